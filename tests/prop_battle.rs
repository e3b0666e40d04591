//! Property-based checks of the tick rule on arbitrary setups.

use auto_battle::{get_valid_moves, Color, GameState, PieceType};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn setup() -> impl Strategy<Value = GameState> {
    prop::collection::vec((0usize..3, any::<bool>(), 0u8..8, 0u8..8), 0..20).prop_map(|drops| {
        GameState::with_pieces(
            Color::White,
            drops.into_iter().map(|(kind, white, x, y)| {
                let color = if white { Color::White } else { Color::Black };
                (PieceType::ALL[kind], color, x, y)
            }),
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Board and piece list agree, health stays positive, turns alternate.
    #[test]
    fn prop_tick_invariants(state in setup(), seed in any::<u64>()) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut state = state;
        prop_assert!(state.is_consistent());
        for _ in 0..60 {
            let next = state.advance(&mut rng);
            prop_assert!(next.is_consistent());
            prop_assert!(next.pieces().iter().all(|piece| piece.health > 0));
            if state.outcome().is_some() {
                prop_assert_eq!(&next, &state);
                break;
            }
            prop_assert_ne!(next.turn(), state.turn());
            prop_assert!(next.pieces().len() <= state.pieces().len());
            state = next;
        }
    }

    /// Move generation stays on the board and never lands on a friend.
    #[test]
    fn prop_moves_stay_legal(state in setup()) {
        for piece in state.pieces() {
            for to in get_valid_moves(piece, state.board()) {
                prop_assert!(to != piece.position);
                prop_assert!(to.x() < 8 && to.y() < 8);
                if let Some(other) = state.board().get(to) {
                    prop_assert_ne!(other.color, piece.color);
                }
            }
        }
    }
}
