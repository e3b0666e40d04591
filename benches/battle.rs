use auto_battle::{
    config::StrategyKind, create_initial_state, get_valid_moves, utils::run_seeded, Board,
    GameState, RandomStrategy,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn all_moves(state: &GameState) -> usize {
    state
        .pieces()
        .iter()
        .map(|piece| get_valid_moves(piece, state.board()).len())
        .sum()
}

fn short_battle(mut state: GameState, max_steps: usize) -> GameState {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    for _ in 0..max_steps {
        if state.outcome().is_some() {
            break;
        }
        state = state.advance(&mut rng);
    }
    state
}

fn criterion_benchmark(c: &mut Criterion) {
    let initial = create_initial_state();
    c.bench_function("valid moves initial", |b| b.iter(|| all_moves(black_box(&initial))));
    c.bench_function("rebuild board", |b| {
        b.iter(|| Board::from_pieces(black_box(initial.pieces())))
    });
    c.bench_function("single tick", |b| {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        b.iter(|| black_box(&initial).advance(&mut rng))
    });
    c.bench_function("random strategy tick", |b| {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        b.iter(|| black_box(&initial).advance_with(&RandomStrategy, &mut rng))
    });
    c.bench_function("battle 100 ticks", |b| {
        b.iter(|| short_battle(create_initial_state(), 100))
    });
    c.bench_function("seeded game to the end", |b| {
        b.iter(|| run_seeded(black_box(3), StrategyKind::Greedy, 1000))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
