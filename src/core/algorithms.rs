use std::fmt::Debug;

use rand::seq::SliceRandom;
use rand::RngCore;

use crate::core::engine::{get_valid_moves, Board, Piece, Position};
use crate::core::utils::{distance, is_adjacent};

/// Decision rule consulted once per active piece and tick.
///
/// The returned destination must be one of the piece's legal destinations,
/// either empty or holding an adjacent enemy. An enemy cell is resolved as an
/// attack, an empty cell as a move. `None` leaves the piece idle.
pub trait Strategy: Debug {
    fn choose(
        &self,
        piece: &Piece,
        board: &Board,
        pieces: &[Piece],
        rng: &mut dyn RngCore,
    ) -> Option<Position>;
}

/// Legal destinations split into attack targets and free cells.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Destinations {
    pub attacks: Vec<Position>,
    pub moves: Vec<Position>,
}

/// Partition the legal destinations of `piece`. Enemy cells out of adjacency
/// reach (the far end of a rook ray) are neither attacks nor moves.
pub fn destinations(piece: &Piece, board: &Board) -> Destinations {
    let mut result = Destinations::default();
    for pos in get_valid_moves(piece, board) {
        if board.is_empty_at(pos) {
            result.moves.push(pos);
        } else if board.is_enemy_at(pos, piece.color) && is_adjacent(piece.position, pos) {
            result.attacks.push(pos);
        }
    }
    result
}

/// Whether stepping to `to` brings `piece` strictly closer to some enemy.
pub fn is_advancing(piece: &Piece, to: Position, pieces: &[Piece]) -> bool {
    pieces
        .iter()
        .filter(|other| other.is_enemy(piece))
        .any(|enemy| distance(to, enemy.position) < distance(piece.position, enemy.position))
}

/// Attack an adjacent enemy when possible, otherwise close in on the nearest
/// enemies, otherwise wander.
#[derive(Debug, Default, Clone, Copy)]
pub struct GreedyStrategy;

impl Strategy for GreedyStrategy {
    fn choose(
        &self,
        piece: &Piece,
        board: &Board,
        pieces: &[Piece],
        rng: &mut dyn RngCore,
    ) -> Option<Position> {
        let Destinations { attacks, moves } = destinations(piece, board);
        if !attacks.is_empty() {
            return attacks.choose(rng).copied();
        }
        let advancing: Vec<_> = moves
            .iter()
            .copied()
            .filter(|&to| is_advancing(piece, to, pieces))
            .collect();
        if advancing.is_empty() {
            moves.choose(rng).copied()
        } else {
            advancing.choose(rng).copied()
        }
    }
}

/// Uniform choice among every attack and move, without preference.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomStrategy;

impl Strategy for RandomStrategy {
    fn choose(
        &self,
        piece: &Piece,
        board: &Board,
        _pieces: &[Piece],
        rng: &mut dyn RngCore,
    ) -> Option<Position> {
        let Destinations { mut attacks, moves } = destinations(piece, board);
        attacks.extend(moves);
        attacks.choose(rng).copied()
    }
}
