use std::fmt::{self, Display};

#[allow(unused_imports)]
use log::{debug, info, trace, warn};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::config::ATTACK_DAMAGE;
use crate::core::algorithms::{GreedyStrategy, Strategy};
use crate::core::definitions::Frame;
use crate::core::engine::{Board, Color, Piece, PieceId, PieceType, Position, Template};
use crate::core::utils::is_adjacent;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Winner(Color),
    /// Both colors were wiped out.
    Draw,
}

impl Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Winner(color) => write!(f, "{color} wins"),
            Outcome::Draw => write!(f, "draw"),
        }
    }
}

/// Where a setup drop comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PieceSource {
    Placed(PieceId),
    Bank(Template),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    board: Board,
    pieces: Vec<Piece>,
    turn: Color,
    next_id: u32,
}

/// Starting layout: pawns, a knight and two rooks per side, white to move.
pub fn create_initial_state() -> GameState {
    use Color::*;
    use PieceType::*;
    GameState::with_pieces(
        White,
        [
            (Pawn, White, 3, 6),
            (Pawn, Black, 3, 1),
            (Pawn, White, 4, 6),
            (Pawn, Black, 4, 1),
            (Knight, White, 1, 7),
            (Knight, Black, 1, 0),
            (Rook, White, 0, 7),
            (Rook, Black, 0, 0),
            (Rook, White, 7, 7),
            (Rook, Black, 7, 0),
        ],
    )
}

impl GameState {
    /// Empty board, white to move.
    pub fn new() -> GameState {
        GameState {
            board: Board::new(),
            pieces: Vec::new(),
            turn: Color::White,
            next_id: 0,
        }
    }

    /// Drop fresh pieces in order; a later piece evicts an earlier one on the same cell.
    pub fn with_pieces(
        turn: Color,
        pieces: impl IntoIterator<Item = (PieceType, Color, u8, u8)>,
    ) -> GameState {
        let mut state = GameState {
            turn,
            ..GameState::new()
        };
        for (kind, color, x, y) in pieces {
            state = state.place_piece(
                PieceSource::Bank(Template::new(kind, color)),
                Position::new(x, y),
            );
        }
        state
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Pieces in insertion order.
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.iter().find(|piece| piece.id == id)
    }

    pub fn count(&self, color: Color) -> usize {
        self.pieces.iter().filter(|piece| piece.color == color).count()
    }

    /// Terminal check: set once a color has no pieces left.
    pub fn outcome(&self) -> Option<Outcome> {
        match (self.count(Color::White), self.count(Color::Black)) {
            (0, 0) => Some(Outcome::Draw),
            (0, _) => Some(Outcome::Winner(Color::Black)),
            (_, 0) => Some(Outcome::Winner(Color::White)),
            _ => None,
        }
    }

    /// Every piece sits on its own cell, no cell is claimed twice and all
    /// pieces are alive.
    pub fn is_consistent(&self) -> bool {
        let occupied = self.board.iter_pieces().count();
        occupied == self.pieces.len()
            && self.pieces.iter().all(|piece| {
                piece.health > 0 && self.board.get(piece.position) == Some(piece)
            })
    }

    /// Free setup placement: evicts whatever stands on `target`.
    pub fn place_piece(&self, source: PieceSource, target: Position) -> GameState {
        let mut next = self.clone();
        match source {
            PieceSource::Bank(template) => {
                next.evict(target, None);
                let id = PieceId(next.next_id);
                next.next_id += 1;
                let piece = Piece::new(id, template.kind, template.color, target);
                trace!("Placed {piece} from bank");
                next.pieces.push(piece);
            }
            PieceSource::Placed(id) => {
                let Some(piece) = self.piece(id) else {
                    trace!("Piece {id} is not on the board, nothing to place");
                    return next;
                };
                if piece.position == target {
                    return next;
                }
                next.evict(target, Some(id));
                if let Some(piece) = next.pieces.iter_mut().find(|piece| piece.id == id) {
                    trace!("Moved {piece} to {target}");
                    piece.position = target;
                }
            }
        }
        next.board = Board::from_pieces(&next.pieces);
        next
    }

    /// Delete a placed piece. Bank templates are never on the board.
    pub fn remove_piece(&self, source: PieceSource) -> GameState {
        let mut next = self.clone();
        if let PieceSource::Placed(id) = source {
            next.pieces.retain(|piece| piece.id != id);
            next.board = Board::from_pieces(&next.pieces);
        }
        next
    }

    fn evict(&mut self, target: Position, keep: Option<PieceId>) {
        self.pieces.retain(|piece| {
            let evicted = piece.position == target && Some(piece.id) != keep;
            if evicted {
                trace!("Evicted {piece}");
            }
            !evicted
        });
    }

    /// One tick with the greedy strategy.
    pub fn advance<R: RngCore>(&self, rng: &mut R) -> GameState {
        self.advance_with(&GreedyStrategy, rng)
    }

    /// One tick: every piece of the side to move acts once, in list order,
    /// then the turn passes. A finished game is returned untouched.
    pub fn advance_with(&self, strategy: &dyn Strategy, rng: &mut dyn RngCore) -> GameState {
        if let Some(outcome) = self.outcome() {
            trace!("Tick on a finished game ({outcome}) ignored");
            return self.clone();
        }
        let mut next = self.clone();
        let active: Vec<PieceId> = self
            .pieces
            .iter()
            .filter(|piece| piece.color == self.turn)
            .map(|piece| piece.id)
            .collect();
        for id in active {
            let Some(piece) = next.piece(id).copied() else {
                continue;
            };
            if next.board.get(piece.position) != Some(&piece) {
                trace!("{piece} left the board earlier this tick");
                continue;
            }
            match strategy.choose(&piece, &next.board, &next.pieces, rng) {
                Some(target) => next.resolve(piece, target),
                None => trace!("{piece} has nowhere to go"),
            }
        }
        next.board = Board::from_pieces(&next.pieces);
        next.turn = self.turn.opposite();
        debug_assert!(next.is_consistent(), "Board and piece list diverged!");
        debug!(
            "Tick done: {} white / {} black pieces, {} to move",
            next.count(Color::White),
            next.count(Color::Black),
            next.turn
        );
        next
    }

    /** Apply a chosen destination: enemy cell means attack, empty cell means move. */
    fn resolve(&mut self, piece: Piece, target: Position) {
        let Some(victim) = self.board.get(target).copied() else {
            trace!("{piece} moves to {target}");
            self.relocate(piece, target);
            return;
        };
        assert!(piece.is_enemy(&victim), "That's a bug! Piece attacked teammate!");
        assert!(
            is_adjacent(piece.position, target),
            "Attack target {target} is out of reach of {piece}!"
        );
        let health = victim.health.saturating_sub(ATTACK_DAMAGE);
        if health == 0 {
            trace!("{piece} captures {victim}");
            self.pieces.retain(|other| other.id != victim.id);
            self.board.clear(target);
            self.relocate(piece, target);
        } else {
            trace!("{piece} hits {victim}");
            if let Some(other) = self.pieces.iter_mut().find(|other| other.id == victim.id) {
                other.health = health;
                self.board.put(*other);
            }
        }
    }

    fn relocate(&mut self, piece: Piece, target: Position) {
        self.board.clear(piece.position);
        if let Some(moved) = self.pieces.iter_mut().find(|other| other.id == piece.id) {
            moved.position = target;
            self.board.put(*moved);
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        GameState::new()
    }
}

impl Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board)?;
        writeln!(f, "{} to move", self.turn)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Setup,
    Battling,
    GameOver(Outcome),
}

impl Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Setup => write!(f, "setup"),
            Phase::Battling => write!(f, "battling"),
            Phase::GameOver(outcome) => write!(f, "over ({outcome})"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupError {
    /// Setup edits and the start signal are only accepted before the battle.
    Closed(Phase),
}

impl Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupError::Closed(phase) => write!(f, "setup is closed, battle is {phase}"),
        }
    }
}

impl std::error::Error for SetupError {}

/// A session: free setup, then an autonomous battle driven by `tick`.
#[derive(Debug)]
pub struct Battle {
    state: GameState,
    phase: Phase,
    ticks: u64,
    strategy: Box<dyn Strategy>,
}

impl Battle {
    pub fn new(state: GameState) -> Battle {
        Battle::with_strategy(state, Box::new(GreedyStrategy))
    }

    pub fn with_strategy(state: GameState, strategy: Box<dyn Strategy>) -> Battle {
        Battle {
            state,
            phase: Phase::Setup,
            ticks: 0,
            strategy,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, Phase::GameOver(_))
    }

    /// Result of the fight, known as soon as a side is wiped out even if the
    /// phase only flips on the following tick.
    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            Phase::Setup => None,
            Phase::Battling => self.state.outcome(),
            Phase::GameOver(outcome) => Some(outcome),
        }
    }

    fn ensure_setup(&self) -> Result<(), SetupError> {
        if self.phase == Phase::Setup {
            Ok(())
        } else {
            Err(SetupError::Closed(self.phase))
        }
    }

    pub fn place_piece(&mut self, source: PieceSource, target: Position) -> Result<(), SetupError> {
        self.ensure_setup()?;
        self.state = self.state.place_piece(source, target);
        Ok(())
    }

    pub fn remove_piece(&mut self, source: PieceSource) -> Result<(), SetupError> {
        self.ensure_setup()?;
        self.state = self.state.remove_piece(source);
        Ok(())
    }

    /// Close setup for good and let the pieces fight.
    pub fn start(&mut self) -> Result<(), SetupError> {
        self.ensure_setup()?;
        info!(
            "Battle starts: {} white vs {} black pieces",
            self.state.count(Color::White),
            self.state.count(Color::Black)
        );
        self.phase = Phase::Battling;
        Ok(())
    }

    /// Run one tick. Ticks outside of the battle phase change nothing.
    pub fn tick<R: RngCore>(&mut self, rng: &mut R) -> Phase {
        match self.phase {
            Phase::Setup => {
                warn!("Tick requested before the battle started");
                return self.phase;
            }
            Phase::GameOver(_) => return self.phase,
            Phase::Battling => (),
        }
        if let Some(outcome) = self.state.outcome() {
            info!("Game over after {} ticks: {outcome}", self.ticks);
            self.phase = Phase::GameOver(outcome);
            return self.phase;
        }
        self.state = self.state.advance_with(self.strategy.as_ref(), rng);
        self.ticks += 1;
        self.phase
    }

    /// Snapshot for the presentation layer.
    pub fn frame(&self) -> Frame {
        Frame::new(self.ticks, self.phase, &self.state)
    }
}
