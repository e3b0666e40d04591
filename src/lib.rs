pub mod config;
pub mod core;
pub mod utils;

// module re-exports
pub use self::core::algorithms::{GreedyStrategy, RandomStrategy, Strategy};
pub use self::core::definitions::{diff, ui_board, Cell, Figure, Frame, MoveIndicator, MoveIndicators, TickEvent};
pub use self::core::engine::{get_valid_moves, Board, Color, Piece, PieceId, PieceType, Position, Template};
pub use self::core::game::{create_initial_state, Battle, GameState, Outcome, Phase, PieceSource, SetupError};
