//! Simulation constants and run configuration.

use std::time::Duration;

/// Side length of the square board.
pub const BOARD_SIZE: u8 = 8;

/// Health lost by a piece for every attack it receives.
pub const ATTACK_DAMAGE: u8 = 1;

/// Starting health pools.
pub const PAWN_HEALTH: u8 = 2;
pub const KNIGHT_HEALTH: u8 = 4;
pub const ROOK_HEALTH: u8 = 6;

/// Wall-clock time between two ticks of a running battle.
pub const TICK_INTERVAL_MS: u64 = 1000;

/// Ticks after which a headless run gives up on a stuck battle.
pub const DEFAULT_MAX_TICKS: u64 = 1000;

/// How long a move indicator stays visible.
pub const MOVE_INDICATOR_TTL_MS: u64 = 500;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum StrategyKind {
    #[default]
    Greedy,
    Random,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BattleConfig {
    /// `None` draws a seed from the OS.
    pub seed: Option<u64>,
    pub max_ticks: u64,
    pub tick_interval: Duration,
    pub strategy: StrategyKind,
    /// Number of seeded games to aggregate instead of a single watched run.
    pub survey: Option<u64>,
    pub quiet: bool,
}

impl Default for BattleConfig {
    fn default() -> Self {
        BattleConfig {
            seed: None,
            max_ticks: DEFAULT_MAX_TICKS,
            tick_interval: Duration::from_millis(TICK_INTERVAL_MS),
            strategy: StrategyKind::default(),
            survey: None,
            quiet: false,
        }
    }
}
