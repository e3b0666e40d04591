use std::{fmt::Display, ops::AddAssign};

#[allow(unused_imports)]
use log::{debug, info, trace};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::StrategyKind;
use crate::core::algorithms::{GreedyStrategy, RandomStrategy, Strategy};
use crate::core::definitions::{diff, TickEvent};
use crate::core::engine::Color;
use crate::core::game::{create_initial_state, Battle, GameState, Outcome};

pub fn strategy_for(kind: StrategyKind) -> Box<dyn Strategy> {
    match kind {
        StrategyKind::Greedy => Box::new(GreedyStrategy),
        StrategyKind::Random => Box::new(RandomStrategy),
    }
}

/// Counters over one or many battles.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BattleReport {
    pub games: u64,
    pub white_wins: u64,
    pub black_wins: u64,
    pub draws: u64,
    /// Games still running when the tick cap was hit.
    pub unfinished: u64,
    pub ticks: u64,
    pub moves: u64,
    pub hits: u64,
    pub captures: u64,
}

impl BattleReport {
    pub fn count_events(&mut self, events: &[TickEvent]) {
        for event in events {
            match event {
                TickEvent::Moved { .. } => self.moves += 1,
                TickEvent::Hit { .. } => self.hits += 1,
                TickEvent::Captured { .. } => self.captures += 1,
            }
        }
    }

    pub fn count_outcome(&mut self, outcome: Option<Outcome>) {
        self.games += 1;
        match outcome {
            Some(Outcome::Winner(Color::White)) => self.white_wins += 1,
            Some(Outcome::Winner(Color::Black)) => self.black_wins += 1,
            Some(Outcome::Draw) => self.draws += 1,
            None => self.unfinished += 1,
        }
    }
}

impl AddAssign for BattleReport {
    fn add_assign(&mut self, rhs: Self) {
        self.games += rhs.games;
        self.white_wins += rhs.white_wins;
        self.black_wins += rhs.black_wins;
        self.draws += rhs.draws;
        self.unfinished += rhs.unfinished;
        self.ticks += rhs.ticks;
        self.moves += rhs.moves;
        self.hits += rhs.hits;
        self.captures += rhs.captures;
    }
}

impl Display for BattleReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} games - W: {:<4} B: {:<4} D: {:<4} ?: {:<4} ticks: {:<6} mv: {:<6} hit: {:<6} cap: {:<6}",
            self.games,
            self.white_wins,
            self.black_wins,
            self.draws,
            self.unfinished,
            self.ticks,
            self.moves,
            self.hits,
            self.captures
        )
    }
}

/// Play `battle` without delays until it ends or `max_ticks` ticks have run.
pub fn run_to_end<R: rand::RngCore>(battle: &mut Battle, rng: &mut R, max_ticks: u64) -> BattleReport {
    let mut report = BattleReport::default();
    if let Err(err) = battle.start() {
        debug!("Resuming battle: {err}");
    }
    while !battle.is_over() && battle.ticks() < max_ticks {
        let before: GameState = battle.state().clone();
        battle.tick(rng);
        report.count_events(&diff(&before, battle.state()));
    }
    report.ticks = battle.ticks();
    report.count_outcome(battle.outcome());
    report
}

/// One seeded game from the starting layout.
pub fn run_seeded(seed: u64, strategy: StrategyKind, max_ticks: u64) -> BattleReport {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut battle = Battle::with_strategy(create_initial_state(), strategy_for(strategy));
    let report = run_to_end(&mut battle, &mut rng, max_ticks);
    trace!("Seed {seed}: {report}");
    report
}

/// Aggregate `games` seeded games, counting seeds up from `first_seed` and
/// wrapping past `u64::MAX`.
pub fn survey(first_seed: u64, games: u64, strategy: StrategyKind, max_ticks: u64) -> BattleReport {
    let mut total = BattleReport::default();
    for seed in (0..games).map(|i| first_seed.wrapping_add(i)) {
        total += run_seeded(seed, strategy, max_ticks);
    }
    info!("Survey done: {total}");
    total
}
