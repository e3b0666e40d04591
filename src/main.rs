use std::thread;
use std::time::Instant;

use anyhow::{bail, Context};
use auto_battle::{
    config::{BattleConfig, StrategyKind},
    create_initial_state, diff,
    utils::{run_to_end, strategy_for, survey},
    Battle, Frame, MoveIndicators, Phase,
};
use clap::{Parser, ValueEnum};
#[allow(unused_imports)]
use log::{debug, error, info, trace, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StrategyArg {
    Greedy,
    Random,
}

/// Watch two armies of pawns, knights and rooks fight it out.
#[derive(Parser, Debug)]
#[command(name = "battle")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Random seed (default: random)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Give up after this many ticks
    #[arg(short = 't', long, default_value_t = auto_battle::config::DEFAULT_MAX_TICKS)]
    max_ticks: u64,

    /// Delay between ticks in milliseconds
    #[arg(short, long, default_value_t = auto_battle::config::TICK_INTERVAL_MS)]
    interval_ms: u64,

    /// Decision rule used by every piece
    #[arg(long, value_enum, default_value = "greedy")]
    strategy: StrategyArg,

    /// Run this many seeded games without delay and print totals
    #[arg(long)]
    survey: Option<u64>,

    /// Only print the result
    #[arg(short, long)]
    quiet: bool,
}

impl From<Args> for BattleConfig {
    fn from(args: Args) -> Self {
        BattleConfig {
            seed: args.seed,
            max_ticks: args.max_ticks,
            tick_interval: std::time::Duration::from_millis(args.interval_ms),
            strategy: match args.strategy {
                StrategyArg::Greedy => StrategyKind::Greedy,
                StrategyArg::Random => StrategyKind::Random,
            },
            survey: args.survey,
            quiet: args.quiet,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).
    let config: BattleConfig = Args::parse().into();
    let seed = config.seed.unwrap_or_else(rand::random);
    info!("Using seed {seed}");

    if let Some(games) = config.survey {
        if games == 0 {
            bail!("Survey needs at least one game");
        }
        let report = survey(seed, games, config.strategy, config.max_ticks);
        println!("{report}");
        return Ok(());
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut battle = Battle::with_strategy(create_initial_state(), strategy_for(config.strategy));
    battle.start().context("Failed to start the battle")?;

    if config.quiet {
        let report = run_to_end(&mut battle, &mut rng, config.max_ticks);
        println!("{report}");
        return Ok(());
    }

    let mut indicators = MoveIndicators::default();
    println!("{}", battle.state());
    while !battle.is_over() && battle.ticks() < config.max_ticks {
        thread::sleep(config.tick_interval);
        let before = battle.state().clone();
        if let Phase::GameOver(outcome) = battle.tick(&mut rng) {
            println!("Game Over! {outcome}!");
            break;
        }
        // the renderer only sees what survives the wire format
        let bytes = battle.frame().to_bytes().context("Failed to encode frame")?;
        trace!("Frame {} encoded to {} bytes", battle.ticks(), bytes.len());
        let frame = Frame::from_bytes(&bytes).context("Failed to decode frame")?;

        let now = Instant::now();
        indicators.prune(now);
        indicators.record(&diff(&before, battle.state()), now);
        print!("{frame}");
        for arrow in indicators.active() {
            println!("  {} {} -> {}", arrow.color, arrow.from, arrow.to);
        }
        println!();
    }
    if !battle.is_over() {
        // the last tick may have emptied a side before the cap stopped the loop
        match battle.outcome() {
            Some(outcome) => println!("Game Over! {outcome}!"),
            None => warn!("Stopped after {} ticks without a winner", battle.ticks()),
        }
    }
    Ok(())
}
