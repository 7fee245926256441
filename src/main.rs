use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use neuro_snake::evolution::{GameEnd, TrainConfig};
use neuro_snake::game::GameConfig;
use neuro_snake::modes::{EvaluateConfig, EvaluateMode, TrainMode};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "neuro_snake")]
#[command(version, about = "Multi-snake simulator with genetically evolved controllers")]
struct Cli {
    /// Log at debug level (per-game results)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Evolve controllers and save the best one every generation
    Train {
        /// Number of generations to run
        #[arg(short, long, default_value = "100")]
        generations: usize,

        /// Controllers per generation (multiple of 4)
        #[arg(short, long, default_value = "100")]
        population: usize,

        /// Weights file; an existing file seeds the first generation
        #[arg(short, long, default_value = "models/best.dat")]
        output: PathBuf,

        /// Games each controller plays per generation
        #[arg(long, default_value = "1")]
        rounds: usize,

        /// Worker threads playing games
        #[arg(long, default_value = "4")]
        workers: usize,

        /// When a game stops
        #[arg(long, default_value = "last-survivor")]
        game_end: EndRule,

        /// Log every game's final board
        #[arg(long)]
        snapshot: bool,

        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,

        /// Grid width
        #[arg(long, default_value = "11")]
        width: usize,

        /// Grid height
        #[arg(long, default_value = "11")]
        height: usize,
    },

    /// Play games with a trained controller
    Evaluate {
        /// Weights file to load
        #[arg(short, long, default_value = "models/best.dat")]
        weights: PathBuf,

        /// Number of games
        #[arg(long, default_value = "1")]
        games: usize,

        /// Add an opponent that moves randomly among its legal moves
        #[arg(long)]
        opponent: bool,

        /// Print scores and the board every turn
        #[arg(long)]
        show: bool,

        /// Milliseconds between turns with --show
        #[arg(long, default_value = "100")]
        delay_ms: u64,

        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,

        /// Grid width
        #[arg(long, default_value = "11")]
        width: usize,

        /// Grid height
        #[arg(long, default_value = "11")]
        height: usize,
    },
}

#[derive(Clone, ValueEnum)]
enum EndRule {
    /// Stop once at most one snake is alive
    LastSurvivor,
    /// Stop once every snake has died
    Extinction,
}

impl From<EndRule> for GameEnd {
    fn from(rule: EndRule) -> Self {
        match rule {
            EndRule::LastSurvivor => GameEnd::LastSurvivor,
            EndRule::Extinction => GameEnd::Extinction,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match cli.command {
        Command::Train {
            generations,
            population,
            output,
            rounds,
            workers,
            game_end,
            snapshot,
            seed,
            width,
            height,
        } => {
            let mut config = TrainConfig::new(generations, population, output);
            config.rounds = rounds;
            config.workers = workers;
            config.game_end = game_end.into();
            config.snapshot = snapshot;
            config.seed = seed;
            config.game_config = GameConfig::new(width, height);

            let mut train_mode = TrainMode::new(config)?;
            train_mode.run()?;
        }
        Command::Evaluate {
            weights,
            games,
            opponent,
            show,
            delay_ms,
            seed,
            width,
            height,
        } => {
            let mut config = EvaluateConfig::new(weights);
            config.games = games;
            config.opponent = opponent;
            config.verbose = show;
            config.delay = Duration::from_millis(delay_ms);
            config.seed = seed;
            config.game_config = GameConfig::new(width, height);

            let mut evaluate_mode = EvaluateMode::new(config)?;
            evaluate_mode.run();
        }
    }

    Ok(())
}
