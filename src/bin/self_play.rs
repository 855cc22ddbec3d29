//! Self-play data generation binary.
//!
//! Plays games of the engine against itself and writes one bincode-encoded
//! `Trajectory` per game. Without a network the search is guided by the
//! uniform-prior, zero-value oracle, which is enough to bootstrap a first
//! training set.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing::info;
use tracing::level_filters::LevelFilter;

use gomoku_zero::nn::UniformPolicyZeroValue;
use gomoku_zero::training::{SelfPlayConfig, SelfPlayWorker};

#[derive(Parser, Debug, Clone)]
#[command(name = "self_play")]
#[command(about = "Generate Gomoku self-play trajectories")]
struct Args {
    /// Number of games to play
    #[arg(long, default_value_t = 1)]
    games: usize,

    /// JSON file holding a full SelfPlayConfig; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// MCTS simulations per move
    #[arg(long)]
    simulations: Option<u32>,

    /// Seed of game i is seed_offset + i
    #[arg(long)]
    seed_offset: Option<u64>,

    /// Board rows
    #[arg(long)]
    rows: Option<usize>,

    /// Board columns
    #[arg(long)]
    cols: Option<usize>,

    /// Stones in a row needed to win
    #[arg(long)]
    win_length: Option<usize>,

    /// Directory the trajectories are written to
    #[arg(long, default_value = "data/self_play")]
    output_dir: PathBuf,

    /// Play games in parallel on all cores
    #[arg(long)]
    parallel: bool,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn validate(&self) -> Result<()> {
        if self.log_level.parse::<LevelFilter>().is_err() {
            return Err(anyhow!(
                "invalid log level '{}', expected one of trace, debug, info, warn, error",
                self.log_level
            ));
        }
        Ok(())
    }

    /// Config file (or defaults) with command-line overrides applied.
    fn self_play_config(&self) -> Result<SelfPlayConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
            }
            None => SelfPlayConfig::default(),
        };

        if let Some(n) = self.simulations {
            config = config.with_simulations(n);
        }
        if let Some(offset) = self.seed_offset {
            config = config.with_seed_offset(offset);
        }
        let rows = self.rows.unwrap_or(config.game.rows);
        let cols = self.cols.unwrap_or(config.game.cols);
        config.game = config.game.with_board(rows, cols);
        if let Some(win_length) = self.win_length {
            config.game = config.game.with_win_length(win_length);
        }

        Ok(config)
    }
}

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    args.validate()?;
    init_tracing(&args.log_level)?;

    let config = args.self_play_config()?;
    info!(
        games = args.games,
        rows = config.game.rows,
        cols = config.game.cols,
        win_length = config.game.win_length,
        simulations = config.mcts.n_simulate,
        parallel = args.parallel,
        "starting self-play"
    );

    let oracle = UniformPolicyZeroValue::new(config.game.cells());
    let worker = SelfPlayWorker::new(config).context("invalid board configuration")?;

    fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("creating {}", args.output_dir.display()))?;

    let start = Instant::now();
    let trajectories = if args.parallel {
        worker.play_games_parallel(&oracle, args.games)?
    } else {
        worker.play_games(&oracle, args.games)?
    };

    let mut samples = 0;
    for trajectory in &trajectories {
        let path = args.output_dir.join(format!("game_{}.bin", trajectory.seed));
        fs::write(&path, trajectory.to_bytes()?)
            .with_context(|| format!("writing {}", path.display()))?;
        samples += trajectory.len();
    }

    info!(
        games = trajectories.len(),
        samples,
        elapsed_ms = start.elapsed().as_millis() as u64,
        output_dir = %args.output_dir.display(),
        "self-play finished"
    );

    Ok(())
}
