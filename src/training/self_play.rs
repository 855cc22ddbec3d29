//! Self-play loop for generating training data.
//!
//! Runs games using MCTS guided by an oracle to generate trajectories for
//! training in an AlphaZero-style loop. Each game owns its state, tree and
//! RNG, so games can run in parallel without sharing anything mutable.

use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::core::{ConfigError, GameConfig, GameRng, GameState, IllegalMove};
use crate::mcts::{MCTSConfig, MCTSSearch, SearchError};
use crate::nn::{PerspectiveEncoder, PolicyValueNetwork, StateEncoder};
use crate::rules::RulesError;

use super::trajectory::{Step, Trajectory, TrajectoryError};

/// Errors that abort a self-play game.
#[derive(Debug, Error)]
pub enum SelfPlayError {
    #[error("search failed: {0}")]
    Search(#[from] SearchError),

    #[error("rules error: {0}")]
    Rules(#[from] RulesError),

    /// The board refused a move the search chose: tree and state disagree.
    #[error("board rejected the searched move: {0}")]
    RejectedMove(IllegalMove),

    #[error("search returned no move at ply {ply}")]
    NoMove { ply: usize },

    #[error(transparent)]
    Trajectory(#[from] TrajectoryError),
}

/// Configuration for self-play.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelfPlayConfig {
    /// Board and rules.
    pub game: GameConfig,

    /// Search parameters. `move_selection` is normally `NoisySample`.
    pub mcts: MCTSConfig,

    /// Seed offset for RNG (combined with game index for unique seeds).
    pub seed_offset: u64,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            mcts: MCTSConfig::for_self_play(),
            seed_offset: 0,
        }
    }
}

impl SelfPlayConfig {
    /// Create a new self-play config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the board configuration.
    #[must_use]
    pub fn with_game(mut self, game: GameConfig) -> Self {
        self.game = game;
        self
    }

    /// Set the search configuration.
    #[must_use]
    pub fn with_mcts(mut self, mcts: MCTSConfig) -> Self {
        self.mcts = mcts;
        self
    }

    /// Set MCTS simulations per move.
    #[must_use]
    pub fn with_simulations(mut self, n_simulate: u32) -> Self {
        self.mcts.n_simulate = n_simulate;
        self
    }

    /// Set seed offset.
    #[must_use]
    pub fn with_seed_offset(mut self, offset: u64) -> Self {
        self.seed_offset = offset;
        self
    }

    /// Seed of the `index`-th game.
    #[must_use]
    pub fn game_seed(&self, index: usize) -> u64 {
        self.seed_offset.wrapping_add(index as u64)
    }
}

/// Worker for running self-play games.
#[derive(Clone, Debug)]
pub struct SelfPlayWorker {
    /// Encoder for recorded states.
    encoder: PerspectiveEncoder,

    /// Empty board every game starts from.
    start: GameState,

    /// Self-play configuration.
    config: SelfPlayConfig,
}

impl SelfPlayWorker {
    /// Create a new self-play worker.
    pub fn new(config: SelfPlayConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            encoder: PerspectiveEncoder::from_config(&config.game),
            start: GameState::new(config.game)?,
            config,
        })
    }

    /// Get the configuration.
    pub fn config(&self) -> &SelfPlayConfig {
        &self.config
    }

    /// Play one game to the end.
    ///
    /// Every position is recorded with the search distribution and the
    /// mover; the outcome is filled in when the game ends.
    pub fn play_game<N>(&self, oracle: &N, seed: u64) -> Result<Trajectory, SelfPlayError>
    where
        N: PolicyValueNetwork + ?Sized,
    {
        let start = Instant::now();
        let cells = self.config.game.cells();

        let mut state = self.start.clone();
        let mut search = MCTSSearch::new(self.config.mcts.clone().with_seed(seed));
        let mut rng = GameRng::new(search.config().seed);
        let mut trajectory = Trajectory::new(seed);

        let status = loop {
            let status = state.status()?;
            if status.is_terminal() {
                break status;
            }

            let ply = state.move_count();
            let player = state.current_player();
            let encoded = self.encoder.encode(&state);

            let probs = search.get_move_probs(&state, oracle)?;
            let cell = probs
                .choose(search.config(), &mut rng)
                .ok_or(SelfPlayError::NoMove { ply })?;

            state.apply_move(cell).map_err(SelfPlayError::RejectedMove)?;
            search.advance_root(cell);

            trajectory.push(Step::new(encoded, probs.to_dense(cells), cell, player, ply));
        };

        trajectory.set_outcome(status)?;

        info!(
            seed,
            moves = trajectory.len(),
            outcome = %status,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "self-play game finished"
        );

        Ok(trajectory)
    }

    /// Play `count` games one after another, seeded `seed_offset + i`.
    pub fn play_games<N>(&self, oracle: &N, count: usize) -> Result<Vec<Trajectory>, SelfPlayError>
    where
        N: PolicyValueNetwork + ?Sized,
    {
        (0..count)
            .map(|i| self.play_game(oracle, self.config.game_seed(i)))
            .collect()
    }

    /// Play `count` games on the rayon pool.
    ///
    /// Results are in game order and identical to `play_games`.
    pub fn play_games_parallel<N>(
        &self,
        oracle: &N,
        count: usize,
    ) -> Result<Vec<Trajectory>, SelfPlayError>
    where
        N: PolicyValueNetwork + ?Sized,
    {
        (0..count)
            .into_par_iter()
            .map(|i| self.play_game(oracle, self.config.game_seed(i)))
            .collect()
    }
}
