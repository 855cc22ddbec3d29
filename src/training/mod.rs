//! Training data generation.
//!
//! This module provides the data structures and self-play loop for
//! generating training data in an AlphaZero-style training pipeline.
//!
//! ## Overview
//!
//! - **Trajectory**: Records a complete game with states, policies, and outcome
//! - **ExperienceBuffer**: Collects and samples from trajectories
//! - **SelfPlayWorker**: Runs games using MCTS to generate trajectories
//!
//! ## Usage
//!
//! ```rust
//! use gomoku_zero::core::GameConfig;
//! use gomoku_zero::nn::UniformPolicyZeroValue;
//! use gomoku_zero::training::{ExperienceBuffer, SelfPlayConfig, SelfPlayWorker};
//!
//! let game = GameConfig::new(5, 5).with_win_length(4);
//! let config = SelfPlayConfig::default().with_game(game).with_simulations(8);
//! let worker = SelfPlayWorker::new(config).unwrap();
//! let oracle = UniformPolicyZeroValue::new(game.cells());
//!
//! let mut buffer = ExperienceBuffer::new(100);
//! for trajectory in worker.play_games(&oracle, 2).unwrap() {
//!     buffer.push(trajectory).unwrap();
//! }
//!
//! let samples = buffer.sample_batch(16, 0);
//! assert!(!samples.is_empty());
//! ```

pub mod self_play;
pub mod trajectory;

// Re-export main types
pub use self_play::{SelfPlayConfig, SelfPlayError, SelfPlayWorker};
pub use trajectory::{ExperienceBuffer, Step, Trajectory, TrajectoryError, TrainingSample};
