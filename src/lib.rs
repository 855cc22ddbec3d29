//! # gomoku-zero
//!
//! A Gomoku engine for AlphaZero-style training: board rules, MCTS guided by
//! an external policy/value oracle, and self-play data generation.
//!
//! ## Design Principles
//!
//! 1. **Oracle at the seam**: The engine never evaluates positions itself.
//!    Every prior and leaf value comes from a `PolicyValueNetwork`, which may
//!    live in Rust, in Python, or behind a socket.
//!
//! 2. **Explicit configuration**: Board size, win length, history depth and
//!    search parameters travel in `GameConfig` / `MCTSConfig` values. There is
//!    no global state.
//!
//! 3. **Deterministic by seed**: Given the same oracle and seed, a search or a
//!    self-play game is reproducible bit for bit.
//!
//! ## Architecture
//!
//! - **Arena MCTS**: Nodes live in a `Vec` addressed by `NodeId`; the tree is
//!   re-rooted after every real move and keeps the chosen subtree.
//!
//! - **Persistent history**: `GameState` keeps its move list in an `im-rs`
//!   vector, so the clone taken at the start of each simulation is cheap.
//!
//! - **Game-level parallelism**: Self-play games run on the rayon pool, each
//!   with its own state, tree and RNG.
//!
//! ## Modules
//!
//! - `core`: Players, cells, board configuration, RNG, game state
//! - `rules`: Line detection and game status
//! - `nn`: Oracle contract and state encoding
//! - `mcts`: Monte Carlo Tree Search
//! - `training`: Self-play workers, trajectories, experience buffer
//! - `play`: Turn-by-turn matches for front ends

pub mod core;
pub mod rules;
pub mod nn;
pub mod mcts;
pub mod training;
pub mod play;

#[cfg(feature = "python")]
pub mod python;

// Re-export commonly used types
pub use crate::core::{
    Cell, ConfigError, GameConfig, GameRng, GameState, IllegalMove, PlayerId, PlayerMap,
    StateError,
};

pub use crate::rules::{GameStatus, RulesError};

pub use crate::nn::{
    EncodedState, Evaluation, OracleError, PerspectiveEncoder, PolicyValueNetwork,
    StateEncoder, UniformFallback, UniformPolicyZeroValue,
};

pub use crate::mcts::{
    MCTSConfig, MCTSNode, MCTSSearch, MCTSTree, MoveProbabilities, MoveSelection, NodeId,
    SearchError, SearchStats, SelectionPolicy, TreeStats, PUCT,
};

pub use crate::training::{
    ExperienceBuffer, SelfPlayConfig, SelfPlayError, SelfPlayWorker, Step, TrainingSample,
    Trajectory, TrajectoryError,
};

pub use crate::play::{ExternalPlayer, Match, PlayError, Player, PlyOutcome, SearchPlayer};
