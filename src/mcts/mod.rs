//! Monte Carlo Tree Search guided by a policy/value oracle.
//!
//! ## Overview
//!
//! - **Arena tree**: nodes addressed by `NodeId`, each storing its parent
//! - **PUCT selection**: oracle priors steer exploration
//! - **Oracle leaves**: no rollouts; leaf values come from the oracle, or
//!   from the rules when the game is over
//! - **Tree reuse**: `advance_root` keeps the subtree of the move played
//!
//! ## Usage
//!
//! ```rust
//! use gomoku_zero::core::{GameConfig, GameRng, GameState};
//! use gomoku_zero::mcts::{MCTSConfig, MCTSSearch};
//! use gomoku_zero::nn::UniformPolicyZeroValue;
//!
//! let game = GameConfig::default();
//! let mut state = GameState::new(game).unwrap();
//! let oracle = UniformPolicyZeroValue::new(game.cells());
//!
//! let config = MCTSConfig::default().with_simulations(50);
//! let mut rng = GameRng::new(config.seed);
//! let mut search = MCTSSearch::new(config);
//!
//! let probs = search.get_move_probs(&state, &oracle).unwrap();
//! let cell = probs.choose(search.config(), &mut rng).unwrap();
//!
//! state.apply_move(cell).unwrap();
//! search.advance_root(cell);
//! ```

pub mod config;
pub mod node;
pub mod policy;
pub mod search;
pub mod stats;
pub mod tree;

// Re-export main types
pub use config::{MCTSConfig, MoveSelection};
pub use node::{MCTSNode, NodeId};
pub use policy::{visit_softmax, MoveProbabilities, SelectionPolicy, PUCT};
pub use search::{MCTSSearch, SearchError};
pub use stats::SearchStats;
pub use tree::{MCTSTree, TreeStats};
