//! Oracle integration.
//!
//! - **Traits**: `PolicyValueNetwork`, the contract for value/policy oracles
//! - **Encoding**: `StateEncoder` and the history-plane `PerspectiveEncoder`
//! - **Baselines**: `UniformPolicyZeroValue` for tests, `UniformFallback`
//!   to degrade gracefully when a real oracle misbehaves
//!
//! ## Usage
//!
//! ```rust
//! use gomoku_zero::core::{GameConfig, GameState};
//! use gomoku_zero::nn::{PerspectiveEncoder, PolicyValueNetwork, StateEncoder, UniformPolicyZeroValue};
//!
//! let config = GameConfig::default();
//! let state = GameState::new(config).unwrap();
//! let encoder = PerspectiveEncoder::from_config(&config);
//! let oracle = UniformPolicyZeroValue::new(config.cells());
//!
//! let evaluation = oracle.predict(&encoder.encode(&state)).unwrap();
//! assert_eq!(evaluation.policy.len(), 81);
//! ```

pub mod encoder;
pub mod traits;

pub use encoder::{PerspectiveEncoder, StateEncoder};
pub use traits::{
    EncodedState, Evaluation, OracleError, PolicyValueNetwork, UniformFallback,
    UniformPolicyZeroValue,
};
