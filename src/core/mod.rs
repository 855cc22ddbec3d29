//! Core types: players, cells, configuration, RNG and the board state.
//!
//! Everything here is independent of the search. Board dimensions and
//! rule parameters travel in `GameConfig` rather than global constants.

pub mod cell;
pub mod config;
pub mod error;
pub mod player;
pub mod rng;
pub mod state;

pub use cell::Cell;
pub use config::GameConfig;
pub use error::{ConfigError, IllegalMove, StateError};
pub use player::{PlayerId, PlayerMap};
pub use rng::GameRng;
pub use state::GameState;
