//! Gomoku rules: line detection and game status.
//!
//! A player wins by owning `win_length` or more contiguous stones along a
//! row, column or diagonal. A full board without a winning line is a draw.

pub mod lines;
pub mod status;

pub use lines::{completes_line, longest_run, run_length, AXES};
pub use status::{evaluate, GameStatus, RulesError};
