//! Game status evaluation.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

use super::lines::completes_line;
use crate::core::{GameState, PlayerId};

/// Result of a position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// The game continues.
    Ongoing,
    /// The board is full with no winning line.
    Draw,
    /// A player completed a line.
    Win(PlayerId),
}

impl GameStatus {
    /// Whether the game is over.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::Ongoing)
    }

    /// The winner, if any.
    #[must_use]
    pub fn winner(self) -> Option<PlayerId> {
        match self {
            GameStatus::Win(player) => Some(player),
            _ => None,
        }
    }

    /// Outcome from `player`'s point of view: `1.0` win, `-1.0` loss,
    /// `0.0` draw or unfinished.
    #[must_use]
    pub fn value_for(self, player: PlayerId) -> f64 {
        match self {
            GameStatus::Win(winner) if winner == player => 1.0,
            GameStatus::Win(_) => -1.0,
            GameStatus::Draw | GameStatus::Ongoing => 0.0,
        }
    }
}

impl std::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameStatus::Ongoing => write!(f, "ongoing"),
            GameStatus::Draw => write!(f, "draw"),
            GameStatus::Win(player) => write!(f, "{player} wins"),
        }
    }
}

/// Rule violations no legal move sequence can produce.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RulesError {
    #[error("both players hold a winning line after {moves} moves")]
    SimultaneousWin { moves: usize },
}

/// Evaluate the status of `state`.
///
/// Only the most recent stone of each player is checked, since any line
/// that existed before it would already have ended the game. No check is
/// made before `2 * win_length - 1` stones are down.
pub fn evaluate(state: &GameState) -> Result<GameStatus, RulesError> {
    let moves = state.move_count();
    let win_length = state.config().win_length;

    if moves > 0 && moves >= (2 * win_length).saturating_sub(1) {
        let last = state.mover_at(moves - 1);
        let previous = last.opponent();

        let wins = |player: PlayerId| {
            state
                .last_move_of(player)
                .is_some_and(|cell| completes_line(state, cell, win_length))
        };

        match (wins(last), wins(previous)) {
            (true, true) => {
                error!(moves, "both players hold a winning line");
                return Err(RulesError::SimultaneousWin { moves });
            }
            (true, false) => return Ok(GameStatus::Win(last)),
            (false, true) => return Ok(GameStatus::Win(previous)),
            (false, false) => {}
        }
    }

    if state.is_full() {
        Ok(GameStatus::Draw)
    } else {
        Ok(GameStatus::Ongoing)
    }
}
