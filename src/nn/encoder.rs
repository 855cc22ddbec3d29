//! State encoding for neural network input.
//!
//! Transforms a `GameState` into the tensor the oracle consumes.

use crate::core::{GameConfig, GameState};
use crate::nn::traits::EncodedState;

/// Encodes game state into tensors for neural network input.
pub trait StateEncoder: Send + Sync {
    /// Encode the position from the point of view of the player to move.
    fn encode(&self, state: &GameState) -> EncodedState;

    /// Shape of encoded states on a board with this configuration.
    fn output_shape(&self, config: &GameConfig) -> Vec<usize>;

    /// Size of the policy output on a board with this configuration.
    fn action_space_size(&self, config: &GameConfig) -> usize {
        config.cells()
    }
}

/// History-plane encoder.
///
/// Produces `2 * history_depth + 1` planes of `rows x cols`: alternating
/// own/opponent occupancy planes for the last `history_depth` moves of
/// each player, and a constant plane marking whether the player to move
/// started the game. See `GameState::encode_perspective`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PerspectiveEncoder {
    history_depth: usize,
}

impl PerspectiveEncoder {
    /// Create an encoder keeping `history_depth` positions per player.
    pub fn new(history_depth: usize) -> Self {
        Self { history_depth }
    }

    /// Encoder matching the config's history depth.
    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.history_depth)
    }

    /// Positions kept per player.
    #[must_use]
    pub fn history_depth(&self) -> usize {
        self.history_depth
    }
}

impl Default for PerspectiveEncoder {
    fn default() -> Self {
        Self::from_config(&GameConfig::default())
    }
}

impl StateEncoder for PerspectiveEncoder {
    fn encode(&self, state: &GameState) -> EncodedState {
        EncodedState::new(
            state.encode_perspective(self.history_depth),
            self.output_shape(state.config()),
        )
    }

    fn output_shape(&self, config: &GameConfig) -> Vec<usize> {
        vec![2 * self.history_depth + 1, config.rows, config.cols]
    }
}
