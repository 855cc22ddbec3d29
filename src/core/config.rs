//! Board configuration.
//!
//! Passed explicitly into every `GameState`, so games with different
//! board sizes or rules can coexist in one process.

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use super::PlayerId;

/// Board dimensions and rule parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Number of board rows.
    pub rows: usize,

    /// Number of board columns.
    pub cols: usize,

    /// Stones in a row required to win.
    pub win_length: usize,

    /// Past positions per player in the encoded state.
    /// The encoded tensor has `2 * history_depth + 1` planes.
    pub history_depth: usize,

    /// Player who places the first stone.
    pub start_player: PlayerId,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: 9,
            cols: 9,
            win_length: 5,
            history_depth: 3,
            start_player: PlayerId::ONE,
        }
    }
}

impl GameConfig {
    /// Create a config for a `rows x cols` board with default rules.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            ..Self::default()
        }
    }

    /// Set the board dimensions.
    #[must_use]
    pub fn with_board(mut self, rows: usize, cols: usize) -> Self {
        self.rows = rows;
        self.cols = cols;
        self
    }

    /// Set the line length required to win.
    #[must_use]
    pub fn with_win_length(mut self, win_length: usize) -> Self {
        self.win_length = win_length;
        self
    }

    /// Set the number of history planes per player.
    #[must_use]
    pub fn with_history_depth(mut self, depth: usize) -> Self {
        self.history_depth = depth;
        self
    }

    /// Set the starting player.
    #[must_use]
    pub fn with_start_player(mut self, player: PlayerId) -> Self {
        self.start_player = player;
        self
    }

    /// Total number of cells (`rows * cols`), also the action space size.
    #[inline]
    #[must_use]
    pub fn cells(&self) -> usize {
        self.rows * self.cols
    }

    /// Shape of the encoded state: `[2 * history_depth + 1, rows, cols]`.
    #[must_use]
    pub fn encoded_shape(&self) -> Vec<usize> {
        vec![2 * self.history_depth + 1, self.rows, self.cols]
    }

    /// Check that the rules can be played on this board.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.win_length == 0 {
            return Err(ConfigError::ZeroWinLength);
        }
        if self.history_depth == 0 {
            return Err(ConfigError::ZeroHistoryDepth);
        }
        if self.rows < self.win_length || self.cols < self.win_length {
            return Err(ConfigError::BoardTooSmall {
                rows: self.rows,
                cols: self.cols,
                win_length: self.win_length,
            });
        }
        let addressable = self
            .rows
            .checked_mul(self.cols)
            .is_some_and(|cells| cells <= usize::from(u16::MAX));
        if !addressable {
            return Err(ConfigError::BoardTooLarge {
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!((config.rows, config.cols), (9, 9));
        assert_eq!(config.win_length, 5);
        assert_eq!(config.history_depth, 3);
        assert_eq!(config.start_player, PlayerId::ONE);
        assert_eq!(config.cells(), 81);
        assert_eq!(config.encoded_shape(), vec![7, 9, 9]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = GameConfig::default()
            .with_board(15, 15)
            .with_win_length(5)
            .with_history_depth(1)
            .with_start_player(PlayerId::TWO);

        assert_eq!(config.cells(), 225);
        assert_eq!(config.encoded_shape(), vec![3, 15, 15]);
        assert_eq!(config.start_player, PlayerId::TWO);
    }

    #[test]
    fn test_validate_rejects_small_board() {
        let config = GameConfig::new(4, 9);
        assert_eq!(
            config.validate(),
            Err(ConfigError::BoardTooSmall {
                rows: 4,
                cols: 9,
                win_length: 5
            })
        );
    }

    #[test]
    fn test_validate_rejects_zero_parameters() {
        let config = GameConfig::default().with_win_length(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroWinLength));

        let config = GameConfig::default().with_history_depth(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroHistoryDepth));
    }

    #[test]
    fn test_validate_rejects_huge_board() {
        let config = GameConfig::new(300, 300);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BoardTooLarge { .. })
        ));
    }

    #[test]
    fn test_serialization() {
        let config = GameConfig::default().with_start_player(PlayerId::TWO);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: GameConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
