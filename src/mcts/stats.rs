//! MCTS search statistics for diagnostics and tuning.

use serde::{Deserialize, Serialize};

/// Statistics collected during one `get_move_probs` call.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SearchStats {
    /// Simulations performed.
    pub simulations: u32,

    /// Nodes added to the tree.
    pub nodes_expanded: u32,

    /// Oracle evaluations requested.
    pub oracle_calls: u32,

    /// Simulations that ended on a finished game.
    pub terminal_visits: u32,

    /// Deepest leaf reached, relative to the root.
    pub max_depth: u16,

    /// Total time spent searching (microseconds).
    pub time_us: u64,
}

impl SearchStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all statistics to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Calculate simulations per second.
    #[must_use]
    pub fn simulations_per_second(&self) -> f64 {
        if self.time_us == 0 {
            0.0
        } else {
            self.simulations as f64 / (self.time_us as f64 / 1_000_000.0)
        }
    }

    /// Average nodes added per simulation.
    #[must_use]
    pub fn avg_nodes_per_simulation(&self) -> f64 {
        if self.simulations == 0 {
            0.0
        } else {
            self.nodes_expanded as f64 / self.simulations as f64
        }
    }
}
