//! MCTS configuration parameters.

use serde::{Deserialize, Serialize};

/// How the move actually played is drawn from the search distribution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveSelection {
    /// Sample from `(1 - w) * probs + w * Dirichlet(alpha)`. Used in self-play.
    NoisySample,
    /// Sample from the visit distribution.
    #[default]
    Sample,
    /// Take the most probable move.
    Greedy,
}

/// MCTS configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MCTSConfig {
    /// PUCT exploration constant.
    /// Higher values lean on the prior and unvisited moves.
    pub c_puct: f64,

    /// Simulations per requested move.
    pub n_simulate: u32,

    /// Softmax temperature over visit counts. Small values approach greedy.
    pub temperature: f64,

    /// Added to visit counts before the log, so unvisited moves stay finite.
    pub visit_epsilon: f64,

    /// Concentration of the exploration noise.
    pub dirichlet_alpha: f64,

    /// Weight of the noise in the blended self-play distribution.
    pub dirichlet_weight: f64,

    /// Seed of the RNG that draws the played move from the search result.
    /// The search itself is deterministic and does not read it.
    pub seed: u64,

    /// How the played move is chosen.
    pub move_selection: MoveSelection,
}

impl Default for MCTSConfig {
    fn default() -> Self {
        Self {
            c_puct: 5.0,
            n_simulate: 500,
            temperature: 1e-3,
            visit_epsilon: 1e-10,
            dirichlet_alpha: 0.3,
            dirichlet_weight: 0.25,
            seed: 42,
            move_selection: MoveSelection::Sample,
        }
    }
}

impl MCTSConfig {
    /// Config for self-play: noisy sampling, otherwise defaults.
    pub fn for_self_play() -> Self {
        Self::default().with_move_selection(MoveSelection::NoisySample)
    }

    /// Set the exploration constant.
    #[must_use]
    pub fn with_c_puct(mut self, c_puct: f64) -> Self {
        self.c_puct = c_puct;
        self
    }

    /// Set the number of simulations per move.
    #[must_use]
    pub fn with_simulations(mut self, n_simulate: u32) -> Self {
        self.n_simulate = n_simulate;
        self
    }

    /// Set the visit softmax temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the Dirichlet noise parameters.
    #[must_use]
    pub fn with_dirichlet(mut self, alpha: f64, weight: f64) -> Self {
        self.dirichlet_alpha = alpha;
        self.dirichlet_weight = weight;
        self
    }

    /// Set the seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set how the played move is chosen.
    #[must_use]
    pub fn with_move_selection(mut self, selection: MoveSelection) -> Self {
        self.move_selection = selection;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MCTSConfig::default();
        assert_eq!(config.c_puct, 5.0);
        assert_eq!(config.n_simulate, 500);
        assert_eq!(config.temperature, 1e-3);
        assert_eq!(config.dirichlet_alpha, 0.3);
        assert_eq!(config.dirichlet_weight, 0.25);
        assert_eq!(config.seed, 42);
        assert_eq!(config.move_selection, MoveSelection::Sample);
        assert_eq!(
            MCTSConfig::for_self_play().move_selection,
            MoveSelection::NoisySample
        );
    }

    #[test]
    fn test_builder_pattern() {
        let config = MCTSConfig::default()
            .with_c_puct(1.5)
            .with_simulations(64)
            .with_temperature(1.0)
            .with_dirichlet(0.5, 0.1)
            .with_seed(123)
            .with_move_selection(MoveSelection::Greedy);

        assert_eq!(config.c_puct, 1.5);
        assert_eq!(config.n_simulate, 64);
        assert_eq!(config.temperature, 1.0);
        assert_eq!((config.dirichlet_alpha, config.dirichlet_weight), (0.5, 0.1));
        assert_eq!(config.seed, 123);
        assert_eq!(config.move_selection, MoveSelection::Greedy);
    }

    #[test]
    fn test_serialization() {
        let config = MCTSConfig::for_self_play().with_simulations(10);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: MCTSConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
