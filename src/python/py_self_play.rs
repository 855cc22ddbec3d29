//! Self-play bindings for Python.

use pyo3::prelude::*;

use crate::mcts::MCTSConfig;
use crate::training::{SelfPlayConfig, SelfPlayWorker};

use super::py_core::PyGameConfig;
use super::py_nn::PyPolicyValueNetwork;
use super::py_training::PyTrajectory;
use super::value_error;

/// Python wrapper for SelfPlayConfig.
#[pyclass(name = "SelfPlayConfig")]
#[derive(Clone)]
pub struct PySelfPlayConfig(pub SelfPlayConfig);

#[pymethods]
impl PySelfPlayConfig {
    /// Create a new self-play configuration.
    ///
    /// # Arguments
    /// - game: Board configuration (default: 9x9, five in a row)
    /// - n_simulate: MCTS simulations per move (default: 500)
    /// - c_puct: Exploration constant (default: 5.0)
    /// - seed_offset: Seed of game `i` is `seed_offset + i` (default: 0)
    #[new]
    #[pyo3(signature = (game = None, n_simulate = 500, c_puct = 5.0, seed_offset = 0))]
    fn new(game: Option<&PyGameConfig>, n_simulate: u32, c_puct: f64, seed_offset: u64) -> Self {
        let mut config = SelfPlayConfig::default()
            .with_mcts(MCTSConfig::for_self_play().with_c_puct(c_puct))
            .with_simulations(n_simulate)
            .with_seed_offset(seed_offset);
        if let Some(game) = game {
            config = config.with_game(game.0);
        }
        Self(config)
    }

    #[getter]
    fn n_simulate(&self) -> u32 {
        self.0.mcts.n_simulate
    }

    #[getter]
    fn c_puct(&self) -> f64 {
        self.0.mcts.c_puct
    }

    #[getter]
    fn seed_offset(&self) -> u64 {
        self.0.seed_offset
    }

    #[getter]
    fn game(&self) -> PyGameConfig {
        PyGameConfig(self.0.game)
    }

    fn __repr__(&self) -> String {
        format!(
            "SelfPlayConfig({}x{}, n_simulate={}, seed_offset={})",
            self.0.game.rows, self.0.game.cols, self.0.mcts.n_simulate, self.0.seed_offset
        )
    }
}

/// Self-play worker driven by a Python oracle.
#[pyclass(name = "SelfPlayWorker")]
pub struct PySelfPlayWorker {
    inner: SelfPlayWorker,
}

#[pymethods]
impl PySelfPlayWorker {
    #[new]
    fn new(config: &PySelfPlayConfig) -> PyResult<Self> {
        let inner = SelfPlayWorker::new(config.0.clone()).map_err(value_error)?;
        Ok(Self { inner })
    }

    /// Play one game and return its trajectory.
    fn play_game(
        &self,
        py: Python<'_>,
        network: &PyPolicyValueNetwork,
        seed: u64,
    ) -> PyResult<PyTrajectory> {
        let oracle = network.oracle.clone();
        py.allow_threads(|| self.inner.play_game(&oracle, seed))
            .map(PyTrajectory)
            .map_err(value_error)
    }

    /// Play `count` games seeded `seed_offset + i`.
    ///
    /// With `parallel`, games run on the rayon pool; the oracle is then
    /// called from several threads, each taking the GIL in turn.
    #[pyo3(signature = (network, count, parallel = false))]
    fn play_games(
        &self,
        py: Python<'_>,
        network: &PyPolicyValueNetwork,
        count: usize,
        parallel: bool,
    ) -> PyResult<Vec<PyTrajectory>> {
        let oracle = network.oracle.clone();
        let trajectories = py
            .allow_threads(|| {
                if parallel {
                    self.inner.play_games_parallel(&oracle, count)
                } else {
                    self.inner.play_games(&oracle, count)
                }
            })
            .map_err(value_error)?;
        Ok(trajectories.into_iter().map(PyTrajectory).collect())
    }

    fn __repr__(&self) -> String {
        let config = self.inner.config();
        format!(
            "SelfPlayWorker({}x{}, n_simulate={})",
            config.game.rows, config.game.cols, config.mcts.n_simulate
        )
    }
}
