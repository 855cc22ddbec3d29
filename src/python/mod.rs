//! Python bindings for the gomoku-zero engine.
//!
//! This module provides PyO3 bindings for self-play data generation and for
//! playing against the engine from a Python front end.
//!
//! # Quick Start
//!
//! ```python
//! import gomoku_zero as gz
//!
//! def oracle(encoded):
//!     value, policy = model(encoded.to_numpy().reshape(encoded.shape))
//!     return float(value), list(policy)
//!
//! network = gz.PolicyValueNetwork(oracle)
//! config = gz.SelfPlayConfig(game=gz.GameConfig(9, 9), n_simulate=400)
//! worker = gz.SelfPlayWorker(config)
//!
//! buffer = gz.ExperienceBuffer(5000)
//! for trajectory in worker.play_games(network, 8, parallel=True):
//!     buffer.push(trajectory)
//! states, policies, values = buffer.to_numpy_batch()
//! ```

use std::fmt::Display;

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

mod py_core;
mod py_nn;
mod py_play;
mod py_self_play;
mod py_training;

pub use py_core::*;
pub use py_nn::*;
pub use py_play::*;
pub use py_self_play::*;
pub use py_training::*;

/// Surface an engine error as a Python `ValueError`.
pub(crate) fn value_error(error: impl Display) -> PyErr {
    PyValueError::new_err(error.to_string())
}

/// gomoku_zero: Gomoku engine for AlphaZero-style training.
#[pymodule]
fn gomoku_zero(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Core types
    m.add_class::<PyPlayerId>()?;
    m.add_class::<PyGameConfig>()?;
    m.add_class::<PyGameState>()?;

    // Oracle types
    m.add_class::<PyEncodedState>()?;
    m.add_class::<PyPolicyValueNetwork>()?;
    m.add_class::<PyUniformPolicy>()?;

    // Training types
    m.add_class::<PyStep>()?;
    m.add_class::<PyTrajectory>()?;
    m.add_class::<PyTrainingSample>()?;
    m.add_class::<PyExperienceBuffer>()?;

    // Self-play
    m.add_class::<PySelfPlayConfig>()?;
    m.add_class::<PySelfPlayWorker>()?;

    // Play
    m.add_class::<PyMatch>()?;
    m.add_class::<PyPlyOutcome>()?;

    Ok(())
}
