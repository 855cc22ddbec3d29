//! Training data type bindings for Python.

use numpy::{PyArray1, PyArray2, PyArrayMethods};
use pyo3::prelude::*;
use pyo3::types::PyBytes;

use crate::training::{ExperienceBuffer, Step, TrainingSample, Trajectory};

use super::py_core::{status_tuple, PyPlayerId};
use super::py_nn::PyEncodedState;
use super::value_error;

/// Python wrapper for Step.
#[pyclass(name = "Step")]
#[derive(Clone)]
pub struct PyStep(pub Step);

#[pymethods]
impl PyStep {
    /// Get the encoded state at this step.
    #[getter]
    fn encoded_state(&self) -> PyEncodedState {
        PyEncodedState(self.0.encoded_state.clone())
    }

    /// Search probabilities over every cell, as numpy.
    fn move_probs<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f32>> {
        PyArray1::from_slice_bound(py, &self.0.move_probs)
    }

    /// Flat index of the move played.
    #[getter]
    fn action(&self) -> u16 {
        self.0.action.0
    }

    /// Get the player who acted.
    #[getter]
    fn player(&self) -> PyPlayerId {
        PyPlayerId(self.0.player)
    }

    /// Get the move number within the game.
    #[getter]
    fn move_number(&self) -> usize {
        self.0.move_number
    }

    fn __repr__(&self) -> String {
        format!(
            "Step(move={}, player={}, action={})",
            self.0.move_number, self.0.player, self.0.action.0
        )
    }
}

/// Python wrapper for Trajectory.
#[pyclass(name = "Trajectory")]
#[derive(Clone)]
pub struct PyTrajectory(pub Trajectory);

#[pymethods]
impl PyTrajectory {
    /// Get all steps in this trajectory.
    #[getter]
    fn steps(&self) -> Vec<PyStep> {
        self.0.steps.iter().map(|s| PyStep(s.clone())).collect()
    }

    /// `(status, winner)` of the finished game, or `None` if unresolved.
    #[getter]
    fn outcome(&self) -> Option<(&'static str, Option<u8>)> {
        self.0.outcome().map(status_tuple)
    }

    #[getter]
    fn winner(&self) -> Option<u8> {
        self.0.winner().map(|player| player.id())
    }

    /// Get the RNG seed used for this game.
    #[getter]
    fn seed(&self) -> u64 {
        self.0.seed
    }

    fn __len__(&self) -> usize {
        self.0.len()
    }

    /// Get steps for a specific player.
    fn player_steps(&self, player: &PyPlayerId) -> Vec<PyStep> {
        self.0
            .player_steps(player.0)
            .map(|s| PyStep(s.clone()))
            .collect()
    }

    /// Convert to training samples labelled with the final outcome.
    fn to_training_samples(&self) -> PyResult<Vec<PyTrainingSample>> {
        let samples = self.0.to_training_samples().map_err(value_error)?;
        Ok(samples.into_iter().map(PyTrainingSample).collect())
    }

    /// Serialize with bincode.
    fn to_bytes<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyBytes>> {
        let bytes = self.0.to_bytes().map_err(value_error)?;
        Ok(PyBytes::new_bound(py, &bytes))
    }

    #[staticmethod]
    fn from_bytes(bytes: &[u8]) -> PyResult<Self> {
        Trajectory::from_bytes(bytes).map(Self).map_err(value_error)
    }

    fn __repr__(&self) -> String {
        format!("Trajectory(steps={}, seed={})", self.0.len(), self.0.seed)
    }
}

/// Python wrapper for TrainingSample.
#[pyclass(name = "TrainingSample")]
#[derive(Clone)]
pub struct PyTrainingSample(pub TrainingSample);

#[pymethods]
impl PyTrainingSample {
    /// Get the encoded state.
    #[getter]
    fn state(&self) -> PyEncodedState {
        PyEncodedState(self.0.state.clone())
    }

    /// Get the target policy (MCTS visit distribution).
    #[getter]
    fn policy(&self) -> Vec<f32> {
        self.0.policy.clone()
    }

    /// Get the target value (game outcome from this player's perspective).
    #[getter]
    fn value(&self) -> f32 {
        self.0.value
    }

    #[getter]
    fn player(&self) -> PyPlayerId {
        PyPlayerId(self.0.player)
    }

    /// Get state tensor as numpy array.
    fn state_numpy<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f32>> {
        PyArray1::from_slice_bound(py, &self.0.state.tensor)
    }

    /// Get policy as numpy array.
    fn policy_numpy<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f32>> {
        PyArray1::from_slice_bound(py, &self.0.policy)
    }

    fn __repr__(&self) -> String {
        format!(
            "TrainingSample(player={}, value={:.0}, state_dim={})",
            self.0.player,
            self.0.value,
            self.0.state.len()
        )
    }
}

/// Python wrapper for ExperienceBuffer.
#[pyclass(name = "ExperienceBuffer")]
pub struct PyExperienceBuffer {
    inner: ExperienceBuffer,
}

#[pymethods]
impl PyExperienceBuffer {
    /// Create a new experience buffer with maximum capacity.
    #[new]
    #[pyo3(signature = (max_trajectories = 10_000))]
    fn new(max_trajectories: usize) -> Self {
        Self {
            inner: ExperienceBuffer::new(max_trajectories),
        }
    }

    /// Add a finished trajectory to the buffer.
    fn push(&mut self, trajectory: &PyTrajectory) -> PyResult<()> {
        self.inner.push(trajectory.0.clone()).map_err(value_error)
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }

    #[getter]
    fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    /// Total number of steps across every stored trajectory.
    fn total_steps(&self) -> usize {
        self.inner.total_steps()
    }

    fn clear(&mut self) {
        self.inner.clear();
    }

    /// Sample a random batch of training samples.
    fn sample_batch(&self, batch_size: usize, seed: u64) -> Vec<PyTrainingSample> {
        self.inner
            .sample_batch(batch_size, seed)
            .into_iter()
            .map(PyTrainingSample)
            .collect()
    }

    /// All samples as `(states, policies, values)` numpy arrays:
    /// `[N, state_dim]`, `[N, cells]` and `[N]`, all float32.
    fn to_numpy_batch<'py>(
        &self,
        py: Python<'py>,
    ) -> PyResult<(
        Bound<'py, PyArray2<f32>>,
        Bound<'py, PyArray2<f32>>,
        Bound<'py, PyArray1<f32>>,
    )> {
        let samples = self.inner.to_training_samples();
        let n = samples.len();
        let state_dim = samples.first().map_or(0, |s| s.state.len());
        let policy_dim = samples.first().map_or(0, |s| s.policy.len());

        let mut states: Vec<f32> = Vec::with_capacity(n * state_dim);
        let mut policies: Vec<f32> = Vec::with_capacity(n * policy_dim);
        let mut values: Vec<f32> = Vec::with_capacity(n);

        for (i, sample) in samples.iter().enumerate() {
            if sample.state.len() != state_dim || sample.policy.len() != policy_dim {
                return Err(value_error(format!(
                    "sample {i} does not match the board of the first sample"
                )));
            }
            states.extend_from_slice(&sample.state.tensor);
            policies.extend_from_slice(&sample.policy);
            values.push(sample.value);
        }

        let states = PyArray1::from_vec_bound(py, states)
            .reshape([n, state_dim])
            .map_err(value_error)?;
        let policies = PyArray1::from_vec_bound(py, policies)
            .reshape([n, policy_dim])
            .map_err(value_error)?;
        Ok((states, policies, PyArray1::from_vec_bound(py, values)))
    }

    fn __repr__(&self) -> String {
        format!(
            "ExperienceBuffer(len={}, capacity={})",
            self.inner.len(),
            self.inner.capacity()
        )
    }
}
