//! Oracle bindings for Python.

use std::sync::Arc;

use numpy::PyArray1;
use pyo3::prelude::*;

use crate::nn::{EncodedState, Evaluation, OracleError, PolicyValueNetwork};

/// Python wrapper for EncodedState.
#[pyclass(name = "EncodedState")]
#[derive(Clone, Debug)]
pub struct PyEncodedState(pub EncodedState);

#[pymethods]
impl PyEncodedState {
    /// Create a new encoded state from tensor data and shape.
    #[new]
    fn new(tensor: Vec<f32>, shape: Vec<usize>) -> Self {
        Self(EncodedState::new(tensor, shape))
    }

    /// Get the tensor data as a list.
    #[getter]
    fn tensor(&self) -> Vec<f32> {
        self.0.tensor.clone()
    }

    /// Get the tensor shape.
    #[getter]
    fn shape(&self) -> Vec<usize> {
        self.0.shape.clone()
    }

    fn __len__(&self) -> usize {
        self.0.len()
    }

    /// Convert tensor to numpy array (flat).
    fn to_numpy<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f32>> {
        PyArray1::from_slice_bound(py, &self.0.tensor)
    }

    fn __repr__(&self) -> String {
        format!("EncodedState(shape={:?}, len={})", self.0.shape, self.0.len())
    }
}

/// Oracle backed by a Python callable.
///
/// The callable receives an `EncodedState` and returns `(value, policy)`.
/// Exceptions and malformed results become `OracleError::Failed`.
pub struct PythonOracle {
    callback: PyObject,
}

impl PythonOracle {
    pub fn new(callback: PyObject) -> Self {
        Self { callback }
    }
}

impl PolicyValueNetwork for PythonOracle {
    fn predict(&self, encoded: &EncodedState) -> Result<Evaluation, OracleError> {
        Python::with_gil(|py| {
            let result = self
                .callback
                .call1(py, (PyEncodedState(encoded.clone()),))
                .map_err(|e| OracleError::Failed(format!("oracle call raised: {e}")))?;
            let (value, policy): (f32, Vec<f32>) = result
                .extract(py)
                .map_err(|e| OracleError::Failed(format!("expected (value, policy): {e}")))?;
            Ok(Evaluation::new(policy, value))
        })
    }
}

/// Python-implemented policy/value oracle.
#[pyclass(name = "PolicyValueNetwork")]
#[derive(Clone)]
pub struct PyPolicyValueNetwork {
    pub(crate) oracle: Arc<PythonOracle>,
}

#[pymethods]
impl PyPolicyValueNetwork {
    /// Wrap a callable `f(EncodedState) -> (value, policy)`.
    #[new]
    fn new(callback: PyObject) -> Self {
        Self {
            oracle: Arc::new(PythonOracle::new(callback)),
        }
    }

    /// Call the oracle and validate its output for a board of `cells` cells.
    fn predict(&self, encoded: &PyEncodedState, cells: usize) -> PyResult<(f32, Vec<f32>)> {
        let evaluation = self.oracle.predict(&encoded.0).map_err(super::value_error)?;
        evaluation.validate(cells).map_err(super::value_error)?;
        Ok((evaluation.value, evaluation.policy))
    }
}

/// Uniform policy, zero value (for testing).
#[pyclass(name = "UniformPolicy")]
#[derive(Clone)]
pub struct PyUniformPolicy {
    action_space_size: usize,
}

#[pymethods]
impl PyUniformPolicy {
    #[new]
    fn new(action_space_size: usize) -> Self {
        Self { action_space_size }
    }

    fn __call__(&self, _encoded: &PyEncodedState) -> (f32, Vec<f32>) {
        let evaluation = Evaluation::uniform(self.action_space_size);
        (evaluation.value, evaluation.policy)
    }
}
