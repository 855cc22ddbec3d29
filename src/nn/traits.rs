//! Policy/value oracle contract.
//!
//! The search never trains or owns a model. It hands an encoded position
//! to a `PolicyValueNetwork` and receives a scalar value plus a policy over
//! every cell of the board, legal or not. Outputs are validated before use
//! so a malformed prediction surfaces as an `OracleError` instead of
//! corrupting the tree.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::core::Cell;

/// Encoded game state as a flat tensor for neural network input.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EncodedState {
    /// Flattened tensor data (row-major order).
    pub tensor: Vec<f32>,

    /// Shape of the tensor, `[planes, rows, cols]` for board encodings.
    pub shape: Vec<usize>,
}

impl EncodedState {
    /// Create a new encoded state.
    pub fn new(tensor: Vec<f32>, shape: Vec<usize>) -> Self {
        debug_assert_eq!(
            tensor.len(),
            shape.iter().product::<usize>(),
            "Tensor length must match shape product"
        );
        Self { tensor, shape }
    }

    /// Create a zero-filled encoded state with the given shape.
    pub fn zeros(shape: Vec<usize>) -> Self {
        let size = shape.iter().product();
        Self {
            tensor: vec![0.0; size],
            shape,
        }
    }

    /// Get the total number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tensor.len()
    }

    /// Check if the tensor is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tensor.is_empty()
    }

    /// Get element at a flat index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<f32> {
        self.tensor.get(index).copied()
    }
}

/// Malformed or failed oracle output.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum OracleError {
    #[error("oracle evaluation failed: {0}")]
    Failed(String),

    #[error("policy has {actual} entries, expected {expected}")]
    PolicyLength { expected: usize, actual: usize },

    #[error("policy entry {index} is not finite")]
    NonFinitePolicy { index: usize },

    #[error("policy entry {index} is negative ({prob})")]
    NegativePolicy { index: usize, prob: f32 },

    #[error("value is not finite")]
    NonFiniteValue,

    #[error("value {0} is outside [-1, 1]")]
    ValueOutOfRange(f32),
}

/// One oracle prediction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Prior over every cell of the board, indexed by `Cell::index`.
    pub policy: Vec<f32>,

    /// Expected outcome for the player to move, in `[-1, 1]`.
    pub value: f32,
}

impl Evaluation {
    /// Create an evaluation.
    pub fn new(policy: Vec<f32>, value: f32) -> Self {
        Self { policy, value }
    }

    /// Uniform policy over `cells` entries with value 0.
    pub fn uniform(cells: usize) -> Self {
        let prob = if cells == 0 { 0.0 } else { 1.0 / cells as f32 };
        Self {
            policy: vec![prob; cells],
            value: 0.0,
        }
    }

    /// Check the prediction against a board of `cells` cells.
    pub fn validate(&self, cells: usize) -> Result<(), OracleError> {
        if self.policy.len() != cells {
            return Err(OracleError::PolicyLength {
                expected: cells,
                actual: self.policy.len(),
            });
        }
        for (index, &prob) in self.policy.iter().enumerate() {
            if !prob.is_finite() {
                return Err(OracleError::NonFinitePolicy { index });
            }
            if prob < 0.0 {
                return Err(OracleError::NegativePolicy { index, prob });
            }
        }
        if !self.value.is_finite() {
            return Err(OracleError::NonFiniteValue);
        }
        if !(-1.0..=1.0).contains(&self.value) {
            return Err(OracleError::ValueOutOfRange(self.value));
        }
        Ok(())
    }

    /// Priors restricted to `legal` and renormalised, in the same order.
    ///
    /// If the legal cells carry no probability mass the result is uniform.
    /// Assumes the evaluation has been validated against the board.
    #[must_use]
    pub fn legal_priors(&self, legal: &[Cell]) -> Vec<f64> {
        let masked: Vec<f64> = legal
            .iter()
            .map(|cell| f64::from(self.policy.get(cell.index()).copied().unwrap_or(0.0)))
            .collect();
        let total: f64 = masked.iter().sum();

        if total > 0.0 {
            masked.into_iter().map(|p| p / total).collect()
        } else {
            vec![1.0 / legal.len().max(1) as f64; legal.len()]
        }
    }
}

/// Combined policy-value network.
///
/// Implementations receive the position encoded from the point of view of
/// the player to move and must return a policy with one entry per cell.
pub trait PolicyValueNetwork: Send + Sync {
    /// Predict policy and value for the given state.
    fn predict(&self, encoded: &EncodedState) -> Result<Evaluation, OracleError>;
}

impl<N: PolicyValueNetwork + ?Sized> PolicyValueNetwork for &N {
    fn predict(&self, encoded: &EncodedState) -> Result<Evaluation, OracleError> {
        (**self).predict(encoded)
    }
}

impl<N: PolicyValueNetwork + ?Sized> PolicyValueNetwork for Box<N> {
    fn predict(&self, encoded: &EncodedState) -> Result<Evaluation, OracleError> {
        (**self).predict(encoded)
    }
}

impl<N: PolicyValueNetwork + ?Sized> PolicyValueNetwork for Arc<N> {
    fn predict(&self, encoded: &EncodedState) -> Result<Evaluation, OracleError> {
        (**self).predict(encoded)
    }
}

/// Uniform policy with value 0: the deterministic stub oracle.
#[derive(Clone, Debug, Default)]
pub struct UniformPolicyZeroValue {
    action_space_size: usize,
}

impl UniformPolicyZeroValue {
    /// Create a baseline oracle for a board of `action_space_size` cells.
    pub fn new(action_space_size: usize) -> Self {
        Self { action_space_size }
    }
}

impl PolicyValueNetwork for UniformPolicyZeroValue {
    fn predict(&self, _encoded: &EncodedState) -> Result<Evaluation, OracleError> {
        Ok(Evaluation::uniform(self.action_space_size))
    }
}

/// Wraps an oracle and replaces failed or malformed predictions with a
/// uniform prior and value 0.
#[derive(Clone, Debug)]
pub struct UniformFallback<N> {
    inner: N,
    action_space_size: usize,
}

impl<N: PolicyValueNetwork> UniformFallback<N> {
    /// Wrap `inner` for a board of `action_space_size` cells.
    pub fn new(inner: N, action_space_size: usize) -> Self {
        Self {
            inner,
            action_space_size,
        }
    }

    /// The wrapped oracle.
    pub fn inner(&self) -> &N {
        &self.inner
    }
}

impl<N: PolicyValueNetwork> PolicyValueNetwork for UniformFallback<N> {
    fn predict(&self, encoded: &EncodedState) -> Result<Evaluation, OracleError> {
        let checked = self.inner.predict(encoded).and_then(|evaluation| {
            evaluation.validate(self.action_space_size)?;
            Ok(evaluation)
        });

        match checked {
            Ok(evaluation) => Ok(evaluation),
            Err(error) => {
                warn!(%error, "oracle failed, using uniform prior");
                Ok(Evaluation::uniform(self.action_space_size))
            }
        }
    }
}
