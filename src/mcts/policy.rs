//! MCTS policies: child selection and turning visit counts into moves.
//!
//! - `SelectionPolicy`: which child a simulation descends into (PUCT)
//! - `visit_softmax`: temperature-scaled distribution over root visits
//! - `MoveProbabilities`: the search result, and how the played move is
//!   drawn from it

use serde::{Deserialize, Serialize};

use crate::core::{Cell, GameRng};

use super::config::{MCTSConfig, MoveSelection};
use super::node::NodeId;
use super::tree::MCTSTree;

// =============================================================================
// Selection Policy
// =============================================================================

/// Policy for selecting which child node to explore.
pub trait SelectionPolicy: Send + Sync {
    /// Select a child of `parent`.
    ///
    /// Returns `None` only if `parent` has no children.
    fn select(&self, tree: &MCTSTree, parent: NodeId, config: &MCTSConfig) -> Option<(Cell, NodeId)>;
}

/// PUCT selection policy (Predictor + UCB for Trees).
///
/// Uses prior probabilities from the oracle.
/// Formula: Q(a) + c * P(a) * sqrt(N) / (1 + n(a))
///
/// Ties go to the lowest cell.
#[derive(Clone, Debug, Default)]
pub struct PUCT;

impl PUCT {
    /// PUCT score of a child given its parent's visit count.
    #[must_use]
    pub fn score(mean_value: f64, prior: f64, visits: u32, parent_visits: u32, c_puct: f64) -> f64 {
        let u = c_puct * prior * f64::from(parent_visits).sqrt() / (1.0 + f64::from(visits));
        mean_value + u
    }
}

impl SelectionPolicy for PUCT {
    fn select(&self, tree: &MCTSTree, parent: NodeId, config: &MCTSConfig) -> Option<(Cell, NodeId)> {
        let node = tree.get(parent);
        let mut best: Option<((Cell, NodeId), f64)> = None;

        for &(cell, id) in &node.children {
            let child = tree.get(id);
            let score = Self::score(child.mean_value, child.prior, child.visits, node.visits, config.c_puct);
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some(((cell, id), score));
            }
        }

        best.map(|(choice, _)| choice)
    }
}

// =============================================================================
// Visit distribution
// =============================================================================

/// `p(a) ∝ exp(ln(visits(a) + epsilon) / temperature)`, computed stably.
///
/// A non-positive temperature puts all mass on the most visited entries.
#[must_use]
pub fn visit_softmax(visits: &[u32], temperature: f64, epsilon: f64) -> Vec<f64> {
    if visits.is_empty() {
        return Vec::new();
    }

    if temperature <= 0.0 {
        let max = visits.iter().copied().max().unwrap_or(0);
        let winners = visits.iter().filter(|&&v| v == max).count() as f64;
        return visits
            .iter()
            .map(|&v| if v == max { 1.0 / winners } else { 0.0 })
            .collect();
    }

    let logits: Vec<f64> = visits
        .iter()
        .map(|&v| (f64::from(v) + epsilon).ln() / temperature)
        .collect();
    let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exp: Vec<f64> = logits.iter().map(|l| (l - max).exp()).collect();
    let total: f64 = exp.iter().sum();
    exp.into_iter().map(|e| e / total).collect()
}

// =============================================================================
// Move probabilities
// =============================================================================

/// Search result: a probability for every legal move at the root.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MoveProbabilities {
    /// `(cell, probability)` in ascending cell order.
    moves: Vec<(Cell, f64)>,
}

impl MoveProbabilities {
    /// Build from `(cell, probability)` pairs.
    pub fn new(mut moves: Vec<(Cell, f64)>) -> Self {
        moves.sort_by_key(|(cell, _)| *cell);
        Self { moves }
    }

    /// Number of moves with an entry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// Whether there are no moves.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Iterate over `(cell, probability)`.
    pub fn iter(&self) -> impl Iterator<Item = (Cell, f64)> + '_ {
        self.moves.iter().copied()
    }

    /// Probability of `cell` (0 if absent).
    #[must_use]
    pub fn probability(&self, cell: Cell) -> f64 {
        self.moves
            .binary_search_by_key(&cell, |(c, _)| *c)
            .map_or(0.0, |i| self.moves[i].1)
    }

    /// Dense vector over the whole board, zero for illegal cells.
    #[must_use]
    pub fn to_dense(&self, cells: usize) -> Vec<f32> {
        let mut dense = vec![0.0; cells];
        for &(cell, prob) in &self.moves {
            if let Some(slot) = dense.get_mut(cell.index()) {
                *slot = prob as f32;
            }
        }
        dense
    }

    /// Most probable move; ties go to the lowest cell.
    #[must_use]
    pub fn greedy(&self) -> Option<Cell> {
        let mut best: Option<(Cell, f64)> = None;
        for &(cell, prob) in &self.moves {
            if best.map_or(true, |(_, p)| prob > p) {
                best = Some((cell, prob));
            }
        }
        best.map(|(cell, _)| cell)
    }

    /// Sample a move from the distribution.
    pub fn sample(&self, rng: &mut GameRng) -> Option<Cell> {
        let weights: Vec<f64> = self.moves.iter().map(|(_, p)| *p).collect();
        rng.choose_weighted(&weights)
            .map(|i| self.moves[i].0)
            .or_else(|| self.greedy())
    }

    /// Sample from `(1 - weight) * probs + weight * Dirichlet(alpha)`.
    ///
    /// A non-positive weight draws no noise and behaves exactly like `sample`.
    pub fn sample_noisy(&self, rng: &mut GameRng, alpha: f64, weight: f64) -> Option<Cell> {
        if weight <= 0.0 {
            return self.sample(rng);
        }
        let noise = rng.dirichlet(self.moves.len(), alpha);
        let weights: Vec<f64> = self
            .moves
            .iter()
            .zip(noise)
            .map(|((_, p), n)| (1.0 - weight) * p + weight * n)
            .collect();
        rng.choose_weighted(&weights)
            .map(|i| self.moves[i].0)
            .or_else(|| self.greedy())
    }

    /// Choose the move to play according to `config.move_selection`.
    pub fn choose(&self, config: &MCTSConfig, rng: &mut GameRng) -> Option<Cell> {
        match config.move_selection {
            MoveSelection::NoisySample => {
                self.sample_noisy(rng, config.dirichlet_alpha, config.dirichlet_weight)
            }
            MoveSelection::Sample => self.sample(rng),
            MoveSelection::Greedy => self.greedy(),
        }
    }
}
