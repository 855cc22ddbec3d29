//! Trajectory and experience buffer for training data collection.
//!
//! A trajectory records a complete self-play game, capturing:
//! - Encoded states at each decision point
//! - MCTS move probabilities (the "target" policy)
//! - Moves actually played
//! - Final game outcome for value targets

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{Cell, GameRng, PlayerId};
use crate::nn::EncodedState;
use crate::rules::GameStatus;

/// Errors raised when converting or storing trajectories.
#[derive(Debug, Error)]
pub enum TrajectoryError {
    #[error("trajectory has no final outcome")]
    Unresolved,

    #[error("trajectory encoding failed: {0}")]
    Codec(#[from] bincode::Error),
}

/// A single step in a trajectory.
///
/// Captures the state, MCTS policy, and move played at one decision point.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Encoded game state from the mover's perspective.
    pub encoded_state: EncodedState,

    /// MCTS move probabilities over every cell (target for the policy head).
    pub move_probs: Vec<f32>,

    /// The move that was actually played.
    pub action: Cell,

    /// The player who made this decision.
    pub player: PlayerId,

    /// Move number in the game (0-indexed).
    pub move_number: usize,
}

impl Step {
    /// Create a new step.
    pub fn new(
        encoded_state: EncodedState,
        move_probs: Vec<f32>,
        action: Cell,
        player: PlayerId,
        move_number: usize,
    ) -> Self {
        Self {
            encoded_state,
            move_probs,
            action,
            player,
            move_number,
        }
    }

    /// Probability the search assigned to the move played.
    pub fn taken_action_prob(&self) -> f32 {
        self.move_probs.get(self.action.index()).copied().unwrap_or(0.0)
    }
}

/// A complete game trajectory from self-play.
///
/// Contains all decision points and, once the game is over, its outcome.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    /// All steps in the game.
    pub steps: Vec<Step>,

    /// Final result; `None` until the game ends.
    outcome: Option<GameStatus>,

    /// Random seed used for this game.
    pub seed: u64,
}

impl Trajectory {
    /// Create a new trajectory.
    pub fn new(seed: u64) -> Self {
        Self {
            steps: Vec::new(),
            outcome: None,
            seed,
        }
    }

    /// Add a step to the trajectory.
    pub fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    /// Record the final result.
    ///
    /// `GameStatus::Ongoing` is not a result and is refused.
    pub fn set_outcome(&mut self, status: GameStatus) -> Result<(), TrajectoryError> {
        if !status.is_terminal() {
            return Err(TrajectoryError::Unresolved);
        }
        self.outcome = Some(status);
        Ok(())
    }

    /// The final result, if the game has ended.
    pub fn outcome(&self) -> Option<GameStatus> {
        self.outcome
    }

    /// Whether the outcome is known.
    pub fn is_resolved(&self) -> bool {
        self.outcome.is_some()
    }

    /// The winner, if the game ended with one.
    pub fn winner(&self) -> Option<PlayerId> {
        self.outcome.and_then(GameStatus::winner)
    }

    /// Get the number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check if trajectory is empty.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Get steps for a specific player.
    pub fn player_steps(&self, player: PlayerId) -> impl Iterator<Item = &Step> {
        self.steps.iter().filter(move |s| s.player == player)
    }

    /// Outcome label for `player`: `1` win, `-1` loss, `0` draw.
    pub fn player_outcome(&self, player: PlayerId) -> Result<f32, TrajectoryError> {
        let outcome = self.outcome.ok_or(TrajectoryError::Unresolved)?;
        Ok(outcome.value_for(player) as f32)
    }

    /// Convert to training samples.
    ///
    /// Each sample's value is the outcome from the mover's perspective.
    /// Fails if the game has not ended.
    pub fn to_training_samples(&self) -> Result<Vec<TrainingSample>, TrajectoryError> {
        let outcome = self.outcome.ok_or(TrajectoryError::Unresolved)?;
        Ok(self
            .steps
            .iter()
            .map(|step| TrainingSample {
                state: step.encoded_state.clone(),
                policy: step.move_probs.clone(),
                value: outcome.value_for(step.player) as f32,
                player: step.player,
            })
            .collect())
    }

    /// Serialize with bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>, TrajectoryError> {
        Ok(bincode::serialize(self)?)
    }

    /// Deserialize from bincode.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TrajectoryError> {
        Ok(bincode::deserialize(bytes)?)
    }
}

/// A single training sample extracted from a trajectory.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainingSample {
    /// Encoded game state.
    pub state: EncodedState,

    /// Target policy (MCTS visit distribution over every cell).
    pub policy: Vec<f32>,

    /// Target value (game outcome for `player`).
    pub value: f32,

    /// Player whose perspective this is from.
    pub player: PlayerId,
}

/// Buffer for storing trajectories during training.
///
/// Uses a FIFO strategy: when full, oldest trajectories are removed.
/// Only finished games are accepted.
#[derive(Clone, Debug)]
pub struct ExperienceBuffer {
    trajectories: VecDeque<Trajectory>,
    max_trajectories: usize,
}

impl ExperienceBuffer {
    /// Create a new experience buffer.
    pub fn new(max_trajectories: usize) -> Self {
        Self {
            trajectories: VecDeque::with_capacity(max_trajectories),
            max_trajectories,
        }
    }

    /// Add a finished trajectory to the buffer.
    ///
    /// If the buffer is full, the oldest trajectory is removed.
    pub fn push(&mut self, trajectory: Trajectory) -> Result<(), TrajectoryError> {
        if !trajectory.is_resolved() {
            return Err(TrajectoryError::Unresolved);
        }
        if self.max_trajectories == 0 {
            return Ok(());
        }
        if self.trajectories.len() >= self.max_trajectories {
            self.trajectories.pop_front();
        }
        self.trajectories.push_back(trajectory);
        Ok(())
    }

    /// Get the number of trajectories in the buffer.
    pub fn len(&self) -> usize {
        self.trajectories.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.trajectories.is_empty()
    }

    /// Get the maximum capacity.
    pub fn capacity(&self) -> usize {
        self.max_trajectories
    }

    /// Clear all trajectories.
    pub fn clear(&mut self) {
        self.trajectories.clear();
    }

    /// Get an iterator over trajectories.
    pub fn iter(&self) -> impl Iterator<Item = &Trajectory> {
        self.trajectories.iter()
    }

    /// Get the total number of steps across all trajectories.
    pub fn total_steps(&self) -> usize {
        self.trajectories.iter().map(|t| t.len()).sum()
    }

    /// Extract all training samples from the buffer.
    pub fn to_training_samples(&self) -> Vec<TrainingSample> {
        self.trajectories
            .iter()
            .filter_map(|t| t.to_training_samples().ok())
            .flatten()
            .collect()
    }

    /// Sample a random batch of training samples.
    ///
    /// Uses the provided RNG seed for reproducibility.
    pub fn sample_batch(&self, batch_size: usize, seed: u64) -> Vec<TrainingSample> {
        let all_samples = self.to_training_samples();
        if all_samples.is_empty() || batch_size == 0 {
            return vec![];
        }

        let mut rng = GameRng::new(seed);

        // Fisher-Yates shuffle first `batch_size` elements
        let mut indices: Vec<usize> = (0..all_samples.len()).collect();
        let n = indices.len();
        let limit = batch_size.min(n);

        for i in 0..limit {
            let j = i + rng.gen_range_usize(0..n - i);
            indices.swap(i, j);
        }

        indices
            .into_iter()
            .take(limit)
            .map(|i| all_samples[i].clone())
            .collect()
    }
}

impl Default for ExperienceBuffer {
    fn default() -> Self {
        Self::new(10000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_step(player: PlayerId, move_num: usize) -> Step {
        Step::new(
            EncodedState::zeros(vec![3, 2, 2]),
            vec![0.5, 0.5, 0.0, 0.0],
            Cell(0),
            player,
            move_num,
        )
    }

    fn finished(seed: u64, steps: usize, status: GameStatus) -> Trajectory {
        let mut traj = Trajectory::new(seed);
        for i in 0..steps {
            let player = if i % 2 == 0 { PlayerId::ONE } else { PlayerId::TWO };
            traj.push(make_test_step(player, i));
        }
        traj.set_outcome(status).unwrap();
        traj
    }

    #[test]
    fn test_step_taken_action_prob() {
        let mut step = make_test_step(PlayerId::ONE, 0);
        step.move_probs = vec![0.7, 0.3, 0.0, 0.0];
        assert!((step.taken_action_prob() - 0.7).abs() < 0.001);
    }

    #[test]
    fn test_trajectory_creation() {
        let mut traj = Trajectory::new(42);
        assert!(traj.is_empty());
        assert!(!traj.is_resolved());

        traj.push(make_test_step(PlayerId::ONE, 0));
        traj.push(make_test_step(PlayerId::TWO, 1));

        assert_eq!(traj.len(), 2);
        assert_eq!(traj.player_steps(PlayerId::ONE).count(), 1);
    }

    #[test]
    fn test_outcome_must_be_terminal() {
        let mut traj = Trajectory::new(42);
        assert!(matches!(
            traj.set_outcome(GameStatus::Ongoing),
            Err(TrajectoryError::Unresolved)
        ));
        assert!(matches!(
            traj.to_training_samples(),
            Err(TrajectoryError::Unresolved)
        ));
        assert!(traj.player_outcome(PlayerId::ONE).is_err());
    }

    #[test]
    fn test_win_labels() {
        let traj = finished(1, 3, GameStatus::Win(PlayerId::ONE));
        let samples = traj.to_training_samples().unwrap();

        let values: Vec<f32> = samples.iter().map(|s| s.value).collect();
        assert_eq!(values, vec![1.0, -1.0, 1.0]);
        assert_eq!(traj.winner(), Some(PlayerId::ONE));
        assert_eq!(traj.player_outcome(PlayerId::TWO).unwrap(), -1.0);
    }

    #[test]
    fn test_draw_labels() {
        let traj = finished(1, 4, GameStatus::Draw);
        let samples = traj.to_training_samples().unwrap();
        assert!(samples.iter().all(|s| s.value == 0.0));
        assert_eq!(traj.winner(), None);
    }

    #[test]
    fn test_bincode_round_trip() {
        let traj = finished(7, 2, GameStatus::Win(PlayerId::TWO));
        let bytes = traj.to_bytes().unwrap();
        let restored = Trajectory::from_bytes(&bytes).unwrap();
        assert_eq!(traj, restored);

        assert!(matches!(
            Trajectory::from_bytes(&[1, 2, 3]),
            Err(TrajectoryError::Codec(_))
        ));
    }

    #[test]
    fn test_experience_buffer_capacity() {
        let mut buffer = ExperienceBuffer::new(3);

        for seed in 1..=4 {
            buffer.push(finished(seed, 1, GameStatus::Draw)).unwrap();
        }
        assert_eq!(buffer.len(), 3);

        let seeds: Vec<_> = buffer.iter().map(|t| t.seed).collect();
        assert_eq!(seeds, vec![2, 3, 4]);
    }

    #[test]
    fn test_experience_buffer_rejects_unfinished() {
        let mut buffer = ExperienceBuffer::new(3);
        assert!(buffer.push(Trajectory::new(1)).is_err());
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_experience_buffer_total_steps() {
        let mut buffer = ExperienceBuffer::new(10);
        buffer.push(finished(1, 2, GameStatus::Draw)).unwrap();
        buffer.push(finished(2, 1, GameStatus::Draw)).unwrap();

        assert_eq!(buffer.total_steps(), 3);
        assert_eq!(buffer.to_training_samples().len(), 3);
    }

    #[test]
    fn test_experience_buffer_sample_batch() {
        let mut buffer = ExperienceBuffer::new(10);
        buffer
            .push(finished(42, 10, GameStatus::Win(PlayerId::TWO)))
            .unwrap();

        let batch = buffer.sample_batch(5, 123);
        assert_eq!(batch.len(), 5);
        assert_eq!(batch, buffer.sample_batch(5, 123));

        // Asking for more than exists returns everything once.
        assert_eq!(buffer.sample_batch(50, 1).len(), 10);
        assert!(buffer.sample_batch(0, 1).is_empty());
    }
}
