//! Participants of a match.
//!
//! A `Player` picks the move for the position it is handed and hears about
//! every move that is actually played, its own included.

use tracing::warn;

use crate::core::{Cell, GameRng, GameState};
use crate::mcts::{MCTSConfig, MCTSSearch, MoveProbabilities, SearchError};
use crate::nn::{PolicyValueNetwork, UniformPolicyZeroValue};

use super::game::PlayError;

/// Interface for anything that can take a seat at the board.
pub trait Player: Send {
    /// Short label used in logs.
    fn name(&self) -> &str {
        "player"
    }

    /// Pick a move for `state`.
    ///
    /// `external` is the move supplied by the front end for this ply, if
    /// any. Players that decide for themselves ignore it.
    fn choose_move(&mut self, state: &GameState, external: Option<Cell>) -> Result<Cell, PlayError>;

    /// Called once for every move applied to the game, by either side.
    fn observe_move(&mut self, _cell: Cell) {}

    /// Forget everything about the previous game.
    fn reset(&mut self) {}
}

// =============================================================================
// Search player
// =============================================================================

/// Player driven by MCTS over an oracle.
///
/// The search tree follows the game through `observe_move`, so statistics
/// gathered for the reply that was actually played are reused.
pub struct SearchPlayer<N> {
    search: MCTSSearch,
    oracle: N,
    rng: GameRng,
}

impl<N: PolicyValueNetwork> SearchPlayer<N> {
    /// Create a player; move sampling is seeded from `config.seed`.
    pub fn new(config: MCTSConfig, oracle: N) -> Self {
        let rng = GameRng::new(config.seed);
        Self {
            search: MCTSSearch::new(config),
            oracle,
            rng,
        }
    }

    /// The underlying search.
    pub fn search(&self) -> &MCTSSearch {
        &self.search
    }

    /// The oracle guiding the search.
    pub fn oracle(&self) -> &N {
        &self.oracle
    }

    /// Search `state`, recovering from a stale tree and from oracle failure.
    pub fn move_probabilities(&mut self, state: &GameState) -> Result<MoveProbabilities, SearchError> {
        let result = match self.search.get_move_probs(state, &self.oracle) {
            Err(SearchError::TreeStateDesync { tree_ply, state_ply }) => {
                warn!(tree_ply, state_ply, "search tree does not match the game, resetting");
                self.search.reset();
                self.search.get_move_probs(state, &self.oracle)
            }
            other => other,
        };

        match result {
            Err(SearchError::Oracle(error)) => {
                warn!(%error, ply = state.move_count(), "oracle failed, searching with a uniform prior");
                self.search.reset();
                let fallback = UniformPolicyZeroValue::new(state.config().cells());
                self.search.get_move_probs(state, &fallback)
            }
            other => other,
        }
    }
}

impl<N: PolicyValueNetwork + 'static> Player for SearchPlayer<N> {
    fn name(&self) -> &str {
        "search"
    }

    fn choose_move(&mut self, state: &GameState, _external: Option<Cell>) -> Result<Cell, PlayError> {
        let probs = self.move_probabilities(state)?;
        probs
            .choose(self.search.config(), &mut self.rng)
            .ok_or(PlayError::NoMove {
                ply: state.move_count(),
            })
    }

    fn observe_move(&mut self, cell: Cell) {
        self.search.advance_root(cell);
    }

    fn reset(&mut self) {
        self.search.reset();
    }
}

// =============================================================================
// External player
// =============================================================================

/// Seat filled by the front end: plays whatever move it is handed.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExternalPlayer;

impl ExternalPlayer {
    pub fn new() -> Self {
        Self
    }
}

impl Player for ExternalPlayer {
    fn name(&self) -> &str {
        "external"
    }

    fn choose_move(&mut self, _state: &GameState, external: Option<Cell>) -> Result<Cell, PlayError> {
        external.ok_or(PlayError::AwaitingInput)
    }
}
