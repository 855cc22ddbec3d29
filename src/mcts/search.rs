//! Core MCTS search algorithm.
//!
//! Each simulation clones the root position, descends the tree with the
//! selection policy, expands the leaf with oracle priors (or scores it
//! exactly if the game is over) and backs the value up to the root,
//! flipping its sign at every ply.

use std::time::Instant;

use thiserror::Error;
use tracing::{debug, trace};

use crate::core::{Cell, GameState, IllegalMove};
use crate::nn::{EncodedState, OracleError, PerspectiveEncoder, PolicyValueNetwork, StateEncoder};
use crate::rules::{GameStatus, RulesError};

use super::config::MCTSConfig;
use super::node::NodeId;
use super::policy::{visit_softmax, MoveProbabilities, SelectionPolicy, PUCT};
use super::stats::SearchStats;
use super::tree::MCTSTree;

/// Errors that can occur during MCTS search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("oracle error: {0}")]
    Oracle(#[from] OracleError),

    #[error("rules error: {0}")]
    Rules(#[from] RulesError),

    #[error("search tree is anchored at ply {tree_ply} but the position is at ply {state_ply}")]
    TreeStateDesync { tree_ply: usize, state_ply: usize },

    #[error("search tree offered an illegal move: {0}")]
    IllegalTreeMove(IllegalMove),

    #[error("cannot search a finished game ({0})")]
    GameOver(GameStatus),
}

/// Position the tree root corresponds to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Anchor {
    ply: usize,
    last_move: Option<Cell>,
}

impl Anchor {
    fn of(state: &GameState) -> Self {
        Self {
            ply: state.move_count(),
            last_move: state.last_move(),
        }
    }
}

/// Main MCTS search context.
///
/// Owns the search tree and configuration. The tree persists between
/// moves: call `advance_root` once per move actually played so the next
/// search reuses the statistics of the chosen branch.
pub struct MCTSSearch {
    /// Search configuration.
    config: MCTSConfig,

    /// The search tree.
    tree: MCTSTree,

    /// Selection policy.
    selection: Box<dyn SelectionPolicy>,

    /// Encoder override; defaults to the history-plane encoder of the
    /// searched position's config.
    encoder: Option<Box<dyn StateEncoder>>,

    /// Position the root stands for, once known.
    anchor: Option<Anchor>,

    /// Statistics of the last search.
    stats: SearchStats,
}

impl MCTSSearch {
    /// Create a new MCTS search context.
    pub fn new(config: MCTSConfig) -> Self {
        Self {
            config,
            tree: MCTSTree::new(),
            selection: Box::new(PUCT),
            encoder: None,
            anchor: None,
            stats: SearchStats::default(),
        }
    }

    /// Set a custom selection policy.
    pub fn with_selection<S: SelectionPolicy + 'static>(mut self, selection: S) -> Self {
        self.selection = Box::new(selection);
        self
    }

    /// Set a custom state encoder.
    pub fn with_encoder<E: StateEncoder + 'static>(mut self, encoder: E) -> Self {
        self.encoder = Some(Box::new(encoder));
        self
    }

    /// Search configuration.
    #[must_use]
    pub fn config(&self) -> &MCTSConfig {
        &self.config
    }

    /// The search tree.
    #[must_use]
    pub fn tree(&self) -> &MCTSTree {
        &self.tree
    }

    /// Statistics of the last `get_move_probs` call.
    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Run `n_simulate` simulations from `state` and return the
    /// temperature-scaled visit distribution over the root's moves.
    ///
    /// `state` is only read; every simulation works on a clone.
    pub fn get_move_probs<N>(
        &mut self,
        state: &GameState,
        oracle: &N,
    ) -> Result<MoveProbabilities, SearchError>
    where
        N: PolicyValueNetwork + ?Sized,
    {
        let start = Instant::now();
        self.stats.reset();

        let anchor = Anchor::of(state);
        match self.anchor {
            Some(expected) if expected != anchor => {
                return Err(SearchError::TreeStateDesync {
                    tree_ply: expected.ply,
                    state_ply: anchor.ply,
                });
            }
            _ => self.anchor = Some(anchor),
        }

        let status = state.status()?;
        if status.is_terminal() {
            return Err(SearchError::GameOver(status));
        }

        let root = self.tree.root();
        if !self.tree.get(root).is_expanded() {
            self.expand(root, state, oracle)?;
        }

        for _ in 0..self.config.n_simulate {
            self.simulate(state, oracle)?;
        }

        let probs = self.root_probabilities();
        self.stats.time_us = start.elapsed().as_micros() as u64;

        debug!(
            ply = anchor.ply,
            simulations = self.stats.simulations,
            oracle_calls = self.stats.oracle_calls,
            tree_size = self.tree.len(),
            branching = self.tree.stats().branching_factor(),
            max_depth = self.stats.max_depth,
            nodes_per_sim = self.stats.avg_nodes_per_simulation(),
            sims_per_sec = self.stats.simulations_per_second(),
            time_us = self.stats.time_us,
            "search complete"
        );

        Ok(probs)
    }

    /// Move the root to the child for `cell`, keeping its statistics.
    ///
    /// Call once per move actually played, after applying it to the
    /// authoritative state. A move the tree has never expanded resets the
    /// tree to a single fresh node.
    pub fn advance_root(&mut self, cell: Cell) {
        match self.tree.child(self.tree.root(), cell) {
            Some(child) => self.tree.rebase(child),
            None => self.tree.reset(),
        }
        self.anchor = self.anchor.map(|anchor| Anchor {
            ply: anchor.ply + 1,
            last_move: Some(cell),
        });
    }

    /// Discard the tree. The next search adopts whatever position it is given.
    pub fn reset(&mut self) {
        self.tree.reset();
        self.anchor = None;
        self.stats.reset();
    }

    /// One simulation: select, expand or score, backpropagate.
    fn simulate<N>(&mut self, root_state: &GameState, oracle: &N) -> Result<(), SearchError>
    where
        N: PolicyValueNetwork + ?Sized,
    {
        let mut state = root_state.clone();
        let mut current = self.tree.root();
        let mut depth: u16 = 0;

        while self.tree.get(current).is_expanded() {
            let Some((cell, child)) = self.selection.select(&self.tree, current, &self.config)
            else {
                break;
            };
            state.apply_move(cell).map_err(SearchError::IllegalTreeMove)?;
            current = child;
            depth += 1;
        }

        let status = state.status()?;
        let value = if status.is_terminal() {
            self.stats.terminal_visits += 1;
            status.value_for(state.current_player())
        } else {
            self.expand(current, &state, oracle)?
        };

        self.tree.backpropagate(current, value);
        self.stats.simulations += 1;
        self.stats.max_depth = self.stats.max_depth.max(depth);

        trace!(depth, value, "simulation complete");
        Ok(())
    }

    /// Expand `node` at `state` with masked oracle priors.
    ///
    /// Returns the oracle's value for the player to move at `state`.
    fn expand<N>(&mut self, node: NodeId, state: &GameState, oracle: &N) -> Result<f64, SearchError>
    where
        N: PolicyValueNetwork + ?Sized,
    {
        let encoded = self.encode(state);
        let evaluation = oracle.predict(&encoded)?;
        evaluation.validate(state.config().cells())?;
        self.stats.oracle_calls += 1;

        let legal = state.legal_moves();
        let priors: Vec<(Cell, f64)> = legal
            .iter()
            .copied()
            .zip(evaluation.legal_priors(&legal))
            .collect();

        let added = self.tree.expand(node, &priors);
        self.stats.nodes_expanded += added as u32;

        Ok(f64::from(evaluation.value))
    }

    fn encode(&self, state: &GameState) -> EncodedState {
        match &self.encoder {
            Some(encoder) => encoder.encode(state),
            None => PerspectiveEncoder::from_config(state.config()).encode(state),
        }
    }

    fn root_probabilities(&self) -> MoveProbabilities {
        let root = self.tree.root_node();
        let visits: Vec<u32> = root
            .children
            .iter()
            .map(|&(_, id)| self.tree.get(id).visits)
            .collect();
        let probs = visit_softmax(&visits, self.config.temperature, self.config.visit_epsilon);

        MoveProbabilities::new(
            root.children
                .iter()
                .map(|&(cell, _)| cell)
                .zip(probs)
                .collect(),
        )
    }
}
