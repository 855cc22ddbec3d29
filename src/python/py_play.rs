//! Match bindings for Python front ends.

use pyo3::prelude::*;

use crate::core::{Cell, PlayerId, PlayerMap};
use crate::mcts::MCTSConfig;
use crate::nn::UniformPolicyZeroValue;
use crate::play::{ExternalPlayer, Match, PlayError, Player, PlyOutcome, SearchPlayer, Seats};

use super::py_core::{status_tuple, PyGameConfig, PyGameState};
use super::py_nn::PyPolicyValueNetwork;
use super::value_error;

/// Result of one ply.
#[pyclass(name = "PlyOutcome")]
#[derive(Clone)]
pub struct PyPlyOutcome {
    outcome: PlyOutcome,
    cols: usize,
}

#[pymethods]
impl PyPlyOutcome {
    #[getter]
    fn mover(&self) -> u8 {
        self.outcome.mover.id()
    }

    /// `(row, col)` of the stone placed.
    #[getter]
    fn position(&self) -> (usize, usize) {
        self.outcome.cell.coords(self.cols)
    }

    #[getter]
    fn status(&self) -> &'static str {
        status_tuple(self.outcome.status).0
    }

    #[getter]
    fn winner(&self) -> Option<u8> {
        self.outcome.winner.map(|player| player.id())
    }

    /// Stone coordinates per player after the move.
    #[getter]
    fn placements(&self) -> (Vec<(usize, usize)>, Vec<(usize, usize)>) {
        (
            self.outcome.placements[PlayerId::ONE].clone(),
            self.outcome.placements[PlayerId::TWO].clone(),
        )
    }

    fn __repr__(&self) -> String {
        let (row, col) = self.position();
        format!(
            "PlyOutcome(mover={}, position=({row}, {col}), status={})",
            self.outcome.mover, self.outcome.status
        )
    }
}

/// A human (or any external caller) against the search engine.
#[pyclass(name = "Match")]
pub struct PyMatch {
    game: Match,
    seats: Seats,
}

#[pymethods]
impl PyMatch {
    /// Create a match.
    ///
    /// # Arguments
    /// - config: Board configuration (default: 9x9, five in a row)
    /// - network: Oracle for the engine; uniform prior and zero value if omitted
    /// - engine_player: Stone number the engine plays (default: 2)
    /// - n_simulate: Simulations per engine move (default: 500)
    /// - seed: Seed for the engine's move sampling (default: 42)
    #[new]
    #[pyo3(signature = (config = None, network = None, engine_player = 2, n_simulate = 500, seed = 42))]
    fn new(
        config: Option<&PyGameConfig>,
        network: Option<&PyPolicyValueNetwork>,
        engine_player: u8,
        n_simulate: u32,
        seed: u64,
    ) -> PyResult<Self> {
        let config = config.map_or_else(Default::default, |c| c.0);
        let engine = PlayerId::new(engine_player)
            .ok_or_else(|| value_error(format!("engine player must be 1 or 2, got {engine_player}")))?;
        let game = Match::new(config).map_err(value_error)?;

        let mcts = MCTSConfig::default().with_simulations(n_simulate).with_seed(seed);
        let engine_seat: Box<dyn Player> = match network {
            Some(network) => Box::new(SearchPlayer::new(mcts, network.oracle.clone())),
            None => Box::new(SearchPlayer::new(mcts, UniformPolicyZeroValue::new(config.cells()))),
        };
        let mut seats: Seats = PlayerMap::new(|_| Box::new(ExternalPlayer::new()) as Box<dyn Player>);
        seats[engine] = engine_seat;

        Ok(Self { game, seats })
    }

    /// Play one ply.
    ///
    /// On the external side's turn pass `(row, col)`; on the engine's turn
    /// pass nothing. Returns `None` if the external side has not moved yet.
    #[pyo3(signature = (row = None, col = None))]
    fn play_ply(
        &mut self,
        py: Python<'_>,
        row: Option<usize>,
        col: Option<usize>,
    ) -> PyResult<Option<PyPlyOutcome>> {
        let config = *self.game.state().config();
        let external = match (row, col) {
            (Some(row), Some(col)) if row < config.rows && col < config.cols => {
                Some(Cell::from_coords(row, col, config.cols))
            }
            (Some(row), Some(col)) => {
                return Err(value_error(format!(
                    "({row}, {col}) is outside the {}x{} board",
                    config.rows, config.cols
                )))
            }
            _ => None,
        };

        let Self { game, seats } = self;
        match py.allow_threads(|| game.play_ply(seats, external)) {
            Ok(outcome) => Ok(Some(PyPlyOutcome {
                outcome,
                cols: config.cols,
            })),
            Err(PlayError::AwaitingInput) => Ok(None),
            Err(e) => Err(value_error(e)),
        }
    }

    /// `(status, winner)` of the current position.
    fn current_status(&self) -> PyResult<(&'static str, Option<u8>)> {
        self.game.current_status().map(status_tuple).map_err(value_error)
    }

    fn placements(&self) -> (Vec<(usize, usize)>, Vec<(usize, usize)>) {
        let placements = self.game.placements();
        (
            placements[PlayerId::ONE].clone(),
            placements[PlayerId::TWO].clone(),
        )
    }

    #[getter]
    fn current_player(&self) -> u8 {
        self.game.state().current_player().id()
    }

    /// A copy of the current position.
    fn state(&self) -> PyGameState {
        PyGameState(self.game.state().clone())
    }

    fn restart(&mut self) {
        self.game.restart(&mut self.seats);
    }
}
