//! Core type bindings for Python.

use numpy::{PyArray1, PyArray3, PyArrayMethods};
use pyo3::prelude::*;

use crate::core::{Cell, GameConfig, GameState, PlayerId};
use crate::rules::GameStatus;

use super::value_error;

/// Python wrapper for PlayerId.
#[pyclass(name = "PlayerId")]
#[derive(Clone, Debug)]
pub struct PyPlayerId(pub PlayerId);

#[pymethods]
impl PyPlayerId {
    /// Create a player ID from its stone number (1 or 2).
    #[new]
    fn new(id: u8) -> PyResult<Self> {
        PlayerId::new(id)
            .map(Self)
            .ok_or_else(|| value_error(format!("player id must be 1 or 2, got {id}")))
    }

    /// Get the player index (0-based).
    fn index(&self) -> usize {
        self.0.index()
    }

    /// Get the stone number.
    #[getter]
    fn id(&self) -> u8 {
        self.0.id()
    }

    fn opponent(&self) -> Self {
        Self(self.0.opponent())
    }

    fn __repr__(&self) -> String {
        format!("PlayerId({})", self.0.id())
    }

    fn __eq__(&self, other: &Self) -> bool {
        self.0 == other.0
    }

    fn __hash__(&self) -> u64 {
        u64::from(self.0.id())
    }
}

/// Python wrapper for GameConfig.
#[pyclass(name = "GameConfig")]
#[derive(Clone, Debug)]
pub struct PyGameConfig(pub GameConfig);

#[pymethods]
impl PyGameConfig {
    #[new]
    #[pyo3(signature = (rows = 9, cols = 9, win_length = 5, history_depth = 3, start_player = 1))]
    fn new(
        rows: usize,
        cols: usize,
        win_length: usize,
        history_depth: usize,
        start_player: u8,
    ) -> PyResult<Self> {
        let start = PyPlayerId::new(start_player)?;
        let config = GameConfig::new(rows, cols)
            .with_win_length(win_length)
            .with_history_depth(history_depth)
            .with_start_player(start.0);
        config.validate().map_err(value_error)?;
        Ok(Self(config))
    }

    #[getter]
    fn rows(&self) -> usize {
        self.0.rows
    }

    #[getter]
    fn cols(&self) -> usize {
        self.0.cols
    }

    #[getter]
    fn win_length(&self) -> usize {
        self.0.win_length
    }

    #[getter]
    fn history_depth(&self) -> usize {
        self.0.history_depth
    }

    /// Shape of the encoded state: `(planes, rows, cols)`.
    fn encoded_shape(&self) -> Vec<usize> {
        self.0.encoded_shape()
    }

    fn __repr__(&self) -> String {
        format!(
            "GameConfig({}x{}, win_length={}, history_depth={})",
            self.0.rows, self.0.cols, self.0.win_length, self.0.history_depth
        )
    }
}

/// `("ongoing" | "draw" | "win", winner)` as exposed to Python.
pub(crate) fn status_tuple(status: GameStatus) -> (&'static str, Option<u8>) {
    match status {
        GameStatus::Ongoing => ("ongoing", None),
        GameStatus::Draw => ("draw", None),
        GameStatus::Win(player) => ("win", Some(player.id())),
    }
}

/// Python wrapper for GameState.
#[pyclass(name = "GameState")]
#[derive(Clone, Debug)]
pub struct PyGameState(pub GameState);

#[pymethods]
impl PyGameState {
    /// Create an empty board.
    #[new]
    #[pyo3(signature = (config = None))]
    fn new(config: Option<&PyGameConfig>) -> PyResult<Self> {
        let config = config.map_or_else(GameConfig::default, |c| c.0);
        GameState::new(config).map(Self).map_err(value_error)
    }

    /// Place a stone for the player to move at `(row, col)`.
    fn apply_move(&mut self, row: usize, col: usize) -> PyResult<()> {
        self.0.apply_coords(row, col).map_err(value_error)
    }

    /// Legal moves as flat cell indices.
    fn legal_moves(&self) -> Vec<u16> {
        self.0.legal_moves().into_iter().map(|cell| cell.0).collect()
    }

    fn is_legal(&self, row: usize, col: usize) -> bool {
        row < self.0.config().rows
            && col < self.0.config().cols
            && self.0.is_legal(Cell::from_coords(row, col, self.0.config().cols))
    }

    #[getter]
    fn current_player(&self) -> u8 {
        self.0.current_player().id()
    }

    #[getter]
    fn move_count(&self) -> usize {
        self.0.move_count()
    }

    /// Moves played so far, as flat cell indices.
    fn history(&self) -> Vec<u16> {
        self.0.history().iter().map(|cell| cell.0).collect()
    }

    /// `(status, winner)` with status one of "ongoing", "draw", "win".
    fn status(&self) -> PyResult<(&'static str, Option<u8>)> {
        self.0.status().map(status_tuple).map_err(value_error)
    }

    /// Stone coordinates per player: `([(row, col)], [(row, col)])`.
    fn placements(&self) -> (Vec<(usize, usize)>, Vec<(usize, usize)>) {
        let placements = self.0.placements();
        (
            placements[PlayerId::ONE].clone(),
            placements[PlayerId::TWO].clone(),
        )
    }

    /// Encoded state as a `(planes, rows, cols)` float32 array.
    fn encode<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyArray3<f32>>> {
        let config = self.0.config();
        let tensor = self.0.encode_perspective(config.history_depth);
        let [planes, rows, cols] = [2 * config.history_depth + 1, config.rows, config.cols];
        PyArray1::from_vec_bound(py, tensor)
            .reshape([planes, rows, cols])
            .map_err(value_error)
    }

    fn __repr__(&self) -> String {
        format!(
            "GameState(moves={}, to_move={})",
            self.0.move_count(),
            self.0.current_player()
        )
    }
}
