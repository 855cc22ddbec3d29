//! Game state: the board state machine.
//!
//! A position is fully described by its move history. The per-cell board
//! is a cache derived from that history and is only ever updated together
//! with it inside `apply_move`, so the two cannot diverge. The player to
//! move is computed from the history length and the starting player.
//!
//! History uses an `im` persistent vector, so the clone taken for every
//! simulation shares the history with the authoritative state. The board
//! cache is a plain vector and is copied with each clone.
//!
//! A `GameState` only exists for a config that passes
//! `GameConfig::validate`, so every cell index fits in a `Cell`.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::cell::Cell;
use super::config::GameConfig;
use super::error::{ConfigError, IllegalMove, StateError};
use super::player::{PlayerId, PlayerMap};
use crate::rules::{self, GameStatus, RulesError};

/// Board position plus move history.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "GameRecord", into = "GameRecord")]
pub struct GameState {
    config: GameConfig,

    /// Every stone placed, in play order.
    history: Vector<Cell>,

    /// Owner of each cell, indexed by `Cell::index`.
    board: Vec<Option<PlayerId>>,
}

impl GameState {
    /// Create an empty board, rejecting configs that fail validation.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            history: Vector::new(),
            board: vec![None; config.cells()],
        })
    }

    /// Rebuild a position by replaying `moves` from an empty board.
    ///
    /// ```
    /// use gomoku_zero::core::{Cell, GameConfig, GameState, PlayerId};
    ///
    /// let state = GameState::from_moves(GameConfig::default(), [Cell(40), Cell(41)]).unwrap();
    /// assert_eq!(state.move_count(), 2);
    /// assert_eq!(state.cell_owner(Cell(41)), Some(PlayerId::TWO));
    /// ```
    pub fn from_moves(
        config: GameConfig,
        moves: impl IntoIterator<Item = Cell>,
    ) -> Result<Self, StateError> {
        let mut state = Self::new(config)?;
        for cell in moves {
            state.apply_move(cell)?;
        }
        Ok(state)
    }

    /// The configuration this game is played under.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Player who placed the first stone.
    #[must_use]
    pub fn start_player(&self) -> PlayerId {
        self.config.start_player
    }

    /// Player who placed (or will place) the stone at ply `ply`.
    #[inline]
    #[must_use]
    pub fn mover_at(&self, ply: usize) -> PlayerId {
        if ply % 2 == 0 {
            self.config.start_player
        } else {
            self.config.start_player.opponent()
        }
    }

    /// Player to move.
    #[inline]
    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.mover_at(self.history.len())
    }

    /// Number of stones on the board.
    #[inline]
    #[must_use]
    pub fn move_count(&self) -> usize {
        self.history.len()
    }

    /// Every move played so far, in order.
    #[must_use]
    pub fn history(&self) -> &Vector<Cell> {
        &self.history
    }

    /// The most recent move.
    #[must_use]
    pub fn last_move(&self) -> Option<Cell> {
        self.history.last().copied()
    }

    /// The most recent stone placed by `player`.
    #[must_use]
    pub fn last_move_of(&self, player: PlayerId) -> Option<Cell> {
        let len = self.history.len();
        let ply = (len.saturating_sub(2)..len)
            .rev()
            .find(|&ply| self.mover_at(ply) == player)?;
        self.history.get(ply).copied()
    }

    /// Owner of `cell`, or `None` if empty or off the board.
    #[must_use]
    pub fn cell_owner(&self, cell: Cell) -> Option<PlayerId> {
        self.board.get(cell.index()).copied().flatten()
    }

    /// Owner of the cell at `(row, col)`, or `None` if empty or off the board.
    #[must_use]
    pub fn owner_at(&self, row: usize, col: usize) -> Option<PlayerId> {
        if row >= self.config.rows || col >= self.config.cols {
            return None;
        }
        self.cell_owner(Cell::from_coords(row, col, self.config.cols))
    }

    /// Whether `cell` is on the board and empty.
    #[must_use]
    pub fn is_legal(&self, cell: Cell) -> bool {
        matches!(self.board.get(cell.index()), Some(None))
    }

    /// All empty cells, in ascending index order.
    #[must_use]
    pub fn legal_moves(&self) -> Vec<Cell> {
        self.board
            .iter()
            .enumerate()
            .filter(|(_, owner)| owner.is_none())
            .filter_map(|(index, _)| u16::try_from(index).ok().map(Cell))
            .collect()
    }

    /// Whether every cell is occupied.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.history.len() >= self.board.len()
    }

    /// Remove every stone, keeping the configuration.
    pub fn clear(&mut self) {
        self.history.clear();
        self.board.fill(None);
    }

    /// Place a stone for the player to move.
    ///
    /// On error the state is unchanged.
    pub fn apply_move(&mut self, cell: Cell) -> Result<(), IllegalMove> {
        let cells = self.board.len();
        let player = self.current_player();
        let slot = self
            .board
            .get_mut(cell.index())
            .ok_or(IllegalMove::OutOfRange { cell, cells })?;

        if let Some(owner) = *slot {
            return Err(IllegalMove::Occupied { cell, owner });
        }

        *slot = Some(player);
        self.history.push_back(cell);
        Ok(())
    }

    /// Place a stone at `(row, col)`.
    pub fn apply_coords(&mut self, row: usize, col: usize) -> Result<(), IllegalMove> {
        if row >= self.config.rows || col >= self.config.cols {
            let index = row.saturating_mul(self.config.cols).saturating_add(col);
            return Err(IllegalMove::OutOfRange {
                cell: Cell(u16::try_from(index).unwrap_or(u16::MAX)),
                cells: self.board.len(),
            });
        }
        self.apply_move(Cell::from_coords(row, col, self.config.cols))
    }

    /// Current result of the game.
    ///
    /// Fails only if both players hold a winning line, which no legal move
    /// sequence can produce.
    pub fn status(&self) -> Result<GameStatus, RulesError> {
        rules::evaluate(self)
    }

    /// Binary feature planes seen from the player to move.
    ///
    /// Returns a flat `[2 * history_depth + 1, rows, cols]` tensor:
    ///
    /// - Plane `2j` holds the stones of the player to move as they stood
    ///   `j` of that player's moves ago.
    /// - Plane `2j + 1` holds the opponent's stones the same way.
    /// - The last plane is all ones if the player to move started the game.
    ///
    /// Planes older than the available history are all zero.
    #[must_use]
    pub fn encode_perspective(&self, history_depth: usize) -> Vec<f32> {
        let area = self.config.cells();
        let mut planes = vec![0.0f32; (2 * history_depth + 1) * area];

        let to_move = self.current_player();
        for (offset, player) in [(0, to_move), (1, to_move.opponent())] {
            // Most recent first.
            let stones: Vec<Cell> = self
                .history
                .iter()
                .enumerate()
                .rev()
                .filter(|(ply, _)| self.mover_at(*ply) == player)
                .map(|(_, cell)| *cell)
                .collect();

            for j in 0..history_depth.min(stones.len()) {
                let base = (2 * j + offset) * area;
                for cell in &stones[j..] {
                    planes[base + cell.index()] = 1.0;
                }
            }
        }

        if to_move == self.config.start_player {
            let base = 2 * history_depth * area;
            planes[base..base + area].fill(1.0);
        }

        planes
    }

    /// Stones of each player as `(row, col)`, in the order they were placed.
    #[must_use]
    pub fn placements(&self) -> PlayerMap<Vec<(usize, usize)>> {
        let mut placements = PlayerMap::with_value(Vec::new());
        for (ply, cell) in self.history.iter().enumerate() {
            placements[self.mover_at(ply)].push(cell.coords(self.config.cols));
        }
        placements
    }
}

/// Serialized form of a `GameState`: the config and the move list.
///
/// Deserializing replays the moves, so the board cache is always rebuilt
/// from history.
#[derive(Serialize, Deserialize)]
struct GameRecord {
    config: GameConfig,
    moves: Vec<Cell>,
}

impl From<GameState> for GameRecord {
    fn from(state: GameState) -> Self {
        Self {
            config: state.config,
            moves: state.history.into_iter().collect(),
        }
    }
}

impl TryFrom<GameRecord> for GameState {
    type Error = StateError;

    fn try_from(record: GameRecord) -> Result<Self, Self::Error> {
        GameState::from_moves(record.config, record.moves)
    }
}
