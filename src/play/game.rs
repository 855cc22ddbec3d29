//! A match between two seats, advanced one ply at a time.
//!
//! `Match::play_ply` is the whole surface a front end needs: it asks the
//! seat to move, applies the move, tells both seats, and reports the new
//! board and result.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::core::{Cell, ConfigError, GameConfig, GameState, IllegalMove, PlayerId, PlayerMap};
use crate::mcts::SearchError;
use crate::rules::{GameStatus, RulesError};

use super::player::Player;

/// Errors from advancing a match.
#[derive(Debug, Error)]
pub enum PlayError {
    #[error("game is already over ({0})")]
    GameOver(GameStatus),

    /// The seat to move needs a move from the front end.
    #[error("waiting for a move from the front end")]
    AwaitingInput,

    #[error(transparent)]
    IllegalMove(#[from] IllegalMove),

    #[error("search failed: {0}")]
    Search(#[from] SearchError),

    #[error("rules error: {0}")]
    Rules(#[from] RulesError),

    #[error("player produced no move at ply {ply}")]
    NoMove { ply: usize },
}

/// Seats of a match, indexed by stone colour.
pub type Seats = PlayerMap<Box<dyn Player>>;

/// What happened during one ply.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlyOutcome {
    /// Who moved.
    pub mover: PlayerId,
    /// Where.
    pub cell: Cell,
    /// Status after the move.
    pub status: GameStatus,
    pub winner: Option<PlayerId>,
    /// `(row, col)` of every stone, per player, after the move.
    pub placements: PlayerMap<Vec<(usize, usize)>>,
}

/// Owner of the authoritative game state.
#[derive(Clone, Debug)]
pub struct Match {
    state: GameState,
}

impl Match {
    /// Start a match on an empty board.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            state: GameState::new(config)?,
        })
    }

    /// The current position.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn current_status(&self) -> Result<GameStatus, RulesError> {
        self.state.status()
    }

    pub fn placements(&self) -> PlayerMap<Vec<(usize, usize)>> {
        self.state.placements()
    }

    /// Clear the board and every seat's memory.
    pub fn restart(&mut self, players: &mut Seats) {
        self.state.clear();
        for player in PlayerId::both() {
            players[player].reset();
        }
        debug!("match restarted");
    }

    /// Advance the game by one ply.
    ///
    /// The seat of the player to move chooses, with `external_move` handed
    /// to it. Illegal moves and `AwaitingInput` leave the state untouched.
    pub fn play_ply(
        &mut self,
        players: &mut Seats,
        external_move: Option<Cell>,
    ) -> Result<PlyOutcome, PlayError> {
        let status = self.state.status()?;
        if status.is_terminal() {
            return Err(PlayError::GameOver(status));
        }

        let mover = self.state.current_player();
        let cell = players[mover].choose_move(&self.state, external_move)?;
        self.state.apply_move(cell)?;

        for player in PlayerId::both() {
            players[player].observe_move(cell);
        }

        let status = self.state.status()?;
        debug!(
            ply = self.state.move_count(),
            %mover,
            seat = players[mover].name(),
            cell = cell.index(),
            "ply played"
        );
        if status.is_terminal() {
            info!(moves = self.state.move_count(), outcome = %status, "match finished");
        }

        Ok(PlyOutcome {
            mover,
            cell,
            status,
            winner: status.winner(),
            placements: self.state.placements(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::play::ExternalPlayer;

    fn small_config() -> GameConfig {
        GameConfig::new(5, 5).with_win_length(4).with_history_depth(2)
    }

    fn human_seats() -> Seats {
        PlayerMap::new(|_| Box::new(ExternalPlayer::new()) as Box<dyn Player>)
    }

    #[test]
    fn test_new_rejects_bad_config() {
        assert!(Match::new(GameConfig::new(3, 3)).is_err());
        assert!(Match::new(small_config()).is_ok());
    }

    #[test]
    fn test_play_ply_places_stone() {
        let mut game = Match::new(small_config()).unwrap();
        let mut seats = human_seats();

        let outcome = game.play_ply(&mut seats, Some(Cell(6))).unwrap();
        assert_eq!(outcome.mover, PlayerId::ONE);
        assert_eq!(outcome.cell, Cell(6));
        assert_eq!(outcome.status, GameStatus::Ongoing);
        assert_eq!(outcome.winner, None);
        assert_eq!(outcome.placements[PlayerId::ONE], vec![(1, 1)]);
        assert!(outcome.placements[PlayerId::TWO].is_empty());
    }

    #[test]
    fn test_awaiting_input_leaves_state() {
        let mut game = Match::new(small_config()).unwrap();
        let mut seats = human_seats();

        assert!(matches!(
            game.play_ply(&mut seats, None),
            Err(PlayError::AwaitingInput)
        ));
        assert_eq!(game.state().move_count(), 0);
    }

    #[test]
    fn test_occupied_cell_is_rejected() {
        let mut game = Match::new(small_config()).unwrap();
        let mut seats = human_seats();
        game.play_ply(&mut seats, Some(Cell(0))).unwrap();

        let err = game.play_ply(&mut seats, Some(Cell(0))).unwrap_err();
        assert!(matches!(err, PlayError::IllegalMove(IllegalMove::Occupied { .. })));
        assert_eq!(game.state().move_count(), 1);
        assert_eq!(game.state().current_player(), PlayerId::TWO);
    }

    #[test]
    fn test_win_then_game_over() {
        let mut game = Match::new(small_config()).unwrap();
        let mut seats = human_seats();

        // Player 1 fills row 0, player 2 row 1.
        for cell in [0, 5, 1, 6, 2, 7] {
            let outcome = game.play_ply(&mut seats, Some(Cell(cell))).unwrap();
            assert_eq!(outcome.status, GameStatus::Ongoing);
        }
        let outcome = game.play_ply(&mut seats, Some(Cell(3))).unwrap();
        assert_eq!(outcome.status, GameStatus::Win(PlayerId::ONE));
        assert_eq!(outcome.winner, Some(PlayerId::ONE));

        assert!(matches!(
            game.play_ply(&mut seats, Some(Cell(20))),
            Err(PlayError::GameOver(GameStatus::Win(_)))
        ));

        game.restart(&mut seats);
        assert_eq!(game.state().move_count(), 0);
        assert_eq!(game.current_status().unwrap(), GameStatus::Ongoing);
    }
}
