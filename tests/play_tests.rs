//! Match play through `play_ply`, as a front end drives it.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use gomoku_zero::core::{Cell, GameConfig, GameState, PlayerId, PlayerMap};
use gomoku_zero::mcts::{MCTSConfig, MoveSelection};
use gomoku_zero::nn::UniformPolicyZeroValue;
use gomoku_zero::play::{ExternalPlayer, Match, PlayError, Player, SearchPlayer, Seats};
use gomoku_zero::rules::GameStatus;

fn small_config() -> GameConfig {
    GameConfig::new(5, 5).with_win_length(4).with_history_depth(2)
}

fn engine(seed: u64) -> Box<dyn Player> {
    let config = MCTSConfig::default()
        .with_simulations(48)
        .with_seed(seed)
        .with_move_selection(MoveSelection::Greedy);
    Box::new(SearchPlayer::new(config, UniformPolicyZeroValue::new(25)))
}

fn human_vs_engine() -> Seats {
    let mut seats: Seats = PlayerMap::new(|_| Box::new(ExternalPlayer::new()) as Box<dyn Player>);
    seats[PlayerId::TWO] = engine(1);
    seats
}

/// Counts the moves it is told about.
struct Recorder {
    seen: Arc<AtomicUsize>,
}

impl Player for Recorder {
    fn choose_move(&mut self, state: &GameState, _external: Option<Cell>) -> Result<Cell, PlayError> {
        state
            .legal_moves()
            .first()
            .copied()
            .ok_or(PlayError::NoMove { ply: state.move_count() })
    }

    fn observe_move(&mut self, _cell: Cell) {
        self.seen.fetch_add(1, Ordering::SeqCst);
    }
}

// =============================================================================
// Turn Order Tests
// =============================================================================

#[test]
fn test_human_then_engine() {
    let mut game = Match::new(small_config()).unwrap();
    let mut seats = human_vs_engine();

    let first = game.play_ply(&mut seats, Some(Cell::from_coords(2, 2, 5))).unwrap();
    assert_eq!(first.mover, PlayerId::ONE);
    assert_eq!(first.placements[PlayerId::ONE], vec![(2, 2)]);

    let reply = game.play_ply(&mut seats, None).unwrap();
    assert_eq!(reply.mover, PlayerId::TWO);
    assert_ne!(reply.cell, first.cell);
    assert_eq!(reply.placements[PlayerId::TWO].len(), 1);
    assert_eq!(game.state().move_count(), 2);
}

#[test]
fn test_engine_ignores_external_move() {
    let mut game = Match::new(small_config()).unwrap();
    let mut seats = human_vs_engine();
    game.play_ply(&mut seats, Some(Cell(0))).unwrap();

    // A stray click during the engine's turn does not place that stone.
    let reply = game.play_ply(&mut seats, Some(Cell(0))).unwrap();
    assert_eq!(reply.mover, PlayerId::TWO);
    assert_ne!(reply.cell, Cell(0));
}

#[test]
fn test_human_turn_waits_for_input() {
    let mut game = Match::new(small_config()).unwrap();
    let mut seats = human_vs_engine();

    assert!(matches!(
        game.play_ply(&mut seats, None),
        Err(PlayError::AwaitingInput)
    ));
    assert_eq!(game.state().move_count(), 0);
    assert_eq!(game.current_status().unwrap(), GameStatus::Ongoing);
}

#[test]
fn test_every_move_is_broadcast() {
    let one = Arc::new(AtomicUsize::new(0));
    let two = Arc::new(AtomicUsize::new(0));
    let mut seats: Seats = PlayerMap::new(|player| -> Box<dyn Player> {
        let seen = if player == PlayerId::ONE { one.clone() } else { two.clone() };
        Box::new(Recorder { seen })
    });

    let mut game = Match::new(small_config()).unwrap();
    for _ in 0..6 {
        game.play_ply(&mut seats, None).unwrap();
    }
    assert_eq!(one.load(Ordering::SeqCst), 6);
    assert_eq!(two.load(Ordering::SeqCst), 6);
}

// =============================================================================
// Full Match Tests
// =============================================================================

#[test]
fn test_engine_against_engine_finishes() {
    let mut game = Match::new(small_config()).unwrap();
    let mut seats: Seats = PlayerMap::new(|player| engine(u64::from(player.id())));

    let mut last = None;
    for _ in 0..25 {
        let outcome = game.play_ply(&mut seats, None).unwrap();
        let done = outcome.status.is_terminal();
        last = Some(outcome);
        if done {
            break;
        }
    }

    let last = last.unwrap();
    assert!(last.status.is_terminal());
    assert_eq!(last.winner, last.status.winner());
    if let Some(winner) = last.winner {
        assert_eq!(winner, last.mover);
    }
    assert!(matches!(
        game.play_ply(&mut seats, None),
        Err(PlayError::GameOver(_))
    ));

    game.restart(&mut seats);
    assert_eq!(game.state().move_count(), 0);
    assert!(game.play_ply(&mut seats, None).is_ok());
}

#[test]
fn test_human_wins_against_passive_engine() {
    // Player 2 is a recorder that always takes the lowest free cell, so
    // player 1 can win on row 4 undisturbed.
    let seen = Arc::new(AtomicUsize::new(0));
    let mut seats: Seats = PlayerMap::new(|_| Box::new(ExternalPlayer::new()) as Box<dyn Player>);
    seats[PlayerId::TWO] = Box::new(Recorder { seen: seen.clone() });

    let mut game = Match::new(small_config()).unwrap();
    for col in 0..3 {
        game.play_ply(&mut seats, Some(Cell::from_coords(4, col, 5))).unwrap();
        game.play_ply(&mut seats, None).unwrap();
    }
    let outcome = game.play_ply(&mut seats, Some(Cell::from_coords(4, 3, 5))).unwrap();

    assert_eq!(outcome.status, GameStatus::Win(PlayerId::ONE));
    assert_eq!(outcome.winner, Some(PlayerId::ONE));
    assert_eq!(outcome.placements[PlayerId::ONE].len(), 4);
    assert_eq!(outcome.placements[PlayerId::TWO], vec![(0, 0), (0, 1), (0, 2)]);
    assert_eq!(seen.load(Ordering::SeqCst), 7);
    assert_eq!(game.placements(), outcome.placements);
}
