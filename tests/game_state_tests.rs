//! GameState integration tests: full games, draws, serialization, and
//! randomized properties of the board.

use gomoku_zero::core::{Cell, GameConfig, GameState, IllegalMove, PlayerId};
use gomoku_zero::rules::GameStatus;
use proptest::prelude::*;

fn cell(row: usize, col: usize) -> Cell {
    Cell::from_coords(row, col, 9)
}

// =============================================================================
// Full Game Tests
// =============================================================================

#[test]
fn test_row_win_on_fifth_stone() {
    let mut state = GameState::new(GameConfig::default()).unwrap();

    for col in 2..6 {
        state.apply_move(cell(4, col)).unwrap();
        state.apply_move(cell(0, col)).unwrap();
    }
    assert_eq!(state.move_count(), 8);
    assert_eq!(state.status().unwrap(), GameStatus::Ongoing);

    state.apply_move(cell(4, 6)).unwrap();
    assert_eq!(state.status().unwrap(), GameStatus::Win(PlayerId::ONE));
    assert_eq!(state.status().unwrap().winner(), Some(PlayerId::ONE));
}

#[test]
fn test_four_in_a_row_is_not_a_win() {
    let mut state = GameState::new(GameConfig::default()).unwrap();
    for col in 0..4 {
        state.apply_move(cell(4, col)).unwrap();
        state.apply_move(cell(8, col * 2)).unwrap();
    }
    assert_eq!(state.status().unwrap(), GameStatus::Ongoing);
}

#[test]
fn test_second_player_wins_on_diagonal() {
    let mut state = GameState::new(GameConfig::default()).unwrap();
    let first = [cell(0, 8), cell(1, 8), cell(2, 8), cell(3, 7), cell(8, 8)];
    for (i, &own) in first.iter().enumerate() {
        state.apply_move(own).unwrap();
        state.apply_move(cell(i + 2, i + 2)).unwrap();
    }
    assert_eq!(state.status().unwrap(), GameStatus::Win(PlayerId::TWO));
}

/// 9x9 colouring with no five in a row for either colour; zeros (41 cells)
/// go to player 1.
fn drawn_colour(row: usize, col: usize) -> usize {
    ((col + 2 * (row % 2) + (row / 2) % 2) / 2) % 2
}

#[test]
fn test_full_board_is_a_draw() {
    let (first, second): (Vec<Cell>, Vec<Cell>) = (0..81u16)
        .map(Cell)
        .partition(|c| {
            let (row, col) = c.coords(9);
            drawn_colour(row, col) == 0
        });
    assert_eq!(first.len(), 41);
    assert_eq!(second.len(), 40);

    let mut state = GameState::new(GameConfig::default()).unwrap();
    for i in 0..41 {
        state.apply_move(first[i]).unwrap();
        assert_eq!(state.status().unwrap(), if i == 40 { GameStatus::Draw } else { GameStatus::Ongoing });
        if let Some(&reply) = second.get(i) {
            state.apply_move(reply).unwrap();
            assert_eq!(state.status().unwrap(), GameStatus::Ongoing);
        }
    }

    assert!(state.is_full());
    assert!(state.legal_moves().is_empty());
    assert_eq!(state.status().unwrap().value_for(PlayerId::ONE), 0.0);
}

#[test]
fn test_largest_board_addresses_every_cell() {
    let state = GameState::new(GameConfig::new(255, 257)).unwrap();
    let legal = state.legal_moves();

    assert_eq!(legal.len(), 65_535);
    assert_eq!(legal.last(), Some(&Cell(65_534)));
    assert!(legal.windows(2).all(|w| w[0] < w[1]));
    assert!(GameState::new(GameConfig::new(256, 256)).is_err());
}

#[test]
fn test_illegal_moves_leave_state_untouched() {
    let mut state = GameState::new(GameConfig::default()).unwrap();
    state.apply_move(cell(4, 4)).unwrap();
    let before = state.clone();

    assert_eq!(
        state.apply_move(cell(4, 4)),
        Err(IllegalMove::Occupied {
            cell: cell(4, 4),
            owner: PlayerId::ONE
        })
    );
    assert!(matches!(
        state.apply_move(Cell(81)),
        Err(IllegalMove::OutOfRange { .. })
    ));

    assert_eq!(state.history(), before.history());
    assert_eq!(state.current_player(), PlayerId::TWO);
}

#[test]
fn test_second_player_can_start() {
    let config = GameConfig::default().with_start_player(PlayerId::TWO);
    let mut state = GameState::new(config).unwrap();
    state.apply_move(cell(0, 0)).unwrap();

    assert_eq!(state.cell_owner(cell(0, 0)), Some(PlayerId::TWO));
    assert_eq!(state.current_player(), PlayerId::ONE);
}

#[test]
fn test_json_replays_moves() {
    let state = GameState::from_moves(GameConfig::default(), [cell(4, 4), cell(3, 3), cell(4, 5)]).unwrap();
    let json = serde_json::to_string(&state).unwrap();
    let restored: GameState = serde_json::from_str(&json).unwrap();

    assert_eq!(restored.history(), state.history());
    assert_eq!(restored.placements(), state.placements());
    assert_eq!(restored.current_player(), PlayerId::TWO);
}

// =============================================================================
// Properties
// =============================================================================

fn shuffled_cells() -> impl Strategy<Value = Vec<u16>> {
    Just((0..81u16).collect::<Vec<_>>()).prop_shuffle()
}

/// Play `order` until the game ends or the board fills.
fn play_out(order: &[Cell]) -> GameState {
    let mut state = GameState::new(GameConfig::default()).unwrap();
    for &c in order {
        if state.status().map_or(true, |s| s.is_terminal()) {
            break;
        }
        state.apply_move(c).unwrap();
    }
    state
}

fn rotate(c: Cell) -> Cell {
    let (row, col) = c.coords(9);
    cell(col, 8 - row)
}

fn reflect(c: Cell) -> Cell {
    let (row, col) = c.coords(9);
    cell(row, 8 - col)
}

proptest! {
    #[test]
    fn prop_legal_moves_are_the_empty_cells(order in shuffled_cells(), played in 0usize..=81) {
        let mut state = GameState::new(GameConfig::default()).unwrap();
        for &c in &order[..played] {
            state.apply_move(Cell(c)).unwrap();
        }

        let legal = state.legal_moves();
        prop_assert_eq!(legal.len() + state.move_count(), 81);
        for c in &legal {
            prop_assert!(!state.history().iter().any(|h| h == c));
            prop_assert_eq!(state.cell_owner(*c), None);
        }
        prop_assert!(legal.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn prop_encoding_is_pure(order in shuffled_cells(), played in 0usize..40) {
        let state = GameState::from_moves(GameConfig::default(), order[..played].iter().copied().map(Cell)).unwrap();
        let before = state.clone();

        let first = state.encode_perspective(3);
        let second = state.encode_perspective(3);
        prop_assert_eq!(first.len(), 7 * 81);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(state.history(), before.history());
    }

    #[test]
    fn prop_status_is_symmetric(order in shuffled_cells(), rotations in 0usize..4, mirror in any::<bool>()) {
        let cells: Vec<Cell> = order.into_iter().map(Cell).collect();
        let original = play_out(&cells);

        let transformed: Vec<Cell> = original
            .history()
            .iter()
            .map(|&c| {
                let c = (0..rotations).fold(c, |c, _| rotate(c));
                if mirror { reflect(c) } else { c }
            })
            .collect();
        let image = play_out(&transformed);

        prop_assert_eq!(image.move_count(), original.move_count());
        prop_assert_eq!(image.status(), original.status());
    }
}
