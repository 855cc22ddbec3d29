//! Line scanning along the four board axes.

use crate::core::{Cell, GameState, PlayerId};

/// Direction steps `(d_row, d_col)`: horizontal, vertical and both diagonals.
pub const AXES: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Length of the contiguous run of `player` stones through `cell` along `axis`.
///
/// `cell` itself counts as part of the run whether or not it is occupied.
#[must_use]
pub fn run_length(state: &GameState, cell: Cell, player: PlayerId, axis: (isize, isize)) -> usize {
    let cols = state.config().cols;
    let (row, col) = cell.coords(cols);
    let (d_row, d_col) = axis;

    let mut count = 1;
    for sign in [1, -1] {
        let (mut r, mut c) = (row as isize, col as isize);
        loop {
            r += sign * d_row;
            c += sign * d_col;
            if r < 0 || c < 0 {
                break;
            }
            if state.owner_at(r as usize, c as usize) != Some(player) {
                break;
            }
            count += 1;
        }
    }
    count
}

/// Longest run through `cell` over all four axes, for the stone's owner.
///
/// Returns 0 for an empty cell.
#[must_use]
pub fn longest_run(state: &GameState, cell: Cell) -> usize {
    let Some(player) = state.cell_owner(cell) else {
        return 0;
    };
    AXES
        .iter()
        .map(|&axis| run_length(state, cell, player, axis))
        .max()
        .unwrap_or(0)
}

/// Whether the stone at `cell` sits on a line of at least `win_length`.
#[must_use]
pub fn completes_line(state: &GameState, cell: Cell, win_length: usize) -> bool {
    longest_run(state, cell) >= win_length
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameConfig;

    #[test]
    fn test_run_length_counts_both_directions() {
        // Player 1 at (0,0), (0,1), (0,2); player 2 elsewhere.
        let config = GameConfig::default();
        let moves = [Cell(0), Cell(40), Cell(1), Cell(50), Cell(2)];
        let state = GameState::from_moves(config, moves).unwrap();

        assert_eq!(run_length(&state, Cell(1), PlayerId::ONE, (0, 1)), 3);
        assert_eq!(run_length(&state, Cell(1), PlayerId::ONE, (1, 0)), 1);
        assert_eq!(longest_run(&state, Cell(0)), 3);
    }

    #[test]
    fn test_run_stops_at_board_edge() {
        // (0,8) and (1,0) are adjacent in flat index but not on the board.
        let config = GameConfig::default();
        let state = GameState::from_moves(config, [Cell(8), Cell(40), Cell(9)]).unwrap();
        assert_eq!(longest_run(&state, Cell(8)), 1);
        assert_eq!(longest_run(&state, Cell(9)), 1);
    }

    #[test]
    fn test_anti_diagonal() {
        // Player 1 on (0,4), (1,3), (2,2).
        let config = GameConfig::default();
        let moves = [Cell(4), Cell(80), Cell(12), Cell(79), Cell(20)];
        let state = GameState::from_moves(config, moves).unwrap();
        assert_eq!(run_length(&state, Cell(12), PlayerId::ONE, (1, -1)), 3);
    }

    #[test]
    fn test_empty_cell() {
        let state = GameState::new(GameConfig::default()).unwrap();
        assert_eq!(longest_run(&state, Cell(0)), 0);
        assert!(!completes_line(&state, Cell(0), 1));
    }
}
