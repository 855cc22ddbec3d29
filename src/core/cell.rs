//! Board cells.
//!
//! A cell is addressed by its flat index `row * cols + col`. The board
//! dimensions are not stored in the cell, so conversions take `cols`.

use serde::{Deserialize, Serialize};

/// Flat index of a board intersection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell(pub u16);

impl Cell {
    /// Create a cell from a flat index.
    #[must_use]
    pub const fn new(index: u16) -> Self {
        Self(index)
    }

    /// Create a cell from `(row, col)` on a board with `cols` columns.
    ///
    /// The caller is responsible for bounds; `GameState::apply_move`
    /// rejects out-of-range cells. Indices past the `u16` range saturate
    /// to `u16::MAX`, which lies off every valid board.
    ///
    /// ```
    /// use gomoku_zero::core::Cell;
    ///
    /// let cell = Cell::from_coords(4, 2, 9);
    /// assert_eq!(cell.index(), 38);
    /// assert_eq!(cell.coords(9), (4, 2));
    /// ```
    #[must_use]
    pub fn from_coords(row: usize, col: usize, cols: usize) -> Self {
        let index = row.checked_mul(cols).and_then(|i| i.checked_add(col));
        Self(index.and_then(|i| u16::try_from(i).ok()).unwrap_or(u16::MAX))
    }

    /// The flat index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// `(row, col)` on a board with `cols` columns.
    #[inline]
    #[must_use]
    pub const fn coords(self, cols: usize) -> (usize, usize) {
        (self.index() / cols, self.index() % cols)
    }
}

impl From<u16> for Cell {
    fn from(index: u16) -> Self {
        Self(index)
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Cell({})", self.0)
    }
}
