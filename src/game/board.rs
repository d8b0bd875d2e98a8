use super::moves::Cell;
use crate::consts;
use rand::{seq::IteratorRandom, Rng};
use serde::Deserialize;
use std::collections::HashSet;
use std::ops::Range;
use thiserror::Error;

/// Dimensions of the playing field
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq)]
#[serde(try_from = "RawBoard")]
pub struct Board {
    height: u16,
    width: u16,
}

impl Board {
    /// The smallest allowed side length: anything smaller has no interior
    /// cell in which to place a new player.
    pub const MIN_SIDE: u16 = 3;

    /// # Errors
    ///
    /// Returns `Err` if either side is shorter than [`Board::MIN_SIDE`].
    pub fn new(height: u16, width: u16) -> Result<Board, BoardError> {
        if height < Self::MIN_SIDE || width < Self::MIN_SIDE {
            Err(BoardError { height, width })
        } else {
            Ok(Board { height, width })
        }
    }

    pub fn height(self) -> u16 {
        self.height
    }

    pub fn width(self) -> u16 {
        self.width
    }

    /// Total number of cells on the board
    pub fn area(self) -> usize {
        usize::from(self.height) * usize::from(self.width)
    }

    pub fn contains(self, cell: Cell) -> bool {
        let (rows, cols) = self.ranges(0);
        rows.contains(&cell.row) && cols.contains(&cell.col)
    }

    /// Row-major index of `cell`, or `None` if it is off the board
    pub(crate) fn index(self, cell: Cell) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let row = usize::try_from(cell.row).ok()?;
        let col = usize::try_from(cell.col).ok()?;
        Some(row * usize::from(self.width) + col)
    }

    /// Iterate over every cell on the board in row-major order
    pub fn cells(self) -> impl Iterator<Item = Cell> {
        self.cells_within(0)
    }

    fn cells_within(self, border: u16) -> impl Iterator<Item = Cell> {
        let (rows, cols) = self.ranges(border);
        rows.flat_map(move |row| cols.clone().map(move |col| Cell::new(row, col)))
    }

    fn ranges(self, border: u16) -> (Range<i32>, Range<i32>) {
        let border = i32::from(border);
        (
            border..i32::from(self.height) - border,
            border..i32::from(self.width) - border,
        )
    }

    /// Pick a uniformly random cell at least `border` cells away from every
    /// edge that is not in `excluded`.
    ///
    /// Draws are retried up to [`MAX_SPAWN_ATTEMPTS`][consts::MAX_SPAWN_ATTEMPTS]
    /// times, after which the choice is made among the remaining free cells
    /// directly.  Returns `None` if there are no free cells.
    pub fn random_cell<R: Rng>(
        self,
        rng: &mut R,
        border: u16,
        excluded: &HashSet<Cell>,
    ) -> Option<Cell> {
        let (rows, cols) = self.ranges(border);
        if rows.is_empty() || cols.is_empty() {
            return None;
        }
        for _ in 0..consts::MAX_SPAWN_ATTEMPTS {
            let cell = Cell::new(
                rng.random_range(rows.clone()),
                rng.random_range(cols.clone()),
            );
            if !excluded.contains(&cell) {
                return Some(cell);
            }
        }
        self.cells_within(border)
            .filter(|c| !excluded.contains(c))
            .choose(rng)
    }
}

impl Default for Board {
    fn default() -> Board {
        Board {
            height: consts::DEFAULT_BOARD_SIDE,
            width: consts::DEFAULT_BOARD_SIDE,
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(default)]
struct RawBoard {
    height: u16,
    width: u16,
}

impl Default for RawBoard {
    fn default() -> RawBoard {
        let Board { height, width } = Board::default();
        RawBoard { height, width }
    }
}

impl TryFrom<RawBoard> for Board {
    type Error = BoardError;

    fn try_from(value: RawBoard) -> Result<Board, BoardError> {
        Board::new(value.height, value.width)
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error("board must be at least 3x3, got {height}x{width}")]
pub struct BoardError {
    height: u16,
    width: u16,
}
