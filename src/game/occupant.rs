use super::board::Board;
use super::moves::Cell;
use crate::consts;
use crate::observation::Color;
use rand::Rng;
use std::collections::{HashSet, VecDeque};
use thiserror::Error;

/// Something that takes up one or more cells on the board
#[derive(Clone, Debug, PartialEq)]
pub struct Occupant {
    /// The occupied cells, head first.  Never empty.
    cells: VecDeque<Cell>,
    color: Color,
}

impl Occupant {
    pub fn new(head: Cell, color: Color) -> Occupant {
        Occupant {
            cells: VecDeque::from([head]),
            color,
        }
    }

    /// Create an occupant covering `cells`, head first.  Returns `None` if
    /// `cells` is empty.
    pub fn from_cells<I: IntoIterator<Item = Cell>>(cells: I, color: Color) -> Option<Occupant> {
        let cells = cells.into_iter().collect::<VecDeque<_>>();
        (!cells.is_empty()).then_some(Occupant { cells, color })
    }

    pub fn head(&self) -> Cell {
        self.cells[0]
    }

    pub fn cells(&self) -> &VecDeque<Cell> {
        &self.cells
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false`; present for symmetry with [`Occupant::len()`]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    /// True if the head shares a cell with any other part
    pub fn head_overlaps_rest(&self) -> bool {
        let head = self.head();
        self.cells.iter().skip(1).any(|&c| c == head)
    }

    pub(crate) fn cell_set(&self) -> HashSet<Cell> {
        self.cells.iter().copied().collect()
    }

    /// Add a new head in front of the current one
    pub(crate) fn push_head(&mut self, cell: Cell) {
        self.cells.push_front(cell);
    }

    /// Remove the last cell, unless it is the only one
    pub(crate) fn drop_tail(&mut self) {
        if self.cells.len() > 1 {
            let _ = self.cells.pop_back();
        }
    }
}

/// A single cell of food
#[derive(Clone, Debug, PartialEq)]
pub struct Food(Occupant);

impl Food {
    pub fn new(cell: Cell) -> Food {
        Food(Occupant::new(cell, consts::FOOD_COLOR))
    }

    /// Place food on a uniformly random cell of `board` not in `excluded`
    ///
    /// # Errors
    ///
    /// Returns `Err` if every cell of the board is excluded.
    pub fn spawn<R: Rng>(
        board: Board,
        excluded: &HashSet<Cell>,
        rng: &mut R,
    ) -> Result<Food, SpawnError> {
        board
            .random_cell(rng, 0, excluded)
            .map(Food::new)
            .ok_or(SpawnError::BoardFull)
    }

    pub fn cell(&self) -> Cell {
        self.0.head()
    }

    pub fn occupant(&self) -> &Occupant {
        &self.0
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum SpawnError {
    #[error("no free cell left on the board")]
    BoardFull,
}
