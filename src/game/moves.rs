use enum_map::Enum;
use std::ops::Add;

/// A position on the board as a (row, column) pair.
///
/// Coordinates are signed so that a head which has just left the board can
/// still be represented.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Cell {
    pub row: i32,
    pub col: i32,
}

impl Cell {
    pub const fn new(row: i32, col: i32) -> Cell {
        Cell { row, col }
    }
}

impl Add<Move> for Cell {
    type Output = Cell;

    fn add(self, mv: Move) -> Cell {
        let (dr, dc) = mv.delta();
        Cell {
            row: self.row + dr,
            col: self.col + dc,
        }
    }
}

/// The four discrete actions.  The declaration order is the action index:
/// `Up` is 0, `Right` is 1, `Down` is 2, `Left` is 3.
#[derive(Clone, Copy, Debug, Enum, Eq, Hash, PartialEq)]
pub enum Move {
    Up,
    Right,
    Down,
    Left,
}

impl Move {
    /// Map an action index to its move, or `None` if the index is not in
    /// `0..Move::LENGTH`.
    pub fn decode(action: usize) -> Option<Move> {
        (action < Self::LENGTH).then(|| Self::from_usize(action))
    }

    /// The action index of this move; the inverse of [`Move::decode()`]
    pub fn action(self) -> usize {
        self.into_usize()
    }

    pub fn iter() -> impl Iterator<Item = Move> {
        (0..Self::LENGTH).map(Self::from_usize)
    }

    /// The unit step taken by this move as a (row, column) offset
    pub fn delta(self) -> (i32, i32) {
        match self {
            Move::Up => (-1, 0),
            Move::Right => (0, 1),
            Move::Down => (1, 0),
            Move::Left => (0, -1),
        }
    }

    pub fn reverse(self) -> Move {
        match self {
            Move::Up => Move::Down,
            Move::Right => Move::Left,
            Move::Down => Move::Up,
            Move::Left => Move::Right,
        }
    }

    /// True if moving in `self` and then in `other` would cancel out
    pub fn opposes(self, other: Move) -> bool {
        let (r1, c1) = self.delta();
        let (r2, c2) = other.delta();
        r1 + r2 == 0 && c1 + c2 == 0
    }
}
