use super::moves::{Cell, Move};
use super::occupant::Occupant;
use crate::consts;
use enum_map::Enum;
use rand::Rng;

/// A controllable occupant of the board.  The environment is generic over
/// the player type; [`Snake`] is the standard one.
pub trait Player: Clone + std::fmt::Debug {
    /// Create a new player whose head is at `head`
    fn spawn<R: Rng>(head: Cell, rng: &mut R) -> Self;

    /// The cells covered by the player, head first
    fn body(&self) -> &Occupant;

    /// The direction of the most recent move
    fn direction(&self) -> Move;

    /// Move one cell in response to a requested move
    fn advance(&mut self, requested: Move);

    /// Arrange for the body to lengthen by one cell on the next advance
    fn grow(&mut self);

    /// True if the next advance will lengthen the body
    fn growing(&self) -> bool;

    fn head(&self) -> Cell {
        self.body().head()
    }
}

/// The standard player: a body that moves one cell per turn and grows one
/// turn after eating
#[derive(Clone, Debug, PartialEq)]
pub struct Snake {
    /// The cells of the snake, head first
    pub(super) body: Occupant,

    /// The direction in which the snake is currently facing
    pub(super) direction: Move,

    /// Whether the tail is kept on the next advance
    pub(super) pending_growth: bool,
}

impl Snake {
    /// Create a one-cell snake at `head` facing in `direction`
    pub fn new(head: Cell, direction: Move) -> Snake {
        Snake {
            body: Occupant::new(head, consts::PLAYER_COLOR),
            direction,
            pending_growth: false,
        }
    }
}

impl Player for Snake {
    /// The initial direction is chosen uniformly at random.
    fn spawn<R: Rng>(head: Cell, rng: &mut R) -> Snake {
        Snake::new(head, Move::from_usize(rng.random_range(0..Move::LENGTH)))
    }

    fn body(&self) -> &Occupant {
        &self.body
    }

    fn direction(&self) -> Move {
        self.direction
    }

    /// Move the head one cell.  A request to reverse straight back into the
    /// body is ignored and the snake keeps going the way it was facing.  No
    /// bounds checking is done here; the new head may be off the board.
    fn advance(&mut self, requested: Move) {
        let mv = if requested.opposes(self.direction) {
            self.direction
        } else {
            requested
        };
        self.body.push_head(self.body.head() + mv);
        if self.pending_growth {
            self.pending_growth = false;
        } else {
            self.body.drop_tail();
        }
        self.direction = mv;
    }

    fn grow(&mut self) {
        self.pending_growth = true;
    }

    fn growing(&self) -> bool {
        self.pending_growth
    }
}
