//! Assorted constants & hard-coded configuration
use crate::observation::Color;
use std::time::Duration;

/// Color of every cell occupied by the player
pub const PLAYER_COLOR: Color = Color::new(0.0, 0.0, 1.0);

/// Color of the food
pub const FOOD_COLOR: Color = Color::new(0.0, 1.0, 0.0);

/// Side length of the board when none is configured
pub const DEFAULT_BOARD_SIDE: u16 = 20;

/// New players are placed at least this many cells away from every edge so
/// that their first move can stay on the board.
pub const PLAYER_SPAWN_BORDER: u16 = 1;

/// Number of random draws made when looking for a free cell before falling
/// back to choosing among the free cells directly
pub const MAX_SPAWN_ATTEMPTS: usize = 64;

/// Frame rate of exported replays
pub const REPLAY_FPS: u32 = 5;

/// Default replay dimensions in pixels
pub const DEFAULT_REPLAY_SIDE: u32 = 250;

/// Time between frames in the terminal viewer; matches [`REPLAY_FPS`]
pub const TICK_PERIOD: Duration = Duration::from_millis(200);

/// Default limit on turns per episode when driven from the command line
pub const DEFAULT_MAX_STEPS: usize = 500;
