//! A minimal grid-based Snake environment for reinforcement learning.
//!
//! A [`Game`] is reset to produce an [`Observation`] and then stepped with
//! discrete actions, each [`Step`] reporting a reward and whether the episode
//! is over.  Every observation of an episode is kept so that it can be saved
//! as an animated GIF with [`Game::save()`].
pub mod agent;
pub mod config;
pub mod consts;
pub mod env;
pub mod game;
pub mod observation;
pub mod replay;
pub use crate::env::{Environment, RenderMode, Step, StepInfo};
pub use crate::game::{Board, Cell, Food, Game, GameState, Move, Player, Snake};
pub use crate::observation::{Color, Observation};
pub use crate::replay::{Replay, ReplayError, ReplaySize};
