//! Stand-in policies for driving an environment
use crate::game::Move;
use crate::observation::Observation;
use enum_map::Enum;
use rand::Rng;

/// Something that picks an action index given the latest observation
pub trait Agent {
    fn act(&mut self, observation: &Observation) -> usize;
}

/// An agent that picks every action uniformly at random
#[derive(Clone, Debug)]
pub struct RandomAgent<R> {
    rng: R,
}

impl<R: Rng> RandomAgent<R> {
    pub fn new(rng: R) -> Self {
        RandomAgent { rng }
    }
}

impl<R: Rng> Agent for RandomAgent<R> {
    fn act(&mut self, _observation: &Observation) -> usize {
        self.rng.random_range(0..Move::LENGTH)
    }
}
