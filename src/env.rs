//! The interface through which agents drive an environment

/// A reinforcement-learning environment: something that can be reset to an
/// initial observation and then stepped with actions until it reports that
/// the episode is done.
pub trait Environment {
    type Observation;
    type Action;

    /// Reseed the environment's random source.  If `seed` is `None`, a fresh
    /// seed is chosen.  Returns the seed actually used.
    fn seed(&mut self, seed: Option<u64>) -> u64;

    /// Begin a new episode and return its first observation
    fn reset(&mut self) -> Self::Observation;

    /// Take one turn
    fn step(&mut self, action: Self::Action) -> Step<Self::Observation>;

    /// Return the current observation
    fn render(&self, mode: RenderMode) -> Self::Observation;

    /// Release any display resources.  The default does nothing.
    fn close(&mut self) {}

    /// Number of discrete actions accepted by [`Environment::step()`]
    fn action_space(&self) -> usize;
}

/// The outcome of a single turn
#[derive(Clone, Debug, PartialEq)]
pub struct Step<O> {
    pub observation: O,

    /// -1 for a fatal move, 1 for eating food, 0 otherwise
    pub reward: i32,

    /// Whether the episode has ended
    pub done: bool,

    pub info: StepInfo,
}

/// Auxiliary per-step information.  Currently always empty.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct StepInfo;

/// How an environment should be rendered.  There is only one mode, and it
/// does not affect what [`Environment::render()`] returns.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum RenderMode {
    #[default]
    Human,
}
