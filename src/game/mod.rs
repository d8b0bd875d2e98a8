mod board;
mod moves;
mod occupant;
mod snake;
pub use self::board::{Board, BoardError};
pub use self::moves::{Cell, Move};
pub use self::occupant::{Food, Occupant, SpawnError};
pub use self::snake::{Player, Snake};
use crate::consts;
use crate::env::{Environment, RenderMode, Step, StepInfo};
use crate::observation::Observation;
use crate::replay::{self, Replay, ReplayError, ReplaySize};
use enum_map::Enum;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::HashSet;
use std::path::Path;

/// A game of Snake on a fixed-size board, one episode at a time.
///
/// The game owns its random source, the player, the food, and every
/// observation produced since the last reset.
#[derive(Clone, Debug)]
pub struct Game<R = StdRng, P = Snake> {
    rng: R,
    board: Board,
    player: P,
    food: Food,
    state: GameState,
    score: u32,
    steps: usize,
    observation: Observation,
    frames: Vec<Observation>,
}

impl Game<StdRng, Snake> {
    /// Start a game on `board` with a randomly-seeded random source
    pub fn new(board: Board) -> Self {
        Game::new_with_rng(board, StdRng::from_rng(&mut rand::rng()))
    }
}

impl<R: Rng, P: Player> Game<R, P> {
    /// Start a game on `board` drawing randomness from `rng`.  The first
    /// episode is set up immediately.
    pub fn new_with_rng(board: Board, mut rng: R) -> Game<R, P> {
        let player = spawn_player::<R, P>(board, &mut rng);
        let food = spawn_first_food(board, &player, &mut rng);
        let mut game = Game {
            rng,
            board,
            player,
            food,
            state: GameState::Running,
            score: 0,
            steps: 0,
            observation: Observation::blank(board),
            frames: Vec::new(),
        };
        game.update_observation();
        game
    }

    /// Discard the current episode and begin a new one with a freshly-placed
    /// player and food.  Returns the first observation.
    pub fn reset(&mut self) -> Observation {
        self.state = GameState::Running;
        self.score = 0;
        self.steps = 0;
        self.frames.clear();
        self.player = spawn_player(self.board, &mut self.rng);
        self.food = spawn_first_food(self.board, &self.player, &mut self.rng);
        tracing::debug!(
            head = ?self.player.head(),
            direction = ?self.player.direction(),
            food = ?self.food.cell(),
            "New episode"
        );
        self.update_observation();
        self.observation.clone()
    }

    /// Take one turn with the move whose action index is `action`.
    ///
    /// # Panics
    ///
    /// Panics if `action` is not less than [`Move::LENGTH`].
    pub fn step(&mut self, action: usize) -> Step<Observation> {
        let Some(mv) = Move::decode(action) else {
            panic!("invalid action index {action}; expected 0..{}", Move::LENGTH);
        };
        self.step_move(mv)
    }

    /// Take one turn with the given move.
    ///
    /// Once the episode has ended, this does nothing and returns the final
    /// observation with a reward of 0.
    pub fn step_move(&mut self, mv: Move) -> Step<Observation> {
        if !self.running() {
            return self.outcome(0);
        }
        self.player.advance(mv);
        self.steps += 1;
        let reward = if self.out_of_bounds() {
            self.die("wall");
            -1
        } else if self.player.body().head_overlaps_rest() {
            self.die("self");
            -1
        } else if self.player.head() == self.food.cell() {
            self.eat();
            1
        } else {
            0
        };
        tracing::trace!(?mv, head = ?self.player.head(), reward, "Turn");
        self.update_observation();
        self.outcome(reward)
    }

    fn out_of_bounds(&self) -> bool {
        !self.board.contains(self.player.head())
    }

    fn die(&mut self, cause: &'static str) {
        self.state = GameState::Dead;
        tracing::debug!(cause, score = self.score, steps = self.steps, "Player died");
    }

    fn eat(&mut self) {
        self.score += 1;
        match Food::spawn(self.board, &self.player.body().cell_set(), &mut self.rng) {
            Ok(food) => {
                self.food = food;
                self.player.grow();
            }
            Err(SpawnError::BoardFull) => {
                // The eaten food stays put so that there is still something
                // to draw.
                self.state = GameState::Exhausted;
                tracing::debug!(score = self.score, steps = self.steps, "Board filled");
            }
        }
    }

    fn update_observation(&mut self) {
        self.observation = self.draw();
        self.frames.push(self.observation.clone());
    }
}

impl<R: SeedableRng, P> Game<R, P> {
    /// Replace the random source with one seeded from `seed`, or from a
    /// freshly-chosen seed if `seed` is `None`.  Returns the seed used.
    ///
    /// The current episode is unaffected; the new source is used from the
    /// next random draw onwards.
    pub fn seed(&mut self, seed: Option<u64>) -> u64 {
        let seed = seed.unwrap_or_else(|| rand::rng().random());
        self.rng = R::seed_from_u64(seed);
        seed
    }
}

impl<R, P: Player> Game<R, P> {
    /// Paint the player (unless the episode is over) and then the food onto
    /// a blank grid
    fn draw(&self) -> Observation {
        let mut obs = Observation::blank(self.board);
        if self.running() {
            let body = self.player.body();
            for &cell in body.cells() {
                // The head of a player that just left the board is off-grid
                // and is skipped.
                obs.paint(cell, body.color());
            }
        }
        let food = self.food.occupant();
        for &cell in food.cells() {
            obs.paint(cell, food.color());
        }
        obs
    }

    fn outcome(&self, reward: i32) -> Step<Observation> {
        Step {
            observation: self.observation.clone(),
            reward,
            done: !self.running(),
            info: StepInfo,
        }
    }

    /// Write every frame of the current episode to `path` as an animated GIF
    /// fitting within `size`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `size` is too small for the board or if the file
    /// could not be written.
    pub fn save<Q: AsRef<Path>>(&self, path: Q, size: ReplaySize) -> Result<Replay, ReplayError> {
        replay::write_gif(path.as_ref(), self.board, &self.frames, size)
    }

    pub fn observation(&self) -> &Observation {
        &self.observation
    }

    /// Every observation of the current episode, oldest first
    pub fn frames(&self) -> &[Observation] {
        &self.frames
    }

    pub fn board(&self) -> Board {
        self.board
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    pub fn food(&self) -> &Food {
        &self.food
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    /// Number of times food has been eaten this episode
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Number of turns taken this episode
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn running(&self) -> bool {
        self.state == GameState::Running
    }
}

impl<R: Rng + SeedableRng, P: Player> Environment for Game<R, P> {
    type Observation = Observation;
    type Action = usize;

    fn seed(&mut self, seed: Option<u64>) -> u64 {
        Game::seed(self, seed)
    }

    fn reset(&mut self) -> Observation {
        Game::reset(self)
    }

    fn step(&mut self, action: usize) -> Step<Observation> {
        Game::step(self, action)
    }

    fn render(&self, _mode: RenderMode) -> Observation {
        self.observation.clone()
    }

    fn action_space(&self) -> usize {
        Move::LENGTH
    }
}

fn spawn_player<R: Rng, P: Player>(board: Board, rng: &mut R) -> P {
    let head = board
        .random_cell(rng, consts::PLAYER_SPAWN_BORDER, &HashSet::new())
        .expect("a valid board should have an interior cell");
    P::spawn(head, rng)
}

fn spawn_first_food<R: Rng, P: Player>(board: Board, player: &P, rng: &mut R) -> Food {
    Food::spawn(board, &player.body().cell_set(), rng)
        .expect("a valid board should have room for food beside a new player")
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GameState {
    Running,
    /// The player left the board or ran into itself.
    Dead,
    /// The player has filled the board and there is nowhere left to place
    /// food.
    Exhausted,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand_chacha::ChaCha12Rng;

    const RNG_SEED: u64 = 0x0123456789ABCDEF;

    fn new_game(height: u16, width: u16) -> Game<ChaCha12Rng> {
        Game::new_with_rng(
            Board::new(height, width).unwrap(),
            ChaCha12Rng::seed_from_u64(RNG_SEED),
        )
    }

    fn place_snake(game: &mut Game<ChaCha12Rng>, cells: &[(i32, i32)], direction: Move) {
        game.player = Snake {
            body: Occupant::from_cells(
                cells.iter().map(|&(r, c)| Cell::new(r, c)),
                consts::PLAYER_COLOR,
            )
            .unwrap(),
            direction,
            pending_growth: false,
        };
    }

    fn count_color(obs: &Observation, color: crate::observation::Color) -> usize {
        obs.painted().filter(|&(_, c)| c == color).count()
    }

    #[test]
    fn new_game_on_3x3_starts_in_center() {
        for seed in 0..32 {
            let game: Game<ChaCha12Rng> = Game::new_with_rng(
                Board::new(3, 3).unwrap(),
                ChaCha12Rng::seed_from_u64(seed),
            );
            assert_eq!(game.player().body().cells(), &[Cell::new(1, 1)]);
            assert_ne!(game.food().cell(), Cell::new(1, 1));
            assert!(game.running());
            assert_eq!(game.frames().len(), 1);
        }
    }

    #[test]
    fn first_step_on_5x5() {
        for seed in 0..64 {
            let mut game: Game<ChaCha12Rng> = Game::new_with_rng(
                Board::new(5, 5).unwrap(),
                ChaCha12Rng::seed_from_u64(seed),
            );
            let obs = game.reset();
            assert_eq!(count_color(&obs, consts::PLAYER_COLOR), 1);
            assert_eq!(count_color(&obs, consts::FOOD_COLOR), 1);
            let head = game.player().head();
            let target = head + game.player().direction();
            let ate = target == game.food().cell();
            let step = game.step(game.player().direction().action());
            assert!(!step.done);
            assert_eq!(step.reward, i32::from(ate));
            assert_eq!(step.info, StepInfo);
            assert_eq!(game.player().head(), target);
            assert_eq!(count_color(&step.observation, consts::PLAYER_COLOR), 1);
            assert_eq!(count_color(&step.observation, consts::FOOD_COLOR), 1);
            assert_eq!(
                step.observation.get(target),
                Some(consts::PLAYER_COLOR),
                "seed {seed}"
            );
            assert_eq!(game.frames().len(), 2);
        }
    }

    #[test]
    fn leaving_the_board_is_fatal() {
        let mut game = new_game(5, 5);
        place_snake(&mut game, &[(0, 2), (1, 2), (2, 2)], Move::Up);
        game.food = Food::new(Cell::new(4, 4));
        let step = game.step(Move::Up.action());
        assert_eq!(step.reward, -1);
        assert!(step.done);
        assert_eq!(game.state(), GameState::Dead);
        assert_eq!(game.player().head(), Cell::new(-1, 2));
        // Only the food is drawn once the player is dead
        assert_eq!(
            step.observation.painted().collect::<Vec<_>>(),
            [(Cell::new(4, 4), consts::FOOD_COLOR)]
        );
        assert_eq!(game.frames().len(), 2);
    }

    #[test]
    fn leaving_the_board_at_every_edge() {
        for (cells, mv) in [
            ([(0, 0)], Move::Up),
            ([(0, 0)], Move::Left),
            ([(4, 4)], Move::Down),
            ([(4, 4)], Move::Right),
        ] {
            let mut game = new_game(5, 5);
            place_snake(&mut game, &cells, mv);
            game.food = Food::new(Cell::new(2, 2));
            let step = game.step_move(mv);
            assert_eq!((step.reward, step.done), (-1, true), "{cells:?} {mv:?}");
        }
    }

    #[test]
    fn running_into_self_is_fatal() {
        let mut game = new_game(10, 10);
        place_snake(
            &mut game,
            &[(5, 5), (5, 4), (5, 3), (5, 2), (5, 1)],
            Move::Right,
        );
        game.food = Food::new(Cell::new(0, 0));
        assert_eq!(game.step_move(Move::Down).reward, 0);
        assert_eq!(game.step_move(Move::Left).reward, 0);
        let step = game.step_move(Move::Up);
        assert_eq!(game.player().head(), Cell::new(5, 4));
        assert_eq!(step.reward, -1);
        assert!(step.done);
        assert_eq!(game.state(), GameState::Dead);
    }

    #[test]
    fn chasing_own_tail_is_safe() {
        let mut game = new_game(10, 10);
        place_snake(&mut game, &[(5, 5), (5, 4), (5, 3), (5, 2)], Move::Right);
        game.food = Food::new(Cell::new(0, 0));
        for mv in [Move::Down, Move::Left, Move::Up] {
            let step = game.step_move(mv);
            assert_eq!((step.reward, step.done), (0, false), "{mv:?}");
        }
        assert_eq!(game.player().head(), Cell::new(5, 4));
    }

    #[test]
    fn retained_tail_counts_as_body() {
        let mut game = new_game(10, 10);
        place_snake(&mut game, &[(5, 4), (5, 3), (5, 2), (5, 1)], Move::Right);
        game.food = Food::new(Cell::new(5, 5));
        assert_eq!(game.step_move(Move::Right).reward, 1);
        game.food = Food::new(Cell::new(0, 0));
        // The tail at (5, 2) is kept by the growth on this move
        assert_eq!(game.step_move(Move::Down).reward, 0);
        assert_eq!(game.player().body().len(), 5);
        assert_eq!(game.step_move(Move::Left).reward, 0);
        let step = game.step_move(Move::Up);
        assert_eq!(game.player().head(), Cell::new(5, 4));
        assert_eq!((step.reward, step.done), (-1, true));
    }

    #[test]
    fn growth_happens_on_the_following_turn() {
        let mut game = new_game(10, 10);
        place_snake(&mut game, &[(5, 5)], Move::Right);
        game.food = Food::new(Cell::new(5, 6));
        let step = game.step_move(Move::Right);
        assert_eq!(step.reward, 1);
        assert_eq!(game.score(), 1);
        assert_eq!(game.player().body().len(), 1);
        assert!(game.player().growing());
        assert!(!game.player().body().occupies(game.food().cell()));
        game.food = Food::new(Cell::new(0, 0));
        assert_eq!(game.step_move(Move::Right).reward, 0);
        assert_eq!(game.player().body().len(), 2);
        assert_eq!(game.step_move(Move::Right).reward, 0);
        assert_eq!(game.player().body().len(), 2);
        assert_eq!(
            game.player().body().cells(),
            &[Cell::new(5, 8), Cell::new(5, 7)]
        );
    }

    #[test]
    fn steps_after_the_end_are_frozen() {
        let mut game = new_game(5, 5);
        place_snake(&mut game, &[(0, 2)], Move::Up);
        game.food = Food::new(Cell::new(4, 4));
        let last = game.step_move(Move::Up);
        assert!(last.done);
        let player = game.player().clone();
        let first = game.step(Move::Down.action());
        let second = game.step(Move::Left.action());
        assert_eq!(first, second);
        assert_eq!(
            first,
            Step {
                observation: last.observation,
                reward: 0,
                done: true,
                info: StepInfo,
            }
        );
        assert_eq!(game.player(), &player);
        assert_eq!(game.frames().len(), 2);
        assert_eq!(game.steps(), 1);
    }

    #[test]
    fn filling_the_board_ends_the_episode() {
        let mut game = new_game(3, 3);
        place_snake(
            &mut game,
            &[
                (0, 1),
                (0, 0),
                (1, 0),
                (2, 0),
                (2, 1),
                (2, 2),
                (1, 2),
                (0, 2),
            ],
            Move::Right,
        );
        game.player.pending_growth = true;
        game.food = Food::new(Cell::new(1, 1));
        let step = game.step_move(Move::Down);
        assert_eq!((step.reward, step.done), (1, true));
        assert_eq!(game.state(), GameState::Exhausted);
        assert_eq!(game.player().body().len(), 9);
        assert_eq!(game.food().cell(), Cell::new(1, 1));
        assert_eq!(
            step.observation.painted().collect::<Vec<_>>(),
            [(Cell::new(1, 1), consts::FOOD_COLOR)]
        );
        assert_eq!(game.step_move(Move::Up).reward, 0);
    }

    #[test]
    fn reset_starts_a_new_episode() {
        let mut game = new_game(8, 8);
        for _ in 0..20 {
            if game.step(Move::Up.action()).done {
                break;
            }
        }
        assert!(!game.running());
        let obs = game.reset();
        assert!(game.running());
        assert_eq!(game.score(), 0);
        assert_eq!(game.steps(), 0);
        assert_eq!(game.frames(), &[obs.clone()]);
        assert_eq!(game.observation(), &obs);
        let head = game.player().head();
        assert!((1..7).contains(&head.row) && (1..7).contains(&head.col));
        assert_eq!(game.player().body().len(), 1);
    }

    #[test]
    fn seeding_is_reproducible() {
        let mut game1 = new_game(12, 9);
        let mut game2: Game<ChaCha12Rng> = Game::new_with_rng(
            Board::new(12, 9).unwrap(),
            ChaCha12Rng::seed_from_u64(42),
        );
        assert_eq!(game1.seed(Some(7)), 7);
        assert_eq!(game2.seed(Some(7)), 7);
        assert_eq!(game1.reset(), game2.reset());
        assert_eq!(game1.player(), game2.player());
        assert_eq!(game1.food(), game2.food());

        let seed = game1.seed(None);
        let obs1 = game1.reset();
        game2.seed(Some(seed));
        assert_eq!(obs1, game2.reset());
    }

    #[test]
    fn render_matches_observation() {
        let mut game = new_game(6, 6);
        let obs = Environment::reset(&mut game);
        assert_eq!(game.render(RenderMode::Human), obs);
        assert_eq!(game.action_space(), 4);
        game.close();
        assert_eq!(game.render(RenderMode::default()), obs);
    }

    #[test]
    #[should_panic(expected = "invalid action index 4")]
    fn invalid_action_panics() {
        let mut game = new_game(5, 5);
        let _ = game.step(4);
    }
}
