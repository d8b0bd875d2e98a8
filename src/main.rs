mod command;
mod util;
mod viewer;
use crate::viewer::{Scene, Viewer};
use anyhow::Context;
use lexopt::{Arg, Parser, ValueExt};
use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;
use snakegym::agent::{Agent, RandomAgent};
use snakegym::config::Config;
use snakegym::{Board, Game, GameState, ReplaySize};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::level_filters::LevelFilter;

static USAGE: &str = "\
Usage: snakegym [options]

Play episodes of Snake with a random agent and optionally save a replay.

Options:
  -c, --config <FILE>     Read configuration from <FILE>
      --seed <N>          Seed the environment's random source
  -n, --episodes <N>      Number of episodes to play
      --height <N>        Board height in cells
      --width <N>         Board width in cells
      --max-steps <N>     Stop an episode after <N> turns
      --gif <FILE>        Save the last episode to <FILE> as an animated GIF
      --size <PX>         Fit the saved replay within <PX>x<PX> pixels
      --json              Print a JSON summary line for each episode
  -w, --watch             Play the episodes back in the terminal
  -v, --verbose           Log more details
  -h, --help              Display this help message and exit
  -V, --version           Show the program version and exit
";

#[derive(Clone, Debug, Eq, PartialEq)]
enum Cli {
    Run(Arguments),
    Help,
    Version,
}

impl Cli {
    fn from_parser(mut parser: Parser) -> Result<Cli, lexopt::Error> {
        let mut args = Arguments::default();
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('c') | Arg::Long("config") => {
                    args.config = Some(PathBuf::from(parser.value()?));
                }
                Arg::Long("seed") => args.seed = Some(parser.value()?.parse()?),
                Arg::Short('n') | Arg::Long("episodes") => {
                    args.episodes = Some(parser.value()?.parse()?);
                }
                Arg::Long("height") => args.height = Some(parser.value()?.parse()?),
                Arg::Long("width") => args.width = Some(parser.value()?.parse()?),
                Arg::Long("max-steps") => args.max_steps = Some(parser.value()?.parse()?),
                Arg::Long("gif") => args.gif = Some(PathBuf::from(parser.value()?)),
                Arg::Long("size") => args.size = Some(parser.value()?.parse()?),
                Arg::Long("json") => args.json = true,
                Arg::Short('w') | Arg::Long("watch") => args.watch = true,
                Arg::Short('v') | Arg::Long("verbose") => args.verbose = true,
                Arg::Short('h') | Arg::Long("help") => return Ok(Cli::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Cli::Version),
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Cli::Run(args))
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Cli::Run(args) => args.run(),
            Cli::Help => {
                let mut out = io::stdout().lock();
                out.write_all(USAGE.as_bytes())?;
                out.flush()?;
                Ok(())
            }
            Cli::Version => {
                let mut out = io::stdout().lock();
                writeln!(
                    &mut out,
                    "{} {}",
                    env!("CARGO_PKG_NAME"),
                    env!("CARGO_PKG_VERSION")
                )?;
                out.flush()?;
                Ok(())
            }
        }
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct Arguments {
    config: Option<PathBuf>,
    seed: Option<u64>,
    episodes: Option<usize>,
    height: Option<u16>,
    width: Option<u16>,
    max_steps: Option<usize>,
    gif: Option<PathBuf>,
    size: Option<u32>,
    json: bool,
    watch: bool,
    verbose: bool,
}

impl Arguments {
    fn run(self) -> anyhow::Result<()> {
        self.init_logging();
        let config = self.configure(load_config(self.config.as_deref())?)?;
        if config.episodes == 0 {
            anyhow::bail!("number of episodes must be positive");
        }
        let mut game = Game::new(config.board);
        let seed = game.seed(config.seed);
        tracing::info!(
            seed,
            height = config.board.height(),
            width = config.board.width(),
            episodes = config.episodes,
            "Starting"
        );
        let mut agent = RandomAgent::new(StdRng::seed_from_u64(seed.wrapping_add(1)));
        let mut summaries = Vec::with_capacity(config.episodes);
        {
            let mut viewer = self.watch.then(Viewer::open);
            for episode in 1..=config.episodes {
                let mut obs = game.reset();
                let mut quit = false;
                loop {
                    if let Some(v) = viewer.as_mut() {
                        quit = !v.show(&Scene::new(&game, episode))?;
                    }
                    if quit || !game.running() || game.steps() >= config.max_steps {
                        break;
                    }
                    obs = game.step(agent.act(&obs)).observation;
                }
                summaries.push(EpisodeSummary::new(&game, episode, seed));
                if quit {
                    break;
                }
            }
        }

        let mut out = io::stdout().lock();
        for summary in &summaries {
            if self.json {
                serde_json::to_writer(&mut out, summary)?;
                writeln!(&mut out)?;
            } else {
                writeln!(&mut out, "{summary}")?;
            }
        }
        if let Some(ref path) = self.gif {
            let replay = game
                .save(path, config.replay)
                .with_context(|| format!("failed to save replay to {}", path.display()))?;
            if !self.json {
                writeln!(
                    &mut out,
                    "Saved {} frames ({}x{} px) to {}",
                    replay.frames,
                    replay.width,
                    replay.height,
                    replay.path.display()
                )?;
            }
        }
        out.flush()?;
        Ok(())
    }

    /// Apply command-line overrides on top of the configuration file
    fn configure(&self, mut config: Config) -> anyhow::Result<Config> {
        if self.height.is_some() || self.width.is_some() {
            config.board = Board::new(
                self.height.unwrap_or(config.board.height()),
                self.width.unwrap_or(config.board.width()),
            )?;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(episodes) = self.episodes {
            config.episodes = episodes;
        }
        if let Some(max_steps) = self.max_steps {
            config.max_steps = max_steps;
        }
        if let Some(size) = self.size {
            config.replay = ReplaySize::square(size);
        }
        Ok(config)
    }

    fn init_logging(&self) {
        let level = if self.watch {
            LevelFilter::OFF
        } else if self.verbose {
            LevelFilter::DEBUG
        } else {
            LevelFilter::INFO
        };
        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(io::stderr)
            .init();
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let config = match path {
        Some(p) => Config::load(p, false)
            .with_context(|| format!("failed to load configuration from {}", p.display()))?,
        None => Config::load(&Config::default_path()?, true)?,
    };
    Ok(config)
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
enum Outcome {
    Died,
    Filled,
    Truncated,
}

impl From<GameState> for Outcome {
    fn from(state: GameState) -> Outcome {
        match state {
            GameState::Running => Outcome::Truncated,
            GameState::Dead => Outcome::Died,
            GameState::Exhausted => Outcome::Filled,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
struct EpisodeSummary {
    episode: usize,
    seed: u64,
    score: u32,
    steps: usize,
    outcome: Outcome,
}

impl EpisodeSummary {
    fn new<R, P: snakegym::Player>(game: &Game<R, P>, episode: usize, seed: u64) -> Self {
        EpisodeSummary {
            episode,
            seed,
            score: game.score(),
            steps: game.steps(),
            outcome: game.state().into(),
        }
    }
}

impl std::fmt::Display for EpisodeSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let outcome = match self.outcome {
            Outcome::Died => "died",
            Outcome::Filled => "filled the board",
            Outcome::Truncated => "ran out of turns",
        };
        write!(
            f,
            "Episode {}: score {} after {} turns ({outcome})",
            self.episode, self.score, self.steps
        )
    }
}

fn main() -> ExitCode {
    match Cli::from_parser(Parser::from_env()) {
        Ok(cli) => anyhow_exit(cli.run()),
        Err(e) => {
            eprintln!("snakegym: {e}");
            ExitCode::from(2)
        }
    }
}

fn anyhow_exit(r: anyhow::Result<()>) -> ExitCode {
    match r {
        Ok(()) => ExitCode::SUCCESS,
        Err(e)
            if e.downcast_ref::<io::Error>()
                .is_some_and(|e| e.kind() == ErrorKind::BrokenPipe) =>
        {
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("snakegym: {e:?}");
            ExitCode::from(2)
        }
    }
}
