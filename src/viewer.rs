use crate::command::Command;
use crate::util::center_rect;
use crossterm::event::{poll, read};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Margin, Position, Rect, Size},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Widget},
    DefaultTerminal,
};
use snakegym::{consts, Game, GameState, Observation, Player};
use std::io;
use std::time::{Duration, Instant};

/// Style for the status bar above the board
const STATUS_BAR_STYLE: Style = Style::new().add_modifier(Modifier::REVERSED);

/// Plays observations back in the terminal, one frame per tick.  The terminal
/// is restored when the viewer is dropped.
#[derive(Debug)]
pub(crate) struct Viewer {
    terminal: DefaultTerminal,
    paused: bool,
}

impl Viewer {
    pub(crate) fn open() -> Viewer {
        Viewer {
            terminal: ratatui::init(),
            paused: false,
        }
    }

    /// Draw `scene` and then wait out the rest of the tick, handling any
    /// keypresses.  Returns `false` if the user asked to quit.
    pub(crate) fn show(&mut self, scene: &Scene<'_>) -> io::Result<bool> {
        self.terminal
            .draw(|frame| frame.render_widget(scene, frame.area()))?;
        let deadline = Instant::now() + consts::TICK_PERIOD;
        loop {
            let wait = if self.paused {
                Duration::from_secs(1)
            } else {
                deadline.saturating_duration_since(Instant::now())
            };
            if wait.is_zero() {
                return Ok(true);
            }
            if poll(wait)? {
                let Some(ev) = read()?.as_key_press_event() else {
                    continue;
                };
                match Command::from_key_event(ev) {
                    Some(Command::Quit) => return Ok(false),
                    Some(Command::Pause) => self.paused = !self.paused,
                    None => (),
                }
            }
        }
    }
}

impl Drop for Viewer {
    fn drop(&mut self) {
        ratatui::restore();
    }
}

/// Everything drawn for one frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Scene<'a> {
    pub(crate) observation: &'a Observation,
    pub(crate) episode: usize,
    pub(crate) score: u32,
    pub(crate) steps: usize,
    pub(crate) state: GameState,
}

impl<'a> Scene<'a> {
    pub(crate) fn new<R, P: Player>(game: &'a Game<R, P>, episode: usize) -> Scene<'a> {
        Scene {
            observation: game.observation(),
            episode,
            score: game.score(),
            steps: game.steps(),
            state: game.state(),
        }
    }
}

impl Widget for &Scene<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [status_area, board_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).areas(area);
        let ending = match self.state {
            GameState::Running => "",
            GameState::Dead => "  [GAME OVER]",
            GameState::Exhausted => "  [BOARD FILLED]",
        };
        Line::styled(
            format!(
                " Episode: {}  Score: {}  Steps: {}{ending}",
                self.episode, self.score, self.steps
            ),
            STATUS_BAR_STYLE,
        )
        .render(status_area, buf);

        let obs = self.observation;
        let block_size = Size {
            width: obs.width().saturating_mul(2).saturating_add(2),
            height: obs.height().saturating_add(2),
        };
        let block_area = center_rect(board_area, block_size);
        Block::bordered().render(block_area, buf);
        let mut canvas = Canvas {
            area: block_area.inner(Margin::new(1, 1)),
            buf,
        };
        for (y, row) in (0u16..).zip(obs.rows()) {
            for (x, &color) in (0u16..).zip(row) {
                if !color.is_blank() {
                    let [r, g, b] = color.to_rgb8();
                    canvas.fill_cell(Position::new(x, y), Color::Rgb(r, g, b));
                }
            }
        }
    }
}

#[derive(Debug, Eq, PartialEq)]
struct Canvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl Canvas<'_> {
    /// Color the two terminal columns that make up board cell `pos`
    fn fill_cell(&mut self, pos: Position, color: Color) {
        let Some(x) = pos
            .x
            .checked_mul(2)
            .and_then(|x| self.area.x.checked_add(x))
        else {
            return;
        };
        let Some(y) = self.area.y.checked_add(pos.y) else {
            return;
        };
        for x in [x, x.saturating_add(1)] {
            if self.area.contains(Position::new(x, y)) {
                if let Some(cell) = self.buf.cell_mut((x, y)) {
                    cell.set_char(' ').set_bg(color);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;
    use snakegym::Board;

    #[test]
    fn new_game_scene() {
        let game: Game<ChaCha12Rng> = Game::new_with_rng(
            Board::new(3, 3).unwrap(),
            ChaCha12Rng::seed_from_u64(0x0123456789ABCDEF),
        );
        let head = game.player().head();
        let food = game.food().cell();
        let scene = Scene::new(&game, 1);
        let area = Rect::new(0, 0, 40, 6);
        let mut buffer = Buffer::empty(area);
        scene.render(area, &mut buffer);
        let mut expected = Buffer::with_lines([
            " Episode: 1  Score: 0  Steps: 0",
            "                ┌──────┐                ",
            "                │      │                ",
            "                │      │                ",
            "                │      │                ",
            "                └──────┘                ",
        ]);
        expected.set_style(Rect::new(0, 0, 40, 1), STATUS_BAR_STYLE);
        let cell_rect = |row: i32, col: i32| {
            Rect::new(
                17 + 2 * u16::try_from(col).unwrap(),
                2 + u16::try_from(row).unwrap(),
                2,
                1,
            )
        };
        expected.set_style(
            cell_rect(head.row, head.col),
            Style::new().bg(Color::Rgb(0, 0, 255)),
        );
        expected.set_style(
            cell_rect(food.row, food.col),
            Style::new().bg(Color::Rgb(0, 255, 0)),
        );
        pretty_assertions::assert_eq!(buffer, expected);
    }

    #[test]
    fn game_over_status() {
        let mut game: Game<ChaCha12Rng> = Game::new_with_rng(
            Board::new(3, 3).unwrap(),
            ChaCha12Rng::seed_from_u64(0x0123456789ABCDEF),
        );
        while !game.step(0).done {}
        let scene = Scene::new(&game, 2);
        let area = Rect::new(0, 0, 60, 6);
        let mut buffer = Buffer::empty(area);
        scene.render(area, &mut buffer);
        let status = (0..60)
            .map(|x| buffer[(x, 0)].symbol())
            .collect::<String>();
        assert!(status.starts_with(" Episode: 2  Score: "), "{status:?}");
        assert!(
            status.trim_end().ends_with("Steps: 2  [GAME OVER]"),
            "{status:?}"
        );
    }
}
