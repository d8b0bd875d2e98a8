use crate::game::{Board, Cell};
use image::{Rgba, RgbaImage};

/// A display color with channels in the range 0.0 to 1.0
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Color {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
}

impl Color {
    pub const BLANK: Color = Color::new(0.0, 0.0, 0.0);

    pub const fn new(red: f32, green: f32, blue: f32) -> Color {
        Color { red, green, blue }
    }

    /// Convert to 8-bit channels.  Values are scaled by 255 and truncated.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn to_rgb8(self) -> [u8; 3] {
        let scale = |v: f32| (v.clamp(0.0, 1.0) * 255.0) as u8;
        [scale(self.red), scale(self.green), scale(self.blue)]
    }

    pub fn is_blank(self) -> bool {
        self == Color::BLANK
    }
}

/// The rendered state of the board: a `height` × `width` grid of colors,
/// stored in row-major order.
#[derive(Clone, Debug, PartialEq)]
pub struct Observation {
    board: Board,
    pixels: Vec<Color>,
}

impl Observation {
    /// Create an observation with every cell blank
    pub fn blank(board: Board) -> Observation {
        Observation {
            board,
            pixels: vec![Color::BLANK; board.area()],
        }
    }

    pub fn height(&self) -> u16 {
        self.board.height()
    }

    pub fn width(&self) -> u16 {
        self.board.width()
    }

    /// Return the color at `cell`, or `None` if it lies outside the grid
    pub fn get(&self, cell: Cell) -> Option<Color> {
        self.board
            .index(cell)
            .and_then(|i| self.pixels.get(i))
            .copied()
    }

    /// Set the color at `cell`.  Cells outside the grid are left alone and
    /// `false` is returned.
    pub(crate) fn paint(&mut self, cell: Cell, color: Color) -> bool {
        match self.board.index(cell).and_then(|i| self.pixels.get_mut(i)) {
            Some(px) => {
                *px = color;
                true
            }
            None => false,
        }
    }

    /// Iterate over the rows of the grid from top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Color]> + '_ {
        self.pixels.chunks(usize::from(self.width()))
    }

    /// Iterate over every non-blank cell and its color
    pub fn painted(&self) -> impl Iterator<Item = (Cell, Color)> + '_ {
        self.board
            .cells()
            .zip(self.pixels.iter().copied())
            .filter(|&(_, color)| !color.is_blank())
    }

    /// Produce an RGBA image in which every cell becomes a `scale` × `scale`
    /// block of pixels.
    pub fn to_image(&self, scale: u32) -> RgbaImage {
        let width = u32::from(self.width()) * scale;
        let height = u32::from(self.height()) * scale;
        RgbaImage::from_fn(width, height, |x, y| {
            let cell = Cell::new(
                i32::try_from(y / scale).unwrap_or(i32::MAX),
                i32::try_from(x / scale).unwrap_or(i32::MAX),
            );
            let [r, g, b] = self.get(cell).unwrap_or_default().to_rgb8();
            Rgba([r, g, b, u8::MAX])
        })
    }
}
