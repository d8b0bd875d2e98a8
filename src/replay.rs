//! Exporting an episode's frames as an animated GIF
use crate::consts;
use crate::game::Board;
use crate::observation::Observation;
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame};
use serde::Deserialize;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Target dimensions of a replay in pixels
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct ReplaySize {
    pub width: u32,
    pub height: u32,
}

impl ReplaySize {
    pub const fn square(side: u32) -> ReplaySize {
        ReplaySize {
            width: side,
            height: side,
        }
    }
}

impl Default for ReplaySize {
    fn default() -> ReplaySize {
        ReplaySize::square(consts::DEFAULT_REPLAY_SIDE)
    }
}

/// A replay file that has been written to disk
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Replay {
    pub path: PathBuf,
    pub frames: usize,
    pub width: u32,
    pub height: u32,
}

/// The largest whole number of pixels per cell such that the board fits
/// within `size`
pub fn magnification(board: Board, size: ReplaySize) -> u32 {
    let by_height = size.height / u32::from(board.height());
    let by_width = size.width / u32::from(board.width());
    by_height.min(by_width)
}

/// Write `frames` to `path` as a looping GIF played at
/// [`REPLAY_FPS`][consts::REPLAY_FPS] frames per second, each cell scaled up
/// by [`magnification()`].
///
/// # Errors
///
/// Returns `Err` if there are no frames, if `size` cannot fit even one pixel
/// per cell, or if the file could not be created, encoded, or fully written.
pub fn write_gif(
    path: &Path,
    board: Board,
    frames: &[Observation],
    size: ReplaySize,
) -> Result<Replay, ReplayError> {
    if frames.is_empty() {
        return Err(ReplayError::NoFrames);
    }
    let scale = magnification(board, size);
    if scale == 0 {
        return Err(ReplayError::TooSmall { size, board });
    }
    let fp = fs_err::File::create(path).map_err(ReplayError::Create)?;
    let mut writer = BufWriter::new(fp);
    {
        // The GIF trailer is written when the encoder is dropped.
        let mut encoder = GifEncoder::new(&mut writer);
        encoder.set_repeat(Repeat::Infinite)?;
        let delay = Delay::from_numer_denom_ms(1000, consts::REPLAY_FPS);
        encoder.encode_frames(
            frames
                .iter()
                .map(|obs| Frame::from_parts(obs.to_image(scale), 0, 0, delay)),
        )?;
    }
    writer.flush().map_err(ReplayError::Write)?;
    let replay = Replay {
        path: path.to_path_buf(),
        frames: frames.len(),
        width: u32::from(board.width()) * scale,
        height: u32::from(board.height()) * scale,
    };
    tracing::info!(
        path = %path.display(),
        frames = replay.frames,
        width = replay.width,
        height = replay.height,
        "Wrote replay"
    );
    Ok(replay)
}

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("no frames to save")]
    NoFrames,
    #[error(
        "replay size {}x{} is too small for a {}x{} board",
        .size.width,
        .size.height,
        .board.width(),
        .board.height()
    )]
    TooSmall { size: ReplaySize, board: Board },
    #[error("failed to create replay file")]
    Create(#[source] std::io::Error),
    #[error("failed to write replay file")]
    Write(#[source] std::io::Error),
    #[error("failed to encode replay")]
    Encode(#[from] image::ImageError),
}
