use std::fs::File;
use std::io::{BufWriter, Write as _};
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, DynamicImage, Frame as ImageFrame};

use crate::foundation::error::{NetevoError, NetevoResult};
use crate::render::frame::Frame;

/// Options for [`write_gif`].
#[derive(Clone, Debug)]
pub struct GifOpts {
    /// Output GIF path. An existing file is overwritten.
    pub out_path: PathBuf,
    /// Playback rate; every frame is shown for `round(1000 / fps)` ms.
    pub fps: u32,
    /// Palette quantization speed, 1 (best) to 30 (fastest).
    pub speed: i32,
}

impl GifOpts {
    /// Options for writing `out_path` at `fps`.
    pub fn new(out_path: impl Into<PathBuf>, fps: u32) -> Self {
        Self {
            out_path: out_path.into(),
            fps,
            speed: 10,
        }
    }

    /// Check option ranges before any output is created.
    pub fn validate(&self) -> NetevoResult<()> {
        frame_delay_ms(self.fps)?;
        if !(1..=30).contains(&self.speed) {
            return Err(NetevoError::validation(format!(
                "gif speed must be in 1..=30, got {}",
                self.speed
            )));
        }
        Ok(())
    }
}

/// Per-frame display time in milliseconds: `round(1000 / fps)`.
pub fn frame_delay_ms(fps: u32) -> NetevoResult<u32> {
    if fps == 0 {
        return Err(NetevoError::validation("fps must be non-zero"));
    }
    Ok((1000 + fps / 2) / fps)
}

/// Create the parent directory of `path` if it is missing.
pub fn ensure_parent_dir(path: &Path) -> NetevoResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

/// Encode `frames` in order as one infinitely looping GIF.
///
/// Frames are consumed as they are encoded. Returns the number of frames written.
pub fn write_gif(frames: Vec<Frame>, opts: &GifOpts) -> NetevoResult<usize> {
    opts.validate()?;
    let delay_ms = frame_delay_ms(opts.fps)?;

    let Some(first) = frames.first() else {
        return Err(NetevoError::validation("no frames to encode"));
    };
    let dims = first.dimensions();
    if let Some(odd) = frames.iter().find(|f| f.dimensions() != dims) {
        return Err(NetevoError::validation(format!(
            "frame for generation '{}' is {}x{}, expected {}x{}",
            odd.generation,
            odd.dimensions().0,
            odd.dimensions().1,
            dims.0,
            dims.1
        )));
    }

    ensure_parent_dir(&opts.out_path)?;
    let file = File::create(&opts.out_path)
        .with_context(|| format!("create gif '{}'", opts.out_path.display()))?;
    let mut writer = BufWriter::new(file);

    let count = frames.len();
    {
        let mut encoder = GifEncoder::new_with_speed(&mut writer, opts.speed);
        encoder
            .set_repeat(Repeat::Infinite)
            .map_err(|e| NetevoError::encode(format!("set gif repeat: {e}")))?;

        for frame in frames {
            let generation = frame.generation;
            let rgba = DynamicImage::ImageRgb8(frame.image).into_rgba8();
            let delay = Delay::from_numer_denom_ms(delay_ms, 1);
            encoder
                .encode_frame(ImageFrame::from_parts(rgba, 0, 0, delay))
                .map_err(|e| {
                    NetevoError::encode(format!("encode frame for generation '{generation}': {e}"))
                })?;
        }
    }

    writer
        .flush()
        .with_context(|| format!("flush gif '{}'", opts.out_path.display()))?;
    tracing::debug!(frames = count, delay_ms, out = %opts.out_path.display(), "gif written");
    Ok(count)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/gif.rs"]
mod tests;
