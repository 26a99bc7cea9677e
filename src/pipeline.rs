use std::path::PathBuf;

use crate::encode::gif::{GifOpts, frame_delay_ms, write_gif};
use crate::foundation::error::{NetevoError, NetevoResult};
use crate::render::figure::{Rasterizer, TitleStyle};
use crate::render::frame::Frame;
use crate::render::network::NetworkRenderer;
use crate::snapshot::discover::{Sampling, SnapshotRef, discover};
use crate::snapshot::matrix::NetworkMatrix;

/// Default snapshot directory.
pub const DEFAULT_DIR: &str = "log/success4_best";
/// Default file pattern for snapshots.
pub const DEFAULT_PATTERN: &str = "*.out";
/// Default task identifier.
pub const DEFAULT_TASK: &str = "slimevolley";
/// Default output for the plain evolution pipeline.
pub const DEFAULT_OUTPUT: &str = "network_evolution.gif";
/// Default output for the comparison pipeline.
pub const DEFAULT_COMPARISON_OUTPUT: &str = "network_evolution_comparison.gif";
/// Default playback rate.
pub const DEFAULT_FPS: u32 = 2;
/// Default snapshot count for the comparison pipeline.
pub const DEFAULT_SNAPSHOTS: usize = 10;

/// Which of the two pipelines to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineMode {
    /// Every `stride`-th snapshot, titled with the generation.
    Evolution {
        /// Keep every n-th snapshot.
        stride: usize,
    },
    /// `snapshots` evenly spaced snapshots, titled with generation and network size.
    Comparison {
        /// Number of snapshots to keep.
        snapshots: usize,
    },
}

impl PipelineMode {
    /// Sampling applied to the discovered snapshots.
    pub fn sampling(self) -> Sampling {
        match self {
            Self::Evolution { stride } => Sampling::Stride(stride),
            Self::Comparison { snapshots } => Sampling::Even(snapshots),
        }
    }

    /// Title format for each frame.
    pub fn title(self) -> FrameTitle {
        match self {
            Self::Evolution { .. } => FrameTitle::Generation,
            Self::Comparison { .. } => FrameTitle::WithStats,
        }
    }
}

/// How frames are titled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameTitle {
    /// `Generation <label>`.
    Generation,
    /// `Generation <label>` plus a `Nodes: X | Connections: Y` line.
    WithStats,
}

impl FrameTitle {
    /// Title text and style for `snapshot`.
    ///
    /// Statistics are read from the snapshot file directly, independent of the renderer.
    pub fn describe(self, snapshot: &SnapshotRef) -> NetevoResult<(String, TitleStyle)> {
        match self {
            Self::Generation => Ok((
                format!("Generation {}", snapshot.generation),
                TitleStyle {
                    font_size_pt: 20.0,
                    bold: true,
                    pad_pt: 20.0,
                },
            )),
            Self::WithStats => {
                let m = NetworkMatrix::load(&snapshot.path)?;
                Ok((
                    format!(
                        "Generation {}\nNodes: {} | Connections: {}",
                        snapshot.generation,
                        m.node_count(),
                        m.connection_count()
                    ),
                    TitleStyle {
                        font_size_pt: 18.0,
                        bold: true,
                        pad_pt: 20.0,
                    },
                ))
            }
        }
    }
}

/// Everything a pipeline run needs besides the renderer.
#[derive(Clone, Debug)]
pub struct PipelineOpts {
    /// Directory holding the snapshots.
    pub dir: PathBuf,
    /// Glob matched against file names in `dir`.
    pub pattern: String,
    /// Output GIF path.
    pub out_path: PathBuf,
    /// Task identifier handed to the renderer.
    pub task: String,
    /// Playback rate of the output.
    pub fps: u32,
    /// Pipeline selection and its sampling parameter.
    pub mode: PipelineMode,
}

impl Default for PipelineOpts {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_DIR),
            pattern: DEFAULT_PATTERN.to_string(),
            out_path: PathBuf::from(DEFAULT_OUTPUT),
            task: DEFAULT_TASK.to_string(),
            fps: DEFAULT_FPS,
            mode: PipelineMode::Evolution { stride: 1 },
        }
    }
}

impl PipelineOpts {
    /// Reject options that cannot produce output.
    pub fn validate(&self) -> NetevoResult<()> {
        self.mode.sampling().validate()?;
        frame_delay_ms(self.fps)?;
        glob::Pattern::new(&self.pattern).map_err(|e| {
            NetevoError::validation(format!("invalid pattern '{}': {e}", self.pattern))
        })?;
        if self.task.is_empty() {
            return Err(NetevoError::validation("task must be non-empty"));
        }
        Ok(())
    }
}

/// A snapshot that failed to render, with the reason.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedSnapshot {
    /// The snapshot that was skipped.
    pub snapshot: SnapshotRef,
    /// Display form of the error.
    pub error: String,
}

/// Frames that rendered, in input order, and the snapshots that did not.
#[derive(Clone, Debug, Default)]
pub struct RenderOutcome {
    /// Successfully rendered frames.
    pub frames: Vec<Frame>,
    /// Snapshots excluded from the output.
    pub skipped: Vec<SkippedSnapshot>,
}

/// Result of a whole pipeline run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// Discovery found nothing; no output was written.
    NoSnapshots,
    /// Every selected snapshot failed; no output was written.
    NoFrames {
        /// Snapshots that failed.
        skipped: Vec<SkippedSnapshot>,
    },
    /// The GIF was written.
    Written {
        /// Output path.
        out_path: PathBuf,
        /// Number of frames in the GIF.
        frames: usize,
        /// Snapshots excluded from the GIF.
        skipped: Vec<SkippedSnapshot>,
        /// Per-frame display time.
        delay_ms: u32,
    },
}

/// Render one snapshot into a titled frame.
///
/// The figure lives only for the duration of this call and is dropped on every return path.
pub fn render_one(
    snapshot: &SnapshotRef,
    renderer: &dyn NetworkRenderer,
    task: &str,
    title: FrameTitle,
    raster: &Rasterizer,
) -> NetevoResult<Frame> {
    let (text, style) = title.describe(snapshot)?;

    let mut figure = renderer.render(&snapshot.path, task)?;
    figure.axis_mut().set_title(text.clone(), style);
    let image = figure.rasterize(raster)?;

    Ok(Frame {
        generation: snapshot.generation.clone(),
        title: text,
        image,
    })
}

/// Render every snapshot in order, skipping (and logging) the ones that fail.
pub fn render_frames(
    snapshots: &[SnapshotRef],
    renderer: &dyn NetworkRenderer,
    task: &str,
    title: FrameTitle,
    raster: &Rasterizer,
) -> RenderOutcome {
    let total = snapshots.len();
    let mut outcome = RenderOutcome::default();

    for (i, snapshot) in snapshots.iter().enumerate() {
        tracing::info!(
            "Processing {}/{total}: Generation {}",
            i + 1,
            snapshot.generation
        );
        match render_one(snapshot, renderer, task, title, raster) {
            Ok(frame) => outcome.frames.push(frame),
            Err(e) => {
                tracing::warn!("Error processing {}: {e}", snapshot.path.display());
                outcome.skipped.push(SkippedSnapshot {
                    snapshot: snapshot.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    outcome
}

/// Discover, render and assemble according to `opts`.
///
/// Only option validation, discovery IO errors and failures of the final write are returned as
/// errors; empty input and all-failed renders are reported through [`RunOutcome`].
#[tracing::instrument(skip_all, fields(dir = %opts.dir.display(), mode = ?opts.mode))]
pub fn run_pipeline(
    opts: &PipelineOpts,
    renderer: &dyn NetworkRenderer,
    raster: &Rasterizer,
) -> NetevoResult<RunOutcome> {
    opts.validate()?;

    let all = discover(&opts.dir, &opts.pattern)?;
    if all.is_empty() {
        tracing::info!("No {} files found in {}", opts.pattern, opts.dir.display());
        return Ok(RunOutcome::NoSnapshots);
    }

    let selected = opts.mode.sampling().apply(&all)?;
    tracing::info!(
        "Found {} network files, creating GIF with {} frames...",
        all.len(),
        selected.len()
    );

    let RenderOutcome { frames, skipped } =
        render_frames(&selected, renderer, &opts.task, opts.mode.title(), raster);

    if frames.is_empty() {
        tracing::info!("No frames were successfully generated");
        return Ok(RunOutcome::NoFrames { skipped });
    }

    let gif = GifOpts::new(&opts.out_path, opts.fps);
    let delay_ms = frame_delay_ms(opts.fps)?;
    tracing::info!("Saving GIF to {}...", opts.out_path.display());
    let written = write_gif(frames, &gif)?;
    tracing::info!(
        "Successfully saved {written} frames to {} ({} fps, {delay_ms}ms per frame)",
        opts.out_path.display(),
        opts.fps
    );
    if !skipped.is_empty() {
        tracing::warn!("{} snapshot(s) skipped", skipped.len());
    }

    Ok(RunOutcome::Written {
        out_path: opts.out_path.clone(),
        frames: written,
        skipped,
        delay_ms,
    })
}

#[cfg(test)]
#[path = "../tests/unit/pipeline/pipeline.rs"]
mod tests;
