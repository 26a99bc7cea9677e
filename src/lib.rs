//! netevo turns a directory of neuro-evolution network snapshots into an animated GIF.
//!
//! Each snapshot is a comma-separated matrix written once per generation: every row is a node,
//! every column but the last is an outgoing weight, and the last column is the node's
//! activation function id.
//!
//! # Pipeline overview
//!
//! 1. **Discover**: `dir + pattern -> Vec<SnapshotRef>`, sorted by file name and sampled
//!    ([`Sampling::Stride`] or [`Sampling::Even`]).
//! 2. **Render**: `SnapshotRef -> Figure -> Frame` through an injected [`NetworkRenderer`];
//!    failures are logged and skipped.
//! 3. **Assemble**: `Vec<Frame> -> GIF`, looping forever at `round(1000 / fps)` ms per frame.
//!
//! [`run_pipeline`] wires the three steps together; the `netevo` binary exposes it on the
//! command line.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod encode;
mod foundation;
mod pipeline;
mod render;
mod snapshot;

pub use encode::gif::{GifOpts, ensure_parent_dir, frame_delay_ms, write_gif};
pub use foundation::error::{NetevoError, NetevoResult};
pub use pipeline::{
    DEFAULT_COMPARISON_OUTPUT, DEFAULT_DIR, DEFAULT_FPS, DEFAULT_OUTPUT, DEFAULT_PATTERN,
    DEFAULT_SNAPSHOTS, DEFAULT_TASK, FrameTitle, PipelineMode, PipelineOpts, RenderOutcome,
    RunOutcome, SkippedSnapshot, render_frames, render_one, run_pipeline,
};
pub use render::figure::{Axis, Figure, FigureSpec, Rasterizer, TitleStyle};
pub use render::frame::Frame;
pub use render::layout::{
    NetworkLayout, NodeRole, PlacedNode, assign_layers, layout_network, node_roles,
};
pub use render::network::{LayeredNetworkRenderer, NetworkRenderer, activation_name};
pub use render::task::TaskSpec;
pub use snapshot::discover::{Sampling, SnapshotRef, discover};
pub use snapshot::matrix::NetworkMatrix;
