use std::io::IsTerminal as _;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Render neuro-evolution network snapshots as an animated GIF.
#[derive(Parser, Debug)]
#[command(name = "netevo", version)]
struct Cli {
    /// Directory containing network snapshot files.
    #[arg(short = 'd', long = "dir", default_value = netevo::DEFAULT_DIR)]
    dir: PathBuf,

    /// Output GIF path [default: network_evolution.gif, or
    /// network_evolution_comparison.gif with --comparison].
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Task name (e.g. slimevolley, swingup).
    #[arg(short = 't', long, default_value = netevo::DEFAULT_TASK)]
    task: String,

    /// Frames per second for the GIF.
    #[arg(long, default_value_t = netevo::DEFAULT_FPS, value_parser = clap::value_parser!(u32).range(1..))]
    fps: u32,

    /// Sample every N networks (1 = all, 2 = every other, ...).
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    sample: u64,

    /// Create a comparison GIF with node and connection counts.
    #[arg(long)]
    comparison: bool,

    /// Number of evenly spaced snapshots in comparison mode.
    #[arg(long, default_value_t = netevo::DEFAULT_SNAPSHOTS as u64, value_parser = clap::value_parser!(u64).range(1..))]
    snapshots: u64,

    /// Glob matched against snapshot file names.
    #[arg(long, default_value = netevo::DEFAULT_PATTERN)]
    pattern: String,

    /// Figure resolution in dots per inch.
    #[arg(long, default_value_t = 100.0)]
    dpi: f32,
}

impl Cli {
    fn into_parts(self) -> (netevo::PipelineOpts, netevo::FigureSpec) {
        let (mode, default_out, figure) = if self.comparison {
            (
                netevo::PipelineMode::Comparison {
                    snapshots: self.snapshots as usize,
                },
                netevo::DEFAULT_COMPARISON_OUTPUT,
                netevo::FigureSpec::new(12.0, 10.0, self.dpi),
            )
        } else {
            (
                netevo::PipelineMode::Evolution {
                    stride: self.sample as usize,
                },
                netevo::DEFAULT_OUTPUT,
                netevo::FigureSpec::new(10.0, 10.0, self.dpi),
            )
        };

        let opts = netevo::PipelineOpts {
            dir: self.dir,
            pattern: self.pattern,
            out_path: self.output.unwrap_or_else(|| PathBuf::from(default_out)),
            task: self.task,
            fps: self.fps,
            mode,
        };
        (opts, figure)
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_ansi(std::io::stdout().is_terminal())
        .without_time()
        .init();

    let (opts, figure) = Cli::parse().into_parts();
    figure.pixel_size()?;

    let renderer = netevo::LayeredNetworkRenderer::new(figure);
    let raster = netevo::Rasterizer::with_system_fonts();
    if raster.font_face_count() == 0 {
        tracing::warn!("no system fonts found; titles and labels will not be drawn");
    }

    match netevo::run_pipeline(&opts, &renderer, &raster)? {
        netevo::RunOutcome::NoSnapshots | netevo::RunOutcome::NoFrames { .. } => {}
        netevo::RunOutcome::Written { out_path, .. } => {
            eprintln!("wrote {}", out_path.display());
        }
    }
    Ok(())
}
