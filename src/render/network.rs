use std::fmt::Write as _;
use std::path::Path;

use kurbo::{BezPath, Rect};

use crate::foundation::error::NetevoResult;
use crate::render::figure::{Figure, FigureSpec, escape_xml};
use crate::render::layout::{NetworkLayout, NodeRole, layout_network};
use crate::render::task::TaskSpec;
use crate::snapshot::matrix::NetworkMatrix;

/// Draws one snapshot into a figure.
///
/// Implementations own layout and drawing; callers only set the axis title and rasterize.
pub trait NetworkRenderer {
    /// Produce a drawn figure for the snapshot at `snapshot`, interpreted for `task`.
    fn render(&self, snapshot: &Path, task: &str) -> NetevoResult<Figure>;
}

impl<R: NetworkRenderer + ?Sized> NetworkRenderer for &R {
    fn render(&self, snapshot: &Path, task: &str) -> NetevoResult<Figure> {
        (**self).render(snapshot, task)
    }
}

const NODE_FILL: &str = "#add8e6";
const NODE_STROKE: &str = "#3d5a6c";
const POSITIVE_EDGE: &str = "#1f77b4";
const NEGATIVE_EDGE: &str = "#d62728";

/// Short name of an activation function id from the last snapshot column.
pub fn activation_name(id: f64) -> Option<&'static str> {
    if id.fract() != 0.0 {
        return None;
    }
    Some(match id as i64 {
        1 => "linear",
        2 => "step",
        3 => "sin",
        4 => "gauss",
        5 => "tanh",
        6 => "sigmoid",
        7 => "inverse",
        8 => "abs",
        9 => "relu",
        10 => "cos",
        11 => "square",
        _ => return None,
    })
}

/// Default collaborator: inputs on the left, hidden nodes in dependency columns, outputs on
/// the right, edges colored by weight sign.
#[derive(Clone, Debug, Default)]
pub struct LayeredNetworkRenderer {
    spec: FigureSpec,
}

impl LayeredNetworkRenderer {
    /// Renderer producing figures of the given size.
    pub fn new(spec: FigureSpec) -> Self {
        Self { spec }
    }

    /// Figure spec used for every snapshot.
    pub fn spec(&self) -> &FigureSpec {
        &self.spec
    }

    fn plot_area(&self, fig: &Figure) -> Rect {
        let (w, h) = fig.size();
        let (w, h) = (f64::from(w), f64::from(h));
        // Leave room for a two-line title above and side labels left and right.
        let top = f64::from(self.spec.points_to_px(20.0 + 2.0 * 18.0 * 1.2 + 12.0));
        Rect::new(w * 0.12, top.min(h * 0.4), w * 0.88, h * 0.95)
    }

    fn draw_edges(&self, fig: &mut Figure, m: &NetworkMatrix, layout: &NetworkLayout) {
        let scale = self.spec.dpi / 100.0;
        let mut out = String::new();
        for src in &layout.nodes {
            for dst in &layout.nodes {
                let Some(w) = m.weight(src.index, dst.index) else {
                    continue;
                };
                if w == 0.0 || !w.is_finite() {
                    continue;
                }
                let mut path = BezPath::new();
                path.move_to(src.pos);
                path.line_to(dst.pos);

                let color = if w > 0.0 { POSITIVE_EDGE } else { NEGATIVE_EDGE };
                let width = (0.5 + w.abs().min(2.0) as f32) * scale;
                let _ = writeln!(
                    out,
                    r#"<path d="{}" fill="none" stroke="{color}" stroke-width="{width:.2}" stroke-opacity="0.6"/>"#,
                    path.to_svg()
                );
            }
        }
        fig.draw(&out);
    }

    fn draw_nodes(
        &self,
        fig: &mut Figure,
        m: &NetworkMatrix,
        layout: &NetworkLayout,
        area: Rect,
    ) {
        let dpi_scale = f64::from(self.spec.dpi / 100.0);
        let slot = area.height() / (layout.widest_layer() + 1) as f64;
        let radius = (slot * 0.35).min(14.0 * dpi_scale).max(1.0);
        let label_px = self.spec.points_to_px(8.0);
        let activations: Vec<f64> = m.activations().collect();

        let mut out = String::new();
        let mut input_no = 0usize;
        let mut output_no = 0usize;
        for node in &layout.nodes {
            let (x, y) = (node.pos.x, node.pos.y);
            let _ = writeln!(
                out,
                r#"<circle cx="{x:.1}" cy="{y:.1}" r="{radius:.1}" fill="{NODE_FILL}" stroke="{NODE_STROKE}" stroke-width="1"/>"#
            );

            let (label, anchor, lx) = match node.role {
                NodeRole::Bias => ("bias".to_string(), "end", x - radius * 1.6),
                NodeRole::Input => {
                    input_no += 1;
                    (format!("in {input_no}"), "end", x - radius * 1.6)
                }
                NodeRole::Output => {
                    output_no += 1;
                    let act = activation_name(activations[node.index]).unwrap_or("?");
                    (format!("out {output_no} ({act})"), "start", x + radius * 1.6)
                }
                NodeRole::Hidden => {
                    let act = activation_name(activations[node.index]).unwrap_or("?");
                    (act.to_string(), "middle", x)
                }
            };
            let ly = if node.role == NodeRole::Hidden {
                y - radius * 1.4
            } else {
                y + f64::from(label_px) * 0.35
            };
            let _ = writeln!(
                out,
                r#"<text x="{lx:.1}" y="{ly:.1}" font-family="DejaVu Sans, sans-serif" font-size="{label_px:.1}" text-anchor="{anchor}" fill="black">{}</text>"#,
                escape_xml(&label)
            );
        }
        fig.draw(&out);
    }
}

impl NetworkRenderer for LayeredNetworkRenderer {
    fn render(&self, snapshot: &Path, task: &str) -> NetevoResult<Figure> {
        let task = TaskSpec::lookup(task)?;
        let m = NetworkMatrix::load(snapshot)?;

        let mut fig = Figure::new(self.spec)?;
        let area = self.plot_area(&fig);
        let layout = layout_network(&m, &task, area)?;
        tracing::debug!(
            snapshot = %snapshot.display(),
            nodes = layout.nodes.len(),
            layers = layout.layer_count,
            "laid out network"
        );

        self.draw_edges(&mut fig, &m, &layout);
        self.draw_nodes(&mut fig, &m, &layout, area);
        Ok(fig)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/network.rs"]
mod tests;
