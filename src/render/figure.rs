use std::fmt::Write as _;
use std::sync::Arc;

use image::RgbImage;

use crate::foundation::error::{NetevoError, NetevoResult};

const MAX_DIM: u32 = 16_384;
const BACKGROUND_RGB: [u8; 3] = [255, 255, 255];

/// Physical size and resolution of a figure.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FigureSpec {
    /// Width in inches.
    pub width_in: f32,
    /// Height in inches.
    pub height_in: f32,
    /// Pixels per inch.
    pub dpi: f32,
}

impl Default for FigureSpec {
    fn default() -> Self {
        Self {
            width_in: 10.0,
            height_in: 10.0,
            dpi: 100.0,
        }
    }
}

impl FigureSpec {
    /// Build a spec from inches and dpi.
    pub fn new(width_in: f32, height_in: f32, dpi: f32) -> Self {
        Self {
            width_in,
            height_in,
            dpi,
        }
    }

    /// Raster size in pixels, `round(inches * dpi)` per axis.
    pub fn pixel_size(&self) -> NetevoResult<(u32, u32)> {
        fn to_px(inches: f32, dpi: f32) -> NetevoResult<u32> {
            let v = (inches * dpi).round();
            if !v.is_finite() || v < 1.0 {
                return Err(NetevoError::validation(
                    "figure size and dpi must be positive",
                ));
            }
            if v > MAX_DIM as f32 {
                return Err(NetevoError::validation(format!(
                    "figure raster size too large: {v} px (max {MAX_DIM})"
                )));
            }
            Ok(v as u32)
        }

        Ok((to_px(self.width_in, self.dpi)?, to_px(self.height_in, self.dpi)?))
    }

    /// Convert typographic points to pixels at this figure's dpi.
    pub fn points_to_px(&self, pt: f32) -> f32 {
        pt * self.dpi / 72.0
    }
}

/// Typography of an axis title, in points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TitleStyle {
    /// Font size in points.
    pub font_size_pt: f32,
    /// Bold weight.
    pub bold: bool,
    /// Gap between the top edge and the first line, in points.
    pub pad_pt: f32,
}

impl Default for TitleStyle {
    fn default() -> Self {
        Self {
            font_size_pt: 20.0,
            bold: true,
            pad_pt: 20.0,
        }
    }
}

/// The primary axis of a figure. Only the title is configurable from outside the collaborator.
#[derive(Clone, Debug, Default)]
pub struct Axis {
    title: Option<(String, TitleStyle)>,
}

impl Axis {
    /// Replace the title. Newlines start additional centered lines.
    pub fn set_title(&mut self, text: impl Into<String>, style: TitleStyle) {
        self.title = Some((text.into(), style));
    }

    /// Current title text, if any.
    pub fn title(&self) -> Option<&str> {
        self.title.as_ref().map(|(t, _)| t.as_str())
    }

    /// Current title style, if a title is set.
    pub fn title_style(&self) -> Option<TitleStyle> {
        self.title.as_ref().map(|(_, s)| *s)
    }
}

/// A drawn network figure: an SVG scene in pixel coordinates plus the canvas it rasterizes into.
///
/// The canvas is allocated up front and released when the figure is dropped, so callers that
/// create one figure per loop iteration never hold more than one canvas at a time.
pub struct Figure {
    spec: FigureSpec,
    width: u32,
    height: u32,
    canvas: resvg::tiny_skia::Pixmap,
    scene: String,
    axis: Axis,
}

impl std::fmt::Debug for Figure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Figure")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("scene_len", &self.scene.len())
            .field("axis", &self.axis)
            .finish()
    }
}

impl Figure {
    /// Allocate an empty figure.
    pub fn new(spec: FigureSpec) -> NetevoResult<Self> {
        let (width, height) = spec.pixel_size()?;
        let canvas = resvg::tiny_skia::Pixmap::new(width, height)
            .ok_or_else(|| NetevoError::render("failed to allocate figure canvas"))?;
        Ok(Self {
            spec,
            width,
            height,
            canvas,
            scene: String::new(),
            axis: Axis::default(),
        })
    }

    /// Figure spec this figure was created with.
    pub fn spec(&self) -> &FigureSpec {
        &self.spec
    }

    /// Pixel size `(width, height)`.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Append raw SVG elements to the scene. Coordinates are pixels from the top-left corner.
    pub fn draw(&mut self, svg_fragment: &str) {
        self.scene.push_str(svg_fragment);
        self.scene.push('\n');
    }

    /// Borrow the primary axis.
    pub fn axis(&self) -> &Axis {
        &self.axis
    }

    /// Mutably borrow the primary axis.
    pub fn axis_mut(&mut self) -> &mut Axis {
        &mut self.axis
    }

    /// Full SVG document for the scene and title.
    pub fn to_svg(&self) -> String {
        let (w, h) = (self.width, self.height);
        let mut out = String::with_capacity(self.scene.len() + 512);
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
        );
        let [r, g, b] = BACKGROUND_RGB;
        let _ = writeln!(
            out,
            r#"<rect x="0" y="0" width="{w}" height="{h}" fill="rgb({r},{g},{b})"/>"#
        );
        out.push_str(&self.scene);

        if let Some((text, style)) = &self.axis.title {
            let size = self.spec.points_to_px(style.font_size_pt);
            let pad = self.spec.points_to_px(style.pad_pt);
            let weight = if style.bold { "bold" } else { "normal" };
            let cx = w as f32 / 2.0;
            for (i, line) in text.lines().enumerate() {
                let y = pad + size * (1.0 + 1.2 * i as f32);
                let _ = writeln!(
                    out,
                    r#"<text x="{cx:.1}" y="{y:.1}" font-family="DejaVu Sans, sans-serif" font-size="{size:.1}" font-weight="{weight}" text-anchor="middle" fill="black">{}</text>"#,
                    escape_xml(line)
                );
            }
        }

        out.push_str("</svg>\n");
        out
    }

    /// Render the figure into its canvas and copy the result out as opaque RGB8.
    pub fn rasterize(&mut self, raster: &Rasterizer) -> NetevoResult<RgbImage> {
        let svg = self.to_svg();
        let opts = raster.options();
        let tree = usvg::Tree::from_str(&svg, &opts)
            .map_err(|e| NetevoError::render(format!("parse figure svg: {e}")))?;

        self.canvas.fill(resvg::tiny_skia::Color::TRANSPARENT);
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::identity(),
            &mut self.canvas.as_mut(),
        );

        let rgb = flatten_premul_over_bg_to_rgb8(self.canvas.data(), BACKGROUND_RGB);
        RgbImage::from_raw(self.width, self.height, rgb)
            .ok_or_else(|| NetevoError::render("rasterized buffer has unexpected size"))
    }
}

/// Shared font database and SVG parsing options for figure rasterization.
#[derive(Clone)]
pub struct Rasterizer {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl Rasterizer {
    /// Load the system fonts once; titles and labels use them for every frame.
    pub fn with_system_fonts() -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.len(), "loaded system fonts");
        Self {
            fontdb: Arc::new(db),
        }
    }

    /// A rasterizer with no fonts. Text elements are skipped; shapes still render.
    pub fn without_fonts() -> Self {
        Self {
            fontdb: Arc::new(usvg::fontdb::Database::new()),
        }
    }

    /// Number of loaded font faces.
    pub fn font_face_count(&self) -> usize {
        self.fontdb.len()
    }

    fn options(&self) -> usvg::Options<'static> {
        usvg::Options {
            fontdb: Arc::clone(&self.fontdb),
            font_resolver: make_font_resolver(),
            ..Default::default()
        }
    }
}

impl std::fmt::Debug for Rasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rasterizer")
            .field("font_faces", &self.fontdb.len())
            .finish()
    }
}

fn make_font_resolver() -> usvg::FontResolver<'static> {
    use usvg::FontResolver;

    FontResolver {
        select_font: Box::new(|font, fontdb| {
            let mut families = Vec::<usvg::fontdb::Family<'_>>::new();
            for family in font.families() {
                families.push(match family {
                    usvg::FontFamily::Serif => usvg::fontdb::Family::Serif,
                    usvg::FontFamily::SansSerif => usvg::fontdb::Family::SansSerif,
                    usvg::FontFamily::Cursive => usvg::fontdb::Family::Cursive,
                    usvg::FontFamily::Fantasy => usvg::fontdb::Family::Fantasy,
                    usvg::FontFamily::Monospace => usvg::fontdb::Family::Monospace,
                    usvg::FontFamily::Named(s) => usvg::fontdb::Family::Name(s),
                });
            }
            families.push(usvg::fontdb::Family::SansSerif);

            let style = match font.style() {
                usvg::FontStyle::Normal => usvg::fontdb::Style::Normal,
                usvg::FontStyle::Italic => usvg::fontdb::Style::Italic,
                usvg::FontStyle::Oblique => usvg::fontdb::Style::Oblique,
            };

            let query = usvg::fontdb::Query {
                families: &families,
                weight: usvg::fontdb::Weight(font.weight()),
                stretch: usvg::fontdb::Stretch::Normal,
                style,
            };

            if let Some(id) = fontdb.query(&query) {
                return Some(id);
            }
            // Generic aliases may be unmapped; fall back to the first face.
            fontdb.faces().next().map(|f| f.id)
        }),
        select_fallback: FontResolver::default_fallback_selector(),
    }
}

pub(crate) fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn mul_div255(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

fn flatten_premul_over_bg_to_rgb8(src_premul: &[u8], bg_rgb: [u8; 3]) -> Vec<u8> {
    let mut out = Vec::with_capacity(src_premul.len() / 4 * 3);
    for s in src_premul.chunks_exact(4) {
        let inv = 255u16 - u16::from(s[3]);
        for c in 0..3 {
            let v = u16::from(s[c]) + mul_div255(u16::from(bg_rgb[c]), inv);
            out.push(v.min(255) as u8);
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/figure.rs"]
mod tests;
