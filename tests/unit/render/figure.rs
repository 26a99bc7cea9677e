use super::*;

fn small_spec() -> FigureSpec {
    FigureSpec::new(0.5, 0.25, 64.0)
}

#[test]
fn pixel_size_rounds_inches_times_dpi() {
    assert_eq!(FigureSpec::default().pixel_size().unwrap(), (1000, 1000));
    assert_eq!(
        FigureSpec::new(12.0, 10.0, 100.0).pixel_size().unwrap(),
        (1200, 1000)
    );
    assert_eq!(small_spec().pixel_size().unwrap(), (32, 16));
}

#[test]
fn pixel_size_rejects_degenerate_specs() {
    assert!(FigureSpec::new(0.0, 1.0, 100.0).pixel_size().is_err());
    assert!(FigureSpec::new(1.0, 1.0, f32::NAN).pixel_size().is_err());
    assert!(FigureSpec::new(1000.0, 1.0, 100.0).pixel_size().is_err());
}

#[test]
fn points_convert_at_dpi() {
    let spec = FigureSpec::new(1.0, 1.0, 144.0);
    assert_eq!(spec.points_to_px(18.0), 36.0);
}

#[test]
fn axis_title_round_trips() {
    let mut fig = Figure::new(small_spec()).unwrap();
    assert_eq!(fig.axis().title(), None);

    fig.axis_mut()
        .set_title("Generation 7", TitleStyle::default());
    assert_eq!(fig.axis().title(), Some("Generation 7"));
    assert_eq!(fig.axis().title_style(), Some(TitleStyle::default()));
}

#[test]
fn svg_escapes_title_and_splits_lines() {
    let mut fig = Figure::new(small_spec()).unwrap();
    fig.axis_mut()
        .set_title("Generation <a&b>\nNodes: 3", TitleStyle::default());
    let svg = fig.to_svg();

    assert!(svg.contains("Generation &lt;a&amp;b&gt;"));
    assert!(svg.contains(">Nodes: 3</text>"));
    assert_eq!(svg.matches("<text").count(), 2);
}

#[test]
fn rasterize_produces_rgb_of_figure_size() {
    let mut fig = Figure::new(small_spec()).unwrap();
    fig.draw(r#"<rect x="0" y="0" width="16" height="16" fill="rgb(255,0,0)"/>"#);

    let img = fig.rasterize(&Rasterizer::without_fonts()).unwrap();
    assert_eq!(img.dimensions(), (32, 16));
    assert_eq!(img.get_pixel(4, 8).0, [255, 0, 0]);
    assert_eq!(img.get_pixel(28, 8).0, [255, 255, 255]);
}

#[test]
fn rasterize_twice_clears_previous_scene() {
    let mut fig = Figure::new(small_spec()).unwrap();
    fig.draw(r#"<rect x="0" y="0" width="32" height="16" fill="rgb(0,0,255)"/>"#);
    let raster = Rasterizer::without_fonts();
    let a = fig.rasterize(&raster).unwrap();
    let b = fig.rasterize(&raster).unwrap();
    assert_eq!(a, b);
}

#[test]
fn broken_fragment_is_a_render_error() {
    let mut fig = Figure::new(small_spec()).unwrap();
    fig.draw("<rect");
    assert!(matches!(
        fig.rasterize(&Rasterizer::without_fonts()),
        Err(NetevoError::Render(_))
    ));
}

#[test]
fn flatten_over_white() {
    assert_eq!(
        flatten_premul_over_bg_to_rgb8(&[0, 0, 0, 0, 128, 0, 0, 128], [255, 255, 255]),
        vec![255, 255, 255, 255, 127, 127]
    );
}
