use super::*;
use crate::render::figure::Rasterizer;

fn swingup_snapshot(dir: &Path) -> std::path::PathBuf {
    // bias + 5 inputs, 1 hidden (tanh), 1 output (linear)
    let n = 8;
    let mut rows = vec![vec![0.0f64; n + 1]; n];
    rows[1][6] = 0.8;
    rows[2][6] = -1.5;
    rows[6][7] = 1.0;
    rows[0][7] = 0.3;
    for row in rows.iter_mut() {
        row[n] = 1.0;
    }
    rows[6][n] = 5.0;

    let text: String = rows
        .iter()
        .map(|r| {
            let cells: Vec<String> = r.iter().map(|v| format!("{v:e}")).collect();
            cells.join(",") + "\n"
        })
        .collect();
    let path = dir.join("0001.out");
    std::fs::write(&path, text).unwrap();
    path
}

fn renderer() -> LayeredNetworkRenderer {
    LayeredNetworkRenderer::new(FigureSpec::new(2.0, 2.0, 50.0))
}

#[test]
fn activation_names_cover_known_ids() {
    assert_eq!(activation_name(1.0), Some("linear"));
    assert_eq!(activation_name(5.0), Some("tanh"));
    assert_eq!(activation_name(11.0), Some("square"));
    assert_eq!(activation_name(0.0), None);
    assert_eq!(activation_name(2.5), None);
    assert_eq!(activation_name(f64::NAN), None);
}

#[test]
fn renders_edges_nodes_and_labels() {
    let dir = tempfile::tempdir().unwrap();
    let path = swingup_snapshot(dir.path());

    let fig = renderer().render(&path, "swingup").unwrap();
    assert_eq!(fig.size(), (100, 100));
    assert_eq!(fig.axis().title(), None);

    let svg = fig.to_svg();
    assert_eq!(svg.matches("<circle").count(), 8);
    assert_eq!(svg.matches("<path").count(), 4);
    assert_eq!(svg.matches(NEGATIVE_EDGE).count(), 1);
    assert!(svg.contains(">tanh</text>"));
    assert!(svg.contains(">out 1 (linear)</text>"));
    assert!(svg.contains(">bias</text>"));
}

#[test]
fn rendered_figure_rasterizes() {
    let dir = tempfile::tempdir().unwrap();
    let path = swingup_snapshot(dir.path());

    let mut fig = renderer().render(&path, "swingup").unwrap();
    let img = fig.rasterize(&Rasterizer::without_fonts()).unwrap();
    assert_eq!(img.dimensions(), (100, 100));
    assert!(img.pixels().any(|p| p.0 != [255, 255, 255]));
}

#[test]
fn unknown_task_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = swingup_snapshot(dir.path());
    assert!(renderer().render(&path, "not-a-task").is_err());
}

#[test]
fn task_shape_mismatch_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = swingup_snapshot(dir.path());
    // slimevolley needs at least 16 nodes
    assert!(renderer().render(&path, "slimevolley").is_err());
}

#[test]
fn works_through_trait_object() {
    let dir = tempfile::tempdir().unwrap();
    let path = swingup_snapshot(dir.path());
    let r = renderer();
    let dyn_r: &dyn NetworkRenderer = &r;
    assert!(dyn_r.render(&path, "swingup").is_ok());
}
