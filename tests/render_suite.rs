use std::path::{Path, PathBuf};

use roadmap_rs_renderer::{
    App, Config, LayoutConfig, LayoutMode, MemStore, ProgressStore, RoadmapDoc, Scene, Theme,
    build_graph, compute_layout, loader, render_svg,
};

fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn load_fixture(name: &str) -> (RoadmapDoc, String) {
    let raw = std::fs::read_to_string(fixture_path(name)).expect("fixture read failed");
    loader::parse_doc(&raw, name).expect("fixture parse failed")
}

fn assert_valid_svg(svg: &str, fixture: &str) {
    assert!(svg.contains("<svg"), "{fixture}: missing <svg tag");
    assert!(svg.contains("</svg>"), "{fixture}: missing </svg tag");
}

fn render_fixture(name: &str) -> String {
    let (doc, _) = load_fixture(name);
    let config = Config::default();
    let graph = build_graph(&doc.nodes).expect("graph build failed");
    let layout = compute_layout(&graph, &config.layout).expect("layout failed");
    let scene = Scene::build(&layout, &graph.edges, &config.layout, |_| false);
    render_svg(&scene, &Theme::dark(), &config.render)
}

#[test]
fn render_all_fixtures() {
    // Keep this list explicit so new fixtures must be added intentionally.
    let candidates = ["math.json", "manual.json", "deep.json", "wide.json"];

    for name in candidates {
        assert!(fixture_path(name).exists(), "fixture missing: {name}");
        let svg = render_fixture(name);
        assert_valid_svg(&svg, name);
    }
}

#[test]
fn fixture_rendering_is_deterministic() {
    let first = render_fixture("math.json");
    let second = render_fixture("math.json");
    assert_eq!(first, second);
}

#[test]
fn math_fixture_drops_its_unknown_prerequisite() {
    let (doc, id) = load_fixture("math.json");
    assert_eq!(id, "math");
    let graph = build_graph(&doc.nodes).unwrap();
    assert!(
        graph
            .edges
            .iter()
            .all(|edge| edge.from != "history-of-math"),
        "unresolvable prerequisite must not become an edge"
    );
    // The node listing it still levels off its resolvable parents only.
    let layout = compute_layout(&graph, &LayoutConfig::default()).unwrap();
    assert_eq!(layout.node("precalculus").unwrap().level, Some(3));
}

#[test]
fn math_fixture_is_layer_monotone() {
    let (doc, _) = load_fixture("math.json");
    let graph = build_graph(&doc.nodes).unwrap();
    let layout = compute_layout(&graph, &LayoutConfig::default()).unwrap();
    assert_eq!(layout.mode, LayoutMode::Auto);
    for edge in &graph.edges {
        let from = layout.node(&edge.from).unwrap().level.unwrap();
        let to = layout.node(&edge.to).unwrap().level.unwrap();
        assert!(from < to, "edge {}->{} inverted", edge.from, edge.to);
    }
}

#[test]
fn manual_fixture_passes_coordinates_through() {
    let (doc, _) = load_fixture("manual.json");
    let graph = build_graph(&doc.nodes).unwrap();
    let layout = compute_layout(&graph, &LayoutConfig::default()).unwrap();
    assert_eq!(layout.mode, LayoutMode::Manual);
    for (node, raw) in layout.nodes.iter().zip(&doc.nodes) {
        assert_eq!(node.x, raw.x.unwrap());
        assert_eq!(node.y, raw.y.unwrap());
        assert!(node.level.is_none());
    }
    // Edges still derived for drawing.
    assert_eq!(graph.edges.len(), 4);
}

#[test]
fn deep_fixture_truncates_the_overlong_title() {
    let (doc, _) = load_fixture("deep.json");
    let config = LayoutConfig::default();
    let graph = build_graph(&doc.nodes).unwrap();
    let layout = compute_layout(&graph, &config).unwrap();
    let scene = Scene::build(&layout, &graph.edges, &config, |_| false);
    let label = &scene.node("n5").unwrap().label;
    assert!(label.ends_with("..."));
    assert_eq!(label.chars().count(), config.max_title_chars);
}

#[test]
fn toggle_flow_end_to_end() {
    let (doc, id) = load_fixture("math.json");
    let mut progress = ProgressStore::open(Box::new(MemStore::default()));
    let config = Config::default();
    let mut app = App::init(&doc, &id, &progress, &config.layout).unwrap();

    assert!(app.toggle(&mut progress, "algebra").unwrap());
    assert_eq!(app.scene.take_damage(), vec!["algebra".to_string()]);

    let stats = app.stats(&progress);
    assert_eq!(stats.total, 8);
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.percent, 13);

    let svg = render_svg(&app.scene, &Theme::light(), &config.render);
    assert_valid_svg(&svg, "math.json");
    assert!(svg.contains("class=\"node completed\""));

    // Toggling back leaves no trace in the persisted mapping.
    assert!(!app.toggle(&mut progress, "algebra").unwrap());
    assert!(!progress.is_done(&id, "algebra"));
    assert_eq!(app.stats(&progress).completed, 0);
}
