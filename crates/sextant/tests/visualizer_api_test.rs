use std::time::Duration;

use sextant::{
    Visualizer,
    config::AppConfig,
    draw::{Primitive, RenderLayer},
    geometry::Size,
    model::{diagram::DiagramSpec, graph::GraphModel, repo::RepositorySnapshot},
    navigation::Mode,
};

fn content_rect_origins(scene: &sextant::scene::Scene) -> Vec<(f32, f32)> {
    scene
        .layer(RenderLayer::Content)
        .filter_map(|primitive| match primitive {
            Primitive::Rect { bounds, .. } => Some((bounds.min_x(), bounds.min_y())),
            _ => None,
        })
        .collect()
}

#[test]
fn test_three_classes_share_the_first_row() {
    let visualizer = Visualizer::default();
    let spec = DiagramSpec::from_json(
        r#"{"type": "class", "classes": [{"name": "A"}, {"name": "B"}, {"name": "C"}]}"#,
    )
    .expect("valid diagram");

    let scene = visualizer.layout_diagram(&spec);
    assert_eq!(scene.size().width(), 720.0);

    let origins = content_rect_origins(&scene);
    assert_eq!(origins.len(), 3);
    assert!(origins.iter().all(|(_, y)| *y == origins[0].1));
    let xs: Vec<f32> = origins.iter().map(|(x, _)| *x).collect();
    assert_eq!(xs, vec![24.0, 208.0, 392.0]);
}

#[test]
fn test_narrow_viewport_wraps_classes() {
    let config = AppConfig::default().with_viewport(Size::new(300.0, 600.0));
    let visualizer = Visualizer::new(config).unwrap();
    let spec = DiagramSpec::from_json(r#"{"classes": [{"name": "A"}, {"name": "B"}]}"#).unwrap();

    let origins = content_rect_origins(&visualizer.layout_diagram(&spec));
    assert_eq!(origins.len(), 2);
    assert_eq!(origins[0].0, origins[1].0);
    assert!(origins[1].1 > origins[0].1);
}

#[test]
fn test_unresolved_graph_edges_are_dropped() {
    let visualizer = Visualizer::default();
    let graph = GraphModel::from_json(
        r#"{"nodes": [{"id": "n1"}, {"id": "n2"}],
            "edges": [{"from": "n1", "to": "n2"}, {"from": "n1", "to": "missing"}]}"#,
    )
    .unwrap();

    assert_eq!(graph.resolve().edge_count(), 1);

    let scene = visualizer.layout_graph(&graph, Some(50));
    assert_eq!(scene.layer(RenderLayer::Connector).count(), 1);
    assert_eq!(scene.layer(RenderLayer::Content).count(), 2);
}

#[test]
fn test_repository_folders_aggregate_their_files() {
    let visualizer = Visualizer::default();
    let snapshot = RepositorySnapshot::from_json(
        r#"[{"path": "src/a.js", "type": "file", "size": 10},
            {"path": "src/b.js", "type": "file", "size": 5}]"#,
    )
    .unwrap();

    let view = visualizer.repo_view(&snapshot);
    let tree = view.tree();
    let root = tree.node(tree.root());
    assert_eq!(root.children().len(), 1);

    let src = tree.node(root.children()[0]);
    assert_eq!(src.name(), "src");
    assert_eq!(src.kind_label(), "folder");
    assert_eq!(src.value(), 15);
    let leaf_total: u64 = src.children().iter().map(|id| tree.node(*id).value()).sum();
    assert_eq!(leaf_total, 15);
}

#[test]
fn test_playback_walks_repository_files() {
    let visualizer = Visualizer::default();
    let snapshot = RepositorySnapshot::from_json(
        r#"[{"path": "src/a.js", "type": "file", "size": 10},
            {"path": "src/b.js", "type": "file", "size": 5},
            {"path": "README.md", "type": "file", "size": 2}]"#,
    )
    .unwrap();
    let mut view = visualizer.repo_view(&snapshot);

    view.play();
    assert_eq!(view.state().mode(), Mode::Playing);
    let visited = view.advance(Duration::from_millis(220 * 4));
    assert_eq!(visited.len(), 4);
    assert_eq!(visited[0], visited[3]);

    view.stop();
    assert_eq!(view.state().mode(), Mode::Idle);
    assert!(view.advance(Duration::from_secs(5)).is_empty());
}

#[test]
fn test_render_svg_uses_configured_background() {
    let config: AppConfig =
        serde_json::from_str(r#"{"style": {"background_color": "white"}}"#).unwrap();
    let visualizer = Visualizer::new(config).unwrap();
    let spec = DiagramSpec::from_json(r#"{"type": "usecase", "actors": ["User"]}"#).unwrap();

    let svg = visualizer
        .render_svg(&visualizer.layout_diagram(&spec))
        .unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("<rect"));
    assert!(svg.contains("User"));
}

#[test]
fn test_invalid_style_is_a_config_error() {
    let config: AppConfig =
        serde_json::from_str(r#"{"style": {"accent_color": "nope"}}"#).unwrap();
    let err = Visualizer::new(config).unwrap_err();
    assert!(matches!(err, sextant::SextantError::Config(_)));
}

#[test]
fn test_reversed_navigation_scales_are_a_config_error() {
    let config: AppConfig =
        serde_json::from_str(r#"{"layout": {"navigation": {"min_scale": 3.0, "max_scale": 1.0}}}"#)
            .unwrap();
    let err = Visualizer::new(config).unwrap_err();
    assert!(matches!(err, sextant::SextantError::Config(_)));
}
