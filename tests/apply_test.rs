//! End-to-end apply tests: chart layout plus style injection on fixture scenes.

use chartstyle::{
    ApplyOptions, ApplyRequest, MemoryNode, MemoryStore, Outbound, PluginController, StyleOrigin,
};

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn load_scene(name: &str) -> MemoryNode {
    let path = format!("{}/{}", FIXTURES_DIR, name);
    let text = std::fs::read_to_string(&path).expect("Failed to read fixture");
    serde_json::from_str(&text).expect("Failed to parse scene")
}

fn controller(scene: &str) -> PluginController<MemoryNode, MemoryStore> {
    PluginController::new(load_scene(scene), MemoryStore::new(), ApplyOptions::default())
}

fn find<'a>(node: &'a MemoryNode, name: &str) -> &'a MemoryNode {
    fn walk<'a>(node: &'a MemoryNode, name: &str) -> Option<&'a MemoryNode> {
        if node.name == name {
            return Some(node);
        }
        node.children.iter().find_map(|child| walk(child, name))
    }
    walk(node, name).unwrap_or_else(|| panic!("no node named {name}"))
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn test_percent_bars_all_applied() {
    let mut controller = controller("bar_chart.json");
    let request =
        ApplyRequest::parse(r#"{"type":"bar","mode":"percent","values":[10,25,18]}"#).unwrap();

    let outcome = controller.apply(&request).expect("apply failed");
    assert_eq!(outcome.chart.applied, 3);
    assert_eq!(outcome.chart.skipped, 0);
    assert_eq!(outcome.chart.blocked, 0);

    let scene = controller.scene();
    assert!(approx(find(scene, "bar_1").padding.top, 180.0));
    assert!(approx(find(scene, "bar_2").padding.top, 150.0));
    assert!(approx(find(scene, "bar_3").padding.top, 164.0));
}

#[test]
fn test_snapshot_styles_are_kept() {
    let mut controller = controller("bar_chart.json");
    let request = ApplyRequest::parse(r#"{"type":"bar","values":[1,2,3]}"#).unwrap();

    let outcome = controller.apply(&request).expect("apply failed");
    let origins = outcome.resolved.origins();
    assert_eq!(origins.cell_fill, StyleOrigin::Snapshot);
    assert_eq!(origins.grid_container, StyleOrigin::Snapshot);
    assert_eq!(origins.mark, StyleOrigin::Snapshot);
    assert_eq!(origins.assist_line, StyleOrigin::Default);

    // Re-applying what is already drawn changes nothing.
    assert_eq!(outcome.styles.grid_container.candidates, 1);
    assert_eq!(outcome.styles.grid_container.applied, 0);
    assert_eq!(outcome.styles.mark.skipped, 3);
    assert_eq!(outcome.styles.cell_fill.skipped, 3);
    assert_eq!(find(controller.scene(), "bar_2").fill.as_deref(), Some("#888888"));
}

#[test]
fn test_explicit_marks_override_snapshot() {
    let mut controller = controller("bar_chart.json");
    let request = ApplyRequest::parse(
        r##"{"type":"bar","values":[1,2,3],"style":{"explicit":{"marks":["#ff0000"]}}}"##,
    )
    .unwrap();

    let outcome = controller.apply(&request).expect("apply failed");
    assert_eq!(outcome.resolved.origins().mark, StyleOrigin::Explicit);
    assert_eq!(outcome.styles.mark.applied, 3);
    for name in ["bar_1", "bar_2", "bar_3"] {
        assert_eq!(find(controller.scene(), name).fill.as_deref(), Some("#FF0000"));
    }
}

#[test]
fn test_stacked_chart_with_locked_nodes() {
    let mut controller = controller("stacked_chart.json");
    let request =
        ApplyRequest::parse(r#"{"type":"stackedBar","values":[[0,0],[30,20],[10,20]]}"#).unwrap();

    let outcome = controller.apply(&request).expect("apply failed");
    // bar_2 is locked and bar_2_2 has a fixed height; the rest still apply.
    assert_eq!(outcome.chart.blocked, 2);
    assert_eq!(outcome.chart.skipped, 0);
    assert_eq!(outcome.chart.applied, 6);

    let scene = controller.scene();
    assert!(approx(find(scene, "bar_1").padding.top, 0.0));
    assert_eq!(find(scene, "bar_1_1").height, Some(150.0));
    assert_eq!(find(scene, "bar_1_2").height, Some(50.0));
    assert_eq!(find(scene, "bar_2_1").height, Some(100.0));
    assert_eq!(find(scene, "bar_2_2").height, Some(0.0));

    // Two series, header row excluded.
    assert_eq!(outcome.resolved.marks().len(), 2);
    assert_eq!(outcome.styles.mark.applied, 4);
}

#[test]
fn test_series_styles_stay_with_their_series() {
    let mut styled = MemoryNode::frame("bar_1_2", 0.0);
    styled.fill = Some("#FF0000".into());
    let scene = MemoryNode::frame("chart", 200.0).with_children(vec![
        MemoryNode::frame("bar_1", 200.0)
            .with_children(vec![MemoryNode::frame("bar_1_1", 0.0), styled]),
    ]);
    let mut controller =
        PluginController::new(scene, MemoryStore::new(), ApplyOptions::default());

    let request =
        ApplyRequest::parse(r#"{"type":"stackedBar","values":[[0],[10],[20]]}"#).unwrap();
    let outcome = controller.apply(&request).expect("apply failed");
    assert_eq!(outcome.resolved.origins().mark, StyleOrigin::Snapshot);

    let scene = controller.scene();
    assert_eq!(find(scene, "bar_1_1").fill.as_deref(), Some("#3B82F6"));
    assert_eq!(find(scene, "bar_1_2").fill.as_deref(), Some("#FF0000"));
}

#[test]
fn test_line_points_get_mark_strokes() {
    let scene = MemoryNode::frame("chart", 100.0).with_children(vec![
        MemoryNode::frame("point_1", 100.0),
        MemoryNode::frame("point_2", 100.0),
        MemoryNode::frame("point_3", 100.0),
    ]);
    let mut controller =
        PluginController::new(scene, MemoryStore::new(), ApplyOptions::default());

    let message = serde_json::json!({
        "type": "apply",
        "payload": {
            "type": "line",
            "values": [5, 10, 20],
            "style": { "explicit": { "marks": [{ "stroke": "#00FF00", "thickness": 3 }] } },
        },
    });
    let replies = controller.handle_text(&message.to_string());
    assert_eq!(replies, [Outbound::ok("패딩 적용: 3 · 대상 없음: 0 · 잠김/오류: 0")]);

    let point = find(controller.scene(), "point_1");
    assert!(approx(point.padding.top, 75.0));
    assert_eq!(point.stroke.weight, Some(3.0));
    assert_eq!(point.stroke.color.as_deref(), Some("#00FF00"));
    assert_eq!(point.stroke.dash_pattern, None);
}

#[test]
fn test_malformed_request_changes_nothing() {
    let mut controller = controller("bar_chart.json");
    let before = controller.scene().clone();

    let replies = controller.handle_text(r#"{"type":"apply-json","text":"{\"type\":\"bar\""}"#);
    assert_eq!(replies.len(), 1);
    assert!(!replies[0].is_ok());
    assert_eq!(controller.scene(), &before);
}
