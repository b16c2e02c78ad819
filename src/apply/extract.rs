//! Capturing what a chart component currently draws.

use chrono::Utc;
use serde_json::Value;
use tracing::debug;

use super::{SceneNode, find, mark_series, walk};
use crate::style::{ChartType, ExtractedStyles, MarkSnapshot, StrokeSnapshot};

fn capture<N: SceneNode>(root: &N, prefix: &str) -> Option<StrokeSnapshot> {
    find(root, &|name| name.starts_with(prefix)).map(|node| node.stroke())
}

/// Snapshot the first node of every slot under `root`.
///
/// Marks are captured once per series from the first node of that series,
/// at the series' position; a series with no node is left as `None`. Every
/// capture carries the same timestamp.
pub fn extract_styles<N: SceneNode>(root: &N, chart_type: ChartType) -> ExtractedStyles {
    let now = Utc::now();
    let stamp = |snapshot: Option<StrokeSnapshot>| {
        snapshot.map(|s| StrokeSnapshot {
            captured_at: Some(now),
            ..s
        })
    };

    let cell = find(root, &|name| name.starts_with("cell"));
    let mut marks: Vec<Option<MarkSnapshot>> = Vec::new();
    walk(root, &mut |node: &N| {
        let Some(series) = mark_series(node.name(), chart_type) else {
            return;
        };
        if marks.len() < series {
            marks.resize(series, None);
        }
        let slot = &mut marks[series - 1];
        if slot.is_none() {
            *slot = Some(MarkSnapshot {
                fill: node.fill().map(Value::String),
                stroke: StrokeSnapshot {
                    captured_at: Some(now),
                    ..node.stroke()
                },
            });
        }
    });

    let extracted = ExtractedStyles {
        cell_fill: cell.and_then(|node| node.fill()).map(Value::String),
        cell_top: stamp(cell.map(|node| node.stroke())),
        tab_right: stamp(capture(root, "tab")),
        grid_container: stamp(capture(root, "grid")),
        assist_line: stamp(capture(root, "assist_")),
        marks,
    };
    debug!(marks = extracted.marks.len(), "extracted styles");
    extracted
}
