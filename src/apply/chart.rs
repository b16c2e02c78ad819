//! Placing chart values by padding and height.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::{MutationError, SceneNode};
use crate::chart::{ChartLayout, LayoutTarget, Padding, Placement};

/// Settings for applying a layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApplyOptions {
    /// Height used for frames whose height the host does not report.
    pub default_plot_height: f64,
}

impl Default for ApplyOptions {
    fn default() -> Self {
        ApplyOptions {
            default_plot_height: 200.0,
        }
    }
}

/// Outcome of one chart apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ChartReport {
    /// Target nodes written, plus the container when the document sets a
    /// padding.
    pub applied: usize,
    /// Value targets with no matching node. Assist lines are optional and
    /// never counted here.
    pub skipped: usize,
    /// Target nodes, or the padded container, whose write failed (locked or
    /// overridden).
    pub blocked: usize,
}

struct Pass<'a> {
    layout: &'a ChartLayout,
    options: ApplyOptions,
    matched: HashSet<&'a str>,
    report: ChartReport,
}

impl<'a> Pass<'a> {
    fn record(&mut self, name: &str, outcome: Result<bool, MutationError>) {
        match outcome {
            Ok(changed) => {
                debug!(node = name, changed, "placed chart value");
                self.report.applied += 1;
            }
            Err(err) => {
                warn!(node = name, %err, "chart value blocked");
                self.report.blocked += 1;
            }
        }
    }

    fn visit<N: SceneNode>(&mut self, node: &mut N, column_height: Option<f64>) {
        let mut child_column = column_height;

        let layout = self.layout;
        if let Some(target) = layout.target(node.name()) {
            self.matched.insert(target.name.as_str());
            let outcome = place(node, target, column_height, self.options);
            self.record(&target.name, outcome);
            if matches!(target.placement, Placement::PaddingTop { .. }) && target.series.is_none()
            {
                child_column = Some(node.height().unwrap_or(self.options.default_plot_height));
            }
        }

        for child in node.children_mut() {
            self.visit(child, child_column);
        }
    }
}

fn place<N: SceneNode>(
    node: &mut N,
    target: &LayoutTarget,
    column_height: Option<f64>,
    options: ApplyOptions,
) -> Result<bool, MutationError> {
    match target.placement {
        Placement::PaddingTop { ratio } => {
            let height = node.height().unwrap_or(options.default_plot_height);
            node.set_padding(&Padding::top(height * (1.0 - ratio)))
        }
        Placement::Height { ratio } => {
            let height = column_height.unwrap_or(options.default_plot_height);
            node.set_height(height * ratio)
        }
    }
}

/// Apply a chart layout under `root`.
///
/// Every node whose name matches a target is placed; value targets with no
/// node are counted as skipped. A failed write never stops the pass.
pub fn apply_chart<N: SceneNode>(
    root: &mut N,
    layout: &ChartLayout,
    options: ApplyOptions,
) -> ChartReport {
    let mut pass = Pass {
        layout,
        options,
        matched: HashSet::new(),
        report: ChartReport::default(),
    };

    if !layout.padding.is_empty() {
        let name = root.name().to_string();
        let outcome = root.set_padding(&layout.padding);
        pass.record(&name, outcome);
    }

    pass.visit(root, None);

    let expected: HashSet<&str> = layout.targets.iter().map(|t| t.name.as_str()).collect();
    pass.report.skipped = expected.difference(&pass.matched).count();

    info!(
        applied = pass.report.applied,
        skipped = pass.report.skipped,
        blocked = pass.report.blocked,
        "chart applied"
    );
    pass.report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::ChartData;
    use crate::scene::MemoryNode;

    fn layout(json: &str) -> ChartLayout {
        serde_json::from_str::<ChartData>(json).unwrap().layout().unwrap()
    }

    #[test]
    fn test_bars_padded_by_ratio() {
        let mut root = MemoryNode::frame("chart", 240.0).with_children(vec![
            MemoryNode::frame("bar_1", 200.0),
            MemoryNode::frame("bar_2", 200.0),
        ]);
        let report = apply_chart(
            &mut root,
            &layout(r#"{"type":"bar","mode":"percent","values":[25,100,40]}"#),
            ApplyOptions::default(),
        );
        // bar_3 has no node; absent assist lines are not counted.
        assert_eq!(report.applied, 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(root.children[0].padding.top, 150.0);
        assert_eq!(root.children[1].padding.top, 0.0);
    }

    #[test]
    fn test_locked_node_is_blocked() {
        let mut root = MemoryNode::frame("chart", 100.0).with_children(vec![
            MemoryNode::frame("bar_1", 100.0).locked(),
            MemoryNode::frame("bar_2", 100.0),
        ]);
        let report = apply_chart(
            &mut root,
            &layout(r#"{"type":"bar","mode":"percent","values":[50,50]}"#),
            ApplyOptions::default(),
        );
        assert_eq!(report.applied, 1);
        assert_eq!(report.blocked, 1);
        assert_eq!(root.children[1].padding.top, 50.0);
    }

    #[test]
    fn test_container_padding_counted_either_way() {
        let padded = r#"{"type":"bar","mode":"percent","values":[40],"padding":{"top":8}}"#;

        let mut root = MemoryNode::frame("chart", 100.0)
            .with_children(vec![MemoryNode::frame("bar_1", 100.0)]);
        let report = apply_chart(&mut root, &layout(padded), ApplyOptions::default());
        assert_eq!((report.applied, report.blocked), (2, 0));

        let mut root = MemoryNode::frame("chart", 100.0)
            .locked()
            .with_children(vec![MemoryNode::frame("bar_1", 100.0)]);
        let report = apply_chart(&mut root, &layout(padded), ApplyOptions::default());
        assert_eq!((report.applied, report.blocked), (1, 1));
        assert_eq!(root.padding.top, 0.0);
    }

    #[test]
    fn test_stacked_segments_use_column_height() {
        let mut root = MemoryNode::frame("chart", 300.0).with_children(vec![
            MemoryNode::frame("bar_1", 160.0).with_children(vec![
                MemoryNode::frame("bar_1_1", 0.0),
                MemoryNode::frame("bar_1_2", 0.0),
            ]),
        ]);
        let report = apply_chart(
            &mut root,
            &layout(r#"{"type":"stackedBar","mode":"percent","values":[[0],[25],[50]]}"#),
            ApplyOptions::default(),
        );
        assert_eq!(report.applied, 3);
        let column = &root.children[0];
        assert_eq!(column.padding.top, 40.0);
        assert_eq!(column.children[0].height, Some(40.0));
        assert_eq!(column.children[1].height, Some(80.0));
    }

    #[test]
    fn test_container_padding_and_assist_lines() {
        let mut root = MemoryNode::frame("chart", 100.0).with_children(vec![
            MemoryNode::frame("bar_1", 100.0),
            MemoryNode::frame("assist_max", 100.0),
            MemoryNode::frame("assist_min", 100.0),
            MemoryNode::frame("assist_avg", 100.0),
        ]);
        let report = apply_chart(
            &mut root,
            &layout(r#"{"type":"bar","mode":"percent","values":[40],"padding":{"h":6}}"#),
            ApplyOptions::default(),
        );
        // The padded container counts alongside bar_1 and the assist lines.
        assert_eq!(report.applied, 5);
        assert_eq!(report.skipped, 0);
        assert_eq!(root.padding.left, 6.0);
        assert_eq!(root.padding.right, 6.0);
        assert_eq!(root.children[1].padding.top, 60.0);
    }
}
