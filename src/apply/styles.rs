//! Injecting resolved styles into matching nodes.
//!
//! Nodes are matched by name:
//! - `cell*` receives the cell fill and the cell top stroke
//! - `tab*` receives the tab right stroke
//! - `grid*` receives the grid container stroke
//! - `assist_*` receives the assist-line stroke
//! - value marks (`bar_{c}`, `bar_{c}_{s}`, `point_...`) receive their series style

use serde::Serialize;
use tracing::info;

use super::{SceneNode, SlotReport, StrokeUpdate, walk_mut};
use crate::style::{
    ChartType, Edge, EdgeWeights, MAX_SERIES, MarkStyle, ResolvedStyles, SideStyle, StyleSlot,
};

/// Per-slot counters of one style injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleReport {
    pub cell_fill: SlotReport,
    pub cell_top: SlotReport,
    pub tab_right: SlotReport,
    pub grid_container: SlotReport,
    pub assist_line: SlotReport,
    pub mark: SlotReport,
}

impl StyleReport {
    pub fn get(&self, slot: StyleSlot) -> &SlotReport {
        match slot {
            StyleSlot::CellFill => &self.cell_fill,
            StyleSlot::CellTop => &self.cell_top,
            StyleSlot::TabRight => &self.tab_right,
            StyleSlot::GridContainer => &self.grid_container,
            StyleSlot::AssistLine => &self.assist_line,
            StyleSlot::Mark => &self.mark,
        }
    }

    /// Sum over every slot.
    pub fn total(&self) -> SlotReport {
        StyleSlot::ALL
            .iter()
            .map(|&slot| *self.get(slot))
            .fold(SlotReport::default(), |acc, r| SlotReport {
                candidates: acc.candidates + r.candidates,
                applied: acc.applied + r.applied,
                skipped: acc.skipped + r.skipped,
                errors: acc.errors + r.errors,
            })
    }
}

/// Parse a value-mark name into its 1-based series.
///
/// `bar_3` is series 1; `bar_3_2` is series 2. Stacked column frames
/// (`bar_{c}`) are not marks; their segments are. Series past
/// [`MAX_SERIES`] are not styled.
pub fn mark_series(name: &str, chart_type: ChartType) -> Option<usize> {
    let rest = name.strip_prefix(chart_type.target_prefix())?.strip_prefix('_')?;
    let mut parts = rest.split('_');
    let column = parts.next()?;
    column.parse::<usize>().ok().filter(|&c| c > 0)?;
    match (parts.next(), parts.next()) {
        (None, _) if chart_type.reserves_header_row() => None,
        (None, _) => Some(1),
        (Some(series), None) => series
            .parse::<usize>()
            .ok()
            .filter(|s| (1..=MAX_SERIES).contains(s)),
        (Some(_), Some(_)) => None,
    }
}

fn side_update(style: &SideStyle, weights: EdgeWeights, individual: bool) -> StrokeUpdate {
    StrokeUpdate {
        weights,
        individual,
        color: style.color,
        style: style.stroke_style,
    }
}

fn mark_update(mark: &MarkStyle) -> StrokeUpdate {
    StrokeUpdate {
        weights: EdgeWeights::uniform(mark.thickness),
        individual: false,
        color: mark.stroke,
        style: mark.stroke_style,
    }
}

/// Write `update` to `node`, or count a skip when there is nothing to write.
fn stroke_into<N: SceneNode>(node: &mut N, update: &StrokeUpdate, report: &mut SlotReport) {
    if update.is_empty() {
        report.record_skip();
    } else {
        report.record(node.set_stroke(update));
    }
}

/// Inject a resolved payload into every matching node under `root`.
///
/// The payload is read-only here; each slot succeeds or fails on its own.
pub fn apply_styles<N: SceneNode>(
    root: &mut N,
    styles: &ResolvedStyles,
    chart_type: ChartType,
) -> StyleReport {
    let mut report = StyleReport::default();

    let cell_top = side_update(
        styles.cell_top(),
        EdgeWeights::only(Edge::Top, styles.cell_top().effective_thickness()),
        true,
    );
    let tab_right = side_update(
        styles.tab_right(),
        EdgeWeights::only(Edge::Right, styles.tab_right().effective_thickness()),
        true,
    );
    let grid = styles.grid_container();
    let grid_update = StrokeUpdate {
        weights: if grid.uses_individual_weights() {
            grid.side_weights()
        } else {
            EdgeWeights::uniform(grid.base.effective_thickness())
        },
        individual: grid.uses_individual_weights(),
        color: grid.applicable_color(),
        style: grid.base.stroke_style,
    };
    let assist = styles.assist_line();
    let assist_update = side_update(
        assist,
        EdgeWeights::uniform(assist.effective_thickness()),
        false,
    );

    walk_mut(root, &mut |node: &mut N| {
        let name = node.name();
        if name.starts_with("cell") {
            report.cell_fill.record(node.set_fill(styles.cell_fill()));
            stroke_into(node, &cell_top, &mut report.cell_top);
        } else if name.starts_with("tab") {
            stroke_into(node, &tab_right, &mut report.tab_right);
        } else if name.starts_with("grid") {
            stroke_into(node, &grid_update, &mut report.grid_container);
        } else if name.starts_with("assist_") {
            stroke_into(node, &assist_update, &mut report.assist_line);
        } else if let Some(series) = mark_series(name, chart_type) {
            let mark = styles.mark_for_series(series);
            match chart_type {
                ChartType::Line => stroke_into(node, &mark_update(mark), &mut report.mark),
                ChartType::Bar | ChartType::StackedBar => match mark.fill {
                    Some(fill) => report.mark.record(node.set_fill(fill)),
                    None => report.mark.record_skip(),
                },
            }
        }
    });

    let total = report.total();
    info!(
        candidates = total.candidates,
        applied = total.applied,
        skipped = total.skipped,
        errors = total.errors,
        "styles injected"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::MemoryNode;
    use crate::style::{ExtractedStyles, StyleOverrides, resolve_styles};
    use serde_json::json;

    #[test]
    fn test_mark_series_names() {
        assert_eq!(mark_series("bar_3", ChartType::Bar), Some(1));
        assert_eq!(mark_series("bar_3_2", ChartType::Bar), Some(2));
        assert_eq!(mark_series("bar_3", ChartType::StackedBar), None);
        assert_eq!(mark_series("bar_3_2", ChartType::StackedBar), Some(2));
        assert_eq!(mark_series("point_1", ChartType::Line), Some(1));
        assert_eq!(mark_series("bar_1", ChartType::Line), None);
        assert_eq!(mark_series("bar_x", ChartType::Bar), None);
        assert_eq!(mark_series("bar_0", ChartType::Bar), None);
        assert_eq!(mark_series("bar", ChartType::Bar), None);
        assert_eq!(mark_series("bar_1_2_3", ChartType::Bar), None);
        assert_eq!(mark_series("bar_1_99999999999", ChartType::Bar), None);
    }

    #[test]
    fn test_injects_each_slot() {
        let mut root = MemoryNode::frame("chart", 100.0).with_children(vec![
            MemoryNode::frame("grid", 100.0).with_children(vec![
                MemoryNode::frame("cell_1", 20.0),
                MemoryNode::frame("cell_2", 20.0).locked(),
            ]),
            MemoryNode::frame("tab_1", 20.0),
            MemoryNode::frame("assist_avg", 100.0),
            MemoryNode::frame("bar_1", 100.0),
        ]);
        let explicit = StyleOverrides::from_raw(&json!({
            "cellFill": "#EEEEEE",
            "cellTop": { "thickness": 5, "visible": false },
            "marks": [{ "fill": "#FF0000" }],
        }));
        let styles = resolve_styles(&explicit, &ExtractedStyles::default(), 1);

        let report = apply_styles(&mut root, &styles, ChartType::Bar);
        assert_eq!(report.cell_fill.candidates, 2);
        assert_eq!(report.cell_fill.applied, 1);
        assert_eq!(report.cell_fill.errors, 1);
        assert_eq!(report.tab_right.applied, 1);
        assert_eq!(report.grid_container.applied, 1);
        assert_eq!(report.assist_line.applied, 1);
        assert_eq!(report.mark.applied, 1);

        let grid = &root.children[0];
        let cell = &grid.children[0];
        assert_eq!(cell.fill.as_deref(), Some("#EEEEEE"));
        // Hidden side strokes at 0 even though 5 is stored.
        assert_eq!(cell.stroke.top, Some(0.0));
        assert_eq!(root.children[3].fill.as_deref(), Some("#FF0000"));
        assert_eq!(root.children[1].stroke.right, Some(1.0));
    }

    #[test]
    fn test_grid_partial_sides_keep_color() {
        let mut root = MemoryNode::frame("grid", 100.0);
        root.stroke.color = Some("#000000".into());
        let explicit = StyleOverrides::from_raw(&json!({
            "gridContainer": {
                "color": "#FF00FF",
                "thickness": 2,
                "sides": { "left": false },
            },
        }));
        let styles = resolve_styles(&explicit, &ExtractedStyles::default(), 1);
        apply_styles(&mut root, &styles, ChartType::Bar);

        assert_eq!(root.stroke.color.as_deref(), Some("#000000"));
        assert_eq!(root.stroke.top, Some(2.0));
        assert_eq!(root.stroke.left, Some(0.0));
        assert_ne!(styles.grid_container().base.color, None);
        assert_eq!(styles.grid_container().applicable_color(), None);
    }

    #[test]
    fn test_second_pass_is_skipped() {
        let mut root = MemoryNode::frame("tab_1", 20.0);
        let styles = resolve_styles(&StyleOverrides::default(), &ExtractedStyles::default(), 1);
        let first = apply_styles(&mut root, &styles, ChartType::Line);
        let second = apply_styles(&mut root, &styles, ChartType::Line);
        assert_eq!(first.tab_right.applied, 1);
        assert_eq!(second.tab_right.applied, 0);
        assert_eq!(second.tab_right.skipped, 1);
    }
}
