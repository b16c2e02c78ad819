//! Editing the in-progress draft.
//!
//! Draft edits are forgiving: a field that fails validation keeps its
//! previous value, and a bad thickness falls back to the current one.

use serde_json::{Map, Value};

use crate::style::{
    DEFAULT_ASSIST_LINE, DEFAULT_CELL_TOP, DEFAULT_GRID, DEFAULT_MARK, DEFAULT_TAB_RIGHT, Edge,
    GridStyle, MAX_SERIES, MarkStyle, SideStyle, StrokeStyle, StyleOverrides, StyleSlot,
    THICKNESS_BOUNDS, normalize_color, normalize_fill, normalize_mark_styles,
    normalize_thickness_or,
};

fn stroke_style(raw: &Value) -> Option<StrokeStyle> {
    raw.as_str().and_then(StrokeStyle::from_keyword)
}

/// Apply the fields present in `raw` on top of `current`.
///
/// `default` supplies the thickness fallback when `current` has none.
fn edit_side(current: Option<SideStyle>, default: SideStyle, raw: &Map<String, Value>) -> SideStyle {
    let mut next = current.unwrap_or_default();
    if let Some(color) = raw.get("color").and_then(normalize_color) {
        next.color = Some(color);
    }
    if let Some(thickness) = raw.get("thickness") {
        let fallback = next.thickness.or(default.thickness).unwrap_or(0);
        next.thickness = Some(normalize_thickness_or(thickness, fallback, THICKNESS_BOUNDS));
    }
    if let Some(visible) = raw.get("visible").and_then(Value::as_bool) {
        next.visible = Some(visible);
    }
    if let Some(style) = raw.get("strokeStyle").and_then(stroke_style) {
        next.stroke_style = Some(style);
    }
    next
}

/// Edit the grid slot. The slot stays unset until an edit supplies a usable
/// base field, `enableIndividualStroke`, or `sides`.
fn edit_grid(current: Option<GridStyle>, raw: &Map<String, Value>) -> Option<GridStyle> {
    let base = edit_side(current.map(|grid| grid.base), DEFAULT_GRID.base, raw);
    let individual = raw.get("enableIndividualStroke").and_then(Value::as_bool);
    let sides = raw.get("sides").and_then(Value::as_object);
    if current.is_none() && base.is_unset() && individual.is_none() && sides.is_none() {
        return None;
    }

    let mut next = current.unwrap_or(GridStyle {
        base: SideStyle::default(),
        ..DEFAULT_GRID
    });
    next.base = base;
    if let Some(flag) = individual {
        next.enable_individual_stroke = flag;
    }
    if let Some(sides) = sides {
        for edge in Edge::ALL {
            if let Some(enabled) = sides.get(edge.key()).and_then(Value::as_bool) {
                next.sides.set(edge, enabled);
            }
        }
    }
    Some(next)
}

fn edit_mark(current: MarkStyle, raw: &Map<String, Value>) -> MarkStyle {
    let mut next = current;
    if let Some(fill) = raw.get("fill").or_else(|| raw.get("color")).and_then(normalize_color) {
        next.fill = Some(fill);
    }
    if let Some(stroke) = raw.get("stroke").and_then(normalize_color) {
        next.stroke = Some(stroke);
    }
    if let Some(thickness) = raw.get("thickness") {
        let fallback = next.thickness.or(DEFAULT_MARK.thickness).unwrap_or(0);
        next.thickness = Some(normalize_thickness_or(thickness, fallback, THICKNESS_BOUNDS));
    }
    if let Some(style) = raw.get("strokeStyle").and_then(stroke_style) {
        next.stroke_style = Some(style);
    }
    next
}

/// Edit the marks list. An array replaces it; an object edits the entry at
/// its `index` (0 when absent), growing the list by repeating the last entry.
/// Edits with an index past [`MAX_SERIES`] are ignored.
fn edit_marks(marks: &mut Vec<Option<MarkStyle>>, raw: &Value) {
    let Some(obj) = raw.as_object() else {
        *marks = normalize_mark_styles(raw);
        return;
    };
    let index = match obj.get("index") {
        None => 0,
        Some(index) => match index.as_u64().and_then(|i| usize::try_from(i).ok()) {
            Some(i) if i < MAX_SERIES => i,
            _ => return,
        },
    };
    if marks.len() <= index {
        let last = marks.last().copied().flatten();
        marks.resize(index + 1, last);
    }
    marks[index] = edit_mark(marks[index].unwrap_or_default(), obj).into_option();
}

/// Apply one UI edit to `draft`. A `null` style clears the slot.
pub fn edit_draft(draft: &mut StyleOverrides, slot: StyleSlot, raw: &Value) {
    if raw.is_null() {
        match slot {
            StyleSlot::CellFill => draft.cell_fill = None,
            StyleSlot::CellTop => draft.cell_top = None,
            StyleSlot::TabRight => draft.tab_right = None,
            StyleSlot::GridContainer => draft.grid_container = None,
            StyleSlot::AssistLine => draft.assist_line = None,
            StyleSlot::Mark => draft.marks.clear(),
        }
        return;
    }

    let empty = Map::new();
    let obj = raw.as_object().unwrap_or(&empty);
    match slot {
        StyleSlot::CellFill => {
            if let Some(fill) = normalize_fill(raw) {
                draft.cell_fill = Some(fill);
            }
        }
        StyleSlot::CellTop => {
            draft.cell_top = edit_side(draft.cell_top, DEFAULT_CELL_TOP, obj).into_option();
        }
        StyleSlot::TabRight => {
            draft.tab_right = edit_side(draft.tab_right, DEFAULT_TAB_RIGHT, obj).into_option();
        }
        StyleSlot::AssistLine => {
            draft.assist_line = edit_side(draft.assist_line, DEFAULT_ASSIST_LINE, obj).into_option();
        }
        StyleSlot::GridContainer => {
            draft.grid_container = edit_grid(draft.grid_container, obj);
        }
        StyleSlot::Mark => edit_marks(&mut draft.marks, raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::HexColor;
    use serde_json::json;

    #[test]
    fn test_bad_thickness_keeps_current() {
        let mut draft = StyleOverrides::default();
        edit_draft(&mut draft, StyleSlot::CellTop, &json!({ "thickness": 6 }));
        edit_draft(&mut draft, StyleSlot::CellTop, &json!({ "thickness": "wide" }));
        assert_eq!(draft.cell_top.and_then(|s| s.thickness), Some(6));

        edit_draft(&mut draft, StyleSlot::TabRight, &json!({ "thickness": -2 }));
        assert_eq!(draft.tab_right.and_then(|s| s.thickness), Some(1));
    }

    #[test]
    fn test_fields_merge_into_slot() {
        let mut draft = StyleOverrides::default();
        edit_draft(&mut draft, StyleSlot::AssistLine, &json!({ "color": "#00ff00" }));
        edit_draft(&mut draft, StyleSlot::AssistLine, &json!({ "strokeStyle": "dash" }));
        edit_draft(&mut draft, StyleSlot::AssistLine, &json!({ "color": "green" }));
        let assist = draft.assist_line.unwrap();
        assert_eq!(assist.color, Some(HexColor::rgb(0, 0xFF, 0)));
        assert_eq!(assist.stroke_style, Some(StrokeStyle::Dash));

        edit_draft(&mut draft, StyleSlot::AssistLine, &Value::Null);
        assert_eq!(draft.assist_line, None);
    }

    #[test]
    fn test_grid_sides_edit() {
        let mut draft = StyleOverrides::default();
        edit_draft(
            &mut draft,
            StyleSlot::GridContainer,
            &json!({ "sides": { "bottom": false }, "thickness": 2 }),
        );
        let grid = draft.grid_container.unwrap();
        assert!(!grid.sides.bottom);
        assert!(grid.sides.top);
        assert_eq!(grid.base.thickness, Some(2));
        assert_eq!(grid.base.color, None);
    }

    #[test]
    fn test_mark_index_grows_list() {
        let mut draft = StyleOverrides::default();
        edit_draft(&mut draft, StyleSlot::Mark, &json!(["#111111"]));
        edit_draft(&mut draft, StyleSlot::Mark, &json!({ "index": 2, "stroke": "#222222" }));
        assert_eq!(draft.marks.len(), 3);
        let fill = |i: usize| draft.marks[i].and_then(|m| m.fill);
        let stroke = |i: usize| draft.marks[i].and_then(|m| m.stroke);
        assert_eq!(fill(1), Some(HexColor::rgb(0x11, 0x11, 0x11)));
        assert_eq!(stroke(2), Some(HexColor::rgb(0x22, 0x22, 0x22)));
        assert_eq!(stroke(0), None);
    }

    #[test]
    fn test_out_of_range_mark_index_is_ignored() {
        let mut draft = StyleOverrides::default();
        edit_draft(&mut draft, StyleSlot::Mark, &json!(["#111111"]));
        for index in [json!(u64::MAX), json!(1_000_000_000_000u64), json!(MAX_SERIES), json!(-1)] {
            edit_draft(&mut draft, StyleSlot::Mark, &json!({ "index": index, "fill": "#222222" }));
        }
        assert_eq!(draft.marks.len(), 1);
        assert_eq!(draft.marks[0].and_then(|m| m.fill), Some(HexColor::rgb(0x11, 0x11, 0x11)));

        edit_draft(
            &mut draft,
            StyleSlot::Mark,
            &json!({ "index": MAX_SERIES - 1, "fill": "#333333" }),
        );
        assert_eq!(draft.marks.len(), MAX_SERIES);
    }

    #[test]
    fn test_empty_grid_edit_leaves_slot_unset() {
        let mut draft = StyleOverrides::default();
        edit_draft(&mut draft, StyleSlot::GridContainer, &json!({}));
        edit_draft(
            &mut draft,
            StyleSlot::GridContainer,
            &json!({ "color": "red", "strokeStyle": "wavy", "enableIndividualStroke": "yes" }),
        );
        assert_eq!(draft.grid_container, None);

        edit_draft(&mut draft, StyleSlot::GridContainer, &json!({ "enableIndividualStroke": true }));
        let grid = draft.grid_container.unwrap();
        assert!(grid.enable_individual_stroke);
        assert!(grid.base.is_unset());

        // Once set, an empty edit keeps the slot.
        edit_draft(&mut draft, StyleSlot::GridContainer, &json!({}));
        assert_eq!(draft.grid_container, Some(grid));
    }
}
