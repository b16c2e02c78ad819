//! Style resolution.
//!
//! Every slot is resolved on its own through a fixed precedence chain:
//!
//! **Explicit → Snapshot → Default**
//!
//! Explicit styles come from a UI draft or a saved template and are already
//! normalized. Snapshot styles are derived from whatever the selected node
//! currently draws. Defaults are constants and always fully populated, so
//! resolution cannot fail.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::mark::{MarkStyle, fill_mark_holes, normalize_fill, normalize_mark_styles};
use super::properties::{StrokeStyle, StyleSlot};
use super::side::{
    Edge, GridSides, GridStyle, SideStyle, normalize_grid_style, normalize_side_style,
};
use super::snapshot::{
    MarkSnapshot, StrokeSnapshot, assist_line_style_from_snapshot, cell_top_style_from_snapshot,
    grid_style_from_snapshot, mark_style_from_snapshot, side_style_from_snapshot,
};
use super::values::{HexColor, normalize_color};

pub const DEFAULT_CELL_FILL: HexColor = HexColor::WHITE;

pub const DEFAULT_CELL_TOP: SideStyle = SideStyle {
    color: Some(HexColor::rgb(0xE5, 0xE5, 0xE5)),
    thickness: Some(1),
    visible: Some(true),
    stroke_style: Some(StrokeStyle::Solid),
};

pub const DEFAULT_TAB_RIGHT: SideStyle = SideStyle {
    color: Some(HexColor::rgb(0xE5, 0xE5, 0xE5)),
    thickness: Some(1),
    visible: Some(true),
    stroke_style: Some(StrokeStyle::Solid),
};

pub const DEFAULT_GRID: GridStyle = GridStyle {
    base: SideStyle {
        color: Some(HexColor::rgb(0xD9, 0xD9, 0xD9)),
        thickness: Some(1),
        visible: Some(true),
        stroke_style: Some(StrokeStyle::Solid),
    },
    enable_individual_stroke: false,
    sides: GridSides {
        top: true,
        right: true,
        bottom: true,
        left: true,
    },
};

pub const DEFAULT_ASSIST_LINE: SideStyle = SideStyle {
    color: Some(HexColor::rgb(0xFF, 0x5A, 0x5A)),
    thickness: Some(1),
    visible: Some(true),
    stroke_style: Some(StrokeStyle::Dash),
};

pub const DEFAULT_MARK: MarkStyle = MarkStyle {
    fill: Some(HexColor::rgb(0x3B, 0x82, 0xF6)),
    stroke: Some(HexColor::rgb(0x3B, 0x82, 0xF6)),
    thickness: Some(2),
    stroke_style: Some(StrokeStyle::Solid),
};

/// Already-normalized styles chosen by the user, one optional entry per slot.
///
/// This is also the payload shape stored in templates.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StyleOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell_fill: Option<HexColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell_top: Option<SideStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tab_right: Option<SideStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid_container: Option<GridStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assist_line: Option<SideStyle>,
    /// One entry per series; `None` leaves a series to the one before it.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub marks: Vec<Option<MarkStyle>>,
}

impl StyleOverrides {
    /// Normalize a raw, loosely-typed override object.
    ///
    /// This is the single validation step for styles entering from outside;
    /// unknown keys and unusable values are dropped.
    pub fn from_raw(raw: &Value) -> Self {
        let Some(obj) = raw.as_object() else {
            return StyleOverrides::default();
        };
        StyleOverrides {
            cell_fill: obj.get("cellFill").and_then(normalize_fill),
            cell_top: obj
                .get("cellTop")
                .and_then(normalize_side_style)
                .or_else(|| obj.get("cellBottom").and_then(normalize_side_style)),
            tab_right: obj.get("tabRight").and_then(normalize_side_style),
            grid_container: obj.get("gridContainer").and_then(normalize_grid_style),
            assist_line: obj.get("assistLine").and_then(normalize_side_style),
            marks: obj
                .get("marks")
                .or_else(|| obj.get("mark"))
                .map(normalize_mark_styles)
                .unwrap_or_default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cell_fill.is_none()
            && self.cell_top.is_none()
            && self.tab_right.is_none()
            && self.grid_container.is_none()
            && self.assist_line.is_none()
            && !self.has_marks()
    }

    /// Whether any series has a mark style.
    pub fn has_marks(&self) -> bool {
        self.marks.iter().any(Option::is_some)
    }

    /// Slot-wise merge: slots set in `self` win, the rest come from `other`.
    pub fn or(self, other: StyleOverrides) -> StyleOverrides {
        StyleOverrides {
            cell_fill: self.cell_fill.or(other.cell_fill),
            cell_top: self.cell_top.or(other.cell_top),
            tab_right: self.tab_right.or(other.tab_right),
            grid_container: self.grid_container.or(other.grid_container),
            assist_line: self.assist_line.or(other.assist_line),
            marks: if self.has_marks() {
                self.marks
            } else {
                other.marks
            },
        }
    }
}

/// Raw captures of what the selected component currently draws.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractedStyles {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell_fill: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell_top: Option<StrokeSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tab_right: Option<StrokeSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid_container: Option<StrokeSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assist_line: Option<StrokeSnapshot>,
    /// Mark captures indexed by series; `None` where no node of that series
    /// was found.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub marks: Vec<Option<MarkSnapshot>>,
}

impl ExtractedStyles {
    /// Slot-wise merge: captures in `self` win, the rest come from `other`.
    pub fn or(self, other: ExtractedStyles) -> ExtractedStyles {
        ExtractedStyles {
            cell_fill: self.cell_fill.or(other.cell_fill),
            cell_top: self.cell_top.or(other.cell_top),
            tab_right: self.tab_right.or(other.tab_right),
            grid_container: self.grid_container.or(other.grid_container),
            assist_line: self.assist_line.or(other.assist_line),
            marks: if self.marks.iter().any(Option::is_some) {
                self.marks
            } else {
                other.marks
            },
        }
    }
}

/// Where a resolved slot's style came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StyleOrigin {
    Explicit,
    Snapshot,
    Default,
}

/// The resolved, applicator-facing payload.
///
/// Built once per apply and never mutated afterwards; every slot holds a
/// fully resolved style.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedStyles {
    cell_fill: HexColor,
    cell_top: SideStyle,
    tab_right: SideStyle,
    grid_container: GridStyle,
    assist_line: SideStyle,
    marks: Vec<MarkStyle>,
    origins: SlotOrigins,
}

/// Origin of every slot in a [`ResolvedStyles`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotOrigins {
    pub cell_fill: StyleOrigin,
    pub cell_top: StyleOrigin,
    pub tab_right: StyleOrigin,
    pub grid_container: StyleOrigin,
    pub assist_line: StyleOrigin,
    pub mark: StyleOrigin,
}

impl SlotOrigins {
    pub fn get(&self, slot: StyleSlot) -> StyleOrigin {
        match slot {
            StyleSlot::CellFill => self.cell_fill,
            StyleSlot::CellTop => self.cell_top,
            StyleSlot::TabRight => self.tab_right,
            StyleSlot::GridContainer => self.grid_container,
            StyleSlot::AssistLine => self.assist_line,
            StyleSlot::Mark => self.mark,
        }
    }
}

impl ResolvedStyles {
    #[inline]
    pub fn cell_fill(&self) -> HexColor {
        self.cell_fill
    }

    #[inline]
    pub fn cell_top(&self) -> &SideStyle {
        &self.cell_top
    }

    #[inline]
    pub fn tab_right(&self) -> &SideStyle {
        &self.tab_right
    }

    #[inline]
    pub fn grid_container(&self) -> &GridStyle {
        &self.grid_container
    }

    #[inline]
    pub fn assist_line(&self) -> &SideStyle {
        &self.assist_line
    }

    /// One mark style per data series; never empty.
    #[inline]
    pub fn marks(&self) -> &[MarkStyle] {
        &self.marks
    }

    /// Mark style for a 1-based series index, clamped to the last entry.
    pub fn mark_for_series(&self, series: usize) -> &MarkStyle {
        let index = series.saturating_sub(1).min(self.marks.len() - 1);
        &self.marks[index]
    }

    #[inline]
    pub fn origins(&self) -> &SlotOrigins {
        &self.origins
    }
}

/// Pick the first available candidate and remember which layer supplied it.
fn pick<T>(explicit: Option<T>, snapshot: impl FnOnce() -> Option<T>, default: T) -> (T, StyleOrigin) {
    // 1. Explicit override
    if let Some(value) = explicit {
        return (value, StyleOrigin::Explicit);
    }
    // 2. Snapshot of the live node
    if let Some(value) = snapshot() {
        return (value, StyleOrigin::Snapshot);
    }
    // 3. Built-in default
    (default, StyleOrigin::Default)
}

/// Pad `marks` to `count` by repeating the last entry, or truncate to it.
pub fn pad_marks(mut marks: Vec<MarkStyle>, count: usize) -> Vec<MarkStyle> {
    let count = count.max(1);
    let last = marks.last().copied().unwrap_or(DEFAULT_MARK);
    marks.resize(count, last);
    marks
}

/// The inputs of one resolve pass.
#[derive(Debug, Clone, Copy)]
pub struct StyleSources<'a> {
    pub explicit: &'a StyleOverrides,
    pub extracted: &'a ExtractedStyles,
}

impl<'a> StyleSources<'a> {
    pub fn new(explicit: &'a StyleOverrides, extracted: &'a ExtractedStyles) -> Self {
        StyleSources {
            explicit,
            extracted,
        }
    }

    /// Resolve every slot. `mark_count` is the number of data series.
    pub fn resolve(&self, mark_count: usize) -> ResolvedStyles {
        resolve_styles(self.explicit, self.extracted, mark_count)
    }
}

/// Resolve one effective style per slot.
///
/// Pure: the result depends only on the arguments.
pub fn resolve_styles(
    explicit: &StyleOverrides,
    extracted: &ExtractedStyles,
    mark_count: usize,
) -> ResolvedStyles {
    let (cell_fill, cell_fill_origin) = pick(
        explicit.cell_fill,
        || extracted.cell_fill.as_ref().and_then(normalize_color),
        DEFAULT_CELL_FILL,
    );
    let (cell_top, cell_top_origin) = pick(
        explicit.cell_top,
        || extracted.cell_top.as_ref().and_then(cell_top_style_from_snapshot),
        DEFAULT_CELL_TOP,
    );
    let (tab_right, tab_right_origin) = pick(
        explicit.tab_right,
        || {
            extracted
                .tab_right
                .as_ref()
                .and_then(|s| side_style_from_snapshot(s, Edge::Right))
        },
        DEFAULT_TAB_RIGHT,
    );
    let (grid_container, grid_origin) = pick(
        explicit.grid_container,
        || extracted.grid_container.as_ref().and_then(grid_style_from_snapshot),
        DEFAULT_GRID,
    );
    let (assist_line, assist_origin) = pick(
        explicit.assist_line,
        || {
            extracted
                .assist_line
                .as_ref()
                .and_then(assist_line_style_from_snapshot)
        },
        DEFAULT_ASSIST_LINE,
    );

    let explicit_marks = explicit.has_marks().then(|| explicit.marks.clone());
    let (marks, mark_origin) = pick(
        explicit_marks,
        || {
            let marks: Vec<Option<MarkStyle>> = extracted
                .marks
                .iter()
                .map(|snapshot| snapshot.as_ref().and_then(mark_style_from_snapshot))
                .collect();
            marks.iter().any(Option::is_some).then_some(marks)
        },
        vec![Some(DEFAULT_MARK)],
    );
    let marks = fill_mark_holes(&marks, DEFAULT_MARK);
    let marks = pad_marks(marks, mark_count);

    let origins = SlotOrigins {
        cell_fill: cell_fill_origin,
        cell_top: cell_top_origin,
        tab_right: tab_right_origin,
        grid_container: grid_origin,
        assist_line: assist_origin,
        mark: mark_origin,
    };
    for slot in StyleSlot::ALL {
        debug!(slot = %slot, origin = ?origins.get(*slot), "resolved style slot");
    }

    ResolvedStyles {
        cell_fill,
        cell_top,
        tab_right,
        grid_container,
        assist_line,
        marks,
        origins,
    }
}
