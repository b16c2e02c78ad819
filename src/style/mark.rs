//! Per-series mark styles and cell fills.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::properties::StrokeStyle;
use super::values::{HexColor, THICKNESS_BOUNDS, normalize_color, normalize_thickness};

/// Largest series number a mark style is kept for.
pub const MAX_SERIES: usize = 256;

/// Style of the marks (bars, segments, or line points) of one data series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<HexColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<HexColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thickness: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_style: Option<StrokeStyle>,
}

impl MarkStyle {
    pub fn is_unset(&self) -> bool {
        self.fill.is_none()
            && self.stroke.is_none()
            && self.thickness.is_none()
            && self.stroke_style.is_none()
    }

    pub fn into_option(self) -> Option<Self> {
        if self.is_unset() { None } else { Some(self) }
    }
}

/// Normalize one raw mark style.
///
/// A bare color string is shorthand for `{ "fill": color }`.
pub fn normalize_mark_style(raw: &Value) -> Option<MarkStyle> {
    if raw.is_string() {
        return normalize_color(raw).map(|fill| MarkStyle {
            fill: Some(fill),
            ..MarkStyle::default()
        });
    }
    let obj = raw.as_object()?;
    MarkStyle {
        fill: obj
            .get("fill")
            .or_else(|| obj.get("color"))
            .and_then(normalize_color),
        stroke: obj.get("stroke").and_then(normalize_color),
        thickness: obj
            .get("thickness")
            .and_then(|v| normalize_thickness(v, THICKNESS_BOUNDS)),
        stroke_style: obj
            .get("strokeStyle")
            .and_then(Value::as_str)
            .and_then(StrokeStyle::from_keyword),
    }
    .into_option()
}

/// Normalize a list of raw mark styles, one entry per series.
///
/// Entries stay in place: an unusable entry becomes `None` so later series
/// keep their position. Trailing holes are dropped, and a list with no usable
/// entry comes back empty.
pub fn normalize_mark_styles(raw: &Value) -> Vec<Option<MarkStyle>> {
    let mut marks: Vec<Option<MarkStyle>> = match raw {
        Value::Array(items) => items
            .iter()
            .take(MAX_SERIES)
            .map(normalize_mark_style)
            .collect(),
        other => vec![normalize_mark_style(other)],
    };
    while marks.last().is_some_and(Option::is_none) {
        marks.pop();
    }
    marks
}

/// Fill the holes of a positional mark list.
///
/// A hole takes the style of the series before it; leading holes take
/// `first`.
pub fn fill_mark_holes(marks: &[Option<MarkStyle>], first: MarkStyle) -> Vec<MarkStyle> {
    let mut previous = first;
    marks
        .iter()
        .map(|mark| {
            if let Some(mark) = mark {
                previous = *mark;
            }
            previous
        })
        .collect()
}

/// Normalize a cell fill: either a color string or `{ "color": ... }`.
pub fn normalize_fill(raw: &Value) -> Option<HexColor> {
    match raw {
        Value::Object(obj) => obj.get("color").and_then(normalize_color),
        other => normalize_color(other),
    }
}
