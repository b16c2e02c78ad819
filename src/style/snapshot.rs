//! Stroke snapshots captured from existing nodes, and their style adapters.
//!
//! A snapshot is what is already drawn on a node at the moment it was read.
//! It is never kept in sync with later edits; callers re-capture before each
//! resolve and the capture time travels with it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::mark::MarkStyle;
use super::properties::StrokeStyle;
use super::side::{Edge, GridSides, GridStyle, SideStyle};
use super::values::{HexColor, THICKNESS_BOUNDS, clamp_thickness, normalize_color};

/// A read-only capture of a node's stroke.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrokeSnapshot {
    /// Overall stroke weight.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
    /// Raw paint color as read from the node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dash_pattern: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captured_at: Option<DateTime<Utc>>,
}

impl StrokeSnapshot {
    /// Weight recorded for `edge`, if the node had per-side weights.
    pub fn side_weight(&self, edge: Edge) -> Option<f64> {
        match edge {
            Edge::Top => self.top,
            Edge::Right => self.right,
            Edge::Bottom => self.bottom,
            Edge::Left => self.left,
        }
    }

    /// Per-side weight if present, else the overall weight.
    pub fn weight_for(&self, edge: Edge) -> Option<f64> {
        self.side_weight(edge).or(self.weight)
    }

    pub fn has_side_weights(&self) -> bool {
        Edge::ALL.iter().any(|&edge| self.side_weight(edge).is_some())
    }

    pub fn normalized_color(&self) -> Option<HexColor> {
        self.color.as_ref().and_then(normalize_color)
    }

    /// Dash pattern present and non-empty means dashed; any other recorded
    /// pattern means solid.
    pub fn stroke_style(&self) -> Option<StrokeStyle> {
        self.dash_pattern.as_ref().map(|pattern| {
            if pattern.is_empty() {
                StrokeStyle::Solid
            } else {
                StrokeStyle::Dash
            }
        })
    }

    /// Build a side style from a chosen weight, inferring visibility.
    fn side_style_with_weight(&self, weight: Option<f64>) -> Option<SideStyle> {
        let thickness = weight.and_then(|w| clamp_thickness(w, THICKNESS_BOUNDS));
        let color = self.normalized_color();
        let stroke_style = self.stroke_style();
        if thickness.is_none() && color.is_none() && stroke_style.is_none() {
            return None;
        }
        SideStyle {
            color,
            thickness,
            visible: thickness.map(|t| t > 0),
            stroke_style: stroke_style.or(Some(StrokeStyle::Solid)),
        }
        .into_option()
    }
}

/// Capture of a mark node: its fill plus its stroke.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<Value>,
    #[serde(default)]
    pub stroke: StrokeSnapshot,
}

/// Side style of `edge` as currently drawn.
pub fn side_style_from_snapshot(snapshot: &StrokeSnapshot, edge: Edge) -> Option<SideStyle> {
    snapshot.side_style_with_weight(snapshot.weight_for(edge))
}

/// Style of a cell's top edge as currently drawn.
///
/// Older captures recorded this edge under `bottom`; both names refer to the
/// same physical edge, with `top` taking priority.
pub fn cell_top_style_from_snapshot(snapshot: &StrokeSnapshot) -> Option<SideStyle> {
    let weight = snapshot.top.or(snapshot.bottom).or(snapshot.weight);
    snapshot.side_style_with_weight(weight)
}

/// Grid style as currently drawn.
///
/// With per-side weights, a side counts as enabled when its weight is > 0 and
/// the base thickness is the heaviest side.
pub fn grid_style_from_snapshot(snapshot: &StrokeSnapshot) -> Option<GridStyle> {
    if !snapshot.has_side_weights() {
        return snapshot
            .side_style_with_weight(snapshot.weight)
            .map(|base| GridStyle {
                base,
                enable_individual_stroke: false,
                sides: GridSides::default(),
            });
    }

    let mut sides = GridSides::default();
    for edge in Edge::ALL {
        if let Some(weight) = snapshot.weight_for(edge) {
            sides.set(edge, weight > 0.0);
        }
    }
    let heaviest = Edge::ALL
        .iter()
        .filter_map(|&edge| snapshot.weight_for(edge))
        .fold(None, |max: Option<f64>, w| Some(max.map_or(w, |m| m.max(w))));

    let base = snapshot
        .side_style_with_weight(heaviest)
        .unwrap_or_default();
    Some(GridStyle {
        base,
        enable_individual_stroke: true,
        sides,
    })
}

/// Assist-line style as currently drawn. Assist lines are single strokes.
pub fn assist_line_style_from_snapshot(snapshot: &StrokeSnapshot) -> Option<SideStyle> {
    snapshot.side_style_with_weight(snapshot.weight)
}

/// Mark style as currently drawn.
pub fn mark_style_from_snapshot(snapshot: &MarkSnapshot) -> Option<MarkStyle> {
    let stroke = &snapshot.stroke;
    MarkStyle {
        fill: snapshot.fill.as_ref().and_then(normalize_color),
        stroke: stroke.normalized_color(),
        thickness: stroke
            .weight
            .and_then(|w| clamp_thickness(w, THICKNESS_BOUNDS)),
        stroke_style: stroke.stroke_style(),
    }
    .into_option()
}
