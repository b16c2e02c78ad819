//! Per-edge and four-sided stroke styles.
//!
//! A [`SideStyle`] describes one stroked edge. A [`GridStyle`] extends it to
//! a container whose four sides can be switched off individually.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::properties::StrokeStyle;
use super::values::{HexColor, THICKNESS_BOUNDS, normalize_color, normalize_thickness};

/// Represents one of the four edges of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];

    /// Key used for this edge in `sides` objects and snapshots.
    pub fn key(self) -> &'static str {
        match self {
            Edge::Top => "top",
            Edge::Right => "right",
            Edge::Bottom => "bottom",
            Edge::Left => "left",
        }
    }
}

/// Style of a single stroked edge.
///
/// Every field is optional. A style with no fields set is never constructed
/// by the normalizers; they return `None` instead, so the presence of a
/// `SideStyle` means the slot was touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SideStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<HexColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thickness: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_style: Option<StrokeStyle>,
}

impl SideStyle {
    /// True when no field is set.
    pub fn is_unset(&self) -> bool {
        self.color.is_none()
            && self.thickness.is_none()
            && self.visible.is_none()
            && self.stroke_style.is_none()
    }

    /// Collapse an unset style to `None`.
    pub fn into_option(self) -> Option<Self> {
        if self.is_unset() { None } else { Some(self) }
    }

    /// Thickness the applicator should use.
    ///
    /// An invisible side always strokes at 0; the stored thickness is kept so
    /// making the side visible again restores it.
    pub fn effective_thickness(&self) -> Option<u32> {
        if self.visible == Some(false) {
            Some(0)
        } else {
            self.thickness
        }
    }

    /// Read the shared side fields out of a raw object.
    fn from_object(obj: &Map<String, Value>) -> Self {
        SideStyle {
            color: obj.get("color").and_then(normalize_color),
            thickness: obj
                .get("thickness")
                .and_then(|v| normalize_thickness(v, THICKNESS_BOUNDS)),
            visible: obj.get("visible").and_then(Value::as_bool),
            stroke_style: obj
                .get("strokeStyle")
                .and_then(Value::as_str)
                .and_then(StrokeStyle::from_keyword),
        }
    }
}

/// Normalize a raw side style.
///
/// Returns `None` when the caller supplied nothing usable. A style that only
/// sets `visible: false` is kept.
pub fn normalize_side_style(raw: &Value) -> Option<SideStyle> {
    SideStyle::from_object(raw.as_object()?).into_option()
}

/// Which sides of a grid container are stroked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSides {
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
    pub left: bool,
}

impl Default for GridSides {
    fn default() -> Self {
        GridSides {
            top: true,
            right: true,
            bottom: true,
            left: true,
        }
    }
}

impl GridSides {
    pub fn get(&self, edge: Edge) -> bool {
        match edge {
            Edge::Top => self.top,
            Edge::Right => self.right,
            Edge::Bottom => self.bottom,
            Edge::Left => self.left,
        }
    }

    pub fn set(&mut self, edge: Edge, enabled: bool) {
        match edge {
            Edge::Top => self.top = enabled,
            Edge::Right => self.right = enabled,
            Edge::Bottom => self.bottom = enabled,
            Edge::Left => self.left = enabled,
        }
    }

    pub fn all(&self) -> bool {
        Edge::ALL.iter().all(|&edge| self.get(edge))
    }
}

/// Per-edge stroke weights handed to the applicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EdgeWeights {
    pub top: Option<u32>,
    pub right: Option<u32>,
    pub bottom: Option<u32>,
    pub left: Option<u32>,
}

impl EdgeWeights {
    pub fn uniform(weight: Option<u32>) -> Self {
        EdgeWeights {
            top: weight,
            right: weight,
            bottom: weight,
            left: weight,
        }
    }

    pub fn only(edge: Edge, weight: Option<u32>) -> Self {
        let mut weights = EdgeWeights::default();
        weights.set(edge, weight);
        weights
    }

    pub fn get(&self, edge: Edge) -> Option<u32> {
        match edge {
            Edge::Top => self.top,
            Edge::Right => self.right,
            Edge::Bottom => self.bottom,
            Edge::Left => self.left,
        }
    }

    pub fn set(&mut self, edge: Edge, weight: Option<u32>) {
        match edge {
            Edge::Top => self.top = weight,
            Edge::Right => self.right = weight,
            Edge::Bottom => self.bottom = weight,
            Edge::Left => self.left = weight,
        }
    }

    pub fn is_empty(&self) -> bool {
        Edge::ALL.iter().all(|&edge| self.get(edge).is_none())
    }
}

/// Stroke style of a grid container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridStyle {
    #[serde(flatten)]
    pub base: SideStyle,
    #[serde(default)]
    pub enable_individual_stroke: bool,
    #[serde(default)]
    pub sides: GridSides,
}

impl GridStyle {
    /// Color the applicator may write to the shared stroke paint.
    ///
    /// The paint is shared by all four sides, so a color is only applicable
    /// when every side is enabled. Excluded sides are limited to thickness.
    pub fn applicable_color(&self) -> Option<HexColor> {
        if self.sides.all() {
            self.base.color
        } else {
            None
        }
    }

    /// Whether weights must be written per side rather than uniformly.
    pub fn uses_individual_weights(&self) -> bool {
        self.enable_individual_stroke || !self.sides.all()
    }

    /// Per-side weights: the effective thickness on enabled sides, 0 elsewhere.
    pub fn side_weights(&self) -> EdgeWeights {
        let thickness = self.base.effective_thickness();
        let mut weights = EdgeWeights::default();
        for edge in Edge::ALL {
            weights.set(edge, if self.sides.get(edge) { thickness } else { Some(0) });
        }
        weights
    }
}

/// Normalize a raw grid style.
///
/// Returns `None` only when the base style, `enableIndividualStroke`, and
/// `sides` are all absent. Unspecified sides default to enabled.
pub fn normalize_grid_style(raw: &Value) -> Option<GridStyle> {
    let obj = raw.as_object()?;
    let base = SideStyle::from_object(obj);
    let individual = obj.get("enableIndividualStroke").and_then(Value::as_bool);
    let sides_raw = obj.get("sides").and_then(Value::as_object);

    if base.is_unset() && individual.is_none() && sides_raw.is_none() {
        return None;
    }

    let mut sides = GridSides::default();
    if let Some(sides_raw) = sides_raw {
        for edge in Edge::ALL {
            if let Some(enabled) = sides_raw.get(edge.key()).and_then(Value::as_bool) {
                sides.set(edge, enabled);
            }
        }
    }

    Some(GridStyle {
        base,
        enable_individual_stroke: individual.unwrap_or(false),
        sides,
    })
}
