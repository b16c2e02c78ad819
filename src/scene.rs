//! An in-memory scene graph.
//!
//! [`MemoryNode`] is the host used by the CLI and the tests. Scenes load from
//! JSON:
//!
//! ```json
//! { "name": "chart", "height": 240, "children": [{ "name": "bar_1", "height": 200 }] }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::apply::{MutationError, SceneNode, StrokeUpdate};
use crate::chart::Padding;
use crate::style::{Edge, HexColor, StrokeSnapshot, StrokeStyle};

/// Dash pattern written for dashed strokes.
pub const DASH_PATTERN: [f64; 2] = [4.0, 4.0];

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NodePadding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeStroke {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash_pattern: Option<Vec<f64>>,
}

impl NodeStroke {
    fn side_mut(&mut self, edge: Edge) -> &mut Option<f64> {
        match edge {
            Edge::Top => &mut self.top,
            Edge::Right => &mut self.right,
            Edge::Bottom => &mut self.bottom,
            Edge::Left => &mut self.left,
        }
    }
}

/// A named frame with the properties the applicators touch.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MemoryNode {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub locked: bool,
    /// Properties fixed by a parent component and not overridable here.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fixed: Vec<String>,
    pub padding: NodePadding,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    pub stroke: NodeStroke,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MemoryNode>,
}

impl MemoryNode {
    pub fn frame(name: impl Into<String>, height: f64) -> Self {
        MemoryNode {
            name: name.into(),
            height: Some(height),
            ..MemoryNode::default()
        }
    }

    pub fn with_children(mut self, children: Vec<MemoryNode>) -> Self {
        self.children = children;
        self
    }

    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }

    /// Mark `property` as fixed by the parent component.
    pub fn with_fixed(mut self, property: &str) -> Self {
        self.fixed.push(property.to_string());
        self
    }

    fn guard(&self, property: &'static str) -> Result<(), MutationError> {
        if self.locked {
            return Err(MutationError::Locked(self.name.clone()));
        }
        if self.fixed.iter().any(|p| p == property) {
            return Err(MutationError::Overridden {
                node: self.name.clone(),
                property,
            });
        }
        Ok(())
    }
}

/// Assign `value` to `slot`, reporting whether it changed.
fn assign<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

impl SceneNode for MemoryNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn height(&self) -> Option<f64> {
        self.height
    }

    fn children(&self) -> &[Self] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut [Self] {
        &mut self.children
    }

    fn fill(&self) -> Option<String> {
        self.fill.clone()
    }

    fn stroke(&self) -> StrokeSnapshot {
        StrokeSnapshot {
            weight: self.stroke.weight,
            top: self.stroke.top,
            right: self.stroke.right,
            bottom: self.stroke.bottom,
            left: self.stroke.left,
            color: self.stroke.color.clone().map(Value::String),
            dash_pattern: self.stroke.dash_pattern.clone(),
            captured_at: None,
        }
    }

    fn set_padding(&mut self, padding: &Padding) -> Result<bool, MutationError> {
        self.guard("padding")?;
        let mut changed = false;
        for (slot, value) in [
            (&mut self.padding.top, padding.top),
            (&mut self.padding.right, padding.right),
            (&mut self.padding.bottom, padding.bottom),
            (&mut self.padding.left, padding.left),
        ] {
            if let Some(value) = value {
                changed |= assign(slot, value);
            }
        }
        Ok(changed)
    }

    fn set_height(&mut self, height: f64) -> Result<bool, MutationError> {
        self.guard("height")?;
        Ok(assign(&mut self.height, Some(height)))
    }

    fn set_fill(&mut self, color: HexColor) -> Result<bool, MutationError> {
        self.guard("fill")?;
        Ok(assign(&mut self.fill, Some(color.to_string())))
    }

    fn set_stroke(&mut self, update: &StrokeUpdate) -> Result<bool, MutationError> {
        self.guard("stroke")?;
        let mut next = self.stroke.clone();

        if update.individual {
            for edge in Edge::ALL {
                if let Some(weight) = update.weights.get(edge) {
                    *next.side_mut(edge) = Some(f64::from(weight));
                }
            }
        } else if let Some(weight) = update.weights.get(Edge::Top) {
            // A shared weight replaces any per-side weights.
            next.weight = Some(f64::from(weight));
            for edge in Edge::ALL {
                *next.side_mut(edge) = None;
            }
        }
        if let Some(color) = update.color {
            next.color = Some(color.to_string());
        }
        if let Some(style) = update.style {
            next.dash_pattern = Some(match style {
                StrokeStyle::Dash => DASH_PATTERN.to_vec(),
                StrokeStyle::Solid => Vec::new(),
            });
        }

        Ok(assign(&mut self.stroke, next))
    }
}
