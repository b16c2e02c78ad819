//! Applying layouts and resolved styles to a scene.
//!
//! The scene itself is reached only through [`SceneNode`]. Every mutation
//! reports whether it changed anything; a mutation that fails is counted and
//! the batch continues with the next node.

mod chart;
mod extract;
mod styles;

use serde::Serialize;
use thiserror::Error;

use crate::chart::Padding;
use crate::style::{EdgeWeights, HexColor, StrokeSnapshot, StrokeStyle};

pub use chart::{ApplyOptions, ChartReport, apply_chart};
pub use extract::extract_styles;
pub use styles::{StyleReport, apply_styles, mark_series};

/// A host refused a property write.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("node '{0}' is locked")]
    Locked(String),

    #[error("property '{property}' on '{node}' cannot be overridden")]
    Overridden { node: String, property: &'static str },
}

/// A stroke change. Fields left `None` are not written.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StrokeUpdate {
    pub weights: EdgeWeights,
    /// Write weights per side instead of one shared weight.
    pub individual: bool,
    pub color: Option<HexColor>,
    pub style: Option<StrokeStyle>,
}

impl StrokeUpdate {
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty() && self.color.is_none() && self.style.is_none()
    }
}

/// A node in the host scene graph.
///
/// Mutators return `Ok(true)` when the node changed and `Ok(false)` when the
/// write was a no-op.
pub trait SceneNode: Sized {
    fn name(&self) -> &str;

    /// Laid-out height, when known.
    fn height(&self) -> Option<f64>;

    fn children(&self) -> &[Self];

    fn children_mut(&mut self) -> &mut [Self];

    /// Current solid fill, as the host reports it.
    fn fill(&self) -> Option<String>;

    /// Capture the node's current stroke.
    fn stroke(&self) -> StrokeSnapshot;

    fn set_padding(&mut self, padding: &Padding) -> Result<bool, MutationError>;

    fn set_height(&mut self, height: f64) -> Result<bool, MutationError>;

    fn set_fill(&mut self, color: HexColor) -> Result<bool, MutationError>;

    fn set_stroke(&mut self, stroke: &StrokeUpdate) -> Result<bool, MutationError>;
}

/// Visit `node` and all its descendants, parents first.
pub fn walk<N: SceneNode>(node: &N, visit: &mut impl FnMut(&N)) {
    visit(node);
    for child in node.children() {
        walk(child, visit);
    }
}

/// Mutable variant of [`walk`].
pub fn walk_mut<N: SceneNode>(node: &mut N, visit: &mut impl FnMut(&mut N)) {
    visit(node);
    for child in node.children_mut() {
        walk_mut(child, visit);
    }
}

/// First node, parents first, whose name satisfies `pred`.
pub fn find<'a, N: SceneNode>(node: &'a N, pred: &impl Fn(&str) -> bool) -> Option<&'a N> {
    if pred(node.name()) {
        return Some(node);
    }
    node.children().iter().find_map(|child| find(child, pred))
}

/// Counters for one injected slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SlotReport {
    /// Eligible nodes found.
    pub candidates: usize,
    /// Nodes that changed.
    pub applied: usize,
    /// Eligible nodes left unchanged.
    pub skipped: usize,
    /// Nodes whose mutation failed.
    pub errors: usize,
}

impl SlotReport {
    /// Count the outcome of one eligible node.
    pub fn record(&mut self, outcome: Result<bool, MutationError>) {
        self.candidates += 1;
        match outcome {
            Ok(true) => self.applied += 1,
            Ok(false) => self.skipped += 1,
            Err(err) => {
                tracing::warn!(%err, "style mutation failed");
                self.errors += 1;
            }
        }
    }

    /// Count an eligible node that had nothing to apply.
    pub fn record_skip(&mut self) {
        self.candidates += 1;
        self.skipped += 1;
    }
}
