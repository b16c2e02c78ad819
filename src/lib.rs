//! # chartstyle
//!
//! Chart layout and style injection for design-tool chart components.
//!
//! ## Features
//!
//! - Lay out bar, stacked bar, and line charts by padding and height
//! - Normalize loosely-typed colors, thicknesses, and side/grid/mark styles
//! - Resolve one style per slot from explicit overrides, live snapshots, and defaults
//! - Inject the resolved styles into a scene and report per-slot counts
//! - Save, rename, and delete named style templates
//!
//! ## Quick Start
//!
//! ```
//! use chartstyle::{ApplyRequest, ApplyOptions, MemoryNode, MemoryStore, PluginController};
//!
//! let scene = MemoryNode::frame("chart", 200.0).with_children(vec![
//!     MemoryNode::frame("bar_1", 200.0),
//!     MemoryNode::frame("bar_2", 200.0),
//! ]);
//! let mut controller = PluginController::new(scene, MemoryStore::new(), ApplyOptions::default());
//!
//! let request = ApplyRequest::parse(r#"{"type":"bar","mode":"percent","values":[25,50]}"#).unwrap();
//! let outcome = controller.apply(&request).unwrap();
//! assert_eq!(outcome.chart.applied, 2);
//! assert_eq!(controller.scene().children[0].padding.top, 150.0);
//! ```
//!
//! ## Resolving styles
//!
//! Each slot resolves independently, explicit first, then the snapshot of
//! what the scene draws, then the built-in default:
//!
//! ```
//! use chartstyle::{ExtractedStyles, StyleOrigin, StyleOverrides, resolve_styles};
//! use serde_json::json;
//!
//! let explicit = StyleOverrides::from_raw(&json!({ "cellTop": { "thickness": 5, "visible": false } }));
//! let resolved = resolve_styles(&explicit, &ExtractedStyles::default(), 1);
//!
//! assert_eq!(resolved.cell_top().thickness, Some(5));
//! assert_eq!(resolved.cell_top().effective_thickness(), Some(0));
//! assert_eq!(resolved.origins().grid_container, StyleOrigin::Default);
//! ```

pub mod apply;
pub mod chart;
pub mod config;
pub mod controller;
pub mod error;
pub mod message;
pub mod scene;
pub mod style;
pub mod template;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use apply::{
    ApplyOptions, ChartReport, MutationError, SceneNode, SlotReport, StrokeUpdate, StyleReport,
    apply_chart, apply_styles, extract_styles,
};
pub use chart::{ChartData, ChartError, ChartLayout, ChartValues, required_mark_count};
pub use config::{Config, DEFAULT_CONFIG_FILE};
pub use controller::{
    AppState, ApplyOutcome, HostReply, HostState, PluginController, handle_host_message,
};
pub use error::{Error, Result};
pub use message::{ApplyRequest, Inbound, Outbound, apply_summary};
pub use scene::MemoryNode;
pub use style::{
    ChartType, ExtractedStyles, HexColor, ResolvedStyles, StyleOrigin, StyleOverrides, StyleSlot,
    resolve_styles,
};
pub use template::{
    JsonFileStore, MemoryStore, StyleTemplateItem, TemplateError, TemplateLibrary, TemplateStore,
};
