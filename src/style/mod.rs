//! Style normalization and resolution.
//!
//! This module contains:
//! - Keyword types (stroke style, chart type, slots)
//! - Color and thickness normalizers
//! - Side, grid, and mark style normalizers
//! - Snapshot-to-style adapters
//! - The per-slot precedence resolver

mod mark;
mod properties;
mod resolve;
mod side;
mod snapshot;
mod values;

// Re-export keyword types
pub use properties::{ChartType, StrokeStyle, StyleSlot, ValueMode};

// Re-export normalizers
pub use mark::{
    MAX_SERIES, MarkStyle, fill_mark_holes, normalize_fill, normalize_mark_style,
    normalize_mark_styles,
};
pub use side::{
    Edge, EdgeWeights, GridSides, GridStyle, SideStyle, normalize_grid_style,
    normalize_side_style,
};
pub use values::{
    HexColor, THICKNESS_BOUNDS, THICKNESS_MAX, clamp_thickness, normalize_color,
    normalize_thickness, normalize_thickness_or,
};

// Re-export snapshot adapters
pub use snapshot::{
    MarkSnapshot, StrokeSnapshot, assist_line_style_from_snapshot, cell_top_style_from_snapshot,
    grid_style_from_snapshot, mark_style_from_snapshot, side_style_from_snapshot,
};

// Re-export the resolver
pub use resolve::{
    DEFAULT_ASSIST_LINE, DEFAULT_CELL_FILL, DEFAULT_CELL_TOP, DEFAULT_GRID, DEFAULT_MARK,
    DEFAULT_TAB_RIGHT, ExtractedStyles, ResolvedStyles, SlotOrigins, StyleOrigin, StyleOverrides,
    StyleSources, pad_marks, resolve_styles,
};
