//! Chart data documents.
//!
//! A document names the chart kind, how values map to heights, the values
//! themselves, and optional container padding:
//!
//! ```json
//! { "type": "bar", "mode": "percent", "values": [10, 25, 18], "padding": { "h": 12 } }
//! ```
//!
//! Flat `values` describe a single series. Nested `values` are rows of
//! series by columns; for stacked bars the first row is the header/legend
//! row and carries no plotted data.

mod layout;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::style::{ChartType, ValueMode};

pub use layout::{AssistMetrics, ChartLayout, LayoutTarget, Placement, ratio_for};

/// Errors in an otherwise well-formed chart document.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    #[error("No values to apply.")]
    EmptyValues,

    #[error("Stacked charts need at least one data row below the header row.")]
    MissingDataRows,
}

/// Chart values: one series, or rows of series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChartValues {
    Flat(Vec<f64>),
    Nested(Vec<Vec<f64>>),
}

impl ChartValues {
    /// Number of rows as entered in the data grid.
    pub fn row_count(&self) -> usize {
        match self {
            ChartValues::Flat(_) => 1,
            ChartValues::Nested(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ChartValues::Flat(values) => values.is_empty(),
            ChartValues::Nested(rows) => rows.iter().all(Vec::is_empty),
        }
    }
}

/// Container padding as written in a document. `h` sets left and right
/// unless they are given explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PaddingSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<f64>,
}

/// Padding with the `h` shorthand expanded. Unset sides are left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Padding {
    pub top: Option<f64>,
    pub right: Option<f64>,
    pub bottom: Option<f64>,
    pub left: Option<f64>,
}

impl Padding {
    pub fn top(top: f64) -> Self {
        Padding {
            top: Some(top),
            ..Padding::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.top.is_none() && self.right.is_none() && self.bottom.is_none() && self.left.is_none()
    }
}

impl PaddingSpec {
    /// Expand the `h` shorthand. Negative and non-finite values become 0.
    pub fn resolve(&self) -> Padding {
        let sanitize = |v: Option<f64>| v.map(|v| if v.is_finite() { v.max(0.0) } else { 0.0 });
        Padding {
            top: sanitize(self.top),
            right: sanitize(self.right.or(self.h)),
            bottom: sanitize(self.bottom),
            left: sanitize(self.left.or(self.h)),
        }
    }
}

/// A chart data document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    #[serde(rename = "type")]
    pub chart_type: ChartType,
    #[serde(default)]
    pub mode: ValueMode,
    pub values: ChartValues,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<PaddingSpec>,
}

/// Number of mark styles a chart needs: one per data series, never fewer
/// than one. Stacked charts reserve their first row as the header row.
pub fn required_mark_count(chart_type: ChartType, row_count: usize) -> usize {
    let reserved = usize::from(chart_type.reserves_header_row());
    row_count.saturating_sub(reserved).max(1)
}

impl ChartData {
    pub fn new(chart_type: ChartType, mode: ValueMode, values: ChartValues) -> Self {
        ChartData {
            chart_type,
            mode,
            values,
            padding: None,
        }
    }

    pub fn row_count(&self) -> usize {
        self.values.row_count()
    }

    /// Number of data series, and so of mark styles.
    pub fn series_count(&self) -> usize {
        required_mark_count(self.chart_type, self.row_count())
    }

    /// Rows that carry plotted data, header row excluded.
    pub fn data_rows(&self) -> Vec<&[f64]> {
        match &self.values {
            ChartValues::Flat(values) => vec![values.as_slice()],
            ChartValues::Nested(rows) => {
                let skip = usize::from(self.chart_type.reserves_header_row());
                rows.iter().skip(skip).map(Vec::as_slice).collect()
            }
        }
    }

    /// Reject documents that have nothing to plot.
    pub fn validate(&self) -> Result<(), ChartError> {
        if self.values.is_empty() {
            return Err(ChartError::EmptyValues);
        }
        if self.data_rows().iter().all(|row| row.is_empty()) {
            return Err(if self.chart_type.reserves_header_row() {
                ChartError::MissingDataRows
            } else {
                ChartError::EmptyValues
            });
        }
        Ok(())
    }

    /// Compute the placement of every value target.
    pub fn layout(&self) -> Result<ChartLayout, ChartError> {
        self.validate()?;
        Ok(ChartLayout::compute(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> ChartData {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_parse_flat_document() {
        let data = parse(r#"{"type":"bar","mode":"percent","values":[10,25,18]}"#);
        assert_eq!(data.chart_type, ChartType::Bar);
        assert_eq!(data.mode, ValueMode::Percent);
        assert_eq!(data.values, ChartValues::Flat(vec![10.0, 25.0, 18.0]));
        assert_eq!(data.series_count(), 1);
    }

    #[test]
    fn test_mode_defaults_to_raw() {
        let data = parse(r#"{"type":"line","values":[[1,2],[3,4]]}"#);
        assert_eq!(data.mode, ValueMode::Raw);
        assert_eq!(data.series_count(), 2);
    }

    #[test]
    fn test_stacked_reserves_header_row() {
        let data = parse(r#"{"type":"stackedBar","values":[[0,0],[1,2],[3,4],[5,6]]}"#);
        assert_eq!(data.row_count(), 4);
        assert_eq!(data.series_count(), 3);
        assert_eq!(data.data_rows().len(), 3);

        assert_eq!(required_mark_count(ChartType::StackedBar, 1), 1);
        assert_eq!(required_mark_count(ChartType::Bar, 0), 1);
    }

    #[test]
    fn test_validate_rejects_empty() {
        let data = parse(r#"{"type":"bar","values":[]}"#);
        assert_eq!(data.validate(), Err(ChartError::EmptyValues));

        let data = parse(r#"{"type":"stackedBar","values":[[1,2]]}"#);
        assert_eq!(data.validate(), Err(ChartError::MissingDataRows));
    }

    #[test]
    fn test_padding_shorthand() {
        let spec = PaddingSpec {
            h: Some(8.0),
            left: Some(2.0),
            top: Some(-4.0),
            ..PaddingSpec::default()
        };
        let padding = spec.resolve();
        assert_eq!(padding.left, Some(2.0));
        assert_eq!(padding.right, Some(8.0));
        assert_eq!(padding.top, Some(0.0));
        assert_eq!(padding.bottom, None);
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let err = serde_json::from_str::<ChartData>(r#"{"type":"pie","values":[1]}"#);
        assert!(err.is_err());
    }
}
