//! Value-to-placement layout.
//!
//! Bars are drawn by padding: a frame of height `H` whose content sits at the
//! bottom gets `padding_top = H * (1 - ratio)`. Stacked segments get an
//! explicit height of `H * ratio` inside their column frame.

use super::{ChartData, ChartValues, Padding};
use crate::style::{ChartType, ValueMode};

/// How a target node is moved to represent its value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// Push content down: `padding_top = H * (1 - ratio)`.
    PaddingTop { ratio: f64 },
    /// Size the node: `height = H * ratio`, with `H` the enclosing column.
    Height { ratio: f64 },
}

impl Placement {
    pub fn ratio(&self) -> f64 {
        match *self {
            Placement::PaddingTop { ratio } | Placement::Height { ratio } => ratio,
        }
    }
}

/// One named node and where its value puts it.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutTarget {
    pub name: String,
    /// 1-based column.
    pub column: usize,
    /// 1-based series, when the chart has more than one.
    pub series: Option<usize>,
    pub placement: Placement,
}

/// Min, max, and average of the plotted values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssistMetrics {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

impl AssistMetrics {
    /// Metrics of the finite values in `values`, or `None` if there are none.
    pub fn of(values: &[f64]) -> Option<Self> {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() {
            return None;
        }
        let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
        let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let avg = finite.iter().sum::<f64>() / finite.len() as f64;
        Some(AssistMetrics { min, max, avg })
    }
}

/// Ratio of the plot height a value fills.
///
/// Percent values are fractions of 100; raw values are fractions of `scale`.
/// Non-finite and negative values fill nothing.
pub fn ratio_for(value: f64, mode: ValueMode, scale: f64) -> f64 {
    if !value.is_finite() || value <= 0.0 {
        return 0.0;
    }
    match mode {
        ValueMode::Percent => (value / 100.0).clamp(0.0, 1.0),
        ValueMode::Raw if scale > 0.0 && scale.is_finite() => (value / scale).clamp(0.0, 1.0),
        ValueMode::Raw => 0.0,
    }
}

/// The full placement plan for one chart document.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    pub targets: Vec<LayoutTarget>,
    pub assist_targets: Vec<LayoutTarget>,
    pub metrics: Option<AssistMetrics>,
    pub padding: Padding,
}

fn positive(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

impl ChartLayout {
    /// Compute the layout. Callers validate the document first.
    pub fn compute(data: &ChartData) -> Self {
        let prefix = data.chart_type.target_prefix();
        let rows = data.data_rows();

        // Values the chart actually plots against the scale.
        let plotted: Vec<f64> = if data.chart_type == ChartType::StackedBar
            && matches!(data.values, ChartValues::Nested(_))
        {
            let columns = rows.iter().map(|row| row.len()).max().unwrap_or(0);
            (0..columns)
                .map(|c| {
                    rows.iter()
                        .filter_map(|row| row.get(c))
                        .copied()
                        .map(positive)
                        .sum::<f64>()
                })
                .collect()
        } else {
            rows.iter().flat_map(|row| row.iter().copied()).collect()
        };

        let scale = plotted
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(0.0_f64, f64::max);
        let ratio = |value: f64| ratio_for(value, data.mode, scale);

        let mut targets = Vec::new();
        match (&data.values, data.chart_type) {
            (ChartValues::Flat(values), _) => {
                for (c, &value) in values.iter().enumerate() {
                    targets.push(LayoutTarget {
                        name: format!("{prefix}_{}", c + 1),
                        column: c + 1,
                        series: None,
                        placement: Placement::PaddingTop { ratio: ratio(value) },
                    });
                }
            }
            (ChartValues::Nested(_), ChartType::StackedBar) => {
                for (c, &total) in plotted.iter().enumerate() {
                    targets.push(LayoutTarget {
                        name: format!("{prefix}_{}", c + 1),
                        column: c + 1,
                        series: None,
                        placement: Placement::PaddingTop { ratio: ratio(total) },
                    });
                    for (s, row) in rows.iter().enumerate() {
                        let Some(&segment) = row.get(c) else { continue };
                        targets.push(LayoutTarget {
                            name: format!("{prefix}_{}_{}", c + 1, s + 1),
                            column: c + 1,
                            series: Some(s + 1),
                            placement: Placement::Height {
                                ratio: ratio(segment),
                            },
                        });
                    }
                }
            }
            (ChartValues::Nested(_), _) => {
                for (s, row) in rows.iter().enumerate() {
                    for (c, &value) in row.iter().enumerate() {
                        targets.push(LayoutTarget {
                            name: format!("{prefix}_{}_{}", c + 1, s + 1),
                            column: c + 1,
                            series: Some(s + 1),
                            placement: Placement::PaddingTop { ratio: ratio(value) },
                        });
                    }
                }
            }
        }

        let metrics = AssistMetrics::of(&plotted);
        let assist_targets = metrics
            .map(|m| {
                [("min", m.min), ("max", m.max), ("avg", m.avg)]
                    .into_iter()
                    .map(|(key, value)| LayoutTarget {
                        name: format!("assist_{key}"),
                        column: 0,
                        series: None,
                        placement: Placement::PaddingTop {
                            ratio: ratio(value),
                        },
                    })
                    .collect()
            })
            .unwrap_or_default();

        ChartLayout {
            targets,
            assist_targets,
            metrics,
            padding: data.padding.map(|p| p.resolve()).unwrap_or_default(),
        }
    }

    /// Look up a value or assist target by node name.
    pub fn target(&self, name: &str) -> Option<&LayoutTarget> {
        self.targets
            .iter()
            .chain(self.assist_targets.iter())
            .find(|t| t.name == name)
    }

    /// Number of targets the applicator is expected to place.
    pub fn target_count(&self) -> usize {
        self.targets.len() + self.assist_targets.len()
    }
}
