//! Heat metric selection and the color breakpoint tables.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::engine::types::{AggregatedCell, ColorStop};

static IMPACT_SCALE: &[(f64, &str)] = &[
    (0.0, "green"),
    (0.05, "lime"),
    (0.10, "orange"),
    (0.15, "red"),
    (1.0, "red"),
];

static DURATION_SCALE: &[(f64, &str)] = &[
    (0.0, "green"),
    (0.0175, "lime"),
    (0.035, "orange"),
    (0.05, "orange"),
    (0.06, "red"),
    (1.0, "red"),
];

/// Which aggregated value drives marker color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    #[default]
    AvgImpact,
    AvgTotalDuration,
}

impl Metric {
    /// Name of the cell field used for color.
    pub fn color_field(self) -> &'static str {
        match self {
            Metric::AvgImpact => "avg_impact",
            Metric::AvgTotalDuration => "avg_total_duration",
        }
    }

    pub fn hover_label(self) -> &'static str {
        match self {
            Metric::AvgImpact => "Average Impact",
            Metric::AvgTotalDuration => "Average Total Duration",
        }
    }

    /// Ordered (position in [0, 1], color name) breakpoints.
    pub fn color_scale(self) -> Vec<ColorStop> {
        let table = match self {
            Metric::AvgImpact => IMPACT_SCALE,
            Metric::AvgTotalDuration => DURATION_SCALE,
        };
        table
            .iter()
            .map(|&(position, color)| ColorStop {
                position,
                color: color.to_string(),
            })
            .collect()
    }

    pub fn value(self, cell: &AggregatedCell) -> Option<f64> {
        match self {
            Metric::AvgImpact => cell.avg_impact,
            Metric::AvgTotalDuration => cell.avg_total_duration,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.color_field())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "avg_impact" => Ok(Metric::AvgImpact),
            "avg_total_duration" => Ok(Metric::AvgTotalDuration),
            other => Err(format!(
                "unknown metric '{other}' (expected avg_impact or avg_total_duration)"
            )),
        }
    }
}
