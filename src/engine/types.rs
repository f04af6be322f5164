//! Data types produced by the query engine.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::engine::metric::Metric;

/// One factor label and how many times it occurs within a cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FactorCount {
    pub factor: String,
    pub count: usize,
}

/// Aggregate statistics for every crash sharing one rounded coordinate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedCell {
    pub latitude: f64,
    pub longitude: f64,
    pub total_crashes: usize,
    /// Mean `normalized_impact`; `None` if no crash in the cell has one.
    pub avg_impact: Option<f64>,
    /// Mean duration in minutes.
    pub avg_total_duration: Option<f64>,
    /// At most three entries, most frequent first.
    pub top_factors: Vec<FactorCount>,
}

/// An [`AggregatedCell`] together with its rendered hover summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapCell {
    #[serde(flatten)]
    pub cell: AggregatedCell,
    pub hover_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorStop {
    pub position: f64,
    pub color: String,
}

/// Map camera and marker styling for the rendered heatmap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub center_latitude: f64,
    pub center_longitude: f64,
    pub zoom: u8,
    pub style: String,
    pub opacity: f64,
    pub height: u32,
}

impl MapView {
    pub fn centered_on(center_latitude: f64, center_longitude: f64) -> Self {
        Self {
            center_latitude,
            center_longitude,
            zoom: 11,
            style: "carto-positron".to_string(),
            opacity: 0.8,
            height: 1000,
        }
    }
}

/// Everything the map view needs to draw one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapResult {
    /// Set by the caller through [`HeatmapResult::stamped`]; queries leave it empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
    pub metric: Metric,
    pub color_field: String,
    pub hover_label: String,
    pub color_scale: Vec<ColorStop>,
    pub view: MapView,
    pub matched_records: usize,
    /// Sorted by latitude, then longitude.
    pub cells: Vec<HeatmapCell>,
}

impl HeatmapResult {
    pub fn stamped(mut self, at: DateTime<Utc>) -> Self {
        self.generated_at = Some(at);
        self
    }
}
