//! Crash filtering and per-location aggregation.
//!
//! [`run_query`] is the whole engine as one pure function: it filters the
//! dataset by the current selections, groups survivors by coordinate,
//! renders hover summaries and attaches the color scale for the chosen
//! metric. It reads the dataset and never modifies it.

pub mod aggregate;
pub mod factors;
pub mod filter;
pub mod hover;
pub mod metric;
pub mod options;
pub mod types;
pub mod utility;

use tracing::debug;

use crate::dataset::Dataset;
use crate::engine::aggregate::aggregate_cells;
use crate::engine::filter::{FilterSelection, filter_records};
use crate::engine::hover::render_hover_text;
use crate::engine::metric::Metric;
use crate::engine::types::{HeatmapCell, HeatmapResult, MapView};

pub fn run_query(dataset: &Dataset, selection: &FilterSelection, metric: Metric) -> HeatmapResult {
    let matched = filter_records(dataset.records(), selection);
    let cells = aggregate_cells(&matched);

    debug!(
        active_filters = selection.active_count(),
        matched = matched.len(),
        cells = cells.len(),
        metric = %metric,
        "Query evaluated"
    );

    let (center_latitude, center_longitude) = dataset.center();

    HeatmapResult {
        generated_at: None,
        metric,
        color_field: metric.color_field().to_string(),
        hover_label: metric.hover_label().to_string(),
        color_scale: metric.color_scale(),
        view: MapView::centered_on(center_latitude, center_longitude),
        matched_records: matched.len(),
        cells: cells
            .into_iter()
            .map(|cell| HeatmapCell {
                hover_text: render_hover_text(&cell, metric),
                cell,
            })
            .collect(),
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::filter::Selection;
    use crate::record::{RawCrashRow, Severity};

    fn raw(lat: f64, lon: f64, factors: &str, bottleneck: f64) -> RawCrashRow {
        RawCrashRow {
            latitude: Some(lat),
            longitude: Some(lon),
            crash_severity: Some("N - NOT INJURED".into()),
            contributing_factors: Some(factors.into()),
            bottleneck_value: Some(bottleneck),
            total_duration: Some(1800.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_speed_factors_merge_into_one_cell() {
        let ds = Dataset::from_rows(vec![
            raw(29.7604, -95.3698, "UNSAFE SPEED", 0.0),
            raw(29.7604, -95.3698, "FAILED TO CONTROL SPEED", 5.0),
            raw(29.7604, -95.3698, "DRIVER INATTENTION", 10.0),
        ]);
        let result = run_query(&ds, &FilterSelection::default(), Metric::AvgImpact);

        assert_eq!(result.cells.len(), 1);
        let cell = &result.cells[0].cell;
        assert_eq!(cell.total_crashes, 3);
        assert_eq!(cell.avg_impact, Some(50.0));
        assert_eq!(cell.avg_total_duration, Some(30.0));
        assert_eq!(cell.top_factors[0].factor, "FAILED TO CONTROL SPEED");
        assert_eq!(cell.top_factors[0].count, 2);
        assert_eq!(cell.top_factors[1].factor, "DRIVER INATTENTION");
        assert_eq!(cell.top_factors[1].count, 1);
        assert_eq!(
            result.cells[0].hover_text,
            "Total Crashes: 3<br>Average Impact: 50.00<br>\
             1st Factor: FAILED TO CONTROL SPEED (2 instances)<br>\
             2nd Factor: DRIVER INATTENTION (1 instances)"
        );
    }

    #[test]
    fn test_unmatched_severity_yields_no_cells() {
        let ds = Dataset::from_rows(vec![raw(29.7604, -95.3698, "NONE", 1.0)]);
        let selection = FilterSelection {
            severity: Selection::Only(Severity::Fatal),
            ..Default::default()
        };
        let result = run_query(&ds, &selection, Metric::AvgImpact);
        assert!(result.cells.is_empty());
        assert_eq!(result.matched_records, 0);
    }

    #[test]
    fn test_query_does_not_modify_dataset() {
        let ds = Dataset::from_rows(vec![
            raw(29.7604, -95.3698, "NONE", 1.0),
            raw(29.7000, -95.4000, "DRIVER INATTENTION", 2.0),
        ]);
        let before = ds.records().to_vec();
        let selection = FilterSelection {
            factor: Selection::Only("NONE".into()),
            ..Default::default()
        };
        let _ = run_query(&ds, &selection, Metric::AvgTotalDuration);
        assert_eq!(ds.records(), before.as_slice());
    }

    #[test]
    fn test_repeated_queries_are_identical() {
        let ds = Dataset::from_rows(vec![
            raw(29.7604, -95.3698, "NONE", 1.0),
            raw(29.7000, -95.4000, "DRIVER INATTENTION", 2.0),
        ]);
        let first = run_query(&ds, &FilterSelection::default(), Metric::AvgImpact);
        let second = run_query(&ds, &FilterSelection::default(), Metric::AvgImpact);

        assert_eq!(first, second);
        assert_eq!(first.generated_at, None);

        let at = chrono::DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let stamped = second.stamped(at);
        assert_eq!(stamped.generated_at, Some(at));
        assert_eq!(stamped.cells, first.cells);
    }

    #[test]
    fn test_result_carries_metric_presentation() {
        let ds = Dataset::from_rows(vec![raw(29.7604, -95.3698, "NONE", 1.0)]);
        let result = run_query(&ds, &FilterSelection::default(), Metric::AvgTotalDuration);
        assert_eq!(result.color_field, "avg_total_duration");
        assert_eq!(result.hover_label, "Average Total Duration");
        assert_eq!(result.color_scale.len(), 6);
        assert_eq!(result.view.zoom, 11);
        assert_eq!(result.view.center_latitude, 29.7604);
    }
}
