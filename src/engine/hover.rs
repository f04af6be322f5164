//! Hover summaries shown when pointing at a heatmap marker.

use crate::engine::metric::Metric;
use crate::engine::types::AggregatedCell;

/// Line separator understood by the map renderer.
pub const LINE_BREAK: &str = "<br>";

/// English ordinal for a 1-based rank.
///
/// Only ranks 1–3 get `st`/`nd`/`rd`; anything else is `th`. Cells never
/// carry more than three factors, so the simplification is never visible.
pub fn ordinal(rank: usize) -> String {
    let suffix = match rank {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    };
    format!("{rank}{suffix}")
}

fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "nan".to_string(),
    }
}

/// Renders the multi-line summary for one cell.
///
/// ```text
/// Total Crashes: 5<br>Average Impact: 12.34<br>1st Factor: DRIVER INATTENTION (5 instances)
/// ```
pub fn render_hover_text(cell: &AggregatedCell, metric: Metric) -> String {
    let factor_lines: Vec<String> = cell
        .top_factors
        .iter()
        .enumerate()
        .map(|(idx, fc)| {
            format!(
                "{} Factor: {} ({} instances)",
                ordinal(idx + 1),
                fc.factor,
                fc.count
            )
        })
        .collect();

    format!(
        "Total Crashes: {}{LINE_BREAK}{}: {}{LINE_BREAK}{}",
        cell.total_crashes,
        metric.hover_label(),
        format_value(metric.value(cell)),
        factor_lines.join(LINE_BREAK)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::FactorCount;

    fn cell(top_factors: Vec<FactorCount>) -> AggregatedCell {
        AggregatedCell {
            latitude: 29.7604,
            longitude: -95.3698,
            total_crashes: 5,
            avg_impact: Some(12.34),
            avg_total_duration: Some(7.4571),
            top_factors,
        }
    }

    fn fc(factor: &str, count: usize) -> FactorCount {
        FactorCount {
            factor: factor.to_string(),
            count,
        }
    }

    #[test]
    fn test_ordinals() {
        assert_eq!(ordinal(1), "1st");
        assert_eq!(ordinal(2), "2nd");
        assert_eq!(ordinal(3), "3rd");
        assert_eq!(ordinal(4), "4th");
        assert_eq!(ordinal(11), "11th");
    }

    #[test]
    fn test_single_factor_impact_hover() {
        let c = cell(vec![fc("DRIVER INATTENTION", 5)]);
        assert_eq!(
            render_hover_text(&c, Metric::AvgImpact),
            "Total Crashes: 5<br>Average Impact: 12.34<br>1st Factor: DRIVER INATTENTION (5 instances)"
        );
    }

    #[test]
    fn test_three_factor_duration_hover() {
        let c = cell(vec![fc("A", 3), fc("B", 2), fc("C", 1)]);
        assert_eq!(
            render_hover_text(&c, Metric::AvgTotalDuration),
            "Total Crashes: 5<br>Average Total Duration: 7.46<br>\
             1st Factor: A (3 instances)<br>2nd Factor: B (2 instances)<br>3rd Factor: C (1 instances)"
        );
    }

    #[test]
    fn test_missing_value_and_no_factors() {
        let mut c = cell(vec![]);
        c.avg_impact = None;
        assert_eq!(
            render_hover_text(&c, Metric::AvgImpact),
            "Total Crashes: 5<br>Average Impact: nan<br>"
        );
    }
}
