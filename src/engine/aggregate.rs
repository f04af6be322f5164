use crate::engine::types::{AggregatedCell, FactorCount};
use crate::engine::utility::mean_present;
use crate::record::CrashRecord;
use std::collections::HashMap;

/// How many factors each cell reports.
pub const TOP_FACTOR_LIMIT: usize = 3;

/// Groups records by their rounded coordinate and computes per-cell
/// statistics.
///
/// One cell is produced per distinct `(latitude, longitude)` pair in
/// `records`; cells come back sorted by latitude, then longitude.
pub fn aggregate_cells(records: &[&CrashRecord]) -> Vec<AggregatedCell> {
    let mut slots: HashMap<(u64, u64), usize> = HashMap::new();
    let mut groups: Vec<Vec<&CrashRecord>> = Vec::new();

    for &record in records {
        let key = (
            signless(record.latitude).to_bits(),
            signless(record.longitude).to_bits(),
        );
        let slot = *slots.entry(key).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(record);
    }

    let mut cells: Vec<AggregatedCell> = groups.iter().map(|g| aggregate_group(g)).collect();

    cells.sort_by(|a, b| {
        a.latitude
            .total_cmp(&b.latitude)
            .then(a.longitude.total_cmp(&b.longitude))
    });

    cells
}

/// Folds `-0.0` into `0.0` so both land in the same cell.
fn signless(coordinate: f64) -> f64 {
    coordinate + 0.0
}

fn aggregate_group(group: &[&CrashRecord]) -> AggregatedCell {
    let first = group[0];

    let avg_impact = mean_present(group.iter().map(|r| r.normalized_impact));
    let avg_total_duration =
        mean_present(group.iter().map(|r| r.total_duration)).map(|seconds| seconds / 60.0);

    // Every record's factors, duplicates across records kept.
    let occurrences = group
        .iter()
        .flat_map(|r| r.contributing_factors.iter().map(String::as_str));

    AggregatedCell {
        latitude: signless(first.latitude),
        longitude: signless(first.longitude),
        total_crashes: group.len(),
        avg_impact,
        avg_total_duration,
        top_factors: top_factors(occurrences, TOP_FACTOR_LIMIT),
    }
}

/// Counts occurrences and returns the `limit` most frequent labels.
/// Equal counts keep first-seen order.
pub fn top_factors<'a, I>(occurrences: I, limit: usize) -> Vec<FactorCount>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: Vec<FactorCount> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for factor in occurrences {
        match index.get(factor) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(factor, counts.len());
                counts.push(FactorCount {
                    factor: factor.to_string(),
                    count: 1,
                });
            }
        }
    }

    // stable
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(limit);
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::record_at;

    fn fc(factor: &str, count: usize) -> FactorCount {
        FactorCount {
            factor: factor.to_string(),
            count,
        }
    }

    #[test]
    fn test_empty_input_yields_no_cells() {
        assert!(aggregate_cells(&[]).is_empty());
    }

    #[test]
    fn test_groups_by_coordinate() {
        let records = vec![
            record_at(29.7604, -95.3698, &["DRIVER INATTENTION"]),
            record_at(29.7000, -95.4000, &["NONE"]),
            record_at(29.7604, -95.3698, &["NONE"]),
        ];
        let refs: Vec<&CrashRecord> = records.iter().collect();
        let cells = aggregate_cells(&refs);

        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].latitude, 29.7000);
        assert_eq!(cells[0].total_crashes, 1);
        assert_eq!(cells[1].latitude, 29.7604);
        assert_eq!(cells[1].total_crashes, 2);
        assert_eq!(
            cells.iter().map(|c| c.total_crashes).sum::<usize>(),
            records.len()
        );
    }

    #[test]
    fn test_negative_zero_shares_a_cell() {
        let records = vec![
            record_at(0.0, -0.0, &["NONE"]),
            record_at(-0.0, 0.0, &["NONE"]),
        ];
        let refs: Vec<&CrashRecord> = records.iter().collect();
        let cells = aggregate_cells(&refs);

        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].total_crashes, 2);
        assert!(cells[0].latitude.is_sign_positive());
        assert!(cells[0].longitude.is_sign_positive());
    }

    #[test]
    fn test_averages() {
        let mut a = record_at(1.0, 2.0, &[]);
        a.normalized_impact = Some(10.0);
        a.total_duration = Some(600.0);
        let mut b = record_at(1.0, 2.0, &[]);
        b.normalized_impact = Some(20.0);
        b.total_duration = Some(1200.0);
        let mut c = record_at(1.0, 2.0, &[]);
        c.normalized_impact = None;
        c.total_duration = None;

        let records = [&a, &b, &c];
        let cells = aggregate_cells(&records);

        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].total_crashes, 3);
        assert_eq!(cells[0].avg_impact, Some(15.0));
        assert_eq!(cells[0].avg_total_duration, Some(15.0));
    }

    #[test]
    fn test_missing_metrics_average_to_none() {
        let a = record_at(1.0, 2.0, &[]);
        let cells = aggregate_cells(&[&a]);
        assert_eq!(cells[0].avg_impact, None);
        assert_eq!(cells[0].avg_total_duration, None);
        assert!(cells[0].top_factors.is_empty());
    }

    #[test]
    fn test_top_factors_counts_across_records() {
        let a = record_at(1.0, 2.0, &["A", "B"]);
        let b = record_at(1.0, 2.0, &["B", "C"]);
        let c = record_at(1.0, 2.0, &["B", "D", "C"]);
        let cells = aggregate_cells(&[&a, &b, &c]);

        assert_eq!(
            cells[0].top_factors,
            vec![fc("B", 3), fc("C", 2), fc("A", 1)]
        );
    }

    #[test]
    fn test_top_factor_ties_keep_first_seen_order() {
        let top = top_factors(["X", "Y", "Z", "W", "Z", "Y"], 3);
        assert_eq!(top, vec![fc("Y", 2), fc("Z", 2), fc("X", 1)]);
    }

    #[test]
    fn test_top_factors_bounded_by_distinct_count() {
        assert_eq!(top_factors(["A", "A"], 3), vec![fc("A", 2)]);
        assert!(top_factors(std::iter::empty(), 3).is_empty());
        assert!(top_factors(["A", "B", "C", "D", "E"], 3).len() <= 3);
    }
}
