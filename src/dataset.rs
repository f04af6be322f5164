//! The immutable, cleaned crash dataset.
//!
//! Built once from raw CSV rows at startup and then only read. Queries
//! borrow it; nothing ever mutates a loaded [`Dataset`].

use tracing::{debug, info};

use crate::engine::factors::{normalize_factors, parse_factor_list};
use crate::engine::utility::{mean, round_to};
use crate::record::{CrashRecord, RawCrashRow, Severity};

/// Decimal places kept on coordinates; crashes closer than this share a cell.
pub const COORDINATE_PRECISION: i32 = 4;

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<CrashRecord>,
    dropped_rows: usize,
}

impl Dataset {
    /// Cleans raw rows into a dataset.
    ///
    /// Rows missing either coordinate are dropped. Impact scaling is
    /// computed over the retained rows only.
    pub fn from_rows(rows: Vec<RawCrashRow>) -> Self {
        let total = rows.len();

        let mut records: Vec<CrashRecord> = rows.into_iter().filter_map(clean_row).collect();
        let dropped_rows = total - records.len();

        assign_normalized_impact(&mut records);
        assign_percentile_rank(&mut records);

        for record in &mut records {
            record.latitude = round_to(record.latitude, COORDINATE_PRECISION);
            record.longitude = round_to(record.longitude, COORDINATE_PRECISION);
        }

        info!(
            retained = records.len(),
            dropped = dropped_rows,
            "Dataset built"
        );

        Self {
            records,
            dropped_rows,
        }
    }

    pub fn records(&self) -> &[CrashRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows discarded at load time for lacking coordinates.
    pub fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }

    /// Mean latitude and longitude of every record, `(0, 0)` when empty.
    pub fn center(&self) -> (f64, f64) {
        let lats: Vec<f64> = self.records.iter().map(|r| r.latitude).collect();
        let lons: Vec<f64> = self.records.iter().map(|r| r.longitude).collect();
        (mean(&lats), mean(&lons))
    }

    /// Smallest and largest raw bottleneck value, if any record has one.
    pub fn bottleneck_range(&self) -> Option<(f64, f64)> {
        bottleneck_bounds(&self.records)
    }
}

/// `NaN` cells count as missing, the same as empty ones.
fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| !v.is_nan())
}

fn clean_row(row: RawCrashRow) -> Option<CrashRecord> {
    let (Some(latitude), Some(longitude)) = (present(row.latitude), present(row.longitude)) else {
        debug!("Dropping row without coordinates");
        return None;
    };

    let raw_factors = row
        .contributing_factors
        .as_deref()
        .map(parse_factor_list)
        .unwrap_or_default();

    let severity = row
        .crash_severity
        .as_deref()
        .and_then(|label| label.parse::<Severity>().ok());

    Some(CrashRecord {
        latitude,
        longitude,
        severity,
        severity_score: severity.map(Severity::score),
        contributing_factors: normalize_factors(&raw_factors),
        bottleneck_value: present(row.bottleneck_value),
        normalized_impact: None,
        impact_percentile_rank: None,
        total_duration: present(row.total_duration),
        month: row.month,
        day_of_week: row.day_of_week,
        hour_of_day: row.hour_of_day,
        first_harmful_event: row.first_harmful_event,
        light_condition: row.light_condition,
        weather_condition: row.weather_condition,
        surface_condition: row.surface_condition,
    })
}

fn bottleneck_bounds(records: &[CrashRecord]) -> Option<(f64, f64)> {
    records
        .iter()
        .filter_map(|r| r.bottleneck_value)
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Min-max scales `bottleneck_value` into [0, 100]. A constant column
/// scales to 0 everywhere.
fn assign_normalized_impact(records: &mut [CrashRecord]) {
    let Some((min, max)) = bottleneck_bounds(records) else {
        return;
    };
    let span = max - min;

    for record in records.iter_mut() {
        record.normalized_impact = record.bottleneck_value.map(|v| {
            if span == 0.0 {
                0.0
            } else {
                ((v - min) / span * 100.0).clamp(0.0, 100.0)
            }
        });
    }
}

/// Percentile rank of `normalized_impact` (ties share their average rank),
/// scaled to 0-100. Records without an impact get no rank.
fn assign_percentile_rank(records: &mut [CrashRecord]) {
    let mut ranked: Vec<(usize, f64)> = records
        .iter()
        .enumerate()
        .filter_map(|(i, r)| r.normalized_impact.map(|v| (i, v)))
        .collect();

    let n = ranked.len();
    if n == 0 {
        return;
    }

    ranked.sort_by(|a, b| a.1.total_cmp(&b.1));

    let mut start = 0;
    while start < n {
        let mut end = start;
        while end + 1 < n && ranked[end + 1].1 == ranked[start].1 {
            end += 1;
        }

        // 1-based positions start+1 ..= end+1
        let avg_rank = (start + end + 2) as f64 / 2.0;
        let pct = avg_rank / n as f64 * 100.0;
        for &(i, _) in &ranked[start..=end] {
            records[i].impact_percentile_rank = Some(pct);
        }

        start = end + 1;
    }
}
