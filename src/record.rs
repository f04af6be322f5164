//! Crash record types: the raw CSV row and the cleaned record the engine reads.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single row deserialized from the collision CSV.
///
/// Only the columns the dashboard uses are mapped; every other column in
/// the file is ignored. Empty cells become `None`.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RawCrashRow {
    #[serde(rename = "Latitude", default, deserialize_with = "csv::invalid_option")]
    pub latitude: Option<f64>,
    #[serde(rename = "Longitude", default, deserialize_with = "csv::invalid_option")]
    pub longitude: Option<f64>,
    #[serde(rename = "Crash Severity", default)]
    pub crash_severity: Option<String>,
    #[serde(rename = "Contributing Factors", default)]
    pub contributing_factors: Option<String>,
    #[serde(
        rename = "bottleneck_values",
        default,
        deserialize_with = "csv::invalid_option"
    )]
    pub bottleneck_value: Option<f64>,
    #[serde(
        rename = "total_duration",
        default,
        deserialize_with = "csv::invalid_option"
    )]
    pub total_duration: Option<f64>,
    #[serde(rename = "Crash Month", default, deserialize_with = "csv::invalid_option")]
    pub month: Option<u32>,
    #[serde(rename = "Day of Week", default)]
    pub day_of_week: Option<String>,
    #[serde(rename = "Hour of Day", default, deserialize_with = "csv::invalid_option")]
    pub hour_of_day: Option<u32>,
    #[serde(rename = "First Harmful Event", default)]
    pub first_harmful_event: Option<String>,
    #[serde(rename = "Light Condition", default)]
    pub light_condition: Option<String>,
    #[serde(rename = "Weather Condition", default)]
    pub weather_condition: Option<String>,
    #[serde(rename = "Surface Condition", default)]
    pub surface_condition: Option<String>,
}

/// Reported crash severity, using the KABCO labels found in the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    #[serde(rename = "N - NOT INJURED")]
    NotInjured,
    #[serde(rename = "C - POSSIBLE INJURY")]
    PossibleInjury,
    #[serde(rename = "B - SUSPECTED MINOR INJURY")]
    MinorInjury,
    #[serde(rename = "A - SUSPECTED SERIOUS INJURY")]
    SeriousInjury,
    #[serde(rename = "K - FATAL INJURY")]
    Fatal,
    #[serde(rename = "99 - UNKNOWN")]
    Unknown,
}

impl Severity {
    pub const ALL: [Severity; 6] = [
        Severity::NotInjured,
        Severity::PossibleInjury,
        Severity::MinorInjury,
        Severity::SeriousInjury,
        Severity::Fatal,
        Severity::Unknown,
    ];

    /// The label as it appears in the source data.
    pub fn label(self) -> &'static str {
        match self {
            Severity::NotInjured => "N - NOT INJURED",
            Severity::PossibleInjury => "C - POSSIBLE INJURY",
            Severity::MinorInjury => "B - SUSPECTED MINOR INJURY",
            Severity::SeriousInjury => "A - SUSPECTED SERIOUS INJURY",
            Severity::Fatal => "K - FATAL INJURY",
            Severity::Unknown => "99 - UNKNOWN",
        }
    }

    /// Ordinal score: 0 (not injured / unknown) through 4 (fatal).
    pub fn score(self) -> u8 {
        match self {
            Severity::NotInjured | Severity::Unknown => 0,
            Severity::PossibleInjury => 1,
            Severity::MinorInjury => 2,
            Severity::SeriousInjury => 3,
            Severity::Fatal => 4,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Severity::ALL
            .into_iter()
            .find(|sev| sev.label() == trimmed)
            .ok_or_else(|| format!("unknown crash severity '{trimmed}'"))
    }
}

/// A cleaned collision report. Built once at load time and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrashRecord {
    /// Rounded to 4 decimal places.
    pub latitude: f64,
    /// Rounded to 4 decimal places.
    pub longitude: f64,
    pub severity: Option<Severity>,
    pub severity_score: Option<u8>,
    /// Normalized, deduplicated factor labels in first-seen order.
    pub contributing_factors: Vec<String>,
    pub bottleneck_value: Option<f64>,
    /// `bottleneck_value` min-max scaled to [0, 100].
    pub normalized_impact: Option<f64>,
    /// Percentile rank of `normalized_impact`, 0-100. Not used by any view yet.
    pub impact_percentile_rank: Option<f64>,
    /// Seconds.
    pub total_duration: Option<f64>,
    pub month: Option<u32>,
    pub day_of_week: Option<String>,
    pub hour_of_day: Option<u32>,
    pub first_harmful_event: Option<String>,
    pub light_condition: Option<String>,
    pub weather_condition: Option<String>,
    pub surface_condition: Option<String>,
}
