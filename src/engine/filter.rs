//! Conjunctive record filtering driven by the dashboard selections.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::engine::options::{
    DAY_OF_WEEK_OPTIONS, FACTOR_OPTIONS, FIRST_HARMFUL_EVENT_OPTIONS, FilterOption,
    LIGHT_CONDITION_OPTIONS, SURFACE_CONDITION_OPTIONS, WEATHER_CONDITION_OPTIONS, find_value,
};
use crate::record::{CrashRecord, Severity};

const ALL: &str = "All";

/// A single filter: either unconstrained or pinned to one value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Selection<T> {
    All,
    Only(T),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Selection::All
    }
}

impl<T: PartialEq> Selection<T> {
    /// `All` matches anything; `Only(v)` matches a present value equal to `v`.
    pub fn matches(&self, value: Option<&T>) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(wanted) => value == Some(wanted),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }
}

impl<T: fmt::Display> fmt::Display for Selection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => f.write_str(ALL),
            Selection::Only(v) => write!(f, "{v}"),
        }
    }
}

impl<T: FromStr> FromStr for Selection<T> {
    type Err = T::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == ALL {
            Ok(Selection::All)
        } else {
            s.parse().map(Selection::Only)
        }
    }
}

/// Parses `All` or a value from a fixed vocabulary.
pub fn parse_choice(s: &str, options: &[FilterOption]) -> Result<Selection<String>, String> {
    if s == ALL {
        return Ok(Selection::All);
    }
    find_value(options, s)
        .map(|v| Selection::Only(v.to_string()))
        .ok_or_else(|| {
            let allowed: Vec<&str> = options.iter().map(|o| o.value).collect();
            format!("'{s}' is not one of: All, {}", allowed.join(", "))
        })
}

fn parse_bounded(s: &str, name: &str, min: u32, max: u32) -> Result<Selection<u32>, String> {
    let selection: Selection<u32> = s
        .parse()
        .map_err(|_| format!("{name} must be All or a number from {min} to {max}"))?;
    match selection {
        Selection::Only(v) if !(min..=max).contains(&v) => {
            Err(format!("{name} must be All or a number from {min} to {max}"))
        }
        other => Ok(other),
    }
}

pub fn parse_factor(s: &str) -> Result<Selection<String>, String> {
    parse_choice(s, FACTOR_OPTIONS)
}

pub fn parse_month(s: &str) -> Result<Selection<u32>, String> {
    parse_bounded(s, "month", 1, 12)
}

pub fn parse_day_of_week(s: &str) -> Result<Selection<String>, String> {
    parse_choice(s, DAY_OF_WEEK_OPTIONS)
}

pub fn parse_hour_of_day(s: &str) -> Result<Selection<u32>, String> {
    parse_bounded(s, "hour of day", 0, 23)
}

pub fn parse_severity(s: &str) -> Result<Selection<Severity>, String> {
    s.parse()
}

pub fn parse_first_harmful_event(s: &str) -> Result<Selection<String>, String> {
    parse_choice(s, FIRST_HARMFUL_EVENT_OPTIONS)
}

pub fn parse_light_condition(s: &str) -> Result<Selection<String>, String> {
    parse_choice(s, LIGHT_CONDITION_OPTIONS)
}

pub fn parse_weather_condition(s: &str) -> Result<Selection<String>, String> {
    parse_choice(s, WEATHER_CONDITION_OPTIONS)
}

pub fn parse_surface_condition(s: &str) -> Result<Selection<String>, String> {
    parse_choice(s, SURFACE_CONDITION_OPTIONS)
}

/// The current state of every dashboard filter. `Default` is "everything".
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterSelection {
    /// Matches when the label is in the record's factor set.
    pub factor: Selection<String>,
    pub month: Selection<u32>,
    pub day_of_week: Selection<String>,
    pub hour_of_day: Selection<u32>,
    pub severity: Selection<Severity>,
    pub first_harmful_event: Selection<String>,
    pub light_condition: Selection<String>,
    pub weather_condition: Selection<String>,
    pub surface_condition: Selection<String>,
}

impl FilterSelection {
    pub fn matches(&self, record: &CrashRecord) -> bool {
        let factor_ok = match &self.factor {
            Selection::All => true,
            Selection::Only(wanted) => record.contributing_factors.contains(wanted),
        };

        factor_ok
            && self.month.matches(record.month.as_ref())
            && self.day_of_week.matches(record.day_of_week.as_ref())
            && self.hour_of_day.matches(record.hour_of_day.as_ref())
            && self.severity.matches(record.severity.as_ref())
            && self
                .first_harmful_event
                .matches(record.first_harmful_event.as_ref())
            && self.light_condition.matches(record.light_condition.as_ref())
            && self
                .weather_condition
                .matches(record.weather_condition.as_ref())
            && self
                .surface_condition
                .matches(record.surface_condition.as_ref())
    }

    /// Number of filters that are not `All`.
    pub fn active_count(&self) -> usize {
        [
            self.factor.is_all(),
            self.month.is_all(),
            self.day_of_week.is_all(),
            self.hour_of_day.is_all(),
            self.severity.is_all(),
            self.first_harmful_event.is_all(),
            self.light_condition.is_all(),
            self.weather_condition.is_all(),
            self.surface_condition.is_all(),
        ]
        .into_iter()
        .filter(|all| !all)
        .count()
    }
}

/// Returns the records satisfying every active filter. Never fails; an
/// empty result is a valid answer.
pub fn filter_records<'a>(
    records: &'a [CrashRecord],
    selection: &FilterSelection,
) -> Vec<&'a CrashRecord> {
    records.iter().filter(|r| selection.matches(r)).collect()
}
