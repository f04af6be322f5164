//! Fixed option vocabularies offered by the dashboard filters.
//!
//! Each filter accepts `All` or one of the `value`s listed here. Labels are
//! the human-readable text shown next to each choice.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilterOption {
    pub label: &'static str,
    pub value: &'static str,
}

const fn opt(label: &'static str, value: &'static str) -> FilterOption {
    FilterOption { label, value }
}

pub static FACTOR_OPTIONS: &[FilterOption] = &[
    opt("Failed to Control Speed", "FAILED TO CONTROL SPEED"),
    opt("Disregarded Stop and Go Signal", "DISREGARD STOP AND GO SIGNAL"),
    opt(
        "Failed to Yield Right of Way - Stop Sign",
        "FAILED TO YIELD RIGHT OF WAY - STOP SIGN",
    ),
    opt("Failed to Drive in Single Lane", "FAILED TO DRIVE IN SINGLE LANE"),
    opt(
        "Failed to Yield Right of Way - Turning Left",
        "FAILED TO YIELD RIGHT OF WAY - TURNING LEFT",
    ),
    opt("Disregarded Stop Sign or Light", "DISREGARD STOP SIGN OR LIGHT"),
    opt("Driver Inattention", "DRIVER INATTENTION"),
    opt("Changed Lane When Unsafe", "CHANGED LANE WHEN UNSAFE"),
    opt(
        "Failed to Yield Right of Way - Open Intersection",
        "FAILED TO YIELD RIGHT OF WAY - OPEN INTERSECTION",
    ),
    opt("Under Influence - Alcohol", "UNDER INFLUENCE - ALCOHOL"),
    opt(
        "Failed to Yield Right of Way - Private Drive",
        "FAILED TO YIELD RIGHT OF WAY - PRIVATE DRIVE",
    ),
    opt("Faulty Evasive Action", "FAULTY EVASIVE ACTION"),
    opt("Turned Improperly - Wrong Lane", "TURNED IMPROPERLY - WRONG LANE"),
    opt(
        "Pedestrian Failed to Yield Right of Way to Vehicle",
        "PEDESTRIAN FAILED TO YIELD RIGHT OF WAY TO VEHICLE",
    ),
    opt("Turned When Unsafe", "TURNED WHEN UNSAFE"),
    opt(
        "Failed to Yield Right of Way - To Pedestrian",
        "FAILED TO YIELD RIGHT OF WAY - TO PEDESTRIAN",
    ),
    opt("Distraction in Vehicle", "DISTRACTION IN VEHICLE"),
    opt("None", "NONE"),
    opt(
        "Failed to Yield Right of Way - Turn on Red",
        "FAILED TO YIELD RIGHT OF WAY - TURN ON RED",
    ),
    opt("Under Influence - Drug", "UNDER INFLUENCE - DRUG"),
];

pub static MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub static DAY_OF_WEEK_OPTIONS: &[FilterOption] = &[
    opt("Monday", "MONDAY"),
    opt("Tuesday", "TUESDAY"),
    opt("Wednesday", "WEDNESDAY"),
    opt("Thursday", "THURSDAY"),
    opt("Friday", "FRIDAY"),
    opt("Saturday", "SATURDAY"),
    opt("Sunday", "SUNDAY"),
];

pub static SEVERITY_OPTIONS: &[FilterOption] = &[
    opt("Not Injured", "N - NOT INJURED"),
    opt("Possible Injury", "C - POSSIBLE INJURY"),
    opt("Suspected Minor Injury", "B - SUSPECTED MINOR INJURY"),
    opt("Suspected Serious Injury", "A - SUSPECTED SERIOUS INJURY"),
    opt("Fatal Injury", "K - FATAL INJURY"),
    opt("Unknown", "99 - UNKNOWN"),
];

pub static FIRST_HARMFUL_EVENT_OPTIONS: &[FilterOption] = &[
    opt("Motor Vehicle in Transport", "MOTOR VEHICLE IN TRANSPORT"),
    opt("Fixed Object", "FIXED OBJECT"),
    opt("Pedestrian", "PEDESTRIAN"),
];

pub static LIGHT_CONDITION_OPTIONS: &[FilterOption] = &[
    opt("Daylight", "1 - DAYLIGHT"),
    opt("Dark, Lighted", "3 - DARK, LIGHTED"),
    opt("Dark, Not Lighted", "2 - DARK, NOT LIGHTED"),
];

pub static WEATHER_CONDITION_OPTIONS: &[FilterOption] = &[
    opt("Clear", "1 - CLEAR"),
    opt("Cloudy", "2 - CLOUDY"),
    opt("Rain", "3 - RAIN"),
];

pub static SURFACE_CONDITION_OPTIONS: &[FilterOption] = &[
    opt("Dry", "1 - DRY"),
    opt("Wet", "2 - WET"),
];

/// A dropdown choice whose value is a number (month, hour).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NumericOption {
    pub label: String,
    pub value: u32,
}

/// The full set of filter vocabularies, as served to a UI.
#[derive(Debug, Clone, Serialize)]
pub struct FilterOptions {
    pub factor: &'static [FilterOption],
    pub month: Vec<NumericOption>,
    pub day_of_week: &'static [FilterOption],
    pub hour_of_day: Vec<NumericOption>,
    pub severity: &'static [FilterOption],
    pub first_harmful_event: &'static [FilterOption],
    pub light_condition: &'static [FilterOption],
    pub weather_condition: &'static [FilterOption],
    pub surface_condition: &'static [FilterOption],
}

impl FilterOptions {
    pub fn get() -> Self {
        Self {
            factor: FACTOR_OPTIONS,
            month: MONTH_NAMES
                .iter()
                .zip(1..)
                .map(|(name, value)| NumericOption {
                    label: name.to_string(),
                    value,
                })
                .collect(),
            day_of_week: DAY_OF_WEEK_OPTIONS,
            hour_of_day: (0..24)
                .map(|hour| NumericOption {
                    label: format!("{hour}:00 - {hour}:59"),
                    value: hour,
                })
                .collect(),
            severity: SEVERITY_OPTIONS,
            first_harmful_event: FIRST_HARMFUL_EVENT_OPTIONS,
            light_condition: LIGHT_CONDITION_OPTIONS,
            weather_condition: WEATHER_CONDITION_OPTIONS,
            surface_condition: SURFACE_CONDITION_OPTIONS,
        }
    }
}

/// Returns `value` if it is one of `options`' values.
pub fn find_value(options: &[FilterOption], value: &str) -> Option<&'static str> {
    options.iter().find(|o| o.value == value).map(|o| o.value)
}
