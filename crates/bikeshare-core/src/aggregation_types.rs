//! Aggregation data types for bikeshare
//!
//! Pure data structures returned by the [`Aggregator`](crate::aggregation::Aggregator).
//! These types carry no formatting logic beyond the truncating unit
//! conversions that are part of the reported statistics.

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Most frequent value of a field and how often it occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeResult<T> {
    pub value: T,
    pub count: usize,
}

/// Value of a field that supports mode queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeValue {
    Month(u32),
    Weekday(Weekday),
    Hour(u32),
    BirthYear(i32),
}

impl fmt::Display for ModeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModeValue::Month(m) => write!(f, "{}", crate::types::month_name(*m)),
            ModeValue::Weekday(d) => write!(f, "{}", crate::types::weekday_name(*d)),
            ModeValue::Hour(h) => write!(f, "{h}"),
            ModeValue::BirthYear(y) => write!(f, "{y}"),
        }
    }
}

/// Grouping key value: a single station or an ordered station pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupValue {
    Station(String),
    Route { start: String, end: String },
}

impl fmt::Display for GroupValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupValue::Station(name) => write!(f, "{name}"),
            GroupValue::Route { start, end } => write!(f, "{start} -> {end}"),
        }
    }
}

/// One row of a group-by count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupCount {
    pub key: GroupValue,
    pub count: usize,
}

/// Reduction over the non-missing values of a numeric field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    pub sum: i64,
    pub mean: f64,
    pub min: i64,
    pub max: i64,
    /// Values that contributed to sum/mean/min/max
    pub count: usize,
    /// Records with no value for the field
    pub missing_count: usize,
}

/// Count for one expected category label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
}

/// Counts for a fixed, ordered set of category labels
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub categories: Vec<CategoryCount>,
}

impl CategoryCounts {
    /// Zero count for every label, in the given order
    pub fn zeroed(labels: &[&str]) -> Self {
        Self {
            categories: labels
                .iter()
                .map(|label| CategoryCount {
                    label: (*label).to_string(),
                    count: 0,
                })
                .collect(),
        }
    }

    /// Count for `label`, zero when the label is not an expected category
    pub fn get(&self, label: &str) -> usize {
        self.categories
            .iter()
            .find(|c| c.label == label)
            .map_or(0, |c| c.count)
    }

    pub fn total(&self) -> usize {
        self.categories.iter().map(|c| c.count).sum()
    }

    pub(crate) fn increment(&mut self, label: &str) {
        if let Some(c) = self.categories.iter_mut().find(|c| c.label == label) {
            c.count += 1;
        }
    }
}

/// Whole hours in `seconds`, truncating at minutes and then at hours
///
/// # Examples
/// ```
/// use bikeshare_core::aggregation_types::whole_hours;
///
/// assert_eq!(whole_hours(360), 0);
/// assert_eq!(whole_hours(7_259), 2);
/// ```
pub fn whole_hours(seconds: i64) -> i64 {
    seconds / 60 / 60
}

/// Whole minutes in a mean duration, truncated toward zero
pub fn whole_minutes(seconds: f64) -> i64 {
    (seconds / 60.0).trunc() as i64
}

/// Most frequent travel times
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeStats {
    pub month: ModeResult<u32>,
    pub weekday: ModeResult<Weekday>,
    pub start_hour: ModeResult<u32>,
}

/// Most popular stations and route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationStats {
    pub start_station: GroupCount,
    pub end_station: GroupCount,
    pub route: GroupCount,
}

/// Total and average trip duration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationStats {
    pub summary: NumericSummary,
    /// Total travel time in whole hours
    pub total_hours: i64,
    /// Mean trip duration in whole minutes
    pub mean_minutes: i64,
}

impl DurationStats {
    pub fn from_summary(summary: NumericSummary) -> Self {
        Self {
            summary,
            total_hours: whole_hours(summary.sum),
            mean_minutes: whole_minutes(summary.mean),
        }
    }
}

/// Earliest, latest and most common birth year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthYearRange {
    pub earliest: i32,
    pub latest: i32,
    pub most_common: i32,
}

/// Birth-year section of the rider report
///
/// `range` is `None` when the dataset has the column but every record in
/// the selection left it blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthYearStats {
    pub range: Option<BirthYearRange>,
    pub missing: usize,
}

/// Rider demographics
///
/// `gender` and `birth_years` are `None` when the dataset does not carry
/// the column at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    pub user_types: CategoryCounts,
    pub gender: Option<CategoryCounts>,
    pub birth_years: Option<BirthYearStats>,
}
