//! Aggregation module for summarizing trip records
//!
//! Every query here is a pure function of a [`RecordTable`]: nothing is
//! cached and nothing is mutated. There are four kinds of query:
//!
//! - **Mode** ([`Aggregator::mode_of`]): most frequent value of a field.
//!   When several values share the highest frequency the *largest* of them
//!   wins (numeric order for month, hour and birth year; the English weekday
//!   name compared as a string for weekdays).
//! - **Group count** ([`Aggregator::group_count`]): occurrences per station
//!   or station pair, sorted by count descending. Equal counts keep the order
//!   in which their keys were first seen in the table.
//! - **Numeric summary** ([`Aggregator::numeric_summary`]): sum, mean, min and
//!   max over the values that are present, plus a count of the missing ones.
//! - **Categorical count** ([`Aggregator::categorical_count`]): counts for a
//!   fixed set of labels, zero for labels that never occur.
//!
//! Mode, group and numeric queries fail with
//! [`BikeshareError::EmptyInput`] when there is nothing to summarize;
//! categorical counts never do. Querying gender or birth year on a table
//! whose schema lacks that column fails with
//! [`BikeshareError::UnknownField`].
//!
//! # Examples
//!
//! ```
//! use bikeshare_core::aggregation::{Aggregator, GroupKey};
//! use bikeshare_core::table::RecordTable;
//! use bikeshare_core::types::{DatasetSchema, TripRecord, UserType, parse_timestamp};
//!
//! let start = parse_timestamp("2017-06-05 08:15:00").unwrap();
//! let table = RecordTable::new(
//!     vec![
//!         TripRecord::new(start, "Union Station", "Dupont Circle", 60, UserType::Subscriber),
//!         TripRecord::new(start, "Union Station", "Eastern Market", 120, UserType::Customer),
//!         TripRecord::new(start, "Dupont Circle", "Union Station", 180, UserType::Customer),
//!     ],
//!     DatasetSchema::minimal(),
//! );
//!
//! let aggregator = Aggregator::new(&table);
//! let top = aggregator.most_popular(GroupKey::StartStation).unwrap();
//! assert_eq!(top.key.to_string(), "Union Station");
//! assert_eq!(top.count, 2);
//!
//! let durations = aggregator.duration_stats().unwrap();
//! assert_eq!(durations.summary.sum, 360);
//! assert_eq!(durations.mean_minutes, 2);
//! assert_eq!(durations.total_hours, 0);
//! ```

use crate::aggregation_types::{
    BirthYearRange, BirthYearStats, CategoryCounts, DurationStats, GroupCount, GroupValue,
    ModeResult, ModeValue, NumericSummary, StationStats, TimeStats, UserStats,
};
use crate::error::{BikeshareError, Result};
use crate::table::RecordTable;
use crate::types::{Gender, UserType, weekday_name};
use chrono::Weekday;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::hash::Hash;
use tracing::debug;

/// Label used for records with no gender under [`MissingPolicy::Bucket`]
pub const UNSPECIFIED: &str = "Unspecified";

/// Fields that support mode queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeField {
    Month,
    Weekday,
    StartHour,
    /// Records without a birth year are skipped
    BirthYear,
}

/// Grouping keys for group-by counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey {
    StartStation,
    EndStation,
    /// Ordered (start station, end station) pair
    Route,
}

/// Fields that support numeric summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericField {
    TripDuration,
    BirthYear,
}

/// Fields that support categorical counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryField {
    UserType,
    Gender,
}

/// What a categorical count does with records that have no value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingPolicy {
    /// Leave them out of every category
    Skip,
    /// Count them under [`UNSPECIFIED`]
    Bucket,
}

/// Main aggregation engine
///
/// Borrows the table for the duration of the queries.
pub struct Aggregator<'a> {
    table: &'a RecordTable,
}

impl<'a> Aggregator<'a> {
    /// Create a new Aggregator over `table`
    pub fn new(table: &'a RecordTable) -> Self {
        Self { table }
    }

    /// Most frequent value of `field`, largest value on ties
    pub fn mode_of(&self, field: ModeField) -> Result<ModeResult<ModeValue>> {
        Ok(match field {
            ModeField::Month => map_mode(self.popular_month()?, ModeValue::Month),
            ModeField::Weekday => map_mode(self.popular_weekday()?, ModeValue::Weekday),
            ModeField::StartHour => map_mode(self.popular_start_hour()?, ModeValue::Hour),
            ModeField::BirthYear => map_mode(self.popular_birth_year()?, ModeValue::BirthYear),
        })
    }

    /// Most common month number
    pub fn popular_month(&self) -> Result<ModeResult<u32>> {
        mode_max_on_tie(self.table.iter().map(|r| r.month()), |m| *m, "month")
    }

    /// Most common weekday; ties go to the lexicographically largest name
    pub fn popular_weekday(&self) -> Result<ModeResult<Weekday>> {
        mode_max_on_tie(
            self.table.iter().map(|r| r.weekday()),
            |d| weekday_name(*d),
            "weekday",
        )
    }

    /// Most common start hour
    pub fn popular_start_hour(&self) -> Result<ModeResult<u32>> {
        mode_max_on_tie(
            self.table.iter().map(|r| r.start_hour()),
            |h| *h,
            "start hour",
        )
    }

    /// Most common birth year among records that have one
    pub fn popular_birth_year(&self) -> Result<ModeResult<i32>> {
        self.require(self.table.schema().has_birth_year, "birth year")?;
        mode_max_on_tie(
            self.table.iter().filter_map(|r| r.birth_year()),
            |y| *y,
            "birth year",
        )
    }

    /// Occurrences per key, sorted by count descending
    ///
    /// Equal counts keep first-seen order, so the result is deterministic
    /// for a given table.
    pub fn group_count(&self, key: GroupKey) -> Result<Vec<GroupCount>> {
        if self.table.is_empty() {
            return Err(BikeshareError::EmptyInput(group_key_name(key)));
        }

        let groups = match key {
            GroupKey::StartStation => {
                count_first_seen(self.table.iter().map(|r| r.start_station()))
                    .into_iter()
                    .map(|(station, count)| GroupCount {
                        key: GroupValue::Station(station.to_string()),
                        count,
                    })
                    .collect()
            }
            GroupKey::EndStation => count_first_seen(self.table.iter().map(|r| r.end_station()))
                .into_iter()
                .map(|(station, count)| GroupCount {
                    key: GroupValue::Station(station.to_string()),
                    count,
                })
                .collect(),
            GroupKey::Route => count_first_seen(
                self.table
                    .iter()
                    .map(|r| (r.start_station(), r.end_station())),
            )
            .into_iter()
            .map(|((start, end), count)| GroupCount {
                key: GroupValue::Route {
                    start: start.to_string(),
                    end: end.to_string(),
                },
                count,
            })
            .collect(),
        };

        Ok(groups)
    }

    /// First entry of [`group_count`](Self::group_count)
    pub fn most_popular(&self, key: GroupKey) -> Result<GroupCount> {
        self.group_count(key)?
            .into_iter()
            .next()
            .ok_or(BikeshareError::EmptyInput(group_key_name(key)))
    }

    /// Sum, mean, min and max over the values present for `field`
    ///
    /// Missing values never contribute to the reductions; they are reported
    /// in `missing_count`. Trip duration is never missing. A sum that does
    /// not fit in `i64` fails with [`BikeshareError::Overflow`].
    pub fn numeric_summary(&self, field: NumericField) -> Result<NumericSummary> {
        match field {
            NumericField::TripDuration => {
                let durations = self
                    .table
                    .iter()
                    .map(|r| {
                        i64::try_from(r.trip_duration_seconds())
                            .map(Some)
                            .map_err(|_| BikeshareError::Overflow("trip duration"))
                    })
                    .collect::<Result<Vec<_>>>()?;
                summarize(durations, "trip duration")
            }
            NumericField::BirthYear => {
                self.require(self.table.schema().has_birth_year, "birth year")?;
                summarize(
                    self.table.iter().map(|r| r.birth_year().map(i64::from)),
                    "birth year",
                )
            }
        }
    }

    /// Counts per expected category of `field`
    ///
    /// User types are counted as Subscriber and Customer. A blank user type
    /// is a missing value and goes to [`UNSPECIFIED`] under
    /// [`MissingPolicy::Bucket`]; `Dependent` is not an expected category
    /// and is never counted. Gender is counted as Male and Female, plus
    /// [`UNSPECIFIED`] under [`MissingPolicy::Bucket`].
    pub fn categorical_count(
        &self,
        field: CategoryField,
        missing: MissingPolicy,
    ) -> Result<CategoryCounts> {
        match field {
            CategoryField::UserType => {
                let mut counts = match missing {
                    MissingPolicy::Skip => CategoryCounts::zeroed(&[
                        UserType::Subscriber.label(),
                        UserType::Customer.label(),
                    ]),
                    MissingPolicy::Bucket => CategoryCounts::zeroed(&[
                        UserType::Subscriber.label(),
                        UserType::Customer.label(),
                        UNSPECIFIED,
                    ]),
                };
                for record in self.table {
                    match record.user_type() {
                        UserType::Unknown if missing == MissingPolicy::Bucket => {
                            counts.increment(UNSPECIFIED)
                        }
                        UserType::Unknown | UserType::Dependent => {}
                        user_type => counts.increment(user_type.label()),
                    }
                }
                Ok(counts)
            }
            CategoryField::Gender => {
                self.require(self.table.schema().has_gender, "gender")?;
                let mut counts = match missing {
                    MissingPolicy::Skip => {
                        CategoryCounts::zeroed(&[Gender::Male.label(), Gender::Female.label()])
                    }
                    MissingPolicy::Bucket => CategoryCounts::zeroed(&[
                        Gender::Male.label(),
                        Gender::Female.label(),
                        UNSPECIFIED,
                    ]),
                };
                for record in self.table {
                    match record.gender() {
                        Some(gender) => counts.increment(gender.label()),
                        None if missing == MissingPolicy::Bucket => counts.increment(UNSPECIFIED),
                        None => {}
                    }
                }
                Ok(counts)
            }
        }
    }

    /// Most common month, weekday and start hour
    pub fn time_stats(&self) -> Result<TimeStats> {
        let stats = TimeStats {
            month: self.popular_month()?,
            weekday: self.popular_weekday()?,
            start_hour: self.popular_start_hour()?,
        };
        debug!("Computed time stats over {} trips", self.table.len());
        Ok(stats)
    }

    /// Most popular start station, end station and route
    pub fn station_stats(&self) -> Result<StationStats> {
        let stats = StationStats {
            start_station: self.most_popular(GroupKey::StartStation)?,
            end_station: self.most_popular(GroupKey::EndStation)?,
            route: self.most_popular(GroupKey::Route)?,
        };
        debug!("Computed station stats over {} trips", self.table.len());
        Ok(stats)
    }

    /// Total and mean trip duration
    pub fn duration_stats(&self) -> Result<DurationStats> {
        let summary = self.numeric_summary(NumericField::TripDuration)?;
        debug!("Computed duration stats over {} trips", summary.count);
        Ok(DurationStats::from_summary(summary))
    }

    /// User-type counts plus gender and birth-year sections when the
    /// dataset carries those columns
    ///
    /// Unlike the other reports this one succeeds on an empty table: counts
    /// are zero and the birth-year range is `None`.
    pub fn user_stats(&self) -> Result<UserStats> {
        let schema = self.table.schema();

        let user_types = self.categorical_count(CategoryField::UserType, MissingPolicy::Skip)?;

        let gender = if schema.has_gender {
            Some(self.categorical_count(CategoryField::Gender, MissingPolicy::Bucket)?)
        } else {
            None
        };

        let birth_years = if schema.has_birth_year {
            Some(self.birth_year_stats()?)
        } else {
            None
        };

        Ok(UserStats {
            user_types,
            gender,
            birth_years,
        })
    }

    fn birth_year_stats(&self) -> Result<BirthYearStats> {
        match self.numeric_summary(NumericField::BirthYear) {
            Ok(summary) => {
                let most_common = self.popular_birth_year()?;
                Ok(BirthYearStats {
                    range: Some(BirthYearRange {
                        earliest: summary.min as i32,
                        latest: summary.max as i32,
                        most_common: most_common.value,
                    }),
                    missing: summary.missing_count,
                })
            }
            Err(BikeshareError::EmptyInput(_)) => Ok(BirthYearStats {
                range: None,
                missing: self.table.len(),
            }),
            Err(e) => Err(e),
        }
    }

    fn require(&self, present: bool, field: &'static str) -> Result<()> {
        if present {
            Ok(())
        } else {
            Err(BikeshareError::UnknownField(field))
        }
    }
}

fn group_key_name(key: GroupKey) -> &'static str {
    match key {
        GroupKey::StartStation => "start station",
        GroupKey::EndStation => "end station",
        GroupKey::Route => "route",
    }
}

fn map_mode<T, U>(mode: ModeResult<T>, f: impl FnOnce(T) -> U) -> ModeResult<U> {
    ModeResult {
        value: f(mode.value),
        count: mode.count,
    }
}

/// Mode of `values`, breaking frequency ties by the largest `order_key`
///
/// `order_key` must be injective over the values so that the winner is
/// independent of hash iteration order.
pub fn mode_max_on_tie<T, K>(
    values: impl IntoIterator<Item = T>,
    order_key: impl Fn(&T) -> K,
    field: &'static str,
) -> Result<ModeResult<T>>
where
    T: Eq + Hash,
    K: Ord,
{
    let mut counts: HashMap<T, usize> = HashMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .max_by(|(a, a_count), (b, b_count)| {
            a_count
                .cmp(b_count)
                .then_with(|| order_key(a).cmp(&order_key(b)))
        })
        .map(|(value, count)| ModeResult { value, count })
        .ok_or(BikeshareError::EmptyInput(field))
}

/// Occurrence counts sorted by count descending, ties in first-seen order
pub fn count_first_seen<K>(keys: impl IntoIterator<Item = K>) -> Vec<(K, usize)>
where
    K: Eq + Hash,
{
    let mut counts: IndexMap<K, usize> = IndexMap::new();
    for key in keys {
        *counts.entry(key).or_insert(0) += 1;
    }

    let mut sorted: Vec<(K, usize)> = counts.into_iter().collect();
    // Stable sort keeps insertion order among equal counts
    sorted.sort_by(|a, b| b.1.cmp(&a.1));
    sorted
}

fn summarize(
    values: impl IntoIterator<Item = Option<i64>>,
    field: &'static str,
) -> Result<NumericSummary> {
    let mut sum = 0i64;
    let mut min = i64::MAX;
    let mut max = i64::MIN;
    let mut count = 0usize;
    let mut missing_count = 0usize;

    for value in values {
        match value {
            Some(v) => {
                sum = sum.checked_add(v).ok_or(BikeshareError::Overflow(field))?;
                min = min.min(v);
                max = max.max(v);
                count += 1;
            }
            None => missing_count += 1,
        }
    }

    if count == 0 {
        return Err(BikeshareError::EmptyInput(field));
    }

    Ok(NumericSummary {
        sum,
        mean: sum as f64 / count as f64,
        min,
        max,
        count,
        missing_count,
    })
}
