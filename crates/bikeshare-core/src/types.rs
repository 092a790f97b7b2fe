//! Core domain types for bikeshare
//!
//! This module contains the fundamental types used throughout the bikeshare
//! library: the selection tokens a user filters by, the rider attributes a
//! trip carries, and the trip record itself with its calendar fields derived
//! from the start time.

use crate::error::{BikeshareError, Result};
use chrono::{Datelike, Month, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Accepted start/end time layouts, tried in order
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Month names indexed by `month - 1`
pub const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Full English weekday name
///
/// chrono only displays the three-letter abbreviation, but weekday modes are
/// tie-broken on the full name.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Title-cased month name for a 1-based month number
pub fn month_name(month: u32) -> &'static str {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name())
        .unwrap_or("Unknown")
}

/// One of the three cities with a trip dataset
///
/// # Examples
/// ```
/// use bikeshare_core::types::City;
/// use std::str::FromStr;
///
/// let city = City::from_str("New York City").unwrap();
/// assert_eq!(city, City::NewYorkCity);
/// assert_eq!(city.file_name(), "new_york_city.csv");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum City {
    Chicago,
    NewYorkCity,
    Washington,
}

impl City {
    /// Every city, in prompt order
    pub const ALL: [City; 3] = [City::Chicago, City::NewYorkCity, City::Washington];

    /// Dataset file name inside the data directory
    pub fn file_name(&self) -> &'static str {
        match self {
            City::Chicago => "chicago.csv",
            City::NewYorkCity => "new_york_city.csv",
            City::Washington => "washington.csv",
        }
    }

    /// Human readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            City::Chicago => "Chicago",
            City::NewYorkCity => "New York City",
            City::Washington => "Washington",
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for City {
    type Err = BikeshareError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('_', " ").as_str() {
            "chicago" => Ok(City::Chicago),
            "new york city" | "new york" | "nyc" => Ok(City::NewYorkCity),
            "washington" => Ok(City::Washington),
            _ => Err(BikeshareError::InvalidSelection(format!(
                "unknown city '{s}', expected one of: Chicago, New York City, Washington"
            ))),
        }
    }
}

/// Month filter token: a single calendar month or `all`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MonthSelection {
    #[default]
    All,
    /// 1-based month number
    Only(u32),
}

impl MonthSelection {
    /// Month number to filter on, `None` for `all`
    pub fn number(&self) -> Option<u32> {
        match self {
            MonthSelection::All => None,
            MonthSelection::Only(m) => Some(*m),
        }
    }
}

impl fmt::Display for MonthSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthSelection::All => write!(f, "All"),
            MonthSelection::Only(m) => write!(f, "{}", month_name(*m)),
        }
    }
}

impl FromStr for MonthSelection {
    type Err = BikeshareError;

    /// Positional mapping: `january` is 1, `december` is 12
    fn from_str(s: &str) -> Result<Self> {
        let token = s.trim().to_lowercase();
        if token == "all" {
            return Ok(MonthSelection::All);
        }
        MONTH_NAMES
            .iter()
            .position(|name| *name == token)
            .map(|idx| MonthSelection::Only(idx as u32 + 1))
            .ok_or_else(|| {
                BikeshareError::InvalidSelection(format!(
                    "unknown month '{s}', expected a month name or 'all'"
                ))
            })
    }
}

/// Day-of-week filter token: a single weekday or `all`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DaySelection {
    #[default]
    All,
    Only(Weekday),
}

impl DaySelection {
    /// Weekday to filter on, `None` for `all`
    pub fn weekday(&self) -> Option<Weekday> {
        match self {
            DaySelection::All => None,
            DaySelection::Only(d) => Some(*d),
        }
    }
}

impl fmt::Display for DaySelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DaySelection::All => write!(f, "All"),
            DaySelection::Only(d) => write!(f, "{}", weekday_name(*d)),
        }
    }
}

impl FromStr for DaySelection {
    type Err = BikeshareError;

    /// Full weekday names only, case-insensitive
    fn from_str(s: &str) -> Result<Self> {
        let token = s.trim().to_lowercase();
        if token == "all" {
            return Ok(DaySelection::All);
        }
        [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ]
        .into_iter()
        .find(|d| weekday_name(*d).eq_ignore_ascii_case(&token))
        .map(DaySelection::Only)
        .ok_or_else(|| {
            BikeshareError::InvalidSelection(format!(
                "unknown day '{s}', expected a weekday name or 'all'"
            ))
        })
    }
}

/// Rider membership type
///
/// Only `Subscriber` and `Customer` are reported categories. `Dependent`
/// shows up in the Chicago data and a blank cell becomes `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserType {
    Subscriber,
    Customer,
    Dependent,
    Unknown,
}

impl UserType {
    /// Parse a dataset label; blank and unrecognized labels map to `Unknown`
    pub fn from_label(label: Option<&str>) -> Self {
        match label.map(str::trim) {
            Some(l) if l.eq_ignore_ascii_case("subscriber") => UserType::Subscriber,
            Some(l) if l.eq_ignore_ascii_case("customer") => UserType::Customer,
            Some(l) if l.eq_ignore_ascii_case("dependent") => UserType::Dependent,
            _ => UserType::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UserType::Subscriber => "Subscriber",
            UserType::Customer => "Customer",
            UserType::Dependent => "Dependent",
            UserType::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Rider gender as recorded by the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            _ => Err(format!("unknown gender '{s}'")),
        }
    }
}

/// Which optional columns a dataset carries
///
/// A `false` flag means the column is absent from the dataset altogether;
/// a `true` flag with `None` on a record means the column exists but that
/// record left it blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSchema {
    pub has_gender: bool,
    pub has_birth_year: bool,
}

impl DatasetSchema {
    /// Schema carrying every optional column
    pub fn full() -> Self {
        Self {
            has_gender: true,
            has_birth_year: true,
        }
    }

    /// Schema with only the required columns
    pub fn minimal() -> Self {
        Self {
            has_gender: false,
            has_birth_year: false,
        }
    }
}

impl Default for DatasetSchema {
    fn default() -> Self {
        Self::full()
    }
}

/// Parse a trip timestamp in any of the accepted layouts
///
/// # Examples
/// ```
/// use bikeshare_core::types::parse_timestamp;
/// use chrono::Timelike;
///
/// let ts = parse_timestamp("2017-01-01 09:07:57").unwrap();
/// assert_eq!(ts.hour(), 9);
/// assert!(parse_timestamp("not a time").is_none());
/// ```
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

/// One row as read from a city CSV, before validation
///
/// Column names follow the published dataset headers. Optional columns are
/// `None` both when the column is missing and when the cell is blank.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTripRow {
    #[serde(rename = "Start Time")]
    pub start_time: String,
    #[serde(rename = "End Time", default)]
    pub end_time: Option<String>,
    #[serde(rename = "Trip Duration")]
    pub trip_duration: String,
    #[serde(rename = "Start Station")]
    pub start_station: String,
    #[serde(rename = "End Station")]
    pub end_station: String,
    #[serde(rename = "User Type", default)]
    pub user_type: Option<String>,
    #[serde(rename = "Gender", default)]
    pub gender: Option<String>,
    #[serde(rename = "Birth Year", default)]
    pub birth_year: Option<String>,
}

/// One bike-share trip with its derived calendar fields
///
/// `month`, `weekday` and `start_hour` are computed from `start_time` when
/// the record is built and cannot be set independently.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripRecord {
    start_time: NaiveDateTime,
    end_time: Option<NaiveDateTime>,
    start_station: String,
    end_station: String,
    trip_duration_seconds: u64,
    user_type: UserType,
    gender: Option<Gender>,
    birth_year: Option<i32>,
    month: u32,
    weekday: Weekday,
    start_hour: u32,
}

impl TripRecord {
    /// Create a record, deriving the calendar fields from `start_time`
    pub fn new(
        start_time: NaiveDateTime,
        start_station: impl Into<String>,
        end_station: impl Into<String>,
        trip_duration_seconds: u64,
        user_type: UserType,
    ) -> Self {
        Self {
            start_time,
            end_time: None,
            start_station: start_station.into(),
            end_station: end_station.into(),
            trip_duration_seconds,
            user_type,
            gender: None,
            birth_year: None,
            month: start_time.month(),
            weekday: start_time.weekday(),
            start_hour: start_time.hour(),
        }
    }

    pub fn with_end_time(mut self, end_time: Option<NaiveDateTime>) -> Self {
        self.end_time = end_time;
        self
    }

    pub fn with_gender(mut self, gender: Option<Gender>) -> Self {
        self.gender = gender;
        self
    }

    pub fn with_birth_year(mut self, birth_year: Option<i32>) -> Self {
        self.birth_year = birth_year;
        self
    }

    /// Validate a raw CSV row
    ///
    /// `row` is the 1-based data row used in error messages. An unparseable
    /// start time is reported as [`BikeshareError::MalformedTimestamp`]; any
    /// other bad cell as [`BikeshareError::InvalidRecord`]. Fractional
    /// durations and birth years are truncated toward zero.
    pub fn from_raw(row: usize, raw: &RawTripRow) -> Result<Self> {
        let start_time =
            parse_timestamp(&raw.start_time).ok_or_else(|| BikeshareError::MalformedTimestamp {
                row,
                value: raw.start_time.clone(),
            })?;

        // End time is display-only, a bad cell is dropped rather than fatal
        let end_time = raw.end_time.as_deref().and_then(parse_timestamp);

        let duration = parse_number(&raw.trip_duration).ok_or_else(|| {
            BikeshareError::InvalidRecord {
                row,
                reason: format!("invalid trip duration '{}'", raw.trip_duration),
            }
        })?;
        if duration < 0.0 {
            return Err(BikeshareError::InvalidRecord {
                row,
                reason: format!("negative trip duration '{}'", raw.trip_duration),
            });
        }
        // 2^63 is the first value past i64::MAX that f64 can represent
        if duration.trunc() >= i64::MAX as f64 {
            return Err(BikeshareError::InvalidRecord {
                row,
                reason: format!("trip duration '{}' is out of range", raw.trip_duration),
            });
        }

        let gender = match non_blank(raw.gender.as_deref()) {
            Some(label) => Some(
                label
                    .parse::<Gender>()
                    .map_err(|reason| BikeshareError::InvalidRecord { row, reason })?,
            ),
            None => None,
        };

        let birth_year = match non_blank(raw.birth_year.as_deref()) {
            Some(value) => Some(parse_number(value).map(|y| y.trunc() as i32).ok_or_else(
                || BikeshareError::InvalidRecord {
                    row,
                    reason: format!("invalid birth year '{value}'"),
                },
            )?),
            None => None,
        };

        Ok(Self::new(
            start_time,
            raw.start_station.trim(),
            raw.end_station.trim(),
            duration.trunc() as u64,
            UserType::from_label(raw.user_type.as_deref()),
        )
        .with_end_time(end_time)
        .with_gender(gender)
        .with_birth_year(birth_year))
    }

    pub fn start_time(&self) -> NaiveDateTime {
        self.start_time
    }

    pub fn end_time(&self) -> Option<NaiveDateTime> {
        self.end_time
    }

    pub fn start_station(&self) -> &str {
        &self.start_station
    }

    pub fn end_station(&self) -> &str {
        &self.end_station
    }

    pub fn trip_duration_seconds(&self) -> u64 {
        self.trip_duration_seconds
    }

    pub fn user_type(&self) -> UserType {
        self.user_type
    }

    pub fn gender(&self) -> Option<Gender> {
        self.gender
    }

    pub fn birth_year(&self) -> Option<i32> {
        self.birth_year
    }

    /// Calendar month of the start time, 1-12
    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    /// Hour of the start time, 0-23
    pub fn start_hour(&self) -> u32 {
        self.start_hour
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn raw(start: &str, duration: &str) -> RawTripRow {
        RawTripRow {
            start_time: start.to_string(),
            end_time: None,
            trip_duration: duration.to_string(),
            start_station: "Canal St & Adams St".to_string(),
            end_station: "Clinton St & Madison St".to_string(),
            user_type: Some("Subscriber".to_string()),
            gender: None,
            birth_year: None,
        }
    }

    #[test]
    fn test_city_parsing() {
        assert_eq!(City::from_str("chicago").unwrap(), City::Chicago);
        assert_eq!(City::from_str("CHICAGO").unwrap(), City::Chicago);
        assert_eq!(City::from_str("new york city").unwrap(), City::NewYorkCity);
        assert_eq!(City::from_str("new_york_city").unwrap(), City::NewYorkCity);
        assert_eq!(City::from_str(" Washington ").unwrap(), City::Washington);
        assert!(City::from_str("boston").is_err());
    }

    #[test]
    fn test_month_selection_is_positional() {
        assert_eq!(
            MonthSelection::from_str("january").unwrap(),
            MonthSelection::Only(1)
        );
        assert_eq!(
            MonthSelection::from_str("June").unwrap(),
            MonthSelection::Only(6)
        );
        assert_eq!(
            MonthSelection::from_str("DECEMBER").unwrap(),
            MonthSelection::Only(12)
        );
        assert_eq!(MonthSelection::from_str("all").unwrap(), MonthSelection::All);
        assert!(MonthSelection::from_str("jan").is_err());
        assert_eq!(MonthSelection::Only(3).to_string(), "March");
    }

    #[test]
    fn test_day_selection() {
        assert_eq!(
            DaySelection::from_str("monday").unwrap(),
            DaySelection::Only(Weekday::Mon)
        );
        assert_eq!(
            DaySelection::from_str("SUNDAY").unwrap(),
            DaySelection::Only(Weekday::Sun)
        );
        assert_eq!(DaySelection::from_str("All").unwrap(), DaySelection::All);
        assert!(DaySelection::from_str("mon").is_err());
        assert_eq!(DaySelection::Only(Weekday::Wed).to_string(), "Wednesday");
    }

    #[test]
    fn test_derived_fields() {
        let start = NaiveDate::from_ymd_opt(2017, 6, 23)
            .unwrap()
            .and_hms_opt(15, 9, 32)
            .unwrap();
        let record = TripRecord::new(start, "A", "B", 321, UserType::Customer);

        assert_eq!(record.month(), 6);
        assert_eq!(record.weekday(), Weekday::Fri);
        assert_eq!(record.start_hour(), 15);
    }

    #[test]
    fn test_from_raw_truncates_fractions() {
        let mut row = raw("2017-03-03 22:07:00", "1782.914");
        row.birth_year = Some("1989.0".to_string());
        row.gender = Some("Female".to_string());

        let record = TripRecord::from_raw(1, &row).unwrap();
        assert_eq!(record.trip_duration_seconds(), 1782);
        assert_eq!(record.birth_year(), Some(1989));
        assert_eq!(record.gender(), Some(Gender::Female));
        assert_eq!(record.user_type(), UserType::Subscriber);
    }

    #[test]
    fn test_from_raw_malformed_timestamp() {
        let row = raw("2017-13-45 99:00:00", "60");
        let err = TripRecord::from_raw(7, &row).unwrap_err();
        assert!(matches!(
            err,
            BikeshareError::MalformedTimestamp { row: 7, .. }
        ));
    }

    #[test]
    fn test_from_raw_rejects_negative_duration() {
        let row = raw("2017-01-01 00:00:00", "-5");
        assert!(matches!(
            TripRecord::from_raw(1, &row),
            Err(BikeshareError::InvalidRecord { row: 1, .. })
        ));
    }

    #[test]
    fn test_from_raw_rejects_out_of_range_duration() {
        for duration in ["1e19", "9223372036854775808"] {
            let err = TripRecord::from_raw(7, &raw("2017-01-02 08:00:00", duration)).unwrap_err();
            match err {
                BikeshareError::InvalidRecord { row, reason } => {
                    assert_eq!(row, 7);
                    assert!(reason.contains("out of range"));
                }
                other => panic!("Expected InvalidRecord, got {other:?}"),
            }
        }

        let record = TripRecord::from_raw(1, &raw("2017-01-02 08:00:00", "5e18")).unwrap();
        assert_eq!(record.trip_duration_seconds(), 5_000_000_000_000_000_000);
    }

    #[test]
    fn test_blank_optionals_are_none() {
        let mut row = raw("2017-01-01T08:30:00", "60");
        row.gender = Some("   ".to_string());
        row.user_type = None;

        let record = TripRecord::from_raw(1, &row).unwrap();
        assert_eq!(record.gender(), None);
        assert_eq!(record.birth_year(), None);
        assert_eq!(record.user_type(), UserType::Unknown);
    }

    #[test]
    fn test_weekday_and_month_names() {
        assert_eq!(weekday_name(Weekday::Thu), "Thursday");
        assert_eq!(month_name(1), "January");
        assert_eq!(month_name(13), "Unknown");
    }
}
