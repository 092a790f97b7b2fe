//! Output formatting module for bikeshare
//!
//! This module provides formatters for displaying trip statistics in
//! different formats:
//! - Table format for human-readable terminal output
//! - JSON format for machine-readable output and integration with other tools
//!
//! # Examples
//!
//! ```no_run
//! use bikeshare::output::get_formatter;
//! use bikeshare::aggregation::Aggregator;
//! use bikeshare::table::RecordTable;
//!
//! # fn example(table: &RecordTable) -> bikeshare::Result<()> {
//! let stats = Aggregator::new(table).time_stats()?;
//!
//! // Table formatter for human-readable output
//! let formatter = get_formatter(false);
//! println!("{}", formatter.format_time_stats(&stats));
//!
//! // JSON formatter for machine-readable output
//! let json_formatter = get_formatter(true);
//! println!("{}", json_formatter.format_time_stats(&stats));
//! # Ok(())
//! # }
//! ```

use crate::aggregation_types::{DurationStats, StationStats, TimeStats, UserStats};
use crate::filters::FilterCriteria;
use crate::report::StatsReport;
use crate::types::{TripRecord, month_name, weekday_name};
use colored::*;
use prettytable::{Table, format, row};
use serde_json::json;

/// Trait for output formatters
///
/// This trait defines the interface for formatting each statistics block.
/// Implementations can provide different output formats (table, JSON, etc.).
pub trait OutputFormatter {
    /// Describe the active selection and how many trips it matched
    fn format_selection(&self, criteria: &FilterCriteria, trips: usize) -> String;

    /// Most frequent month, weekday and start hour
    fn format_time_stats(&self, stats: &TimeStats) -> String;

    /// Most popular stations and route
    fn format_station_stats(&self, stats: &StationStats) -> String;

    /// Total and average trip duration
    fn format_duration_stats(&self, stats: &DurationStats) -> String;

    /// Rider type, gender and birth-year breakdown
    fn format_user_stats(&self, stats: &UserStats) -> String;

    /// A page of raw trips; `offset` is the table position of the first one
    fn format_sample(&self, records: &[TripRecord], offset: usize) -> String;

    /// Message for a selection that matched no trips
    fn format_no_data(&self, criteria: &FilterCriteria) -> String;

    /// All four blocks for one selection
    fn format_report(&self, report: &StatsReport) -> String;
}

/// Table formatter for human-readable output
///
/// Produces ASCII tables suitable for terminal display. Counts get
/// thousands separators and durations are shown in whole hours and minutes.
pub struct TableFormatter {
    /// Whether to color section headings (respects NO_COLOR)
    colored_output: bool,
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl TableFormatter {
    /// Create a new TableFormatter, coloring unless NO_COLOR is set
    pub fn new() -> Self {
        Self {
            colored_output: std::env::var("NO_COLOR").is_err(),
        }
    }

    /// Formatter that never emits ANSI escapes
    pub fn plain() -> Self {
        Self {
            colored_output: false,
        }
    }

    /// Format a number with thousands separators
    fn format_number(n: usize) -> String {
        let s = n.to_string();
        let mut result = String::new();

        for (count, ch) in s.chars().rev().enumerate() {
            if count > 0 && count % 3 == 0 {
                result.push(',');
            }
            result.push(ch);
        }

        result.chars().rev().collect()
    }

    fn heading(&self, text: &str) -> String {
        if self.colored_output {
            format!("\n{}\n", text.bold().cyan())
        } else {
            format!("\n{text}\n")
        }
    }

    fn key_value_table(rows: &[(&str, String)]) -> String {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
        table.set_titles(row![b -> "Statistic", b -> "Value"]);
        for (label, value) in rows {
            table.add_row(row![label, r -> value]);
        }
        table.to_string()
    }

    fn occurrences(count: usize) -> String {
        format!("{} occurrences", Self::format_number(count))
    }
}

impl OutputFormatter for TableFormatter {
    fn format_selection(&self, criteria: &FilterCriteria, trips: usize) -> String {
        let mut output = format!(
            "We found a total of {} rides for your criteria:\n",
            Self::format_number(trips)
        );
        output.push_str(&format!(" City: {}\n", criteria.city));
        output.push_str(&format!(" Month: {}\n", criteria.month));
        output.push_str(&format!(" Day: {}\n", criteria.day));
        output
    }

    fn format_time_stats(&self, stats: &TimeStats) -> String {
        let mut output = self.heading("The Most Frequent Times of Travel");
        output.push_str(&Self::key_value_table(&[
            (
                "Most common month",
                format!(
                    "{} ({})",
                    month_name(stats.month.value),
                    Self::occurrences(stats.month.count)
                ),
            ),
            (
                "Most common day of week",
                format!(
                    "{} ({})",
                    weekday_name(stats.weekday.value),
                    Self::occurrences(stats.weekday.count)
                ),
            ),
            (
                "Most common start hour",
                format!(
                    "{} ({})",
                    stats.start_hour.value,
                    Self::occurrences(stats.start_hour.count)
                ),
            ),
        ]));
        output
    }

    fn format_station_stats(&self, stats: &StationStats) -> String {
        let mut output = self.heading("The Most Popular Stations and Trip");
        output.push_str(&Self::key_value_table(&[
            (
                "Most common start station",
                format!(
                    "{} ({})",
                    stats.start_station.key,
                    Self::occurrences(stats.start_station.count)
                ),
            ),
            (
                "Most common end station",
                format!(
                    "{} ({})",
                    stats.end_station.key,
                    Self::occurrences(stats.end_station.count)
                ),
            ),
            (
                "Most frequent route",
                format!(
                    "{} ({})",
                    stats.route.key,
                    Self::occurrences(stats.route.count)
                ),
            ),
        ]));
        output
    }

    fn format_duration_stats(&self, stats: &DurationStats) -> String {
        let mut output = self.heading("Trip Duration");
        output.push_str(&Self::key_value_table(&[
            ("Total travel time", format!("{} hours", stats.total_hours)),
            (
                "Average trip duration",
                format!("{} minutes", stats.mean_minutes),
            ),
            (
                "Trips",
                Self::format_number(stats.summary.count),
            ),
        ]));
        output
    }

    fn format_user_stats(&self, stats: &UserStats) -> String {
        let mut output = self.heading("User Stats");

        let mut rows: Vec<(&str, String)> = stats
            .user_types
            .categories
            .iter()
            .map(|c| (c.label.as_str(), Self::format_number(c.count)))
            .collect();

        if let Some(gender) = &stats.gender {
            rows.extend(
                gender
                    .categories
                    .iter()
                    .map(|c| (c.label.as_str(), Self::format_number(c.count))),
            );
        }

        if let Some(birth_years) = &stats.birth_years {
            match &birth_years.range {
                Some(range) => {
                    rows.push(("Earliest birth year", range.earliest.to_string()));
                    rows.push(("Latest birth year", range.latest.to_string()));
                    rows.push(("Most common birth year", range.most_common.to_string()));
                }
                None => rows.push(("Birth years", "none recorded".to_string())),
            }
            rows.push((
                "Unspecified birth year",
                Self::format_number(birth_years.missing),
            ));
        }

        output.push_str(&Self::key_value_table(&rows));
        output
    }

    fn format_sample(&self, records: &[TripRecord], offset: usize) -> String {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
        table.set_titles(row![
            b -> "#",
            b -> "Start Time",
            b -> "End Time",
            b -> "Duration (s)",
            b -> "Start Station",
            b -> "End Station",
            b -> "User Type",
            b -> "Gender",
            b -> "Birth Year"
        ]);

        for (i, record) in records.iter().enumerate() {
            table.add_row(row![
                r -> offset + i,
                record.start_time().format("%Y-%m-%d %H:%M:%S"),
                record
                    .end_time()
                    .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                    .unwrap_or_else(|| "-".to_string()),
                r -> record.trip_duration_seconds(),
                record.start_station(),
                record.end_station(),
                record.user_type(),
                record.gender().map_or("-", |g| g.label()),
                record
                    .birth_year()
                    .map_or_else(|| "-".to_string(), |y| y.to_string())
            ]);
        }

        table.to_string()
    }

    fn format_no_data(&self, criteria: &FilterCriteria) -> String {
        format!(
            "There is no data for the options you've selected:\n City: {}\n Month: {}\n Day: {}\n",
            criteria.city, criteria.month, criteria.day
        )
    }

    fn format_report(&self, report: &StatsReport) -> String {
        let mut output = self.format_selection(&report.criteria, report.trips);
        output.push_str(&self.format_time_stats(&report.time));
        output.push_str(&self.format_station_stats(&report.stations));
        output.push_str(&self.format_duration_stats(&report.durations));
        output.push_str(&self.format_user_stats(&report.users));
        output
    }
}

/// JSON formatter for machine-readable output
///
/// Produces JSON output suitable for further processing by other tools.
/// Durations carry both the raw seconds and the truncated display units.
pub struct JsonFormatter;

impl JsonFormatter {
    fn selection_json(criteria: &FilterCriteria) -> serde_json::Value {
        json!({
            "city": criteria.city.display_name(),
            "month": criteria.month.to_string(),
            "day": criteria.day.to_string(),
        })
    }

    fn time_json(stats: &TimeStats) -> serde_json::Value {
        json!({
            "month": { "value": month_name(stats.month.value), "number": stats.month.value, "count": stats.month.count },
            "weekday": { "value": weekday_name(stats.weekday.value), "count": stats.weekday.count },
            "start_hour": { "value": stats.start_hour.value, "count": stats.start_hour.count },
        })
    }

    fn duration_json(stats: &DurationStats) -> serde_json::Value {
        json!({
            "total_seconds": stats.summary.sum,
            "mean_seconds": stats.summary.mean,
            "min_seconds": stats.summary.min,
            "max_seconds": stats.summary.max,
            "trips": stats.summary.count,
            "total_hours": stats.total_hours,
            "mean_minutes": stats.mean_minutes,
        })
    }

    fn pretty(value: &serde_json::Value) -> String {
        serde_json::to_string_pretty(value).unwrap_or_default()
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_selection(&self, criteria: &FilterCriteria, trips: usize) -> String {
        Self::pretty(&json!({
            "selection": Self::selection_json(criteria),
            "trips": trips,
        }))
    }

    fn format_time_stats(&self, stats: &TimeStats) -> String {
        Self::pretty(&json!({ "time": Self::time_json(stats) }))
    }

    fn format_station_stats(&self, stats: &StationStats) -> String {
        Self::pretty(&json!({ "stations": stats }))
    }

    fn format_duration_stats(&self, stats: &DurationStats) -> String {
        Self::pretty(&json!({ "durations": Self::duration_json(stats) }))
    }

    fn format_user_stats(&self, stats: &UserStats) -> String {
        Self::pretty(&json!({ "users": stats }))
    }

    fn format_sample(&self, records: &[TripRecord], offset: usize) -> String {
        Self::pretty(&json!({
            "offset": offset,
            "trips": records.iter().map(|r| json!({
                "start_time": r.start_time().format("%Y-%m-%d %H:%M:%S").to_string(),
                "end_time": r.end_time().map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string()),
                "trip_duration_seconds": r.trip_duration_seconds(),
                "start_station": r.start_station(),
                "end_station": r.end_station(),
                "user_type": r.user_type().label(),
                "gender": r.gender().map(|g| g.label()),
                "birth_year": r.birth_year(),
            })).collect::<Vec<_>>(),
        }))
    }

    fn format_no_data(&self, criteria: &FilterCriteria) -> String {
        Self::pretty(&json!({
            "selection": Self::selection_json(criteria),
            "trips": 0,
            "error": "no data for this selection",
        }))
    }

    fn format_report(&self, report: &StatsReport) -> String {
        Self::pretty(&json!({
            "selection": Self::selection_json(&report.criteria),
            "trips": report.trips,
            "time": Self::time_json(&report.time),
            "stations": report.stations,
            "durations": Self::duration_json(&report.durations),
            "users": report.users,
        }))
    }
}

/// Get appropriate formatter based on JSON flag
///
/// # Examples
///
/// ```
/// use bikeshare::output::get_formatter;
/// use bikeshare::filters::FilterCriteria;
/// use bikeshare::types::City;
///
/// let formatter = get_formatter(true);
/// let output = formatter.format_selection(&FilterCriteria::new(City::Chicago), 42);
/// assert!(output.contains("\"trips\": 42"));
/// ```
pub fn get_formatter(json: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonFormatter)
    } else {
        Box::new(TableFormatter::new())
    }
}
