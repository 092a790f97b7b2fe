//! Report assembly for the non-interactive commands
//!
//! [`StatsReport`] bundles the four statistics blocks for one selection.
//! [`render`] maps a CLI [`Command`] onto the matching queries and
//! formatter call.

use crate::aggregation::Aggregator;
use crate::aggregation_types::{DurationStats, StationStats, TimeStats, UserStats};
use crate::cli::Command;
use crate::error::Result;
use crate::filters::FilterCriteria;
use crate::output::OutputFormatter;
use crate::table::RecordTable;
use serde::Serialize;
use tracing::info;

/// Every statistic for one filtered table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsReport {
    pub criteria: FilterCriteria,
    pub trips: usize,
    pub time: TimeStats,
    pub stations: StationStats,
    pub durations: DurationStats,
    pub users: UserStats,
}

impl StatsReport {
    /// Run all four report queries over `table`
    ///
    /// # Errors
    ///
    /// Fails with `EmptyInput` when `table` has no trips.
    pub fn compute(criteria: FilterCriteria, table: &RecordTable) -> Result<Self> {
        let aggregator = Aggregator::new(table);
        Ok(Self {
            criteria,
            trips: table.len(),
            time: aggregator.time_stats()?,
            stations: aggregator.station_stats()?,
            durations: aggregator.duration_stats()?,
            users: aggregator.user_stats()?,
        })
    }
}

/// Render the output of `command` for an already filtered table
///
/// An empty table renders the no-data message instead of failing, and the
/// sample command renders an empty page past the end of the table.
pub fn render(
    command: &Command,
    criteria: &FilterCriteria,
    table: &RecordTable,
    formatter: &dyn OutputFormatter,
) -> Result<String> {
    if table.is_empty() {
        info!("No trips matched {:?}", criteria);
        return Ok(formatter.format_no_data(criteria));
    }

    let aggregator = Aggregator::new(table);
    let output = match command {
        Command::Stats | Command::Interactive => {
            formatter.format_report(&StatsReport::compute(*criteria, table)?)
        }
        Command::Time => formatter.format_time_stats(&aggregator.time_stats()?),
        Command::Stations => formatter.format_station_stats(&aggregator.station_stats()?),
        Command::Durations => formatter.format_duration_stats(&aggregator.duration_stats()?),
        Command::Users => formatter.format_user_stats(&aggregator.user_stats()?),
        Command::Sample(args) => {
            formatter.format_sample(table.sample(args.offset, args.count), args.offset)
        }
    };

    Ok(output)
}
