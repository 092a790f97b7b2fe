//! CLI interface for bikeshare
//!
//! This module defines the command-line interface using clap. The selection
//! flags (`--city`, `--month`, `--day`) are global so every report accepts
//! them.
//!
//! When no subcommand is given, `bikeshare` runs the interactive session
//! unless a city was passed, in which case it prints the full report.
//!
//! # Example
//!
//! ```bash
//! # Every statistic for Chicago trips in June
//! bikeshare --city chicago --month june
//!
//! # Only the station block for Washington Fridays, as JSON
//! bikeshare stations -c washington -d friday --json
//!
//! # Ten raw trips starting at row 20
//! bikeshare sample -c "new york city" --offset 20
//!
//! # Prompt for everything
//! bikeshare interactive
//! ```

use crate::error::{BikeshareError, Result};
use crate::filters::FilterCriteria;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Explore US bike-share trip data
#[derive(Parser, Debug, Clone)]
#[command(name = "bikeshare")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Show informational output (default is quiet mode with only warnings and errors)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Suppress everything but errors
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// City to analyse (chicago, new york city, washington)
    #[arg(long, short = 'c', global = true)]
    pub city: Option<String>,

    /// Month filter: a month name from january to december, or "all"
    #[arg(long, short = 'm', default_value = "all", global = true)]
    pub month: String,

    /// Day-of-week filter: a weekday name, or "all"
    #[arg(long, short = 'd', default_value = "all", global = true)]
    pub day: String,

    /// Directory holding chicago.csv, new_york_city.csv and washington.csv
    #[arg(
        long,
        env = "BIKESHARE_DATA_PATH",
        default_value = ".",
        global = true
    )]
    pub data_dir: PathBuf,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// All four statistics blocks
    Stats,

    /// Most frequent month, day of week and start hour
    Time,

    /// Most popular start station, end station and route
    Stations,

    /// Total and average trip duration
    Durations,

    /// Rider type, gender and birth-year breakdown
    Users,

    /// Print raw trips from the filtered table
    Sample(SampleArgs),

    /// Prompt for city, month and day, then walk through the statistics
    Interactive,
}

/// Arguments for the sample command
#[derive(Args, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleArgs {
    /// Index of the first trip to print
    #[arg(long, default_value = "0")]
    pub offset: usize,

    /// Number of trips to print
    #[arg(long, short = 'n', default_value = "10")]
    pub count: usize,
}

impl Cli {
    /// Filter criteria from the selection flags, `None` without `--city`
    ///
    /// # Errors
    ///
    /// Returns [`BikeshareError::InvalidSelection`] when a token is not
    /// recognized.
    pub fn criteria(&self) -> Result<Option<FilterCriteria>> {
        self.city
            .as_deref()
            .map(|city| FilterCriteria::parse(city, &self.month, &self.day))
            .transpose()
    }

    /// The command to run once defaults are applied
    pub fn resolve_command(&self) -> Command {
        match (&self.command, &self.city) {
            (Some(command), _) => command.clone(),
            (None, Some(_)) => Command::Stats,
            (None, None) => Command::Interactive,
        }
    }

    /// Criteria for a non-interactive command, which needs `--city`
    pub fn require_criteria(&self) -> Result<FilterCriteria> {
        self.criteria()?.ok_or_else(|| {
            BikeshareError::InvalidSelection(
                "--city is required for this command (or run `bikeshare interactive`)"
                    .to_string(),
            )
        })
    }
}
