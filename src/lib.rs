//! bikeshare - Explore US bike-share trip data from city CSV files
//!
//! This library provides functionality to:
//! - Load the Chicago, New York City and Washington trip datasets
//! - Filter trips by month and day of week
//! - Compute popular travel times, stations, trip durations and rider stats
//! - Generate reports in table and JSON formats
//! - Run the interactive question-and-answer session
//!
//! # Examples
//!
//! ```no_run
//! use bikeshare::{
//!     data_loader::DataLoader,
//!     filters::FilterCriteria,
//!     report::StatsReport,
//!     types::City,
//! };
//!
//! #[tokio::main]
//! async fn main() -> bikeshare::Result<()> {
//!     let loader = DataLoader::new("./data");
//!     let criteria = FilterCriteria::parse("chicago", "june", "all")?;
//!
//!     let dataset = loader.load_city(criteria.city).await?;
//!     let table = dataset.into_table(&criteria)?;
//!     let report = StatsReport::compute(criteria, &table)?;
//!
//!     println!("Busiest month: {}", report.time.month.value);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod data_loader;
pub mod output;
pub mod report;
pub mod session;

// Core modules live in bikeshare-core
pub use bikeshare_core::{
    aggregation, aggregation_types, error, filters, source, table, types,
};

// Re-export commonly used types
pub use bikeshare_core::{BikeshareError, Result};
pub use bikeshare_core::{City, DatasetSchema, DaySelection, MonthSelection, TripRecord};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
