//! Core types, table and aggregations for bikeshare
//!
//! This crate provides the trip record model, the filterable record table,
//! and the pure statistics queries run over it. It does no I/O of its own
//! beyond the [`source::TripSource`] trait that loaders implement.

pub mod aggregation;
pub mod aggregation_types;
pub mod error;
pub mod filters;
pub mod source;
pub mod table;
pub mod types;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types
pub use error::{BikeshareError, Result};
pub use table::RecordTable;
pub use types::{City, DatasetSchema, DaySelection, MonthSelection, RawTripRow, TripRecord};
