//! Error types for bikeshare
//!
//! This module defines the error types used throughout the bikeshare library.
//! All errors are derived from `thiserror` for convenient error handling
//! and automatic `From` implementations.
//!
//! # Example
//!
//! ```
//! use bikeshare_core::error::{BikeshareError, Result};
//!
//! fn example_function() -> Result<()> {
//!     // This will automatically convert io::Error to BikeshareError
//!     let _file = std::fs::read_to_string("nonexistent.csv")?;
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for bikeshare operations
///
/// Table construction and aggregation only ever produce
/// [`MalformedTimestamp`](BikeshareError::MalformedTimestamp),
/// [`InvalidRecord`](BikeshareError::InvalidRecord),
/// [`EmptyInput`](BikeshareError::EmptyInput),
/// [`UnknownField`](BikeshareError::UnknownField) and
/// [`Overflow`](BikeshareError::Overflow). The remaining variants
/// belong to loading and argument handling.
#[derive(Error, Debug)]
pub enum BikeshareError {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV decoding error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A start time could not be parsed; fatal for the whole batch
    #[error("Malformed timestamp in row {row}: '{value}'")]
    MalformedTimestamp {
        /// 1-based data row (header excluded)
        row: usize,
        /// The offending cell
        value: String,
    },

    /// A row carried a value outside its field's domain
    #[error("Invalid record in row {row}: {reason}")]
    InvalidRecord {
        /// 1-based data row (header excluded)
        row: usize,
        /// What was wrong with it
        reason: String,
    },

    /// A query was asked to summarize zero values
    #[error("No data to summarize for {0}")]
    EmptyInput(&'static str),

    /// A query named a field the dataset does not carry
    #[error("Field '{0}' is not available in this dataset")]
    UnknownField(&'static str),

    /// A numeric reduction exceeded the range of its accumulator
    #[error("Total of {0} is too large to summarize")]
    Overflow(&'static str),

    /// City, month or day token not recognized
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    /// Parse error with file context
    #[error("Parse error in {file}: {error}")]
    Parse {
        /// The file that caused the error
        file: PathBuf,
        /// The error message
        error: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience type alias for Results in bikeshare
///
/// # Example
///
/// ```
/// use bikeshare_core::Result;
///
/// fn process_data() -> Result<String> {
///     Ok("Processed successfully".to_string())
/// }
/// ```
pub type Result<T> = std::result::Result<T, BikeshareError>;
