//! Source trait for trip datasets
//!
//! This module defines the `TripSource` trait that dataset loaders
//! implement. The CSV loader in the main binary is one implementation; tests
//! use in-memory sources.

use crate::error::Result;
use crate::filters::FilterCriteria;
use crate::table::RecordTable;
use crate::types::{City, DatasetSchema, RawTripRow};
use async_trait::async_trait;

/// Raw rows of one city's dataset plus the optional columns it carries
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedDataset {
    pub rows: Vec<RawTripRow>,
    pub schema: DatasetSchema,
}

impl LoadedDataset {
    /// Build the filtered table for `criteria`
    pub fn into_table(&self, criteria: &FilterCriteria) -> Result<RecordTable> {
        RecordTable::construct(&self.rows, self.schema, criteria)
    }
}

/// Trait for loaders that produce the raw rows of a city dataset.
#[async_trait]
pub trait TripSource: Send + Sync {
    /// Load every row for `city`, in file order.
    async fn load(&self, city: City) -> Result<LoadedDataset>;
}
