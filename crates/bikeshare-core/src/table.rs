//! Record table: the in-memory trip log for one query session
//!
//! A [`RecordTable`] is built once from the raw rows of a city dataset,
//! filtered by a [`FilterCriteria`], and handed to the
//! [`Aggregator`](crate::aggregation::Aggregator). Tables are immutable;
//! filtering always produces a new table and keeps source order.
//!
//! # Examples
//!
//! ```
//! use bikeshare_core::filters::FilterCriteria;
//! use bikeshare_core::table::RecordTable;
//! use bikeshare_core::types::{City, DatasetSchema, MonthSelection, RawTripRow};
//!
//! let rows = vec![RawTripRow {
//!     start_time: "2017-01-01 09:07:57".to_string(),
//!     trip_duration: "1039".to_string(),
//!     start_station: "Wood St & Hubbard St".to_string(),
//!     end_station: "Damen Ave & Chicago Ave".to_string(),
//!     user_type: Some("Subscriber".to_string()),
//!     ..Default::default()
//! }];
//!
//! let criteria = FilterCriteria::new(City::Chicago).with_month(MonthSelection::Only(2));
//! let table = RecordTable::construct(&rows, DatasetSchema::full(), &criteria).unwrap();
//!
//! // No February trips: an empty table, not an error
//! assert!(table.is_empty());
//! ```

use crate::error::Result;
use crate::filters::FilterCriteria;
use crate::types::{DatasetSchema, RawTripRow, TripRecord};
use tracing::debug;

/// Ordered, immutable collection of trip records
#[derive(Debug, Clone, PartialEq)]
pub struct RecordTable {
    records: Vec<TripRecord>,
    schema: DatasetSchema,
}

impl RecordTable {
    /// Wrap already validated records
    pub fn new(records: Vec<TripRecord>, schema: DatasetSchema) -> Self {
        Self { records, schema }
    }

    /// Validate every raw row without filtering
    ///
    /// # Errors
    ///
    /// Fails on the first row with a malformed start time or an invalid
    /// cell; no partial table is returned.
    pub fn from_rows(rows: &[RawTripRow], schema: DatasetSchema) -> Result<Self> {
        let records = rows
            .iter()
            .enumerate()
            .map(|(idx, raw)| TripRecord::from_raw(idx + 1, raw))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::new(records, schema))
    }

    /// Validate raw rows and keep the ones matching `criteria`, in one pass
    ///
    /// Rows that would be filtered out are still validated, so a malformed
    /// timestamp anywhere in the batch fails the whole load.
    pub fn construct(
        rows: &[RawTripRow],
        schema: DatasetSchema,
        criteria: &FilterCriteria,
    ) -> Result<Self> {
        let mut records = Vec::new();

        for (idx, raw) in rows.iter().enumerate() {
            let record = TripRecord::from_raw(idx + 1, raw)?;
            if criteria.matches(&record) {
                records.push(record);
            }
        }

        debug!(
            "Kept {} of {} rows for {} / month {} / day {}",
            records.len(),
            rows.len(),
            criteria.city,
            criteria.month,
            criteria.day
        );

        Ok(Self::new(records, schema))
    }

    /// New table holding the records that match `criteria`
    pub fn filter(&self, criteria: &FilterCriteria) -> Self {
        Self {
            records: self
                .records
                .iter()
                .filter(|r| criteria.matches(r))
                .cloned()
                .collect(),
            schema: self.schema,
        }
    }

    /// Up to `count` records starting at `offset`
    ///
    /// Returns fewer records near the end of the table and an empty slice
    /// when `offset` is past it.
    pub fn sample(&self, offset: usize, count: usize) -> &[TripRecord] {
        let start = offset.min(self.records.len());
        let end = start.saturating_add(count).min(self.records.len());
        &self.records[start..end]
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn schema(&self) -> DatasetSchema {
        self.schema
    }

    pub fn records(&self) -> &[TripRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TripRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a RecordTable {
    type Item = &'a TripRecord;
    type IntoIter = std::slice::Iter<'a, TripRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
