//! Filtering module for trip records
//!
//! A [`FilterCriteria`] names the city whose dataset is analysed and the
//! optional month and day-of-week constraints. Month and day are
//! AND-combined; `all` on either dimension leaves it unconstrained.
//!
//! # Examples
//!
//! ```
//! use bikeshare_core::filters::FilterCriteria;
//! use bikeshare_core::types::{City, DaySelection, MonthSelection};
//! use chrono::Weekday;
//!
//! // Fridays in June, Chicago
//! let criteria = FilterCriteria::new(City::Chicago)
//!     .with_month(MonthSelection::Only(6))
//!     .with_day(DaySelection::Only(Weekday::Fri));
//!
//! // Or straight from user-supplied tokens
//! let parsed = FilterCriteria::parse("chicago", "June", "friday").unwrap();
//! assert_eq!(parsed, criteria);
//! ```

use crate::error::Result;
use crate::types::{City, DaySelection, MonthSelection, TripRecord};
use serde::{Deserialize, Serialize};

/// City, month and day selection for one query session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub city: City,
    pub month: MonthSelection,
    pub day: DaySelection,
}

impl FilterCriteria {
    /// Create criteria for a city with no month or day restriction
    pub fn new(city: City) -> Self {
        Self {
            city,
            month: MonthSelection::All,
            day: DaySelection::All,
        }
    }

    /// Parse the three selection tokens, case-insensitively
    pub fn parse(city: &str, month: &str, day: &str) -> Result<Self> {
        Ok(Self {
            city: city.parse()?,
            month: month.parse()?,
            day: day.parse()?,
        })
    }

    /// Set the month filter
    pub fn with_month(mut self, month: MonthSelection) -> Self {
        self.month = month;
        self
    }

    /// Set the day-of-week filter
    pub fn with_day(mut self, day: DaySelection) -> Self {
        self.day = day;
        self
    }

    /// True when neither month nor day constrains the table
    pub fn is_unrestricted(&self) -> bool {
        self.month == MonthSelection::All && self.day == DaySelection::All
    }

    /// Check if a record passes the filter
    pub fn matches(&self, record: &TripRecord) -> bool {
        if let Some(month) = self.month.number()
            && record.month() != month
        {
            return false;
        }

        if let Some(day) = self.day.weekday()
            && record.weekday() != day
        {
            return false;
        }

        true
    }
}
