//! Shared test utilities for unit tests
//!
//! Integration tests (in tests/) cannot access this module because it's
//! marked with #[cfg(test)]. They have their own builders in
//! tests/common/mod.rs.

use crate::types::{Gender, TripRecord, UserType, parse_timestamp};

/// Subscriber trip between two fixed stations starting at `ts`
pub fn trip_at(ts: &str) -> TripRecord {
    TripBuilder::new(ts).build()
}

/// Builder for test trip records
pub struct TripBuilder {
    start: String,
    start_station: String,
    end_station: String,
    duration: u64,
    user_type: UserType,
    gender: Option<Gender>,
    birth_year: Option<i32>,
}

impl TripBuilder {
    pub fn new(start: &str) -> Self {
        Self {
            start: start.to_string(),
            start_station: "Streeter Dr & Grand Ave".to_string(),
            end_station: "Lake Shore Dr & Monroe St".to_string(),
            duration: 600,
            user_type: UserType::Subscriber,
            gender: None,
            birth_year: None,
        }
    }

    pub fn stations(mut self, start: &str, end: &str) -> Self {
        self.start_station = start.to_string();
        self.end_station = end.to_string();
        self
    }

    pub fn duration(mut self, seconds: u64) -> Self {
        self.duration = seconds;
        self
    }

    pub fn user_type(mut self, user_type: UserType) -> Self {
        self.user_type = user_type;
        self
    }

    pub fn gender(mut self, gender: Option<Gender>) -> Self {
        self.gender = gender;
        self
    }

    pub fn birth_year(mut self, year: Option<i32>) -> Self {
        self.birth_year = year;
        self
    }

    pub fn build(self) -> TripRecord {
        let start = parse_timestamp(&self.start).expect("test timestamp should parse");
        TripRecord::new(
            start,
            self.start_station,
            self.end_station,
            self.duration,
            self.user_type,
        )
        .with_gender(self.gender)
        .with_birth_year(self.birth_year)
    }
}
