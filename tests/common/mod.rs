//! Common test utilities and helpers for bikeshare tests
//!
//! This module provides CSV fixture builders and helpers for writing city
//! datasets into temporary data directories.

#![allow(dead_code)]

use bikeshare::{
    data_loader::DataLoader,
    types::{City, DatasetSchema},
};
use once_cell::sync::Lazy;
use std::fmt::Write as _;
use tempfile::TempDir;

// Global mutex to serialize environment variable modifications in tests
pub static ENV_MUTEX: Lazy<std::sync::Mutex<()>> = Lazy::new(|| std::sync::Mutex::new(()));

/// Station names used across tests
pub const TEST_STATIONS: &[&str] = &[
    "Streeter Dr & Grand Ave",
    "Lake Shore Dr & Monroe St",
    "Clinton St & Washington Blvd",
    "Canal St & Adams St",
];

const FULL_HEADER: &str =
    ",Start Time,End Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year";
const MINIMAL_HEADER: &str = ",Start Time,End Time,Trip Duration,Start Station,End Station,User Type";

/// Builder for one CSV trip row
#[derive(Debug, Clone)]
pub struct TripRowBuilder {
    start_time: String,
    end_time: String,
    duration: String,
    start_station: String,
    end_station: String,
    user_type: String,
    gender: String,
    birth_year: String,
}

impl Default for TripRowBuilder {
    fn default() -> Self {
        Self::new("2017-01-02 08:00:00")
    }
}

impl TripRowBuilder {
    /// Create a new builder starting at `start_time` with default values
    pub fn new(start_time: &str) -> Self {
        Self {
            start_time: start_time.to_string(),
            end_time: String::new(),
            duration: "600".to_string(),
            start_station: TEST_STATIONS[0].to_string(),
            end_station: TEST_STATIONS[1].to_string(),
            user_type: "Subscriber".to_string(),
            gender: String::new(),
            birth_year: String::new(),
        }
    }

    pub fn with_stations(mut self, start: &str, end: &str) -> Self {
        self.start_station = start.to_string();
        self.end_station = end.to_string();
        self
    }

    pub fn with_duration(mut self, duration: &str) -> Self {
        self.duration = duration.to_string();
        self
    }

    pub fn with_user_type(mut self, user_type: &str) -> Self {
        self.user_type = user_type.to_string();
        self
    }

    pub fn with_gender(mut self, gender: &str) -> Self {
        self.gender = gender.to_string();
        self
    }

    pub fn with_birth_year(mut self, birth_year: &str) -> Self {
        self.birth_year = birth_year.to_string();
        self
    }

    pub fn with_end_time(mut self, end_time: &str) -> Self {
        self.end_time = end_time.to_string();
        self
    }

    /// Render as a CSV line for `schema`, with `index` in the leading column
    pub fn to_csv(&self, index: usize, schema: DatasetSchema) -> String {
        let mut line = format!(
            "{index},{},{},{},\"{}\",\"{}\",{}",
            self.start_time,
            self.end_time,
            self.duration,
            self.start_station,
            self.end_station,
            self.user_type
        );
        if schema.has_gender {
            let _ = write!(line, ",{},{}", self.gender, self.birth_year);
        }
        line
    }
}

/// Full CSV document for `rows`
///
/// Only the full and minimal column sets occur in the real datasets.
pub fn csv_document(rows: &[TripRowBuilder], schema: DatasetSchema) -> String {
    let header = if schema.has_gender {
        FULL_HEADER
    } else {
        MINIMAL_HEADER
    };
    let mut doc = String::from(header);
    doc.push('\n');
    for (i, row) in rows.iter().enumerate() {
        doc.push_str(&row.to_csv(i, schema));
        doc.push('\n');
    }
    doc
}

/// Write `rows` as the dataset for `city` into a fresh temporary directory
pub fn create_test_data_dir(
    city: City,
    rows: &[TripRowBuilder],
    schema: DatasetSchema,
) -> (TempDir, DataLoader) {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join(city.file_name()),
        csv_document(rows, schema),
    )
    .unwrap();

    let loader = DataLoader::new(temp_dir.path());
    (temp_dir, loader)
}

/// A small Chicago dataset with known statistics
///
/// - months: January x3, March x2, June x1; weekdays: Monday x5, Tuesday x1
/// - start stations: Streeter x3, Canal x3 (Streeter first seen)
/// - durations sum to 10 800 seconds
/// - birth years 1985 and 1990 tie at two each, one is blank
/// - one blank gender
pub fn chicago_rows() -> Vec<TripRowBuilder> {
    vec![
        TripRowBuilder::new("2017-01-02 08:15:00")
            .with_stations("Streeter Dr & Grand Ave", "Canal St & Adams St")
            .with_duration("1200")
            .with_gender("Male")
            .with_birth_year("1985.0"),
        TripRowBuilder::new("2017-01-09 08:45:00")
            .with_stations("Canal St & Adams St", "Streeter Dr & Grand Ave")
            .with_duration("1800")
            .with_gender("Female")
            .with_birth_year("1990.0"),
        TripRowBuilder::new("2017-01-16 17:30:00")
            .with_stations("Streeter Dr & Grand Ave", "Canal St & Adams St")
            .with_duration("600")
            .with_user_type("Customer")
            .with_birth_year("1990.0"),
        TripRowBuilder::new("2017-03-06 08:05:00")
            .with_stations("Canal St & Adams St", "Lake Shore Dr & Monroe St")
            .with_duration("2400")
            .with_gender("Female")
            .with_birth_year("1972.0"),
        TripRowBuilder::new("2017-03-07 12:00:00")
            .with_stations("Streeter Dr & Grand Ave", "Canal St & Adams St")
            .with_duration("3000")
            .with_user_type("Dependent")
            .with_gender("Male"),
        TripRowBuilder::new("2017-06-05 08:30:00")
            .with_stations("Canal St & Adams St", "Lake Shore Dr & Monroe St")
            .with_duration("1800")
            .with_gender("Male")
            .with_birth_year("1985.0"),
    ]
}

/// Assert two floats are within `tolerance`
pub fn assert_approx_eq(a: f64, b: f64, tolerance: f64) {
    assert!(
        (a - b).abs() < tolerance,
        "Values not approximately equal: {a} vs {b} (tolerance: {tolerance})"
    );
}
