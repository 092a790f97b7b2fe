//! Data loader module for city trip CSV files
//!
//! Each city has one dataset file inside the data directory:
//!
//! - `chicago.csv`
//! - `new_york_city.csv`
//! - `washington.csv`
//!
//! The data directory defaults to the current directory and can be set with
//! `--data-dir` or the `BIKESHARE_DATA_PATH` environment variable.
//!
//! Files are read whole (the datasets are a few hundred thousand rows) and
//! decoded with the `csv` crate into [`RawTripRow`]s. The header row decides
//! which optional columns the dataset carries; Washington, for instance, has
//! neither `Gender` nor `Birth Year`.
//!
//! # Examples
//!
//! ```no_run
//! use bikeshare::data_loader::DataLoader;
//! use bikeshare::filters::FilterCriteria;
//! use bikeshare::types::City;
//!
//! # async fn example() -> bikeshare::Result<()> {
//! let loader = DataLoader::new("./data");
//! let dataset = loader.load_city(City::Chicago).await?;
//!
//! let table = dataset.into_table(&FilterCriteria::new(City::Chicago))?;
//! println!("{} trips", table.len());
//! # Ok(())
//! # }
//! ```

use crate::error::{BikeshareError, Result};
use crate::source::{LoadedDataset, TripSource};
use crate::types::{City, DatasetSchema, RawTripRow};
use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Columns every dataset must carry
const REQUIRED_COLUMNS: &[&str] = &[
    "Start Time",
    "Trip Duration",
    "Start Station",
    "End Station",
];

const GENDER_COLUMN: &str = "Gender";
const BIRTH_YEAR_COLUMN: &str = "Birth Year";

/// Loader for the per-city CSV datasets
pub struct DataLoader {
    data_dir: PathBuf,
    show_progress: bool,
}

impl DataLoader {
    /// Create a loader reading from `data_dir`
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            show_progress: false,
        }
    }

    /// Enable or disable the loading spinner
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the dataset file for `city`
    pub fn dataset_path(&self, city: City) -> PathBuf {
        self.data_dir.join(city.file_name())
    }

    /// Read and decode the dataset for `city`
    ///
    /// # Errors
    ///
    /// Returns [`BikeshareError::Config`] when the file does not exist,
    /// [`BikeshareError::Parse`] when a required column is missing, and
    /// [`BikeshareError::Csv`] for undecodable rows.
    pub async fn load_city(&self, city: City) -> Result<LoadedDataset> {
        let path = self.dataset_path(city);
        info!("Loading {} trips from {}", city, path.display());

        let bytes = tokio::fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                BikeshareError::Config(format!(
                    "dataset for {} not found at {} (set --data-dir or BIKESHARE_DATA_PATH)",
                    city,
                    path.display()
                ))
            } else {
                BikeshareError::Io(e)
            }
        })?;

        let progress = if self.show_progress {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg} [{elapsed_precise}] {pos} rows read")
            {
                pb.set_style(style);
            }
            pb.set_message(format!("Loading {city} data"));
            pb.enable_steady_tick(std::time::Duration::from_millis(100));
            Some(pb)
        } else {
            None
        };

        let dataset = parse_dataset_with_progress(bytes.as_slice(), &path, progress.as_ref());

        if let Some(pb) = progress {
            match &dataset {
                Ok(d) => pb.finish_with_message(format!("Loaded {} rows", d.rows.len())),
                Err(_) => pb.abandon_with_message("Load failed"),
            }
        }

        let dataset = dataset?;
        info!(
            "Loaded {} rows (gender: {}, birth year: {})",
            dataset.rows.len(),
            dataset.schema.has_gender,
            dataset.schema.has_birth_year
        );
        Ok(dataset)
    }
}

#[async_trait]
impl TripSource for DataLoader {
    async fn load(&self, city: City) -> Result<LoadedDataset> {
        self.load_city(city).await
    }
}

/// Decode a trip CSV from any reader
///
/// `file` is only used for error context.
pub fn parse_dataset<R: Read>(reader: R, file: &Path) -> Result<LoadedDataset> {
    parse_dataset_with_progress(reader, file, None)
}

fn parse_dataset_with_progress<R: Read>(
    reader: R,
    file: &Path,
    progress: Option<&ProgressBar>,
) -> Result<LoadedDataset> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let has_column = |name: &str| headers.iter().any(|h| h == name);

    for column in REQUIRED_COLUMNS {
        if !has_column(column) {
            return Err(BikeshareError::Parse {
                file: file.to_path_buf(),
                error: format!("missing required column '{column}'"),
            });
        }
    }

    let schema = DatasetSchema {
        has_gender: has_column(GENDER_COLUMN),
        has_birth_year: has_column(BIRTH_YEAR_COLUMN),
    };
    debug!("Detected schema {:?} for {}", schema, file.display());

    let mut rows = Vec::new();
    for result in rdr.deserialize::<RawTripRow>() {
        rows.push(result?);
        if let Some(pb) = progress {
            pb.inc(1);
        }
    }

    Ok(LoadedDataset { rows, schema })
}
