//! Interactive question-and-answer session
//!
//! The session asks for a city, a month and a day of week, re-prompting
//! until each answer is valid. It then offers the raw trips a page at a
//! time, prints the four statistics blocks with the time each took, and
//! offers to start over.
//!
//! The session is generic over its input and output so it can be driven by
//! a script in tests. End of input at any prompt ends the session cleanly.

use crate::aggregation::Aggregator;
use crate::error::Result;
use crate::filters::FilterCriteria;
use crate::output::OutputFormatter;
use crate::source::TripSource;
use crate::table::RecordTable;
use crate::types::{City, DaySelection, MonthSelection};
use std::fmt::Display;
use std::io::{BufRead, Write};
use std::str::FromStr;
use std::time::Instant;
use tracing::{debug, info};

/// Raw trips shown per page
pub const PAGE_SIZE: usize = 10;

/// Position in the raw-data pager
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SamplePage {
    pub offset: usize,
}

impl SamplePage {
    pub fn next(self) -> Self {
        Self {
            offset: self.offset + PAGE_SIZE,
        }
    }
}

/// What the user chose after one pass through the statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Restart,
    Finish,
}

/// Prompt loop over a reader and a writer
pub struct Session<R, W> {
    input: R,
    output: W,
    formatter: Box<dyn OutputFormatter>,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(input: R, output: W, formatter: Box<dyn OutputFormatter>) -> Self {
        Self {
            input,
            output,
            formatter,
        }
    }

    /// Give back the writer, e.g. to inspect a scripted run
    pub fn into_output(self) -> W {
        self.output
    }

    /// Run selections against `source` until the user declines a restart
    pub async fn run(&mut self, source: &dyn TripSource) -> Result<()> {
        writeln!(self.output, "Hello! Let's explore some US bikeshare data!")?;

        loop {
            let Some(criteria) = self.select()? else {
                break;
            };
            info!("Interactive selection {:?}", criteria);

            let dataset = source.load(criteria.city).await?;
            let table = dataset.into_table(&criteria)?;

            if self.explore(&criteria, &table)? == Outcome::Finish {
                break;
            }
        }

        writeln!(self.output, "Goodbye!")?;
        Ok(())
    }

    /// Ask for city, month and day; `None` when input ends first
    pub fn select(&mut self) -> Result<Option<FilterCriteria>> {
        let Some(city) = self.ask::<City>(
            "Would you like to see data for Chicago, New York City, or Washington?",
        )?
        else {
            return Ok(None);
        };
        let Some(month) = self.ask::<MonthSelection>(
            "Which month? Any month name from January to December, or all?",
        )?
        else {
            return Ok(None);
        };
        let Some(day) = self.ask::<DaySelection>(
            "Which day? Monday, Tuesday, Wednesday, Thursday, Friday, Saturday, Sunday, or all?",
        )?
        else {
            return Ok(None);
        };

        Ok(Some(
            FilterCriteria::new(city).with_month(month).with_day(day),
        ))
    }

    fn explore(&mut self, criteria: &FilterCriteria, table: &RecordTable) -> Result<Outcome> {
        if table.is_empty() {
            write!(self.output, "{}", self.formatter.format_no_data(criteria))?;
        } else {
            write!(
                self.output,
                "{}",
                self.formatter.format_selection(criteria, table.len())
            )?;
            self.page_raw_data(table, SamplePage::default())?;
            self.show_stats(table)?;
        }

        match self.ask_yes_no("Would you like to restart? Enter yes or no.")? {
            Some(true) => Ok(Outcome::Restart),
            _ => Ok(Outcome::Finish),
        }
    }

    /// Offer pages of raw trips starting at `page` until declined or exhausted
    pub fn page_raw_data(&mut self, table: &RecordTable, mut page: SamplePage) -> Result<()> {
        loop {
            let question = if page.offset == 0 {
                "Would you like to see 10 rows of raw data? Enter yes or no."
            } else {
                "Would you like to see 10 more rows? Enter yes or no."
            };
            if self.ask_yes_no(question)? != Some(true) {
                return Ok(());
            }

            let rows = table.sample(page.offset, PAGE_SIZE);
            debug!("Showing {} rows from offset {}", rows.len(), page.offset);
            writeln!(self.output, "{}", self.formatter.format_sample(rows, page.offset))?;

            page = page.next();
            if page.offset >= table.len() {
                writeln!(self.output, "No more trips to show.")?;
                return Ok(());
            }
        }
    }

    fn show_stats(&mut self, table: &RecordTable) -> Result<()> {
        let aggregator = Aggregator::new(table);

        let start = Instant::now();
        let block = self.formatter.format_time_stats(&aggregator.time_stats()?);
        self.write_timed(&block, start)?;

        let start = Instant::now();
        let block = self
            .formatter
            .format_station_stats(&aggregator.station_stats()?);
        self.write_timed(&block, start)?;

        let start = Instant::now();
        let block = self
            .formatter
            .format_duration_stats(&aggregator.duration_stats()?);
        self.write_timed(&block, start)?;

        let start = Instant::now();
        let block = self.formatter.format_user_stats(&aggregator.user_stats()?);
        self.write_timed(&block, start)?;

        Ok(())
    }

    fn write_timed(&mut self, block: &str, start: Instant) -> Result<()> {
        writeln!(self.output, "{block}")?;
        writeln!(
            self.output,
            "This took {:.4} seconds.",
            start.elapsed().as_secs_f64()
        )?;
        writeln!(self.output, "{}", "-".repeat(40))?;
        Ok(())
    }

    /// Read one trimmed line; `None` at end of input
    fn prompt(&mut self, question: &str) -> Result<Option<String>> {
        writeln!(self.output, "\n{question}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Re-prompt until the answer parses as `T`
    fn ask<T>(&mut self, question: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: Display,
    {
        loop {
            let Some(answer) = self.prompt(question)? else {
                return Ok(None);
            };
            match answer.parse::<T>() {
                Ok(value) => return Ok(Some(value)),
                Err(e) => writeln!(self.output, "Invalid input: {e}. Please try again.")?,
            }
        }
    }

    fn ask_yes_no(&mut self, question: &str) -> Result<Option<bool>> {
        loop {
            let Some(answer) = self.prompt(question)? else {
                return Ok(None);
            };
            match answer.to_lowercase().as_str() {
                "yes" | "y" => return Ok(Some(true)),
                "no" | "n" => return Ok(Some(false)),
                _ => writeln!(self.output, "Please answer yes or no.")?,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::TableFormatter;
    use crate::source::LoadedDataset;
    use crate::types::{DatasetSchema, RawTripRow, TripRecord, UserType, parse_timestamp};
    use async_trait::async_trait;
    use chrono::Weekday;
    use std::io::Cursor;

    struct MemorySource(LoadedDataset);

    #[async_trait]
    impl TripSource for MemorySource {
        async fn load(&self, _city: City) -> Result<LoadedDataset> {
            Ok(self.0.clone())
        }
    }

    fn row(ts: &str, start: &str, end: &str) -> RawTripRow {
        RawTripRow {
            start_time: ts.to_string(),
            trip_duration: "600".to_string(),
            start_station: start.to_string(),
            end_station: end.to_string(),
            user_type: Some("Subscriber".to_string()),
            ..Default::default()
        }
    }

    fn session(script: &str) -> Session<Cursor<Vec<u8>>, Vec<u8>> {
        Session::new(
            Cursor::new(script.as_bytes().to_vec()),
            Vec::new(),
            Box::new(TableFormatter::plain()),
        )
    }

    fn table_of(n: usize) -> RecordTable {
        let start = parse_timestamp("2017-01-02 08:00:00").unwrap();
        RecordTable::new(
            (0..n)
                .map(|i| {
                    TripRecord::new(start, format!("S{i}"), "End", 60, UserType::Subscriber)
                })
                .collect(),
            DatasetSchema::minimal(),
        )
    }

    #[test]
    fn test_select_reprompts_until_valid() {
        let mut s = session("boston\nwashington\nsmarch\nMAY\nfunday\nfriday\n");
        let criteria = s.select().unwrap().unwrap();

        assert_eq!(criteria.city, City::Washington);
        assert_eq!(criteria.month, MonthSelection::Only(5));
        assert_eq!(criteria.day, DaySelection::Only(Weekday::Fri));

        let output = String::from_utf8(s.into_output()).unwrap();
        assert_eq!(output.matches("Invalid input").count(), 3);
    }

    #[test]
    fn test_select_offers_and_accepts_every_month() {
        let mut s = session("chicago\ndecember\nall\n");
        let criteria = s.select().unwrap().unwrap();
        assert_eq!(criteria.month, MonthSelection::Only(12));

        let output = String::from_utf8(s.into_output()).unwrap();
        assert!(output.contains("January to December"));
    }

    #[test]
    fn test_select_ends_on_eof() {
        let mut s = session("chicago\n");
        assert!(s.select().unwrap().is_none());
    }

    #[test]
    fn test_page_raw_data_stops_at_end() {
        let table = table_of(15);
        let mut s = session("yes\nyes\nyes\n");
        s.page_raw_data(&table, SamplePage::default()).unwrap();

        let output = String::from_utf8(s.into_output()).unwrap();
        assert!(output.contains("S0"));
        assert!(output.contains("S14"));
        assert!(output.contains("No more trips to show."));
        // Only two pages were offered
        assert_eq!(output.matches("Enter yes or no.").count(), 2);
    }

    #[test]
    fn test_page_raw_data_declined() {
        let table = table_of(15);
        let mut s = session("maybe\nno\n");
        s.page_raw_data(&table, SamplePage::default()).unwrap();

        let output = String::from_utf8(s.into_output()).unwrap();
        assert!(output.contains("Please answer yes or no."));
        assert!(!output.contains("S0"));
    }

    #[test]
    fn test_sample_page_next() {
        assert_eq!(SamplePage::default().next().offset, PAGE_SIZE);
        assert_eq!(SamplePage { offset: 20 }.next().offset, 30);
    }

    #[tokio::test]
    async fn test_restart_prompt_requires_yes_or_no() {
        let source = MemorySource(LoadedDataset {
            rows: vec![row("2017-01-02 08:00:00", "Union Station", "Dupont Circle")],
            schema: DatasetSchema::minimal(),
        });

        // An unclear answer to the restart question is asked again, not taken as "no"
        let mut s = session("washington\nall\nall\nno\nsure\nno\n");
        s.run(&source).await.unwrap();

        let output = String::from_utf8(s.into_output()).unwrap();
        assert_eq!(output.matches("Would you like to restart?").count(), 2);
        assert_eq!(output.matches("Please answer yes or no.").count(), 1);
        assert_eq!(output.matches("We found a total of").count(), 1);
        assert!(output.contains("Goodbye!"));
    }

    #[tokio::test]
    async fn test_full_run_with_restart() {
        let source = MemorySource(LoadedDataset {
            rows: vec![
                row("2017-01-02 08:00:00", "Union Station", "Dupont Circle"),
                row("2017-01-09 09:00:00", "Union Station", "Eastern Market"),
            ],
            schema: DatasetSchema::minimal(),
        });

        // First pass: January, all days, no raw data, restart.
        // Second pass: February has no trips, decline restart.
        let mut s = session("washington\njanuary\nall\nno\nyes\nwashington\nfebruary\nall\nno\n");
        s.run(&source).await.unwrap();

        let output = String::from_utf8(s.into_output()).unwrap();
        assert!(output.contains("We found a total of 2 rides"));
        assert!(output.contains("Union Station"));
        assert_eq!(output.matches("This took").count(), 4);
        assert!(output.contains("There is no data"));
        assert!(output.contains("Goodbye!"));
    }
}
