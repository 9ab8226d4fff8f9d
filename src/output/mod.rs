//! Output writers
//!
//! A run-length aggregating CSV writer and an incremental JSON array writer,
//! both consuming the `(centre, slot)` pair stream one record at a time.

use std::io::Write;
use std::str::FromStr;

use crate::{Centre, DaySlot};

pub mod columns;
pub mod csv;
pub mod json;

pub use columns::{Column, Field};
pub use csv::CsvWriter;
pub use json::JsonWriter;

/// Formatter errors
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// Unknown output format identifier; raised before any network activity
    #[error("invalid output format: {0}")]
    UnknownFormat(String),

    /// IO error on the output sink
    #[error("IO error: {0}")]
    Io(String),

    /// CSV write error
    #[error("CSV error: {0}")]
    Csv(String),

    /// JSON serialization error
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result type for formatter operations
pub type FormatResult<T> = Result<T, FormatError>;

/// Streaming writer of `(centre, slot)` records.
pub trait SlotWriter {
    /// Emit any leading output (CSV header row, JSON opening bracket).
    fn start(&mut self) -> FormatResult<()>;

    /// Consume one record. Emission may be deferred while consecutive records
    /// share a group, but memory use stays bounded by one buffered row.
    fn write(&mut self, centre: &Centre, slot: &DaySlot) -> FormatResult<()>;

    /// Flush any buffered row and emit trailing output.
    fn finish(&mut self) -> FormatResult<()>;
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// One row per slot
    Csv,
    /// One row per centre, available dates aggregated into one cell
    CsvByCentre,
    /// One row per centre and date
    CsvByDate,
    /// JSON array of `{centre, slot}` objects, no grouping
    Json,
}

impl FromStr for OutputFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "csv" => Ok(OutputFormat::Csv),
            "csv_by_centre" => Ok(OutputFormat::CsvByCentre),
            "csv_by_date" => Ok(OutputFormat::CsvByDate),
            "json" => Ok(OutputFormat::Json),
            _ => Err(FormatError::UnknownFormat(s.to_string())),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OutputFormat::Csv => "csv",
            OutputFormat::CsvByCentre => "csv_by_centre",
            OutputFormat::CsvByDate => "csv_by_date",
            OutputFormat::Json => "json",
        };
        write!(f, "{s}")
    }
}

impl OutputFormat {
    /// Build the writer for this format over a sink.
    pub fn writer(self, sink: Box<dyn Write>) -> Box<dyn SlotWriter> {
        match self {
            OutputFormat::Json => Box::new(JsonWriter::new(sink)),
            _ => Box::new(CsvWriter::new(sink, columns::preset(self))),
        }
    }

    /// MIME type of the produced output.
    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Json => "application/json",
            _ => "text/csv",
        }
    }
}
