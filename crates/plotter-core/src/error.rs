use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the plotter crates.
#[derive(Error, Debug)]
pub enum PlotterError {
    /// The first row of a snapshot file matched none of the known layouts.
    #[error("Unknown schema for header: {header}")]
    UnknownSchema { header: String },

    /// A case-count column held something other than a non-negative integer.
    #[error("Malformed {field} count: {value:?}")]
    MalformedCount { field: &'static str, value: String },

    /// A row is narrower than the column the layout expects.
    #[error("Column {field} at index {index} is out of range for a row of width {width}")]
    IndexOutOfRange {
        field: &'static str,
        index: usize,
        width: usize,
    },

    /// The snapshot date could not be derived from a file name.
    #[error("Invalid snapshot filename (expected MM-DD-YYYY.csv): {}", .0.display())]
    InvalidFilename(PathBuf),

    /// A moving-average window is zero or longer than the series.
    #[error("Invalid moving-average window {window} for a series of length {len}")]
    InvalidWindow { window: usize, len: usize },

    /// Summing a metric across the records of one snapshot exceeded `u64`.
    #[error("{field} total for {date} overflows")]
    CountOverflow { field: &'static str, date: String },

    /// A data row failed to normalize.
    #[error("Line {line}: {source}")]
    Row {
        line: u64,
        #[source]
        source: Box<PlotterError>,
    },

    /// A snapshot file failed to ingest; aborts the whole corpus load.
    #[error("Failed to ingest {}: {source}", .path.display())]
    Ingest {
        path: PathBuf,
        #[source]
        source: Box<PlotterError>,
    },

    /// A file could not be opened or read from disk.
    #[error("Failed to read file {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV tokenizer rejected the input.
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

}

impl PlotterError {
    /// Wrap `self` with the 1-based line number of the offending row.
    pub fn at_line(self, line: u64) -> Self {
        PlotterError::Row {
            line,
            source: Box::new(self),
        }
    }

    /// Wrap `self` with the path of the file being ingested.
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        PlotterError::Ingest {
            path: path.into(),
            source: Box::new(self),
        }
    }

    /// Strip the `Ingest` / `Row` context wrappers.
    pub fn root_cause(&self) -> &PlotterError {
        match self {
            PlotterError::Row { source, .. } | PlotterError::Ingest { source, .. } => {
                source.root_cause()
            }
            other => other,
        }
    }
}

/// Convenience alias used throughout the plotter crates.
pub type Result<T> = std::result::Result<T, PlotterError>;
