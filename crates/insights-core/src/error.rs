use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the campaign insights crates.
#[derive(Error, Debug)]
pub enum InsightsError {
    /// The input file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input file is not well-formed CSV.
    #[error("Malformed CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The input file has a header but no data rows.
    #[error("Dataset {0} contains no campaign rows")]
    EmptyDataset(PathBuf),

    /// An aggregation was asked to summarise zero campaign records.
    #[error("No campaign records to aggregate")]
    NoRecords,

    /// A column required by the campaign schema is absent from the header.
    #[error("Missing required column: {column}")]
    MissingColumn { column: String },

    /// A required field holds a null, unparseable or out-of-range value.
    #[error("Invalid value {value:?} in column {column} at row {row}: {reason}")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
        reason: String,
    },

    /// An output file could not be written.
    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The plotting backend failed while drawing a chart.
    #[error("Failed to render chart {path}: {message}")]
    Chart { path: PathBuf, message: String },

    /// A summary could not be serialised to JSON.
    #[error("Failed to serialise JSON: {0}")]
    JsonSerialize(#[from] serde_json::Error),
}

/// Convenience alias used throughout the insights crates.
pub type Result<T> = std::result::Result<T, InsightsError>;
