//! Error types shared across the generator, loaders and composer.

use thiserror::Error;

/// Crate result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Every failure the crate reports. None of them are retried.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error while reading or writing a file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Delimited file could not be read or written.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration could not be loaded or failed validation.
    #[error("{0}")]
    Config(String),

    /// Generation or composition parameters are out of range.
    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    /// A series file lacks one or more required columns.
    #[error("missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// A value in a delimited file could not be parsed.
    #[error("row {row}, column {column}: {message}")]
    Parse {
        row: usize,
        column: String,
        message: String,
    },

    /// Random selection was attempted against an empty reference table.
    #[error("empty reference data: table \"{table}\" has no rows")]
    EmptyReferenceData { table: String },

    /// A reference row has no value for a field a record template needs.
    #[error("reference table \"{table}\" has no field \"{field}\"")]
    MissingField { table: String, field: String },
}
