//! Error type shared by every pipeline stage

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to parse response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Polygon API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("record is missing field `{0}`")]
    MissingField(String),

    #[error("column not found: {0}")]
    ColumnNotFound(String),

    #[error("column `{0}` is not numeric")]
    NonNumericColumn(String),

    #[error("column `{0}` mixes timestamps and numbers")]
    MixedColumn(String),

    #[error("column `{column}` has {actual} rows, table has {expected}")]
    ColumnLength {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("timestamp {0} is out of range")]
    TimestampOutOfRange(String),

    #[error("invalid timespan: {0}")]
    InvalidTimespan(String),

    #[error("unknown normalization: {0}")]
    InvalidNormalization(String),

    #[error("window starting at row {start} selects no rows of a {len} row table")]
    EmptyWindow { start: usize, len: usize },

    #[error("window [{start}, {end}) exceeds table of {len} rows")]
    WindowOutOfRange { start: usize, end: usize, len: usize },
}
