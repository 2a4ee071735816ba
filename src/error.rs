//! Library error type
//!
//! Only caller mistakes surface as errors. Poor measurement data never does:
//! it becomes a warning on a `DateEstimate` or an empty estimate instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DendroError {
    /// Variable name not in the fixed dendrochronology vocabulary
    #[error("unknown dendro variable: '{0}'")]
    UnknownVariable(String),

    /// Lookup id not in the fixed dendrochronology vocabulary
    #[error("unknown dendro lookup id: {0}")]
    UnknownLookupId(i64),

    /// Timespan query with start after end
    #[error("invalid timespan: start year {start} is after end year {end}")]
    InvalidTimespan { start: i64, end: i64 },

    /// Histogram bins must be at least one year wide
    #[error("histogram bin width must be positive, got {0}")]
    InvalidBinWidth(i64),

    /// Row table lacks a column the loader needs
    #[error("missing column '{column}' in {table} table")]
    MissingColumn { table: &'static str, column: &'static str },
}

pub type DendroResult<T> = std::result::Result<T, DendroError>;
