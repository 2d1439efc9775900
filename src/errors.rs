use std::io;

use thiserror::Error;

use crate::types::SourceId;

/// Error type for dataset loading, coreset construction, and export failures.
#[derive(Debug, Error)]
pub enum CoresetError {
    #[error("data source '{source_id}' is unavailable: {reason}")]
    SourceUnavailable { source_id: SourceId, reason: String },
    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },
    #[error("line {line}: expected {expected} features, found {found}")]
    ShapeMismatch {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("cannot build a coreset from an empty dataset")]
    EmptyDataset,
    #[error("total deviation from the mean is zero; every record equals the mean")]
    DegenerateDataset,
    #[error("deviation from the mean overflows f64 (total deviation {total_deviation})")]
    NonFiniteDeviation { total_deviation: f64 },
    #[error("sampler ran out of records after {drawn} of {requested} draws")]
    SamplingExhausted { drawn: usize, requested: usize },
    #[error("coreset target size must be positive, got {0}")]
    InvalidTargetSize(usize),
    #[error("coreset index {index} is out of range for {len} records")]
    IndexOutOfRange { index: usize, len: usize },
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("summary serialization failed: {0}")]
    Summary(#[from] serde_json::Error),
    #[error("configuration error: {0}")]
    Configuration(String),
}
