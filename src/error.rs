//! Error types for dataset loading and querying.
//!
//! Malformed rows are deliberately absent here: they are dropped during
//! load and never surface as errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the dataset loader and the aggregation service.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// The dataset file does not exist. Fatal at startup.
    #[error("Dataset not found at: {}", path.display())]
    DatasetNotFound { path: PathBuf },

    /// A required column is absent from the header row.
    #[error("Required column '{column}' missing from {source_label}")]
    MissingColumn {
        column: String,
        source_label: String,
    },

    /// The dataset exists but could not be opened or read.
    #[error("Failed to read dataset {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configured delimiter is not a single ASCII character.
    #[error("Invalid delimiter {0:?}: must be a single ASCII character")]
    InvalidDelimiter(char),

    /// The header row could not be parsed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A group-by was requested on something that is not a dimension.
    #[error("Unknown dimension: '{0}' (expected category, age_group or zone)")]
    UnknownDimension(String),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
