//! Ingestion error types.

use std::path::PathBuf;
use thiserror::Error;
use traffic_domain::{ColumnKind, DomainError};

/// Errors raised while reading the dashboard's source files.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{}: missing required column {column}", path.display())]
    MissingColumn { path: PathBuf, column: String },

    #[error("{}:{line}: cannot read '{value}' in column {column} as {expected}", path.display())]
    Parse {
        path: PathBuf,
        line: u64,
        column: String,
        value: String,
        expected: ColumnKind,
    },

    #[error("No yearly files configured for {0}")]
    NoYears(String),

    #[error("Invalid dataset: {0}")]
    Domain(#[from] DomainError),
}

/// Result type for ingestion.
pub type Result<T> = std::result::Result<T, IngestError>;
