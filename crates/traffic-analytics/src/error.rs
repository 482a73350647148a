//! Analytics error types.

use thiserror::Error;
use traffic_domain::DomainError;

/// Analytics errors.
#[derive(Error, Debug)]
pub enum AnalyticsError {
    /// DuckDB error
    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(String),

    /// Date bounds had to be resolved from a dataset with no rows
    #[error("Cannot resolve a date range on an empty dataset")]
    EmptyDataset,

    /// A requested column is absent and nothing can stand in for it
    #[error("Missing column: {column}")]
    MissingColumn { column: String },

    /// Contradictory or malformed filter parameters
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// Invalid transform parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Table invariant violated while building a derived table
    #[error("Schema error: {0}")]
    Schema(DomainError),

    /// Data conversion error
    #[error("Data conversion error: {0}")]
    Conversion(String),
}

impl From<DomainError> for AnalyticsError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::MissingColumn { column } => Self::MissingColumn { column },
            other => Self::Schema(other),
        }
    }
}

impl From<serde_json::Error> for AnalyticsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Conversion(err.to_string())
    }
}

/// Result type for analytics operations.
pub type Result<T> = std::result::Result<T, AnalyticsError>;
