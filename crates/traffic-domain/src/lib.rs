//! # Air Traffic Dashboard - Domain Model
//!
//! Core data types for European air-traffic statistics (flights per state,
//! area control center, airport and aircraft operator). These types are the
//! single source of truth across all layers: ingestion, analytics and the
//! command-line front end.
//!
//! ```text
//!   Value ── one typed cell (date, text, integer, number, null)
//!   Table ── typed columns + ordered rows (loaded data and derived tables)
//!   Dataset ── Table with a non-null FLT_DATE column and a DatasetKind
//!   FilterParams ── date window + dimension selections for one request
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod columns;
pub mod dataset;
pub mod params;
pub mod table;
pub mod value;

pub use dataset::{Dataset, DatasetKind, DateRange};
pub use params::{DimensionSelectors, FilterParams};
pub use table::{Column, Row, Table};
pub use value::{ColumnKind, Value};

// =============================================================================
// ERRORS
// =============================================================================

/// Domain-level errors: a table or dataset would break its invariants.
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Missing column: {column}")]
    MissingColumn { column: String },

    #[error("Duplicate column: {column}")]
    DuplicateColumn { column: String },

    #[error("Row {row} has {found} values, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Column {column} holds {expected} values, got {found}")]
    TypeMismatch {
        column: String,
        expected: ColumnKind,
        found: ColumnKind,
    },

    #[error("Column {column} needs {expected} values, got {found}")]
    LengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("Row {row} has no date")]
    NullDate { row: usize },

    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("Column {column} has no row with value '{value}'")]
    MissingEntity { column: String, value: String },

    #[error("Unknown dataset kind: {0}")]
    UnknownDatasetKind(String),
}

/// Result type for domain operations.
pub type Result<T> = std::result::Result<T, DomainError>;
