//! Typed CSV reading into [`Table`]s.
//!
//! Every source file is read against a list of [`ColumnSpec`]s: the header
//! to look for, the canonical name it lands under and the storage kind its
//! cells are parsed as. Headers not named by a spec are ignored.

use crate::error::{IngestError, Result};
use chrono::NaiveDate;
use std::path::Path;
use tracing::debug;
use traffic_domain::{Column, ColumnKind, Row, Table, Value};

// =============================================================================
// FORMAT
// =============================================================================

/// Dialect of a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvFormat {
    pub delimiter: u8,
    /// Numbers use `,` as the decimal separator.
    pub decimal_comma: bool,
    pub date_format: &'static str,
}

impl CsvFormat {
    /// Daily state, ACC and operator files: `;` separated, `1234,5`, ISO dates.
    pub const DAILY: Self = Self {
        delimiter: b';',
        decimal_comma: true,
        date_format: "%Y-%m-%d",
    };

    /// Airport traffic file: `;` separated, day-first dates.
    pub const AIRPORTS: Self = Self {
        delimiter: b';',
        decimal_comma: false,
        date_format: "%d/%m/%Y",
    };

    /// Lookup tables such as the ISO code list.
    pub const LOOKUP: Self = Self {
        delimiter: b';',
        decimal_comma: false,
        date_format: "%Y-%m-%d",
    };
}

// =============================================================================
// COLUMN SPECS
// =============================================================================

/// One column to pull out of a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    /// Header in the file.
    pub source: &'static str,
    /// Name in the resulting table.
    pub name: &'static str,
    pub kind: ColumnKind,
    pub required: bool,
}

impl ColumnSpec {
    #[must_use]
    pub const fn required(name: &'static str, kind: ColumnKind) -> Self {
        Self {
            source: name,
            name,
            kind,
            required: true,
        }
    }

    #[must_use]
    pub const fn optional(name: &'static str, kind: ColumnKind) -> Self {
        Self {
            source: name,
            name,
            kind,
            required: false,
        }
    }

    /// Read the column from a differently named header.
    #[must_use]
    pub const fn from_header(mut self, source: &'static str) -> Self {
        self.source = source;
        self
    }
}

// =============================================================================
// READING
// =============================================================================

/// Read `path` into a table with one column per spec whose header is present.
///
/// Empty cells become nulls. A missing required header fails with
/// [`IngestError::MissingColumn`]; a missing optional one is left out of the
/// table. Cells that do not parse as their column's kind fail with the line
/// number they sit on.
pub fn read_table(path: &Path, format: &CsvFormat, specs: &[ColumnSpec]) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(format.delimiter)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    let mut selected = Vec::with_capacity(specs.len());
    for spec in specs {
        match headers.iter().position(|h| h == spec.source) {
            Some(index) => selected.push((index, *spec)),
            None if spec.required => {
                return Err(IngestError::MissingColumn {
                    path: path.to_path_buf(),
                    column: spec.source.to_string(),
                });
            }
            None => debug!(
                path = %path.display(),
                column = spec.source,
                "Optional column absent"
            ),
        }
    }

    let columns = selected
        .iter()
        .map(|(_, spec)| Column::new(spec.name, spec.kind))
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map_or(0, csv::Position::line);
        let mut values = Vec::with_capacity(selected.len());
        for (index, spec) in &selected {
            let cell = record.get(*index).unwrap_or_default();
            let value = parse_cell(cell, spec.kind, format).ok_or_else(|| IngestError::Parse {
                path: path.to_path_buf(),
                line,
                column: spec.source.to_string(),
                value: cell.to_string(),
                expected: spec.kind,
            })?;
            values.push(value);
        }
        rows.push(Row::new(values));
    }

    debug!(path = %path.display(), rows = rows.len(), "Read CSV file");
    Ok(Table::new(columns, rows)?)
}

/// Parse one cell, `None` when it does not fit `kind`.
fn parse_cell(cell: &str, kind: ColumnKind, format: &CsvFormat) -> Option<Value> {
    if cell.is_empty() {
        return Some(Value::Null);
    }
    match kind {
        ColumnKind::Text => Some(Value::Text(cell.to_string())),
        ColumnKind::Date => NaiveDate::parse_from_str(cell, format.date_format)
            .ok()
            .map(Value::Date),
        ColumnKind::Integer => cell.parse::<i64>().ok().map(Value::Integer),
        ColumnKind::Number => {
            let cell = cell.strip_suffix('%').unwrap_or(cell).trim_end();
            let parsed = if format.decimal_comma {
                cell.replace(',', ".").parse::<f64>()
            } else {
                cell.parse::<f64>()
            };
            parsed.ok().map(Value::Number)
        }
    }
}
