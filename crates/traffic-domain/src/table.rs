//! Column-typed, row-ordered tables.
//!
//! A [`Table`] is both the shape of a loaded dataset and of every derived
//! table read back from the analytics store. Tables are values: the few
//! load-time operations that change membership or shape return a new table.

use crate::value::{ColumnKind, Value};
use crate::{DomainError, Result};
use serde::Serialize;
use std::collections::HashSet;

// =============================================================================
// COLUMNS & ROWS
// =============================================================================

/// Named, typed column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
}

impl Column {
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, ColumnKind::Date)
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, ColumnKind::Text)
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, ColumnKind::Integer)
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, ColumnKind::Number)
    }
}

/// One row, positionally aligned with the table's columns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Row(Vec<Value>);

impl Row {
    #[must_use]
    pub const fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.0
    }

    #[must_use]
    pub fn into_values(self) -> Vec<Value> {
        self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Value>> for Row {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

// =============================================================================
// TABLE
// =============================================================================

/// Ordered rows over a fixed set of typed columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Row>,
}

impl Table {
    /// Build a table, checking column names are unique, every row has one
    /// value per column and every non-null value matches its column kind.
    pub fn new(columns: Vec<Column>, rows: Vec<Row>) -> Result<Self> {
        let mut table = Self::empty(columns)?;
        table.rows.reserve(rows.len());
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Table with the given columns and no rows.
    pub fn empty(columns: Vec<Column>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(DomainError::DuplicateColumn {
                    column: column.name.clone(),
                });
            }
        }
        Ok(Self {
            columns,
            rows: Vec::new(),
        })
    }

    /// Append a row after checking it against the schema.
    pub fn push_row(&mut self, row: Row) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(DomainError::RowWidth {
                row: self.rows.len(),
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        for (column, value) in self.columns.iter().zip(row.values()) {
            check_kind(column, value)?;
        }
        self.rows.push(row);
        Ok(())
    }

    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Index of a column that must exist.
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| DomainError::MissingColumn {
                column: name.to_string(),
            })
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[must_use]
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value of `column` in row `row`, if both exist.
    #[must_use]
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let index = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(index))
    }

    /// All values of one column, in row order.
    pub fn column_values(&self, name: &str) -> Result<impl Iterator<Item = &Value>> {
        let index = self.require_column(name)?;
        Ok(self.rows.iter().map(move |row| &row.values()[index]))
    }

    /// Copy of the table keeping only the rows accepted by `keep`, in order.
    #[must_use]
    pub fn filter_rows(&self, mut keep: impl FnMut(&Row) -> bool) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }

    /// Append a column. `values` must have one entry per row.
    pub fn with_column(mut self, column: Column, values: Vec<Value>) -> Result<Self> {
        if self.has_column(&column.name) {
            return Err(DomainError::DuplicateColumn {
                column: column.name,
            });
        }
        if values.len() != self.rows.len() {
            return Err(DomainError::LengthMismatch {
                column: column.name,
                expected: self.rows.len(),
                found: values.len(),
            });
        }
        for value in &values {
            check_kind(&column, value)?;
        }
        self.columns.push(column);
        self.rows = self
            .rows
            .into_iter()
            .zip(values)
            .map(|(row, value)| {
                let mut cells = row.into_values();
                cells.push(value);
                Row::new(cells)
            })
            .collect();
        Ok(self)
    }

    /// Projection onto `names`, in that order.
    pub fn select(&self, names: &[&str]) -> Result<Self> {
        let indices = names
            .iter()
            .map(|name| self.require_column(name))
            .collect::<Result<Vec<_>>>()?;
        let columns = indices.iter().map(|&i| self.columns[i].clone()).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| Row::new(indices.iter().map(|&i| row.values()[i].clone()).collect()))
            .collect();
        Self::empty(columns).map(|mut table| {
            table.rows = rows;
            table
        })
    }

    /// Stack tables with identical columns.
    pub fn concat(tables: Vec<Self>) -> Result<Self> {
        let mut tables = tables.into_iter();
        let Some(mut first) = tables.next() else {
            return Err(DomainError::SchemaMismatch(
                "no tables to concatenate".to_string(),
            ));
        };
        for table in tables {
            if table.columns != first.columns {
                return Err(DomainError::SchemaMismatch(format!(
                    "cannot concatenate [{}] onto [{}]",
                    table.column_names().collect::<Vec<_>>().join(", "),
                    first.column_names().collect::<Vec<_>>().join(", "),
                )));
            }
            first.rows.extend(table.rows);
        }
        Ok(first)
    }
}

fn check_kind(column: &Column, value: &Value) -> Result<()> {
    match value.kind() {
        Some(found) if found != column.kind => Err(DomainError::TypeMismatch {
            column: column.name.clone(),
            expected: column.kind,
            found,
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn airports() -> Table {
        Table::new(
            vec![Column::text("APT_NAME"), Column::number("FLT_TOT_1")],
            vec![
                Row::new(vec!["Paris-CDG".into(), 1200.0.into()]),
                Row::new(vec!["Amsterdam".into(), 1300.0.into()]),
                Row::new(vec!["Vienna".into(), Value::Null]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_duplicate_columns() {
        let err = Table::empty(vec![Column::text("a"), Column::number("a")]).unwrap_err();
        assert!(matches!(err, DomainError::DuplicateColumn { .. }));
    }

    #[test]
    fn test_rejects_wrong_width_and_kind() {
        let mut table = Table::empty(vec![Column::text("a"), Column::number("b")]).unwrap();
        let err = table.push_row(Row::new(vec!["x".into()])).unwrap_err();
        assert!(matches!(err, DomainError::RowWidth { expected: 2, found: 1, .. }));

        let err = table
            .push_row(Row::new(vec!["x".into(), "y".into()]))
            .unwrap_err();
        assert!(matches!(err, DomainError::TypeMismatch { .. }));
        assert!(table.is_empty());
    }

    #[test]
    fn test_null_fits_any_column() {
        let mut table = Table::empty(vec![Column::date("d")]).unwrap();
        table.push_row(Row::new(vec![Value::Null])).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_with_column_appends() {
        let table = airports()
            .with_column(
                Column::integer("rank"),
                vec![1_i64.into(), 2_i64.into(), 3_i64.into()],
            )
            .unwrap();
        assert_eq!(table.columns().len(), 3);
        assert_eq!(table.value(2, "rank"), Some(&Value::Integer(3)));

        let err = airports()
            .with_column(Column::integer("rank"), vec![1_i64.into()])
            .unwrap_err();
        assert!(matches!(err, DomainError::LengthMismatch { .. }));
    }

    #[test]
    fn test_select_reorders() {
        let table = airports().select(&["FLT_TOT_1", "APT_NAME"]).unwrap();
        assert_eq!(table.column_names().collect::<Vec<_>>(), ["FLT_TOT_1", "APT_NAME"]);
        assert_eq!(table.value(1, "APT_NAME"), Some(&Value::from("Amsterdam")));
        assert!(matches!(
            airports().select(&["missing"]),
            Err(DomainError::MissingColumn { .. })
        ));
    }

    #[test]
    fn test_concat_requires_same_columns() {
        let stacked = Table::concat(vec![airports(), airports()]).unwrap();
        assert_eq!(stacked.len(), 6);

        let other = Table::empty(vec![Column::text("APT_NAME")]).unwrap();
        assert!(matches!(
            Table::concat(vec![airports(), other]),
            Err(DomainError::SchemaMismatch(_))
        ));
    }
}
