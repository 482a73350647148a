//! Lazy relations over the analytics store.
//!
//! A [`Frame`] is a SQL query against the in-memory DuckDB store plus the
//! typed columns it yields. Transforms wrap the query and return a new
//! frame; nothing runs until [`Frame::collect`], [`Frame::count`] or
//! [`Frame::date_bounds`].
//!
//! Every frame carries the hidden ordinal column [`ROW_ORDER`]. Filters keep
//! it, so surviving rows stay in their original order; sorts renumber it and
//! break ties on the previous order, so they are stable.

use crate::error::{AnalyticsError, Result};
use crate::store::Store;
use std::iter;
use traffic_domain::{Column, DateRange, DomainError, Table};

/// Hidden row ordinal carried by every frame.
pub const ROW_ORDER: &str = "__row";

const PART: &str = "__part";

/// Sort direction for [`Frame::sorted_by`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Smallest first, nulls first.
    Ascending,
    /// Largest first, nulls last.
    Descending,
}

/// Quote an identifier for DuckDB.
#[must_use]
pub fn quote(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

#[derive(Debug, Clone)]
pub struct Frame {
    store: Store,
    sql: String,
    params: Vec<String>,
    columns: Vec<Column>,
}

impl Frame {
    /// Every row of a stored table.
    pub(crate) fn scan(store: Store, table: &str, columns: Vec<Column>) -> Self {
        Self {
            store,
            sql: format!("SELECT * FROM {}", quote(table)),
            params: Vec::new(),
            columns,
        }
    }

    #[must_use]
    pub const fn store(&self) -> &Store {
        &self.store
    }

    pub(crate) fn sql(&self) -> &str {
        &self.sql
    }

    pub(crate) fn params(&self) -> &[String] {
        &self.params
    }

    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// A column that must exist.
    pub fn require_column(&self, name: &str) -> Result<&Column> {
        self.column(name).ok_or_else(|| AnalyticsError::MissingColumn {
            column: name.to_string(),
        })
    }

    /// Run the query and read the rows back in order.
    pub fn collect(&self) -> Result<Table> {
        self.store.collect(self)
    }

    pub fn count(&self) -> Result<usize> {
        self.store.count(self)
    }

    /// Earliest and latest `FLT_DATE`, `None` when there are no rows.
    pub fn date_bounds(&self) -> Result<Option<DateRange>> {
        self.store.date_bounds(self)
    }

    /// Keep the rows matching `predicate`. Its `?` placeholders bind to
    /// `params`, after the frame's own.
    pub(crate) fn filter(&self, predicate: &str, params: Vec<String>) -> Self {
        Self {
            store: self.store.clone(),
            sql: format!("SELECT * FROM ({}) AS t WHERE {predicate}", self.sql),
            params: self.params.iter().cloned().chain(params).collect(),
            columns: self.columns.clone(),
        }
    }

    /// Append `column` computed by `expression`.
    pub(crate) fn with_column(&self, column: Column, expression: &str) -> Result<Self> {
        if self.has_column(&column.name) || column.name == ROW_ORDER {
            return Err(DomainError::DuplicateColumn {
                column: column.name,
            }
            .into());
        }
        let sql = format!(
            "SELECT *, {expression} AS {} FROM ({}) AS t",
            quote(&column.name),
            self.sql
        );
        let mut columns = self.columns.clone();
        columns.push(column);
        Ok(Self {
            store: self.store.clone(),
            sql,
            params: self.params.clone(),
            columns,
        })
    }

    /// New relation over this one. `select` must produce every column in
    /// `columns` plus [`ROW_ORDER`].
    pub(crate) fn derive(&self, select: &str, tail: &str, columns: Vec<Column>) -> Self {
        Self {
            store: self.store.clone(),
            sql: format!("SELECT {select} FROM ({}) AS t {tail}", self.sql),
            params: self.params.clone(),
            columns,
        }
    }

    /// Projection onto `names`, in that order.
    pub fn select(&self, names: &[&str]) -> Result<Self> {
        let columns = names
            .iter()
            .map(|name| self.require_column(name).cloned())
            .collect::<Result<Vec<_>>>()?;
        let select = names
            .iter()
            .map(|name| quote(name))
            .chain(iter::once(quote(ROW_ORDER)))
            .collect::<Vec<_>>()
            .join(", ");
        Ok(self.derive(&select, "", columns))
    }

    /// Rename one column, keeping its kind and position.
    pub fn rename_column(&self, from: &str, to: &str) -> Result<Self> {
        self.require_column(from)?;
        if from != to && (self.has_column(to) || to == ROW_ORDER) {
            return Err(DomainError::DuplicateColumn {
                column: to.to_string(),
            }
            .into());
        }
        let select = self
            .columns
            .iter()
            .map(|c| {
                if c.name == from {
                    format!("{} AS {}", quote(from), quote(to))
                } else {
                    quote(&c.name)
                }
            })
            .chain(iter::once(quote(ROW_ORDER)))
            .collect::<Vec<_>>()
            .join(", ");
        let columns = self
            .columns
            .iter()
            .map(|c| {
                if c.name == from {
                    Column::new(to, c.kind)
                } else {
                    c.clone()
                }
            })
            .collect();
        Ok(self.derive(&select, "", columns))
    }

    /// Renumber rows by `order`, previous order breaking ties.
    pub(crate) fn reorder(&self, order: &str) -> Self {
        let row = quote(ROW_ORDER);
        self.derive(
            &format!("* EXCLUDE ({row}), row_number() OVER (ORDER BY {order}, {row}) AS {row}"),
            "",
            self.columns.clone(),
        )
    }

    /// Stable sort on one column.
    pub fn sorted_by(&self, column: &str, order: SortOrder) -> Result<Self> {
        self.require_column(column)?;
        let direction = match order {
            SortOrder::Ascending => "ASC NULLS FIRST",
            SortOrder::Descending => "DESC NULLS LAST",
        };
        Ok(self.reorder(&format!("{} {direction}", quote(column))))
    }

    /// First `n` rows.
    #[must_use]
    pub fn head(&self, n: usize) -> Self {
        self.derive("*", &format!("ORDER BY {} LIMIT {n}", quote(ROW_ORDER)), self.columns.clone())
    }

    /// Distinct non-null values of `column`, ascending.
    pub fn distinct(&self, column: &str) -> Result<Self> {
        let kept = self.require_column(column)?.clone();
        let name = quote(column);
        Ok(self.derive(
            &format!(
                "{name}, row_number() OVER (ORDER BY {name}) AS {}",
                quote(ROW_ORDER)
            ),
            &format!("WHERE {name} IS NOT NULL GROUP BY {name}"),
            vec![kept],
        ))
    }

    /// Stack frames with identical columns, in argument order.
    pub fn union_all(frames: &[Self]) -> Result<Self> {
        let Some(first) = frames.first() else {
            return Err(DomainError::SchemaMismatch("no frames to stack".to_string()).into());
        };
        if let Some(other) = frames.iter().find(|f| f.columns != first.columns) {
            return Err(DomainError::SchemaMismatch(format!(
                "cannot stack [{}] onto [{}]",
                other.column_names().collect::<Vec<_>>().join(", "),
                first.column_names().collect::<Vec<_>>().join(", "),
            ))
            .into());
        }

        let row = quote(ROW_ORDER);
        let part = quote(PART);
        let projection = first
            .column_names()
            .map(quote)
            .chain(iter::once(row.clone()))
            .collect::<Vec<_>>()
            .join(", ");
        let parts = frames
            .iter()
            .enumerate()
            .map(|(i, frame)| {
                format!("SELECT {projection}, {i} AS {part} FROM ({}) AS t", frame.sql)
            })
            .collect::<Vec<_>>()
            .join(" UNION ALL ");

        Ok(Self {
            store: first.store.clone(),
            sql: format!(
                "SELECT * EXCLUDE ({part}, {row}), row_number() OVER (ORDER BY {part}, {row}) AS {row} FROM ({parts}) AS u"
            ),
            params: frames.iter().flat_map(|f| f.params.iter().cloned()).collect(),
            columns: first.columns.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{self, column_numbers, column_strings};
    use traffic_domain::columns as c;
    use traffic_domain::{Row, Value};

    fn ranked() -> Frame {
        let table = Table::new(
            vec![Column::text(c::ENTITY), Column::number(c::FLIGHTS)],
            vec![
                Row::new(vec!["C".into(), Value::Null]),
                Row::new(vec!["B".into(), 5.0.into()]),
                Row::new(vec!["A".into(), 5.0.into()]),
                Row::new(vec!["D".into(), 9.0.into()]),
            ],
        )
        .unwrap();
        fixtures::table_frame(&table)
    }

    #[test]
    fn test_scan_reads_rows_back_in_order() {
        let states = fixtures::states();
        let frame = fixtures::frame(&states);
        assert_eq!(&frame.collect().unwrap(), states.table());
        assert_eq!(frame.count().unwrap(), states.len());
    }

    #[test]
    fn test_sort_is_stable() {
        let sorted = ranked().sorted_by(c::FLIGHTS, SortOrder::Descending).unwrap();
        assert_eq!(column_strings(&sorted.collect().unwrap(), c::ENTITY), vec!["D", "B", "A", "C"]);

        let sorted = ranked().sorted_by(c::FLIGHTS, SortOrder::Ascending).unwrap();
        assert_eq!(column_strings(&sorted.collect().unwrap(), c::ENTITY), vec!["C", "B", "A", "D"]);
    }

    #[test]
    fn test_head_and_distinct() {
        let top = ranked().head(2).collect().unwrap();
        assert_eq!(column_strings(&top, c::ENTITY), vec!["C", "B"]);

        let values = ranked().distinct(c::FLIGHTS).unwrap().collect().unwrap();
        assert_eq!(column_numbers(&values, c::FLIGHTS), vec![5.0, 9.0]);
    }

    #[test]
    fn test_select_and_rename() {
        let frame = ranked()
            .select(&[c::FLIGHTS, c::ENTITY])
            .unwrap()
            .rename_column(c::FLIGHTS, c::DAILY_AVERAGE)
            .unwrap();
        let table = frame.collect().unwrap();
        assert_eq!(
            table.column_names().collect::<Vec<_>>(),
            vec![c::DAILY_AVERAGE, c::ENTITY]
        );
        assert_eq!(table.value(3, c::DAILY_AVERAGE), Some(&Value::Number(9.0)));

        assert!(matches!(
            ranked().rename_column(c::FLIGHTS, c::ENTITY),
            Err(AnalyticsError::Schema(_))
        ));
        assert!(matches!(
            ranked().select(&[c::ACC]),
            Err(AnalyticsError::MissingColumn { .. })
        ));
    }

    #[test]
    fn test_union_keeps_argument_order() {
        let frame = ranked();
        let stacked = Frame::union_all(&[frame.head(1), frame.clone()]).unwrap();
        assert_eq!(
            column_strings(&stacked.collect().unwrap(), c::ENTITY),
            vec!["C", "C", "B", "A", "D"]
        );

        let narrow = frame.select(&[c::ENTITY]).unwrap();
        assert!(matches!(
            Frame::union_all(&[frame, narrow]),
            Err(AnalyticsError::Schema(_))
        ));
        assert!(Frame::union_all(&[]).is_err());
    }

    #[test]
    fn test_quoting() {
        assert_eq!(quote("Flights 2019 (Reference)"), "\"Flights 2019 (Reference)\"");
        assert_eq!(quote("a\"b"), "\"a\"\"b\"");
    }
}
