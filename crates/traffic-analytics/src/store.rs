//! In-memory DuckDB store holding the loaded datasets.

use crate::error::{AnalyticsError, Result};
use crate::frame::{quote, Frame, ROW_ORDER};
use chrono::NaiveDate;
use duckdb::types::{ToSql, ToSqlOutput, Value as SqlValue};
use duckdb::{params_from_iter, Connection};
use std::fmt;
use std::iter;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;
use traffic_domain::columns as c;
use traffic_domain::value::normalize_zero;
use traffic_domain::{
    Column, ColumnKind, Dataset, DatasetKind, DateRange, DomainError, Row, Table, Value,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Shared handle to one in-memory DuckDB database. Clones share the
/// connection; queries run one at a time.
#[derive(Clone)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}

impl Store {
    /// Create an empty in-memory store.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| AnalyticsError::Query("analytics store lock poisoned".to_string()))
    }

    /// Load a dataset into the table named after its kind.
    pub fn load_dataset(&self, dataset: &Dataset) -> Result<Frame> {
        self.load_table(table_name(dataset.kind()), dataset.table())
    }

    /// Create (or replace) table `name` holding the rows of `table`.
    pub fn load_table(&self, name: &str, table: &Table) -> Result<Frame> {
        if table.has_column(ROW_ORDER) {
            return Err(DomainError::DuplicateColumn {
                column: ROW_ORDER.to_string(),
            }
            .into());
        }

        let definitions = table
            .columns()
            .iter()
            .map(|column| format!("{} {}", quote(&column.name), sql_type(column.kind)))
            .chain(iter::once(format!("{} BIGINT", quote(ROW_ORDER))))
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = table
            .columns()
            .iter()
            .map(|column| match column.kind {
                ColumnKind::Date => "CAST(? AS DATE)",
                _ => "?",
            })
            .chain(iter::once("?"))
            .collect::<Vec<_>>()
            .join(", ");

        let mut conn = self.lock()?;
        conn.execute_batch(&format!(
            "CREATE OR REPLACE TABLE {} ({definitions})",
            quote(name)
        ))?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO {} VALUES ({placeholders})",
                quote(name)
            ))?;
            for (ordinal, row) in table.rows().iter().enumerate() {
                let ordinal = i64::try_from(ordinal)
                    .map_err(|e| AnalyticsError::Conversion(e.to_string()))?;
                let cells: Vec<Cell<'_>> = row.values().iter().map(Cell).collect();
                let mut params: Vec<&dyn ToSql> =
                    cells.iter().map(|cell| cell as &dyn ToSql).collect();
                params.push(&ordinal);
                stmt.execute(params.as_slice())?;
            }
        }
        tx.commit()?;

        debug!(table = name, rows = table.len(), "Table loaded");
        Ok(Frame::scan(self.clone(), name, table.columns().to_vec()))
    }

    /// Store the rows of `frame` as table `name`, so later views read them
    /// without re-running the query.
    pub fn materialize(&self, name: &str, frame: &Frame) -> Result<Frame> {
        let table = frame.collect()?;
        self.load_table(name, &table)
    }

    pub(crate) fn collect(&self, frame: &Frame) -> Result<Table> {
        let mut table = Table::empty(frame.columns().to_vec())?;
        if frame.columns().is_empty() {
            return Ok(table);
        }

        let projection = frame
            .columns()
            .iter()
            .map(read_expression)
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "SELECT {projection} FROM ({}) AS t ORDER BY {}",
            frame.sql(),
            quote(ROW_ORDER)
        );
        debug!(sql = %sql, "Running query");

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(frame.params()))?;
        while let Some(row) = rows.next()? {
            let values = frame
                .columns()
                .iter()
                .enumerate()
                .map(|(index, column)| read_cell(row, index, column.kind))
                .collect::<Result<Vec<_>>>()?;
            table.push_row(Row::new(values))?;
        }
        Ok(table)
    }

    pub(crate) fn count(&self, frame: &Frame) -> Result<usize> {
        let sql = format!("SELECT COUNT(*) FROM ({}) AS t", frame.sql());
        let conn = self.lock()?;
        let count: i64 = conn.query_row(&sql, params_from_iter(frame.params()), |row| row.get(0))?;
        usize::try_from(count).map_err(|e| AnalyticsError::Conversion(e.to_string()))
    }

    pub(crate) fn date_bounds(&self, frame: &Frame) -> Result<Option<DateRange>> {
        frame.require_column(c::DATE)?;
        let date = quote(c::DATE);
        let sql = format!(
            "SELECT CAST(MIN({date}) AS VARCHAR), CAST(MAX({date}) AS VARCHAR) FROM ({}) AS t",
            frame.sql()
        );
        let conn = self.lock()?;
        let (start, end): (Option<String>, Option<String>) =
            conn.query_row(&sql, params_from_iter(frame.params()), |row| {
                Ok((row.get(0)?, row.get(1)?))
            })?;
        match (start, end) {
            (Some(start), Some(end)) => Ok(Some(DateRange::new(
                parse_date(&start)?,
                parse_date(&end)?,
            ))),
            _ => Ok(None),
        }
    }
}

/// Table holding datasets of `kind`.
#[must_use]
pub const fn table_name(kind: DatasetKind) -> &'static str {
    match kind {
        DatasetKind::States => "states",
        DatasetKind::AreaCenters => "area_centers",
        DatasetKind::Airports => "airports",
        DatasetKind::AircraftOperators => "aircraft_operators",
    }
}

/// Date bound as a query parameter, for `CAST(? AS DATE)`.
pub(crate) fn date_param(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

const fn sql_type(kind: ColumnKind) -> &'static str {
    match kind {
        ColumnKind::Date => "DATE",
        ColumnKind::Text => "VARCHAR",
        ColumnKind::Integer => "BIGINT",
        ColumnKind::Number => "DOUBLE",
    }
}

// Dates travel as ISO text and are parsed back with chrono.
fn read_expression(column: &Column) -> String {
    let target = match column.kind {
        ColumnKind::Date | ColumnKind::Text => "VARCHAR",
        ColumnKind::Integer => "BIGINT",
        ColumnKind::Number => "DOUBLE",
    };
    format!("CAST({} AS {target})", quote(&column.name))
}

fn read_cell(row: &duckdb::Row<'_>, index: usize, kind: ColumnKind) -> Result<Value> {
    let value = match kind {
        ColumnKind::Text => row
            .get::<_, Option<String>>(index)?
            .map_or(Value::Null, Value::Text),
        ColumnKind::Integer => row
            .get::<_, Option<i64>>(index)?
            .map_or(Value::Null, Value::Integer),
        ColumnKind::Number => Value::from_f64(row.get::<_, Option<f64>>(index)?),
        ColumnKind::Date => match row.get::<_, Option<String>>(index)? {
            Some(text) => Value::Date(parse_date(&text)?),
            None => Value::Null,
        },
    };
    Ok(value)
}

fn parse_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .map_err(|e| AnalyticsError::Conversion(format!("unreadable date '{text}': {e}")))
}

/// One table cell bound as a query parameter.
struct Cell<'a>(&'a Value);

impl ToSql for Cell<'_> {
    fn to_sql(&self) -> duckdb::Result<ToSqlOutput<'_>> {
        let value = match self.0 {
            Value::Null => SqlValue::Null,
            Value::Integer(i) => SqlValue::BigInt(*i),
            Value::Number(n) if n.is_nan() => SqlValue::Null,
            Value::Number(n) => SqlValue::Double(normalize_zero(*n)),
            Value::Text(s) => SqlValue::Text(s.clone()),
            Value::Date(d) => SqlValue::Text(date_param(*d)),
        };
        Ok(ToSqlOutput::Owned(value))
    }
}
