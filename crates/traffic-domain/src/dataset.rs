//! Dated datasets: the loaded input of every analytics pipeline.

use crate::columns;
use crate::table::Table;
use crate::value::{ColumnKind, Value};
use crate::{DomainError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Which source a dataset was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DatasetKind {
    States,
    AreaCenters,
    Airports,
    AircraftOperators,
}

impl DatasetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::States => "STATES",
            Self::AreaCenters => "AREA_CENTERS",
            Self::Airports => "AIRPORTS",
            Self::AircraftOperators => "AIRCRAFT_OPERATORS",
        }
    }

    /// Column naming the entity each row reports on.
    #[must_use]
    pub const fn entity_column(self) -> &'static str {
        match self {
            Self::States | Self::AircraftOperators => columns::ENTITY,
            Self::AreaCenters => columns::ACC,
            Self::Airports => columns::AIRPORT_NAME,
        }
    }

    /// Whether the source carries a whole-network total row.
    #[must_use]
    pub const fn has_total_row(self) -> bool {
        matches!(self, Self::States)
    }
}

impl std::str::FromStr for DatasetKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "states" => Ok(Self::States),
            "area_centers" | "accs" | "acc" => Ok(Self::AreaCenters),
            "airports" => Ok(Self::Airports),
            "aircraft_operators" | "operators" => Ok(Self::AircraftOperators),
            _ => Err(DomainError::UnknownDatasetKind(s.to_string())),
        }
    }
}

/// Inclusive calendar window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    #[must_use]
    pub const fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }
}

/// A table with a non-null `FLT_DATE` column, tagged with its source.
///
/// Datasets are loaded once, checked, and then handed to the analytics
/// store; they are never changed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    kind: DatasetKind,
    #[serde(skip)]
    date_index: usize,
    table: Table,
}

impl Dataset {
    /// Wrap a table, checking the date column exists, is typed as a date and
    /// has no nulls.
    pub fn new(kind: DatasetKind, table: Table) -> Result<Self> {
        let date_index = table.require_column(columns::DATE)?;
        let column = &table.columns()[date_index];
        if column.kind != ColumnKind::Date {
            return Err(DomainError::TypeMismatch {
                column: column.name.clone(),
                expected: ColumnKind::Date,
                found: column.kind,
            });
        }
        if let Some(row) = table
            .rows()
            .iter()
            .position(|r| r.values()[date_index].is_null())
        {
            return Err(DomainError::NullDate { row });
        }
        Ok(Self {
            kind,
            date_index,
            table,
        })
    }

    #[must_use]
    pub const fn kind(&self) -> DatasetKind {
        self.kind
    }

    #[must_use]
    pub const fn table(&self) -> &Table {
        &self.table
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Dates in row order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.table
            .rows()
            .iter()
            .filter_map(|row| row.get(self.date_index).and_then(Value::as_date))
    }

    /// Earliest and latest date, `None` when empty.
    #[must_use]
    pub fn date_bounds(&self) -> Option<DateRange> {
        let mut dates = self.dates();
        let first = dates.next()?;
        let (start, end) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
        Some(DateRange::new(start, end))
    }

    /// Fail unless `column` holds `value` in at least one row.
    ///
    /// Used at load time to make sure sentinel rows such as
    /// [`columns::TOTAL_NETWORK_AREA`] are present before anything relies on
    /// excluding them.
    pub fn ensure_contains(&self, column: &str, value: &str) -> Result<()> {
        let found = self
            .table
            .column_values(column)?
            .any(|v| v.as_str() == Some(value));
        if found {
            Ok(())
        } else {
            Err(DomainError::MissingEntity {
                column: column.to_string(),
                value: value.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Column, Row};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 1, d).unwrap()
    }

    fn states() -> Table {
        Table::new(
            vec![
                Column::text(columns::ENTITY),
                Column::date(columns::DATE),
                Column::number(columns::FLIGHTS),
            ],
            vec![
                Row::new(vec!["Spain".into(), day(3).into(), 10.0.into()]),
                Row::new(vec!["France".into(), day(1).into(), 20.0.into()]),
                Row::new(vec![
                    columns::TOTAL_NETWORK_AREA.into(),
                    day(2).into(),
                    30.0.into(),
                ]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_requires_date_column() {
        let table = Table::empty(vec![Column::text(columns::ENTITY)]).unwrap();
        assert!(matches!(
            Dataset::new(DatasetKind::States, table),
            Err(DomainError::MissingColumn { .. })
        ));

        let table = Table::empty(vec![Column::text(columns::DATE)]).unwrap();
        assert!(matches!(
            Dataset::new(DatasetKind::States, table),
            Err(DomainError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_rejects_null_dates() {
        let mut table = Table::empty(vec![Column::date(columns::DATE)]).unwrap();
        table.push_row(Row::new(vec![day(1).into()])).unwrap();
        table.push_row(Row::new(vec![Value::Null])).unwrap();
        assert!(matches!(
            Dataset::new(DatasetKind::Airports, table),
            Err(DomainError::NullDate { row: 1 })
        ));
    }

    #[test]
    fn test_date_bounds_on_unsorted_rows() {
        let ds = Dataset::new(DatasetKind::States, states()).unwrap();
        assert_eq!(ds.date_bounds(), Some(DateRange::new(day(1), day(3))));

        let empty = Dataset::new(DatasetKind::States, states().filter_rows(|_| false)).unwrap();
        assert_eq!(empty.date_bounds(), None);
    }

    #[test]
    fn test_ensure_contains_sentinel() {
        let ds = Dataset::new(DatasetKind::States, states()).unwrap();
        ds.ensure_contains(columns::ENTITY, columns::TOTAL_NETWORK_AREA)
            .unwrap();

        let table = states()
            .filter_rows(|r| r.values()[0].as_str() != Some(columns::TOTAL_NETWORK_AREA));
        let without = Dataset::new(DatasetKind::States, table).unwrap();
        assert!(matches!(
            without.ensure_contains(columns::ENTITY, columns::TOTAL_NETWORK_AREA),
            Err(DomainError::MissingEntity { .. })
        ));
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!("operators".parse::<DatasetKind>().unwrap(), DatasetKind::AircraftOperators);
        assert_eq!("area-centers".parse::<DatasetKind>().unwrap(), DatasetKind::AreaCenters);
        assert!("runways".parse::<DatasetKind>().is_err());
    }
}
