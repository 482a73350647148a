//! ISO 3166 codes per state, joined onto the state and airport datasets.

use crate::error::Result;
use crate::reader::{read_table, ColumnSpec, CsvFormat};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;
use traffic_domain::columns as c;
use traffic_domain::{Column, ColumnKind, Table, Value};

/// State name to ISO code lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IsoCodes(HashMap<String, String>);

impl IsoCodes {
    #[must_use]
    pub fn get(&self, state: &str) -> Option<&str> {
        self.0.get(state).map(String::as_str)
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

impl<S: Into<String>, T: Into<String>> FromIterator<(S, T)> for IsoCodes {
    fn from_iter<I: IntoIterator<Item = (S, T)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(state, code)| (state.into(), code.into()))
                .collect(),
        )
    }
}

/// Read `STATE_NAME;ISO Code` pairs. Rows missing either side are skipped.
pub fn load_iso_codes(path: &Path) -> Result<IsoCodes> {
    let specs = [
        ColumnSpec::required(c::STATE_NAME, ColumnKind::Text),
        ColumnSpec::required(c::ISO, ColumnKind::Text),
    ];
    let table = read_table(path, &CsvFormat::LOOKUP, &specs)?;
    let codes: IsoCodes = table
        .rows()
        .iter()
        .filter_map(|row| Some((row.get(0)?.as_str()?, row.get(1)?.as_str()?)))
        .collect();
    debug!(codes = codes.len(), "Loaded ISO codes");
    Ok(codes)
}

/// Left join: append an `ISO Code` column looked up by `key_column`, null
/// where the state is unknown. Tables that already carry the column are
/// returned unchanged.
pub fn attach_iso_codes(table: Table, key_column: &str, codes: &IsoCodes) -> Result<Table> {
    if table.has_column(c::ISO) {
        return Ok(table);
    }
    let values: Vec<Value> = table
        .column_values(key_column)?
        .map(|key| {
            key.as_str()
                .and_then(|state| codes.get(state))
                .map_or(Value::Null, Value::from)
        })
        .collect();
    let unmatched = values.iter().filter(|v| v.is_null()).count();
    debug!(key_column, unmatched, "Attached ISO codes");
    Ok(table.with_column(Column::text(c::ISO), values)?)
}
