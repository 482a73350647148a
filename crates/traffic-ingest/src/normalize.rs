//! Canonical spellings for state and aircraft operator names.
//!
//! The yearly files do not agree on how entities are spelled, so names are
//! rewritten at load time and every later filter sees one spelling.

use crate::error::Result;
use traffic_domain::{Row, Table, Value};

const STATE_RENAMES: [(&str, &str); 3] = [
    ("Bosnia-Herzegovina", "Bosnia and Herzegovina"),
    ("Serbia & Montenegro", "Serbia"),
    ("North Macedonia", "Republic of North Macedonia"),
];

/// Operators reported under their bare brand that belong to a group.
const GROUP_SUFFIXES: [&str; 12] = [
    "Ryanair",
    "easyJet",
    "KLM",
    "Wizz Air",
    "SAS",
    "SWISS",
    "TAP",
    "Aer Lingus",
    "Air France",
    "Eurowings",
    "Iberia",
    "British Airways",
];

const OPERATOR_RENAMES: [(&str, &str); 2] = [
    ("DHL Express", "DHL Group"),
    ("Aegean Airlines", "AEGEAN Group"),
];

#[must_use]
pub fn canonical_state_name(name: &str) -> &str {
    STATE_RENAMES
        .iter()
        .find(|(from, _)| *from == name)
        .map_or(name, |(_, to)| *to)
}

/// Rules apply in order: brand suffixes gain ` Group`, a trailing
/// `Lufthansa` becomes `Lufthansa Airlines`, then the substring renames.
#[must_use]
pub fn canonical_operator_name(name: &str) -> String {
    let mut name = name.to_string();
    for brand in GROUP_SUFFIXES {
        if let Some(prefix) = name.strip_suffix(brand) {
            name = format!("{prefix}{brand} Group");
        }
    }
    if let Some(prefix) = name.strip_suffix("Lufthansa") {
        name = format!("{prefix}Lufthansa Airlines");
    }
    for (from, to) in OPERATOR_RENAMES {
        name = name.replace(from, to);
    }
    name
}

/// Rewrite every text cell of `column` through `rename`. Nulls are kept.
pub fn rename_values(table: Table, column: &str, rename: impl Fn(&str) -> String) -> Result<Table> {
    let index = table.require_column(column)?;
    let columns = table.columns().to_vec();
    let rows = table
        .into_rows()
        .into_iter()
        .map(|row| {
            let mut values = row.into_values();
            if let Some(Value::Text(text)) = values.get_mut(index) {
                *text = rename(text.as_str());
            }
            Row::new(values)
        })
        .collect();
    Ok(Table::new(columns, rows)?)
}
