//! Loaders for the four dashboard datasets.
//!
//! ```text
//!   {year}-States.csv ─┐
//!   {year}-ACCs.csv   ─┼─► combine_yearly ─► canonical names ─► ISO join ─► Dataset
//!   {year}-Aircraft_Operators.csv ─┘              (cutoff on the newest file)
//!   Airport_Traffic.csv ─────────────────────────────────────► ISO join ─► Dataset
//! ```

use crate::config::{
    IngestConfig, AIRPORTS_FILE, AREA_CENTERS_FILE, ISO_CODES_FILE, OPERATORS_FILE, STATES_FILE,
};
use crate::error::{IngestError, Result};
use crate::iso::{attach_iso_codes, load_iso_codes, IsoCodes};
use crate::normalize::{canonical_operator_name, canonical_state_name, rename_values};
use crate::reader::{read_table, ColumnSpec, CsvFormat};
use chrono::NaiveDate;
use tracing::{debug, info, instrument};
use traffic_domain::columns as c;
use traffic_domain::{Column, ColumnKind, Dataset, DatasetKind, Table, Value};

// =============================================================================
// SOURCE LAYOUTS
// =============================================================================

/// Columns of the daily state and aircraft operator files.
pub const DAILY_COLUMNS: [ColumnSpec; 10] = [
    ColumnSpec::required(c::ENTITY, ColumnKind::Text),
    ColumnSpec::required(c::DATE, ColumnKind::Date).from_header("Day"),
    ColumnSpec::required(c::FLIGHTS, ColumnKind::Number),
    ColumnSpec::optional(c::DATE_2019, ColumnKind::Date),
    ColumnSpec::optional(c::FLIGHTS_2019, ColumnKind::Number),
    ColumnSpec::optional(c::DATE_PREVIOUS_YEAR, ColumnKind::Date),
    ColumnSpec::optional(c::FLIGHTS_PREVIOUS_YEAR, ColumnKind::Number),
    ColumnSpec::optional(c::MOVING_AVERAGE, ColumnKind::Number),
    ColumnSpec::optional(c::VARIATION_2019, ColumnKind::Number),
    ColumnSpec::optional(c::WEEK, ColumnKind::Integer),
];

/// Columns of the daily area control center files.
pub const AREA_CENTER_COLUMNS: [ColumnSpec; 7] = [
    ColumnSpec::required(c::ACC, ColumnKind::Text).from_header("Entity"),
    ColumnSpec::required(c::STATE_NAME, ColumnKind::Text).from_header("State"),
    ColumnSpec::required(c::DATE, ColumnKind::Date).from_header("Day"),
    ColumnSpec::required(c::FLIGHTS, ColumnKind::Number),
    ColumnSpec::optional(c::DATE_2019, ColumnKind::Date),
    ColumnSpec::optional(c::FLIGHTS_2019, ColumnKind::Number),
    ColumnSpec::optional(c::MOVING_AVERAGE, ColumnKind::Number),
];

/// Columns of the airport traffic file. Airport-reported movements are not
/// published by every airport.
pub const AIRPORT_COLUMNS: [ColumnSpec; 13] = [
    ColumnSpec::required(c::YEAR, ColumnKind::Integer),
    ColumnSpec::required(c::MONTH_NUM, ColumnKind::Integer),
    ColumnSpec::required(c::MONTH_MON, ColumnKind::Text),
    ColumnSpec::required(c::DATE, ColumnKind::Date),
    ColumnSpec::required(c::AIRPORT_CODE, ColumnKind::Text),
    ColumnSpec::required(c::AIRPORT_NAME, ColumnKind::Text),
    ColumnSpec::required(c::STATE_NAME, ColumnKind::Text),
    ColumnSpec::required(c::NM_DEP_FLIGHTS, ColumnKind::Number),
    ColumnSpec::required(c::NM_ARR_FLIGHTS, ColumnKind::Number),
    ColumnSpec::required(c::NM_TOTAL_FLIGHTS, ColumnKind::Number),
    ColumnSpec::optional(c::AIRPORT_DEP_FLIGHTS, ColumnKind::Number),
    ColumnSpec::optional(c::AIRPORT_ARR_FLIGHTS, ColumnKind::Number),
    ColumnSpec::optional(c::AIRPORT_TOTAL_FLIGHTS, ColumnKind::Number),
];

/// Every loaded dataset, ready to hand to the analytics engine.
#[derive(Debug, Clone)]
pub struct DashboardParts {
    pub states: Dataset,
    pub area_centers: Dataset,
    pub airports: Dataset,
    pub aircraft_operators: Dataset,
}

// =============================================================================
// YEARLY FILES
// =============================================================================

/// Read `{year}-{name}.csv` for every configured year and stack them.
///
/// The newest file overlaps the previous year, so when more than one year is
/// configured only its rows dated strictly after `cutoff` are kept. Columns
/// missing from some years are filled with nulls.
pub fn combine_yearly(
    config: &IngestConfig,
    name: &str,
    cutoff: NaiveDate,
    specs: &[ColumnSpec],
) -> Result<Table> {
    let Some((newest, earlier)) = config.years.split_last() else {
        return Err(IngestError::NoYears(name.to_string()));
    };

    let mut tables = Vec::with_capacity(config.years.len());
    for year in earlier {
        tables.push(read_table(&config.yearly_file(*year, name), &CsvFormat::DAILY, specs)?);
    }

    let latest = read_table(&config.yearly_file(*newest, name), &CsvFormat::DAILY, specs)?;
    if earlier.is_empty() {
        tables.push(latest);
    } else {
        let before = latest.len();
        let latest = keep_after(latest, cutoff)?;
        debug!(
            name,
            year = newest,
            dropped = before - latest.len(),
            %cutoff,
            "Dropped overlapping rows"
        );
        tables.push(latest);
    }

    Ok(Table::concat(align_columns(tables, specs)?)?)
}

fn keep_after(table: Table, cutoff: NaiveDate) -> Result<Table> {
    let index = table.require_column(c::DATE)?;
    Ok(table.filter_rows(|row| {
        row.get(index)
            .and_then(Value::as_date)
            .is_some_and(|date| date > cutoff)
    }))
}

/// Give every table the columns any of them has, in the order of `specs`.
fn align_columns(tables: Vec<Table>, specs: &[ColumnSpec]) -> Result<Vec<Table>> {
    let present: Vec<&ColumnSpec> = specs
        .iter()
        .filter(|spec| tables.iter().any(|t| t.has_column(spec.name)))
        .collect();
    let names: Vec<&str> = present.iter().map(|spec| spec.name).collect();

    tables
        .into_iter()
        .map(|mut table| -> Result<Table> {
            for spec in &present {
                if !table.has_column(spec.name) {
                    let nulls = vec![Value::Null; table.len()];
                    table = table.with_column(Column::new(spec.name, spec.kind), nulls)?;
                }
            }
            Ok(table.select(&names)?)
        })
        .collect()
}

// =============================================================================
// DATASETS
// =============================================================================

/// Daily traffic per state, including the network total row.
#[instrument(skip_all, fields(data_dir = %config.data_dir().display()))]
pub fn load_states(config: &IngestConfig, iso_codes: Option<&IsoCodes>) -> Result<Dataset> {
    let table = combine_yearly(config, STATES_FILE, config.states_cutoff, &DAILY_COLUMNS)?;
    let table = rename_values(table, c::ENTITY, |name| canonical_state_name(name).to_string())?;
    let table = match iso_codes {
        Some(codes) => attach_iso_codes(table, c::ENTITY, codes)?,
        None => table,
    };

    let states = Dataset::new(DatasetKind::States, table)?;
    if config.require_total_row {
        states.ensure_contains(c::ENTITY, c::TOTAL_NETWORK_AREA)?;
    }
    info!(rows = states.len(), span = ?states.date_bounds(), "Loaded states");
    Ok(states)
}

/// Daily traffic per area control center.
#[instrument(skip_all, fields(data_dir = %config.data_dir().display()))]
pub fn load_area_centers(config: &IngestConfig) -> Result<Dataset> {
    let table = combine_yearly(
        config,
        AREA_CENTERS_FILE,
        config.states_cutoff,
        &AREA_CENTER_COLUMNS,
    )?;
    let table = rename_values(table, c::STATE_NAME, |name| {
        canonical_state_name(name).to_string()
    })?;

    let area_centers = Dataset::new(DatasetKind::AreaCenters, table)?;
    info!(rows = area_centers.len(), "Loaded area control centers");
    Ok(area_centers)
}

/// Daily IFR movements per airport.
#[instrument(skip_all, fields(data_dir = %config.data_dir().display()))]
pub fn load_airports(config: &IngestConfig, iso_codes: Option<&IsoCodes>) -> Result<Dataset> {
    let table = read_table(
        &config.file(AIRPORTS_FILE),
        &CsvFormat::AIRPORTS,
        &AIRPORT_COLUMNS,
    )?;
    let table = match iso_codes {
        Some(codes) => attach_iso_codes(table, c::STATE_NAME, codes)?,
        None => table,
    };

    let airports = Dataset::new(DatasetKind::Airports, table)?;
    info!(
        rows = airports.len(),
        airport_reported = c::AIRPORT_REPORTED
            .iter()
            .any(|column| airports.table().has_column(column)),
        "Loaded airports"
    );
    Ok(airports)
}

/// Daily traffic per aircraft operator, names folded onto their groups.
#[instrument(skip_all, fields(data_dir = %config.data_dir().display()))]
pub fn load_aircraft_operators(config: &IngestConfig) -> Result<Dataset> {
    let table = combine_yearly(
        config,
        OPERATORS_FILE,
        config.operators_cutoff,
        &DAILY_COLUMNS,
    )?;
    let table = rename_values(table, c::ENTITY, canonical_operator_name)?;

    let operators = Dataset::new(DatasetKind::AircraftOperators, table)?;
    info!(
        rows = operators.len(),
        span = ?operators.date_bounds(),
        "Loaded aircraft operators"
    );
    Ok(operators)
}

/// Load all four datasets from `config.data_dir`.
pub fn load_dashboard(config: &IngestConfig) -> Result<DashboardParts> {
    let iso_codes = if config.attach_iso_codes {
        Some(load_iso_codes(&config.file(ISO_CODES_FILE))?)
    } else {
        None
    };

    let parts = DashboardParts {
        states: load_states(config, iso_codes.as_ref())?,
        area_centers: load_area_centers(config)?,
        airports: load_airports(config, iso_codes.as_ref())?,
        aircraft_operators: load_aircraft_operators(config)?,
    };
    info!(
        data_dir = %config.data_dir().display(),
        years = ?config.years,
        "Dashboard datasets loaded"
    );
    Ok(parts)
}
