//! Small synthetic datasets shared by the unit tests.

use crate::frame::Frame;
use crate::store::Store;
use chrono::NaiveDate;
use traffic_domain::columns as c;
use traffic_domain::{Column, Dataset, DatasetKind, Row, Table, Value};

pub fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// `dataset` loaded into a store of its own.
pub fn frame(dataset: &Dataset) -> Frame {
    Store::open_in_memory()
        .unwrap()
        .load_dataset(dataset)
        .unwrap()
}

/// Any table loaded into a store of its own.
pub fn table_frame(table: &Table) -> Frame {
    Store::open_in_memory()
        .unwrap()
        .load_table("input", table)
        .unwrap()
}

/// Three entities (A, B and the network total) over two January days.
pub fn states() -> Dataset {
    let rows = [
        ("A", 1, 10.0, 12.0),
        ("A", 2, 20.0, 22.0),
        ("B", 1, 5.0, 6.0),
        ("B", 2, 15.0, 14.0),
        (c::TOTAL_NETWORK_AREA, 1, 15.0, 18.0),
        (c::TOTAL_NETWORK_AREA, 2, 35.0, 36.0),
    ];
    let table = Table::new(
        vec![
            Column::text(c::ENTITY),
            Column::date(c::DATE),
            Column::number(c::FLIGHTS),
            Column::number(c::FLIGHTS_2019),
            Column::text(c::ISO),
        ],
        rows.iter()
            .map(|(entity, d, flights, flights_2019)| {
                Row::new(vec![
                    (*entity).into(),
                    day(2021, 1, *d).into(),
                    (*flights).into(),
                    (*flights_2019).into(),
                    iso(entity),
                ])
            })
            .collect(),
    )
    .unwrap();
    Dataset::new(DatasetKind::States, table).unwrap()
}

fn iso(entity: &str) -> Value {
    match entity {
        "A" => "AAA".into(),
        "B" => "BBB".into(),
        _ => Value::Null,
    }
}

/// Network totals over ten consecutive days, with moving-average and
/// reference columns, listed newest first.
pub fn network_days() -> Dataset {
    let mut rows: Vec<Row> = (1..=10)
        .map(|d| {
            let flights = f64::from(d) * 10.0;
            Row::new(vec![
                c::TOTAL_NETWORK_AREA.into(),
                day(2021, 3, d).into(),
                flights.into(),
                (flights * 2.0).into(),
                (flights - 5.0).into(),
                (flights + 1.0).into(),
                (-50.0).into(),
                i64::from(9 + d / 7).into(),
            ])
        })
        .collect();
    rows.push(Row::new(vec![
        "Spain".into(),
        day(2021, 3, 1).into(),
        1000.0.into(),
        1000.0.into(),
        1000.0.into(),
        1000.0.into(),
        0.0.into(),
        9_i64.into(),
    ]));
    rows.reverse();
    let table = Table::new(
        vec![
            Column::text(c::ENTITY),
            Column::date(c::DATE),
            Column::number(c::FLIGHTS),
            Column::number(c::FLIGHTS_2019),
            Column::number(c::FLIGHTS_PREVIOUS_YEAR),
            Column::number(c::MOVING_AVERAGE),
            Column::number(c::VARIATION_2019),
            Column::integer(c::WEEK),
        ],
        rows,
    )
    .unwrap();
    Dataset::new(DatasetKind::States, table).unwrap()
}

/// Area control centers in two states.
pub fn area_centers() -> Dataset {
    let rows = [
        ("France", "Brest", 1, 800.0, 900.0),
        ("France", "Brest", 2, 1000.0, 1100.0),
        ("France", "Reims", 1, 600.0, 700.0),
        ("Spain", "Madrid", 1, 1200.0, 1300.0),
        ("Spain", "Madrid", 2, 1400.0, 1500.0),
    ];
    let table = Table::new(
        vec![
            Column::text(c::STATE_NAME),
            Column::text(c::ACC),
            Column::date(c::DATE),
            Column::number(c::FLIGHTS),
            Column::number(c::FLIGHTS_2019),
        ],
        rows.iter()
            .map(|(state, acc, d, flights, flights_2019)| {
                Row::new(vec![
                    (*state).into(),
                    (*acc).into(),
                    day(2021, 2, *d).into(),
                    (*flights).into(),
                    (*flights_2019).into(),
                ])
            })
            .collect(),
    )
    .unwrap();
    Dataset::new(DatasetKind::AreaCenters, table).unwrap()
}

/// Airport movements; airport-reported columns only when `with_airport`.
pub fn airports(with_airport: bool) -> Dataset {
    // (code, name, state, date, nm dep, nm arr, apt dep, apt arr)
    let rows = [
        ("LFPG", "Paris-CDG", "France", day(2020, 12, 31), 300.0, 310.0, 299.0, 305.0),
        ("LFPG", "Paris-CDG", "France", day(2021, 1, 1), 400.0, 420.0, 398.0, 421.0),
        ("LFPO", "Paris-Orly", "France", day(2021, 1, 1), 100.0, 110.0, 101.0, 111.0),
        ("LEMD", "Madrid", "Spain", day(2021, 1, 1), 350.0, 340.0, 351.0, 339.0),
        ("LEMD", "Madrid", "Spain", day(2021, 2, 1), 250.0, 260.0, 250.0, 259.0),
    ];
    let mut columns = vec![
        Column::integer(c::YEAR),
        Column::integer(c::MONTH_NUM),
        Column::text(c::MONTH_MON),
        Column::date(c::DATE),
        Column::text(c::AIRPORT_CODE),
        Column::text(c::AIRPORT_NAME),
        Column::text(c::STATE_NAME),
        Column::number(c::NM_DEP_FLIGHTS),
        Column::number(c::NM_ARR_FLIGHTS),
        Column::number(c::NM_TOTAL_FLIGHTS),
        Column::text(c::ISO),
    ];
    if with_airport {
        columns.extend([
            Column::number(c::AIRPORT_DEP_FLIGHTS),
            Column::number(c::AIRPORT_ARR_FLIGHTS),
            Column::number(c::AIRPORT_TOTAL_FLIGHTS),
        ]);
    }
    let rows = rows
        .iter()
        .map(|(code, name, state, date, nm_dep, nm_arr, apt_dep, apt_arr)| {
            use chrono::Datelike;
            let mut cells: Vec<Value> = vec![
                i64::from(date.year()).into(),
                i64::from(date.month()).into(),
                date.format("%b").to_string().to_uppercase().into(),
                (*date).into(),
                (*code).into(),
                (*name).into(),
                (*state).into(),
                (*nm_dep).into(),
                (*nm_arr).into(),
                (nm_dep + nm_arr).into(),
                (if *state == "France" { "FRA" } else { "ESP" }).into(),
            ];
            if with_airport {
                cells.extend([
                    (*apt_dep).into(),
                    (*apt_arr).into(),
                    (apt_dep + apt_arr).into(),
                ]);
            }
            Row::new(cells)
        })
        .collect();
    Dataset::new(DatasetKind::Airports, Table::new(columns, rows).unwrap()).unwrap()
}

/// Operator traffic in 2021 with the matching 2019 reference days.
pub fn operators() -> Dataset {
    let rows = [
        ("Ryanair Group", day(2021, 1, 4), 1000.0, day(2019, 1, 7), 2000.0),
        ("Ryanair Group", day(2021, 2, 1), 1200.0, day(2019, 2, 4), 2200.0),
        ("easyJet Group", day(2021, 1, 4), 300.0, day(2019, 1, 7), 1500.0),
        ("easyJet Group", day(2021, 2, 1), 500.0, day(2019, 2, 4), 1700.0),
        ("Wizz Air Group", day(2021, 1, 4), 400.0, day(2019, 1, 7), 450.0),
        ("Wizz Air Group", day(2020, 12, 28), 350.0, day(2018, 12, 31), 420.0),
    ];
    let table = Table::new(
        vec![
            Column::text(c::ENTITY),
            Column::date(c::DATE),
            Column::number(c::FLIGHTS),
            Column::date(c::DATE_2019),
            Column::number(c::FLIGHTS_2019),
        ],
        rows.iter()
            .map(|(entity, date, flights, date_2019, flights_2019)| {
                Row::new(vec![
                    (*entity).into(),
                    (*date).into(),
                    (*flights).into(),
                    (*date_2019).into(),
                    (*flights_2019).into(),
                ])
            })
            .collect(),
    )
    .unwrap();
    Dataset::new(DatasetKind::AircraftOperators, table).unwrap()
}

/// Values of one column rendered as strings.
pub fn column_strings(table: &Table, column: &str) -> Vec<String> {
    table
        .column_values(column)
        .unwrap()
        .map(ToString::to_string)
        .collect()
}

/// Values of one numeric column.
pub fn column_numbers(table: &Table, column: &str) -> Vec<f64> {
    table
        .column_values(column)
        .unwrap()
        .map(|v| v.as_f64().unwrap_or(f64::NAN))
        .collect()
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
