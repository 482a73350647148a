//! Airport traffic views.
//!
//! Airport files carry IFR movements twice: as recorded by the Network
//! Manager (always present) and as reported by the airport (optional). The
//! selected [`IfrMovement`]s decide which pair of columns a view reads; the
//! airport-reported column drops out of the result when the dataset lacks it.

use crate::aggregate::{aggregate, Reducer};
use crate::calendar::{with_month, with_year};
use crate::engine::AnalyticsEngine;
use crate::error::Result;
use crate::filter::{apply_filters, filter_by_date, filter_by_dimensions};
use crate::frame::{Frame, SortOrder};
use crate::rolling::rolling_mean;
use crate::selection::{flight_column, flight_columns, has_airport_data, IfrMovement};
use crate::top_n::top_n;
use traffic_domain::columns as c;
use traffic_domain::{FilterParams, Table};

/// Daily movements with their moving averages, oldest day first.
pub fn number_of_flights(
    airports: &Frame,
    params: &FilterParams,
    movements: &[IfrMovement],
    window: usize,
) -> Result<Table> {
    let filtered = apply_filters(airports, params)?;
    let columns = flight_columns(movements);
    let daily = aggregate(&filtered, &[c::DATE], &columns.as_array(), Reducer::Sum)?;

    let daily = rolling_mean(&daily, columns.network, c::NM_MOVING_AVERAGE, window)?;
    if daily.has_column(columns.airport) {
        rolling_mean(&daily, columns.airport, c::AIRPORT_MOVING_AVERAGE, window)?.collect()
    } else {
        daily.collect()
    }
}

/// The `n` busiest airports by mean daily Network Manager movements, as
/// `[APT_NAME, Daily Average]`.
pub fn top_flight_airports(
    airports: &Frame,
    params: &FilterParams,
    movements: &[IfrMovement],
    n: usize,
) -> Result<Table> {
    let dated = filter_by_date(airports, params.start_date(), params.end_date())?;
    let metric = flight_column(movements);
    top_n(&dated, c::AIRPORT_NAME, metric, n, &[])?
        .rename_column(metric, c::DAILY_AVERAGE)?
        .collect()
}

/// Movements summed per state, states in alphabetical order.
pub fn daily_average_per_state(
    airports: &Frame,
    params: &FilterParams,
    movements: &[IfrMovement],
) -> Result<Table> {
    let filtered = apply_filters(airports, params)?;
    let columns = flight_columns(movements);
    let metrics = if has_airport_data(&filtered) {
        vec![columns.network, columns.airport]
    } else {
        vec![columns.network]
    };
    aggregate(&filtered, &[c::STATE_NAME], &metrics, Reducer::Sum)?
        .sorted_by(c::STATE_NAME, SortOrder::Ascending)?
        .collect()
}

/// Mean daily movements per airport, keyed for the airport map.
pub fn daily_average_per_airport(
    airports: &Frame,
    params: &FilterParams,
    movements: &[IfrMovement],
) -> Result<Table> {
    let filtered = apply_filters(airports, params)?;
    aggregate(
        &filtered,
        &[c::AIRPORT_CODE, c::AIRPORT_NAME, c::ISO],
        &[flight_column(movements)],
        Reducer::Mean,
    )?
    .collect()
}

/// Mean daily movements per year. The date window is ignored so every year
/// stays comparable.
pub fn average_per_year(
    airports: &Frame,
    params: &FilterParams,
    movements: &[IfrMovement],
) -> Result<Table> {
    let filtered = filter_by_dimensions(airports, params.selectors())?;
    aggregate(
        &with_year(&filtered)?,
        &[c::YEAR],
        &flight_columns(movements).as_array(),
        Reducer::Mean,
    )?
    .sorted_by(c::YEAR, SortOrder::Ascending)?
    .collect()
}

/// Mean daily movements per calendar month, January first.
pub fn average_per_month(
    airports: &Frame,
    params: &FilterParams,
    movements: &[IfrMovement],
) -> Result<Table> {
    let filtered = apply_filters(airports, params)?;
    aggregate(
        &with_month(&filtered)?,
        &[c::MONTH_MON, c::MONTH_NUM],
        &flight_columns(movements).as_array(),
        Reducer::Mean,
    )?
    .sorted_by(c::MONTH_NUM, SortOrder::Ascending)?
    .collect()
}

impl AnalyticsEngine {
    pub fn number_of_flights(
        &self,
        params: &FilterParams,
        movements: &[IfrMovement],
    ) -> Result<Table> {
        number_of_flights(
            self.data().airports(),
            params,
            movements,
            self.settings().rolling_window,
        )
    }

    pub fn top_flight_airports(
        &self,
        params: &FilterParams,
        movements: &[IfrMovement],
    ) -> Result<Table> {
        top_flight_airports(
            self.data().airports(),
            params,
            movements,
            self.settings().top_n,
        )
    }

    pub fn daily_average_per_state(
        &self,
        params: &FilterParams,
        movements: &[IfrMovement],
    ) -> Result<Table> {
        daily_average_per_state(self.data().airports(), params, movements)
    }

    pub fn daily_average_per_airport(
        &self,
        params: &FilterParams,
        movements: &[IfrMovement],
    ) -> Result<Table> {
        daily_average_per_airport(self.data().airports(), params, movements)
    }

    pub fn average_per_year(
        &self,
        params: &FilterParams,
        movements: &[IfrMovement],
    ) -> Result<Table> {
        average_per_year(self.data().airports(), params, movements)
    }

    pub fn average_per_month(
        &self,
        params: &FilterParams,
        movements: &[IfrMovement],
    ) -> Result<Table> {
        average_per_month(self.data().airports(), params, movements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{self, assert_close, column_numbers, column_strings, day};
    use crate::rolling::DEFAULT_WINDOW;

    const BOTH: [IfrMovement; 2] = [IfrMovement::Arrival, IfrMovement::Departure];

    fn airports(with_airport: bool) -> Frame {
        fixtures::frame(&fixtures::airports(with_airport))
    }

    #[test]
    fn test_number_of_flights_with_airport_data() {
        let table =
            number_of_flights(&airports(true), &FilterParams::new(), &BOTH, DEFAULT_WINDOW)
                .unwrap();

        assert_eq!(
            table.column_names().collect::<Vec<_>>(),
            vec![
                c::DATE,
                c::NM_TOTAL_FLIGHTS,
                c::AIRPORT_TOTAL_FLIGHTS,
                c::NM_MOVING_AVERAGE,
                c::AIRPORT_MOVING_AVERAGE,
            ]
        );
        assert_eq!(column_numbers(&table, c::NM_TOTAL_FLIGHTS), vec![610.0, 1720.0, 510.0]);
        let smoothed = column_numbers(&table, c::NM_MOVING_AVERAGE);
        assert_close(smoothed[1], 1165.0);
        assert_close(smoothed[2], 2840.0 / 3.0);
    }

    #[test]
    fn test_number_of_flights_network_only() {
        let table =
            number_of_flights(&airports(false), &FilterParams::new(), &[], DEFAULT_WINDOW)
                .unwrap();
        assert_eq!(
            table.column_names().collect::<Vec<_>>(),
            vec![c::DATE, c::NM_TOTAL_FLIGHTS, c::NM_MOVING_AVERAGE]
        );
    }

    #[test]
    fn test_top_airports_by_arrivals() {
        let table = top_flight_airports(
            &airports(true),
            &FilterParams::new(),
            &[IfrMovement::Arrival],
            2,
        )
        .unwrap();
        assert_eq!(
            table.column_names().collect::<Vec<_>>(),
            vec![c::AIRPORT_NAME, c::DAILY_AVERAGE]
        );
        assert_eq!(column_strings(&table, c::AIRPORT_NAME), vec!["Paris-CDG", "Madrid"]);
        assert_eq!(column_numbers(&table, c::DAILY_AVERAGE), vec![365.0, 300.0]);
    }

    #[test]
    fn test_per_state_sums() {
        let table =
            daily_average_per_state(&airports(false), &FilterParams::new(), &BOTH).unwrap();
        assert_eq!(column_strings(&table, c::STATE_NAME), vec!["France", "Spain"]);
        assert_eq!(column_numbers(&table, c::NM_TOTAL_FLIGHTS), vec![1640.0, 1200.0]);
        assert!(!table.has_column(c::AIRPORT_TOTAL_FLIGHTS));

        let table =
            daily_average_per_state(&airports(true), &FilterParams::new(), &BOTH).unwrap();
        assert!(table.has_column(c::AIRPORT_TOTAL_FLIGHTS));
    }

    #[test]
    fn test_per_airport_keys() {
        let params = FilterParams::new().with_selection(c::STATE_NAME, ["France"]);
        let table =
            daily_average_per_airport(&airports(true), &params, &[IfrMovement::Departure])
                .unwrap();
        assert_eq!(column_strings(&table, c::AIRPORT_CODE), vec!["LFPG", "LFPO"]);
        assert_eq!(column_numbers(&table, c::NM_DEP_FLIGHTS), vec![350.0, 100.0]);
    }

    #[test]
    fn test_per_year_ignores_dates() {
        let params = FilterParams::between(day(2021, 1, 1), day(2021, 12, 31));
        let table = average_per_year(&airports(false), &params, &BOTH).unwrap();
        assert_eq!(column_strings(&table, c::YEAR), vec!["2020", "2021"]);
        assert_eq!(column_numbers(&table, c::NM_TOTAL_FLIGHTS), vec![610.0, 557.5]);
    }

    #[test]
    fn test_per_month_in_calendar_order() {
        let table = average_per_month(&airports(true), &FilterParams::new(), &BOTH).unwrap();
        assert_eq!(column_strings(&table, c::MONTH_MON), vec!["JAN", "FEB", "DEC"]);

        let params = FilterParams::between(day(2021, 1, 1), day(2021, 2, 28))
            .with_selection(c::AIRPORT_NAME, ["Madrid"]);
        let table = average_per_month(&airports(true), &params, &BOTH).unwrap();
        assert_eq!(column_numbers(&table, c::AIRPORT_TOTAL_FLIGHTS), vec![690.0, 509.0]);
    }
}
