//! State traffic views.

use super::variations_by_date;
use crate::aggregate::{aggregate, Reducer};
use crate::calendar::with_season;
use crate::engine::AnalyticsEngine;
use crate::error::Result;
use crate::filter::{apply_filters, exclude_values, filter_by_date, filter_traffic_variability};
use crate::frame::{Frame, SortOrder};
use crate::top_n::top_n;
use traffic_domain::columns as c;
use traffic_domain::{FilterParams, Table};

/// The `n` busiest states by mean daily flights in the date window.
pub fn top_ten_states(states: &Frame, params: &FilterParams, n: usize) -> Result<Table> {
    let dated = filter_by_date(states, params.start_date(), params.end_date())?;
    top_n(&dated, c::ENTITY, c::FLIGHTS, n, &[c::TOTAL_NETWORK_AREA])?.collect()
}

/// Mean daily flights and 2019 reference per state, keyed by ISO code for
/// the choropleth map. States without an ISO code are left out.
pub fn states_map(states: &Frame, params: &FilterParams) -> Result<Table> {
    let dated = filter_by_date(states, params.start_date(), params.end_date())?;
    let per_state = exclude_values(&dated, c::ENTITY, &[c::TOTAL_NETWORK_AREA])?;
    aggregate(
        &per_state,
        &[c::ISO, c::ENTITY],
        &[c::FLIGHTS, c::FLIGHTS_2019],
        Reducer::Mean,
    )?
    .collect()
}

/// Mean daily flights per selected state, busiest first.
pub fn state_traffic(states: &Frame, params: &FilterParams) -> Result<Table> {
    let filtered = apply_filters(states, params)?;
    let per_state = exclude_values(&filtered, c::ENTITY, &[c::TOTAL_NETWORK_AREA])?;
    aggregate(
        &per_state,
        &[c::ENTITY],
        &[c::FLIGHTS, c::FLIGHTS_2019],
        Reducer::Mean,
    )?
    .sorted_by(c::FLIGHTS, SortOrder::Descending)?
    .collect()
}

/// Daily traffic of the selected states (the network total when none are
/// selected) against 2019 and the previous year.
pub fn traffic_variations(states: &Frame, params: &FilterParams, window: usize) -> Result<Table> {
    let filtered = filter_traffic_variability(states, params, c::ENTITY)?;
    variations_by_date(&filtered, window)?.collect()
}

/// Mean weekly traffic and variation against 2019, tagged with the season.
pub fn weekly_variations(states: &Frame, params: &FilterParams) -> Result<Table> {
    let filtered = filter_traffic_variability(states, params, c::ENTITY)?;
    aggregate(
        &with_season(&filtered)?,
        &[c::WEEK, c::SEASON],
        &[c::MOVING_AVERAGE, c::FLIGHTS, c::VARIATION_2019],
        Reducer::Mean,
    )?
    .collect()
}

impl AnalyticsEngine {
    pub fn top_ten_states(&self, params: &FilterParams) -> Result<Table> {
        top_ten_states(self.data().states(), params, self.settings().top_n)
    }

    pub fn states_map(&self, params: &FilterParams) -> Result<Table> {
        states_map(self.data().states(), params)
    }

    pub fn state_traffic(&self, params: &FilterParams) -> Result<Table> {
        state_traffic(self.data().states(), params)
    }

    pub fn traffic_variations(&self, params: &FilterParams) -> Result<Table> {
        traffic_variations(
            self.data().states(),
            params,
            self.settings().rolling_window,
        )
    }

    pub fn weekly_variations(&self, params: &FilterParams) -> Result<Table> {
        weekly_variations(self.data().states(), params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{self, assert_close, column_numbers, column_strings, day};
    use crate::top_n::DEFAULT_TOP_N;
    use traffic_domain::Value;

    fn states() -> Frame {
        fixtures::frame(&fixtures::states())
    }

    fn network_days() -> Frame {
        fixtures::frame(&fixtures::network_days())
    }

    #[test]
    fn test_top_states_skip_network_total() {
        let params = FilterParams::between(day(2021, 1, 1), day(2021, 1, 2));
        let table = top_ten_states(&states(), &params, DEFAULT_TOP_N).unwrap();
        assert_eq!(column_strings(&table, c::ENTITY), vec!["A", "B"]);
        assert_eq!(column_numbers(&table, c::FLIGHTS), vec![15.0, 10.0]);
    }

    #[test]
    fn test_top_states_ignore_selection() {
        let params = FilterParams::new().with_selection(c::ENTITY, ["B"]);
        let table = top_ten_states(&states(), &params, 1).unwrap();
        assert_eq!(column_strings(&table, c::ENTITY), vec!["A"]);
    }

    #[test]
    fn test_states_map_keys() {
        let table = states_map(&states(), &FilterParams::new()).unwrap();
        assert_eq!(
            table.column_names().collect::<Vec<_>>(),
            vec![c::ISO, c::ENTITY, c::FLIGHTS, c::FLIGHTS_2019]
        );
        assert_eq!(column_strings(&table, c::ISO), vec!["AAA", "BBB"]);
        assert_eq!(column_numbers(&table, c::FLIGHTS_2019), vec![17.0, 10.0]);
    }

    #[test]
    fn test_state_traffic_sorted_descending() {
        let table = state_traffic(&states(), &FilterParams::new()).unwrap();
        assert_eq!(column_strings(&table, c::ENTITY), vec!["A", "B"]);

        let params = FilterParams::new().with_selection(c::ENTITY, ["B"]);
        let table = state_traffic(&states(), &params).unwrap();
        assert_eq!(column_numbers(&table, c::FLIGHTS), vec![10.0]);
    }

    #[test]
    fn test_traffic_variations_follow_network_total() {
        let table = traffic_variations(&network_days(), &FilterParams::new(), 7).unwrap();

        assert_eq!(table.len(), 10);
        assert_eq!(table.value(0, c::DATE), Some(&Value::Date(day(2021, 3, 1))));
        assert_close(column_numbers(&table, c::FLIGHTS)[0], 10.0);
        let smoothed = column_numbers(&table, c::MOVING_AVERAGE_2019);
        assert_close(smoothed[0], 20.0);
        assert_close(smoothed[9], 140.0);
    }

    #[test]
    fn test_weekly_variations() {
        let table = weekly_variations(&network_days(), &FilterParams::new()).unwrap();
        assert_eq!(column_strings(&table, c::SEASON), vec!["Winter", "Spring"]);
        let flights = column_numbers(&table, c::FLIGHTS);
        assert_close(flights[0], 35.0);
        assert_close(flights[1], 85.0);
    }
}
