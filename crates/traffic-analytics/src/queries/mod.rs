//! Dashboard views.
//!
//! Each view is a function from a loaded [`Frame`] and the request's
//! [`FilterParams`](traffic_domain::FilterParams) to a derived table ready
//! for charting. Views compose lazy frame transforms and run one query at
//! the end. The same views are exposed as methods on
//! [`AnalyticsEngine`](crate::AnalyticsEngine), which supplies the loaded
//! datasets and the ranking and moving-average settings.

pub mod airports;
pub mod area_centers;
pub mod operators;
pub mod options;
pub mod states;

pub use airports::{
    average_per_month, average_per_year, daily_average_per_airport, daily_average_per_state,
    number_of_flights, top_flight_airports,
};
pub use area_centers::area_centers_data;
pub use operators::{
    operator_monthly, operator_traffic, operator_traffic_variations, operator_yearly,
    reference_period, top_ten_operators,
};
pub use options::entity_options;
pub use states::{state_traffic, states_map, top_ten_states, traffic_variations, weekly_variations};

use crate::aggregate::{aggregate, Reducer};
use crate::error::Result;
use crate::frame::Frame;
use crate::rolling::rolling_mean;
use traffic_domain::columns as c;

/// Daily sums of the variation metrics with the 2019 reference smoothed
/// over `window` days. Shared by the state and operator variation charts.
pub(crate) fn variations_by_date(filtered: &Frame, window: usize) -> Result<Frame> {
    let daily = aggregate(
        filtered,
        &[c::DATE],
        &[
            c::MOVING_AVERAGE,
            c::FLIGHTS,
            c::FLIGHTS_2019,
            c::FLIGHTS_PREVIOUS_YEAR,
        ],
        Reducer::Sum,
    )?;
    rolling_mean(&daily, c::FLIGHTS_2019, c::MOVING_AVERAGE_2019, window)
}
