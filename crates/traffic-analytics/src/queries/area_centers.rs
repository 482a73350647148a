//! Area control center views.

use crate::aggregate::{aggregate, Reducer};
use crate::engine::AnalyticsEngine;
use crate::error::Result;
use crate::filter::apply_filters;
use crate::frame::{Frame, SortOrder};
use traffic_domain::columns as c;
use traffic_domain::{FilterParams, Table};

/// Mean of `fields` per area control center, busiest first.
///
/// Selections apply to `STATE_NAME` and `ACC`. Rows are ordered by
/// `Flights` when it is among the fields, by state and center otherwise.
pub fn area_centers_data(
    area_centers: &Frame,
    params: &FilterParams,
    fields: &[&str],
) -> Result<Table> {
    let filtered = apply_filters(area_centers, params)?;
    let grouped = aggregate(&filtered, &[c::STATE_NAME, c::ACC], fields, Reducer::Mean)?;
    if grouped.has_column(c::FLIGHTS) {
        grouped.sorted_by(c::FLIGHTS, SortOrder::Descending)?.collect()
    } else {
        grouped.collect()
    }
}

impl AnalyticsEngine {
    /// Daily flights and 2019 reference per area control center.
    pub fn area_centers_data(&self, params: &FilterParams) -> Result<Table> {
        area_centers_data(
            self.data().area_centers(),
            params,
            &[c::FLIGHTS, c::FLIGHTS_2019],
        )
    }
}
