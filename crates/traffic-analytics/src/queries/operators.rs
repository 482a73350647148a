//! Aircraft operator views.

use super::variations_by_date;
use crate::aggregate::{aggregate, Reducer};
use crate::calendar::{with_month, with_year};
use crate::engine::AnalyticsEngine;
use crate::error::Result;
use crate::filter::{apply_filters, filter_by_date, filter_by_dimensions};
use crate::frame::{quote, Frame, SortOrder};
use crate::top_n::top_n;
use tracing::debug;
use traffic_domain::columns as c;
use traffic_domain::{FilterParams, Table};

/// Daily traffic of the selected operators against 2019 and the previous
/// year. With no operator selected every operator is summed.
pub fn operator_traffic_variations(
    operators: &Frame,
    params: &FilterParams,
    window: usize,
) -> Result<Table> {
    let filtered = apply_filters(operators, params)?;
    variations_by_date(&filtered, window)?.collect()
}

/// The `n` busiest operators by mean daily flights in the date window.
pub fn top_ten_operators(operators: &Frame, params: &FilterParams, n: usize) -> Result<Table> {
    let dated = filter_by_date(operators, params.start_date(), params.end_date())?;
    top_n(&dated, c::ENTITY, c::FLIGHTS, n, &[])?.collect()
}

/// Mean daily flights and 2019 reference per selected operator.
pub fn operator_traffic(operators: &Frame, params: &FilterParams) -> Result<Table> {
    let filtered = apply_filters(operators, params)?;
    aggregate(
        &filtered,
        &[c::ENTITY],
        &[c::FLIGHTS, c::FLIGHTS_2019],
        Reducer::Mean,
    )?
    .collect()
}

/// Mean daily flights and 2019 reference per calendar month.
pub fn operator_monthly(operators: &Frame, params: &FilterParams) -> Result<Table> {
    let filtered = apply_filters(operators, params)?;
    aggregate(
        &with_month(&filtered)?,
        &[c::MONTH_MON, c::MONTH_NUM],
        &[c::FLIGHTS_2019, c::FLIGHTS],
        Reducer::Mean,
    )?
    .sorted_by(c::MONTH_NUM, SortOrder::Ascending)?
    .collect()
}

/// Mean daily flights per year, with the 2019 reference year prepended.
///
/// The date window applies to `operators` only; `reference` is filtered by
/// the operator selection alone.
pub fn operator_yearly(
    operators: &Frame,
    reference: &Frame,
    params: &FilterParams,
) -> Result<Table> {
    let current = apply_filters(operators, params)?;
    let reference = filter_by_dimensions(reference, params.selectors())?;

    let per_year = |frame: &Frame| -> Result<Frame> {
        aggregate(&with_year(frame)?, &[c::YEAR], &[c::FLIGHTS], Reducer::Mean)
    };
    Frame::union_all(&[per_year(&reference)?, per_year(&current)?])?
        .sorted_by(c::YEAR, SortOrder::Ascending)?
        .collect()
}

/// Reference traffic as its own relation: the `Day 2019` and
/// `Flights 2019 (Reference)` of every row dated in `year` whose reference
/// day falls in `reference_year`, as `[Entity, FLT_DATE, Flights]`.
pub fn reference_period(operators: &Frame, year: i32, reference_year: i32) -> Result<Frame> {
    operators.require_column(c::DATE)?;
    operators.require_column(c::DATE_2019)?;
    let in_period = operators.filter(
        &format!(
            "year({}) = {year} AND year({}) = {reference_year}",
            quote(c::DATE),
            quote(c::DATE_2019)
        ),
        Vec::new(),
    );

    debug!(year, reference_year, "Reference period extracted");
    in_period
        .select(&[c::ENTITY, c::DATE_2019, c::FLIGHTS_2019])?
        .rename_column(c::DATE_2019, c::DATE)?
        .rename_column(c::FLIGHTS_2019, c::FLIGHTS)
}

impl AnalyticsEngine {
    pub fn operator_traffic_variations(&self, params: &FilterParams) -> Result<Table> {
        operator_traffic_variations(
            self.data().aircraft_operators(),
            params,
            self.settings().rolling_window,
        )
    }

    pub fn top_ten_operators(&self, params: &FilterParams) -> Result<Table> {
        top_ten_operators(
            self.data().aircraft_operators(),
            params,
            self.settings().top_n,
        )
    }

    pub fn operator_traffic(&self, params: &FilterParams) -> Result<Table> {
        operator_traffic(self.data().aircraft_operators(), params)
    }

    pub fn operator_monthly(&self, params: &FilterParams) -> Result<Table> {
        operator_monthly(self.data().aircraft_operators(), params)
    }

    pub fn operator_yearly(&self, params: &FilterParams) -> Result<Table> {
        operator_yearly(
            self.data().aircraft_operators(),
            self.data().operators_reference(),
            params,
        )
    }
}
