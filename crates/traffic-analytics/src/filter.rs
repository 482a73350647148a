//! Date-range and dimension filters.
//!
//! Every filter returns a new [`Frame`] with the same columns and the
//! surviving rows in their original order.

use crate::error::{AnalyticsError, Result};
use crate::frame::{quote, Frame};
use crate::store::date_param;
use chrono::NaiveDate;
use std::collections::BTreeSet;
use tracing::debug;
use traffic_domain::columns::{self as c, TOTAL_NETWORK_AREA};
use traffic_domain::{ColumnKind, DateRange, DimensionSelectors, FilterParams};

// =============================================================================
// DATE RANGE
// =============================================================================

/// Resolve optional bounds against the data: a missing start becomes the
/// earliest date, a missing end the latest.
pub fn resolve_date_range(
    frame: &Frame,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<DateRange> {
    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(AnalyticsError::InvalidFilter(format!(
                "start date {start} is after end date {end}"
            )));
        }
        return Ok(DateRange::new(start, end));
    }

    let bounds = frame.date_bounds()?.ok_or(AnalyticsError::EmptyDataset)?;
    let range = DateRange::new(start.unwrap_or(bounds.start), end.unwrap_or(bounds.end));
    if range.start > range.end {
        return Err(AnalyticsError::InvalidFilter(format!(
            "start date {} is after end date {}",
            range.start, range.end
        )));
    }
    Ok(range)
}

/// Keep rows whose date lies in the inclusive window.
pub fn filter_by_date(
    frame: &Frame,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<Frame> {
    frame.require_column(c::DATE)?;
    let range = resolve_date_range(frame, start, end)?;
    let filtered = frame.filter(
        &format!(
            "{} BETWEEN CAST(? AS DATE) AND CAST(? AS DATE)",
            quote(c::DATE)
        ),
        vec![date_param(range.start), date_param(range.end)],
    );

    debug!(start = %range.start, end = %range.end, "Date filter applied");
    Ok(filtered)
}

// =============================================================================
// DIMENSIONS
// =============================================================================

/// Keep rows whose value in every selected dimension is one of the selected
/// values. Empty selections pass everything through.
pub fn filter_by_dimensions(frame: &Frame, selectors: &DimensionSelectors) -> Result<Frame> {
    let mut predicates = Vec::new();
    let mut params = Vec::new();
    for (dimension, values) in selectors.iter().filter(|(_, values)| !values.is_empty()) {
        let kind = frame.require_column(dimension)?.kind;
        if kind != ColumnKind::Text {
            return Err(AnalyticsError::InvalidFilter(format!(
                "dimension {dimension} holds {kind} values, expected text"
            )));
        }
        predicates.push(format!("{} IN ({})", quote(dimension), placeholders(values.len())));
        params.extend(values.iter().cloned());
    }

    if predicates.is_empty() {
        return Ok(frame.clone());
    }
    debug!(dimensions = predicates.len(), values = params.len(), "Dimension filter applied");
    Ok(frame.filter(&predicates.join(" AND "), params))
}

/// Date filter followed by the dimension filter.
pub fn apply_filters(frame: &Frame, params: &FilterParams) -> Result<Frame> {
    let dated = filter_by_date(frame, params.start_date(), params.end_date())?;
    filter_by_dimensions(&dated, params.selectors())
}

/// Filter for network-wide variation charts.
///
/// With nothing selected in `entity_column` the view falls back to the
/// network total row.
pub fn filter_traffic_variability(
    frame: &Frame,
    params: &FilterParams,
    entity_column: &str,
) -> Result<Frame> {
    let dated = filter_by_date(frame, params.start_date(), params.end_date())?;
    let mut selectors = params.selectors().clone();
    if params.selection(entity_column).is_none() {
        selectors.insert(
            entity_column.to_string(),
            BTreeSet::from([TOTAL_NETWORK_AREA.to_string()]),
        );
    }
    filter_by_dimensions(&dated, &selectors)
}

/// Drop rows whose text value in `column` is one of `excluded`. Nulls stay.
pub fn exclude_values(frame: &Frame, column: &str, excluded: &[&str]) -> Result<Frame> {
    let kind = frame.require_column(column)?.kind;
    if excluded.is_empty() {
        return Ok(frame.clone());
    }
    if kind != ColumnKind::Text {
        return Err(AnalyticsError::InvalidFilter(format!(
            "cannot exclude text values from {kind} column {column}"
        )));
    }
    let name = quote(column);
    Ok(frame.filter(
        &format!("({name} IS NULL OR {name} NOT IN ({}))", placeholders(excluded.len())),
        excluded.iter().map(|v| (*v).to_string()).collect(),
    ))
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{self, column_numbers, column_strings, day};
    use traffic_domain::{Column, Row, Table, Value};

    #[test]
    fn test_open_bounds_keep_every_row() {
        let states = fixtures::states();
        let filtered = filter_by_date(&fixtures::frame(&states), None, None).unwrap();
        assert_eq!(&filtered.collect().unwrap(), states.table());
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let states = fixtures::frame(&fixtures::states());
        let filtered =
            filter_by_date(&states, Some(day(2021, 1, 2)), Some(day(2021, 1, 2))).unwrap();
        let table = filtered.collect().unwrap();
        assert_eq!(table.len(), 3);
        assert!(
            table
                .column_values(c::DATE)
                .unwrap()
                .all(|d| d == &Value::Date(day(2021, 1, 2)))
        );
    }

    #[test]
    fn test_open_end_resolves_to_latest_date() {
        let states = fixtures::frame(&fixtures::states());
        let range = resolve_date_range(&states, Some(day(2021, 1, 1)), None).unwrap();
        assert_eq!(range, DateRange::new(day(2021, 1, 1), day(2021, 1, 2)));
    }

    #[test]
    fn test_reversed_bounds_are_rejected() {
        let states = fixtures::frame(&fixtures::states());
        let err = filter_by_date(&states, Some(day(2021, 2, 1)), Some(day(2021, 1, 1))).unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidFilter(_)));

        // An open end resolving before the given start is rejected too.
        let err = filter_by_date(&states, Some(day(2021, 2, 1)), None).unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidFilter(_)));
    }

    #[test]
    fn test_resolving_on_empty_dataset_fails() {
        let empty = fixtures::table_frame(&fixtures::states().table().filter_rows(|_| false));
        let err = filter_by_date(&empty, None, Some(day(2021, 1, 1))).unwrap_err();
        assert!(matches!(err, AnalyticsError::EmptyDataset));

        let explicit =
            filter_by_date(&empty, Some(day(2021, 1, 1)), Some(day(2021, 1, 2))).unwrap();
        assert_eq!(explicit.count().unwrap(), 0);
    }

    #[test]
    fn test_dimension_selection_is_exact_membership() {
        let states = fixtures::frame(&fixtures::states());
        let selectors = FilterParams::new()
            .with_selection(c::ENTITY, ["A", "b"])
            .selectors()
            .clone();
        let filtered = filter_by_dimensions(&states, &selectors).unwrap();
        assert_eq!(
            column_strings(&filtered.collect().unwrap(), c::ENTITY),
            vec!["A", "A"]
        );
    }

    #[test]
    fn test_dimensions_combine_with_and() {
        let centers = fixtures::frame(&fixtures::area_centers());
        let params = FilterParams::new()
            .with_selection(c::STATE_NAME, ["France"])
            .with_selection(c::ACC, ["Reims", "Madrid"]);
        let table = filter_by_dimensions(&centers, params.selectors())
            .unwrap()
            .collect()
            .unwrap();
        assert_eq!(column_strings(&table, c::ACC), vec!["Reims"]);
    }

    #[test]
    fn test_empty_selection_passes_through() {
        let centers = fixtures::area_centers();
        let params = FilterParams::new().with_selection(c::ACC, Vec::<String>::new());
        let filtered = filter_by_dimensions(&fixtures::frame(&centers), params.selectors()).unwrap();
        assert_eq!(&filtered.collect().unwrap(), centers.table());
    }

    #[test]
    fn test_selector_on_missing_column() {
        let states = fixtures::frame(&fixtures::states());
        let params = FilterParams::new().with_selection(c::ACC, ["Brest"]);
        let err = filter_by_dimensions(&states, params.selectors()).unwrap_err();
        assert!(matches!(err, AnalyticsError::MissingColumn { column } if column == c::ACC));
    }

    #[test]
    fn test_selector_on_numeric_column() {
        let states = fixtures::frame(&fixtures::states());
        let params = FilterParams::new().with_selection(c::FLIGHTS, ["10"]);
        let err = filter_by_dimensions(&states, params.selectors()).unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidFilter(_)));
    }

    #[test]
    fn test_variability_defaults_to_network_total() {
        let states = fixtures::frame(&fixtures::states());
        let filtered =
            filter_traffic_variability(&states, &FilterParams::new(), c::ENTITY).unwrap();
        let entities = column_strings(&filtered.collect().unwrap(), c::ENTITY);
        assert_eq!(entities.len(), 2);
        assert!(entities.iter().all(|e| e == c::TOTAL_NETWORK_AREA));

        let params = FilterParams::new().with_selection(c::ENTITY, ["B"]);
        let filtered = filter_traffic_variability(&states, &params, c::ENTITY).unwrap();
        assert_eq!(column_strings(&filtered.collect().unwrap(), c::ENTITY), vec!["B", "B"]);
    }

    #[test]
    fn test_apply_filters_runs_dates_then_dimensions() {
        let states = fixtures::frame(&fixtures::states());
        let params = FilterParams::between(day(2021, 1, 1), day(2021, 1, 1))
            .with_selection(c::ENTITY, ["A", "B"]);
        let filtered = apply_filters(&states, &params).unwrap();
        assert_eq!(column_numbers(&filtered.collect().unwrap(), c::FLIGHTS), vec![10.0, 5.0]);
    }

    #[test]
    fn test_exclude_values_keeps_nulls() {
        let table = Table::new(
            vec![Column::text(c::ENTITY), Column::date(c::DATE)],
            vec![
                Row::new(vec!["A".into(), day(2021, 1, 1).into()]),
                Row::new(vec![Value::Null, day(2021, 1, 1).into()]),
                Row::new(vec![c::TOTAL_NETWORK_AREA.into(), day(2021, 1, 1).into()]),
            ],
        )
        .unwrap();
        let frame = fixtures::table_frame(&table);
        let kept = exclude_values(&frame, c::ENTITY, &[c::TOTAL_NETWORK_AREA]).unwrap();
        assert_eq!(kept.count().unwrap(), 2);

        assert!(matches!(
            exclude_values(&frame, c::DATE, &["A"]),
            Err(AnalyticsError::InvalidFilter(_))
        ));
        assert!(matches!(
            exclude_values(&frame, c::ACC, &[]),
            Err(AnalyticsError::MissingColumn { .. })
        ));
    }
}
