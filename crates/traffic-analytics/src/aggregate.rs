//! Group-by aggregation (the pivot step of every view).

use crate::error::{AnalyticsError, Result};
use crate::frame::{quote, Frame, ROW_ORDER};
use serde::{Deserialize, Serialize};
use tracing::debug;
use traffic_domain::Column;

/// How the values of one group collapse into a single number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reducer {
    Mean,
    Sum,
}

impl Reducer {
    /// Reduction over the non-null values of a group. The sum of nothing is
    /// zero, the mean of nothing is null.
    fn expression(self, metric: &str) -> String {
        let metric = quote(metric);
        match self {
            Self::Mean => format!("AVG(CAST({metric} AS DOUBLE))"),
            Self::Sum => format!("COALESCE(SUM(CAST({metric} AS DOUBLE)), 0.0)"),
        }
    }
}

/// Group `frame` by `group_by` and reduce each of `metrics` per group.
///
/// Output columns are the key columns (in `group_by` order, with their input
/// kinds) followed by one number column per metric that exists in the input.
/// Rows come out in ascending key order. Rows with a null key are dropped.
pub fn aggregate(
    frame: &Frame,
    group_by: &[&str],
    metrics: &[&str],
    reducer: Reducer,
) -> Result<Frame> {
    let keys = group_by
        .iter()
        .map(|name| frame.require_column(name).cloned())
        .collect::<Result<Vec<_>>>()?;
    if keys.is_empty() {
        return Err(AnalyticsError::InvalidParameter(
            "aggregation needs at least one group column".to_string(),
        ));
    }

    let present: Vec<&str> = metrics
        .iter()
        .copied()
        .filter(|name| {
            let found = frame.has_column(name);
            if !found {
                debug!(metric = name, "Metric column absent, skipping");
            }
            found
        })
        .collect();
    if present.is_empty() {
        if let Some(first) = metrics.first() {
            return Err(AnalyticsError::MissingColumn {
                column: (*first).to_string(),
            });
        }
    }
    for name in &present {
        let kind = frame.require_column(name)?.kind;
        if !kind.is_numeric() {
            return Err(AnalyticsError::InvalidParameter(format!(
                "metric {name} holds {kind} values"
            )));
        }
    }

    let key_list = group_by
        .iter()
        .map(|name| quote(name))
        .collect::<Vec<_>>()
        .join(", ");
    let select = group_by
        .iter()
        .map(|name| quote(name))
        .chain(
            present
                .iter()
                .map(|name| format!("{} AS {}", reducer.expression(name), quote(name))),
        )
        .chain(std::iter::once(format!(
            "row_number() OVER (ORDER BY {key_list}) AS {}",
            quote(ROW_ORDER)
        )))
        .collect::<Vec<_>>()
        .join(", ");
    let not_null = group_by
        .iter()
        .map(|name| format!("{} IS NOT NULL", quote(name)))
        .collect::<Vec<_>>()
        .join(" AND ");

    let columns = keys
        .into_iter()
        .chain(present.iter().map(|name| Column::number(*name)))
        .collect();

    debug!(
        groups = group_by.len(),
        metrics = present.len(),
        ?reducer,
        "Aggregated"
    );
    Ok(frame.derive(
        &select,
        &format!("WHERE {not_null} GROUP BY {key_list}"),
        columns,
    ))
}
