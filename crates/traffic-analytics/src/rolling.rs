//! Trailing moving averages over already-ordered rows.

use crate::error::{AnalyticsError, Result};
use crate::frame::{quote, Frame, ROW_ORDER};
use traffic_domain::Column;

/// Days in the dashboard's moving average.
pub const DEFAULT_WINDOW: usize = 7;

/// Append `output_column` holding the trailing mean of `value_column` over
/// the last `window` rows, current row included.
///
/// Rows are used in the frame's order; sort it first. The first rows average
/// over whatever is available (minimum period 1) and nulls are skipped, so a
/// row is null only if its whole window is.
pub fn rolling_mean(
    frame: &Frame,
    value_column: &str,
    output_column: &str,
    window: usize,
) -> Result<Frame> {
    if window == 0 {
        return Err(AnalyticsError::InvalidParameter(
            "rolling window must be at least one row".to_string(),
        ));
    }
    let kind = frame.require_column(value_column)?.kind;
    if !kind.is_numeric() {
        return Err(AnalyticsError::InvalidParameter(format!(
            "cannot average {kind} column {value_column}"
        )));
    }

    let expression = format!(
        "AVG(CAST({} AS DOUBLE)) OVER (ORDER BY {} ROWS BETWEEN {} PRECEDING AND CURRENT ROW)",
        quote(value_column),
        quote(ROW_ORDER),
        window - 1
    );
    frame.with_column(Column::number(output_column), &expression)
}
