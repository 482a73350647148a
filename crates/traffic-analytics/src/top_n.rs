//! Top-N rankings.

use crate::aggregate::{aggregate, Reducer};
use crate::error::Result;
use crate::filter::exclude_values;
use crate::frame::{Frame, SortOrder};

/// Length of every ranking on the dashboard.
pub const DEFAULT_TOP_N: usize = 10;

/// Rank the keys of `key_column` by their mean `metric`, highest first.
///
/// Keys listed in `exclude` are dropped before ranking. Ties keep ascending
/// key order and keys with no value sort last.
pub fn top_n(
    frame: &Frame,
    key_column: &str,
    metric: &str,
    n: usize,
    exclude: &[&str],
) -> Result<Frame> {
    let grouped = aggregate(frame, &[key_column], &[metric], Reducer::Mean)?;
    let kept = exclude_values(&grouped, key_column, exclude)?;
    Ok(kept.sorted_by(metric, SortOrder::Descending)?.head(n))
}
