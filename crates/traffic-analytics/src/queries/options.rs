//! Values offered in the filter drop-downs.

use crate::engine::AnalyticsEngine;
use crate::error::Result;
use crate::filter::{exclude_values, filter_by_dimensions};
use crate::frame::Frame;
use traffic_domain::columns as c;
use traffic_domain::{DatasetKind, DimensionSelectors};

/// Sorted distinct values of `column` among the rows matching `selectors`,
/// without the `exclude`d ones.
pub fn entity_options(
    frame: &Frame,
    column: &str,
    selectors: &DimensionSelectors,
    exclude: &[&str],
) -> Result<Vec<String>> {
    let filtered = filter_by_dimensions(frame, selectors)?;
    let filtered = exclude_values(&filtered, column, exclude)?;
    let values = filtered.distinct(column)?.collect()?;
    Ok(values
        .column_values(column)?
        .map(ToString::to_string)
        .collect())
}

impl AnalyticsEngine {
    /// Drop-down values of `column` in one dataset. The network total row
    /// is never offered as a state.
    pub fn entity_options(
        &self,
        kind: DatasetKind,
        column: &str,
        selectors: &DimensionSelectors,
    ) -> Result<Vec<String>> {
        let exclude: &[&str] = if kind.has_total_row() {
            &[c::TOTAL_NETWORK_AREA]
        } else {
            &[]
        };
        entity_options(self.data().frame(kind), column, selectors, exclude)
    }
}
