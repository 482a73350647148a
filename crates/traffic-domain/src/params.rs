//! Per-request filter parameters.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Selected values per dimension column. A dimension that is absent, or
/// whose set is empty, does not constrain anything.
pub type DimensionSelectors = BTreeMap<String, BTreeSet<String>>;

/// Date window and dimension selections for one dashboard query.
///
/// Built fresh per request with the consuming `with_*` methods and not
/// changed afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterParams {
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    #[serde(default)]
    selectors: DimensionSelectors,
}

impl FilterParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parameters covering `[start, end]` with no dimension selection.
    #[must_use]
    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self::new().with_start_date(start).with_end_date(end)
    }

    #[must_use]
    pub fn with_start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    #[must_use]
    pub fn with_end_date(mut self, date: NaiveDate) -> Self {
        self.end_date = Some(date);
        self
    }

    #[must_use]
    pub fn with_dates(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    /// Select `values` in `dimension`. Repeated calls for the same dimension
    /// add to the selection.
    #[must_use]
    pub fn with_selection<I, S>(mut self, dimension: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selectors
            .entry(dimension.to_string())
            .or_default()
            .extend(values.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub const fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    #[must_use]
    pub const fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    #[must_use]
    pub const fn selectors(&self) -> &DimensionSelectors {
        &self.selectors
    }

    /// Non-empty selection for one dimension.
    #[must_use]
    pub fn selection(&self, dimension: &str) -> Option<&BTreeSet<String>> {
        self.selectors.get(dimension).filter(|s| !s.is_empty())
    }

    /// Same dates, no dimension selection.
    #[must_use]
    pub fn dates_only(&self) -> Self {
        Self::new().with_dates(self.start_date, self.end_date)
    }

    /// Same selection, no date window.
    #[must_use]
    pub fn selectors_only(&self) -> Self {
        Self {
            start_date: None,
            end_date: None,
            selectors: self.selectors.clone(),
        }
    }
}
