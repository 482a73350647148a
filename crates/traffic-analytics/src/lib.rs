//! # Air Traffic Analytics
//!
//! Filtering and aggregation engine behind the European air-traffic
//! dashboard. Loaded [`Dataset`](traffic_domain::Dataset)s go into an
//! in-memory DuckDB [`Store`]; every view is a chain of lazy [`Frame`]
//! transforms compiled to one SQL query and collected into a
//! [`Table`](traffic_domain::Table):
//!
//! ```text
//!   Dataset ──► Store ──► Frame ──► filter_by_date ──► filter_by_dimensions ──► aggregate ──► Frame
//!                                     (start, end)        (selectors)         (Mean | Sum)     │
//!                                                                                              ├─► rolling_mean
//!                                                                                              ├─► top_n
//!                                                                                              └─► collect ──► Table
//! ```
//!
//! ## Features
//!
//! - Inclusive date windows with open bounds resolved from the data
//! - Exact-membership dimension filters, combined with AND
//! - Pivot-style group-by with graceful handling of absent metric columns
//! - Trailing moving averages and Top-N rankings
//! - State, area control center, airport and aircraft operator views
//! - JSON and Markdown reports

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod aggregate;
pub mod calendar;
pub mod engine;
pub mod error;
pub mod filter;
pub mod frame;
pub mod queries;
pub mod reports;
pub mod rolling;
pub mod selection;
pub mod store;
pub mod top_n;

#[cfg(test)]
mod fixtures;

pub use aggregate::{aggregate, Reducer};
pub use engine::{AnalyticsEngine, DashboardData, EngineSettings};
pub use error::{AnalyticsError, Result};
pub use filter::{
    apply_filters, exclude_values, filter_by_date, filter_by_dimensions,
    filter_traffic_variability, resolve_date_range,
};
pub use frame::{Frame, SortOrder};
pub use reports::{render_markdown, DashboardReport};
pub use rolling::{rolling_mean, DEFAULT_WINDOW};
pub use selection::{flight_column, flight_columns, has_airport_data, FlightColumns, IfrMovement};
pub use store::Store;
pub use top_n::{top_n, DEFAULT_TOP_N};
