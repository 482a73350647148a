//! # Air Traffic Ingest
//!
//! Reads the Eurocontrol traffic exports into typed
//! [`Dataset`](traffic_domain::Dataset)s:
//!
//! - yearly state, area control center and aircraft operator files, stacked
//!   with the overlap of the newest file cut off
//! - the airport traffic file, with optional airport-reported movements
//! - ISO codes joined onto states and airports
//! - state and operator names folded onto one spelling
//!
//! ## Example
//!
//! ```rust,ignore
//! use traffic_ingest::{load_dashboard, IngestConfig};
//!
//! let parts = load_dashboard(&IngestConfig::new("datasets"))?;
//! println!("{} state rows", parts.states.len());
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod iso;
pub mod loader;
pub mod normalize;
pub mod reader;

pub use config::IngestConfig;
pub use error::{IngestError, Result};
pub use iso::{attach_iso_codes, load_iso_codes, IsoCodes};
pub use loader::{
    combine_yearly, load_aircraft_operators, load_airports, load_area_centers, load_dashboard,
    load_states, DashboardParts,
};
pub use normalize::{canonical_operator_name, canonical_state_name};
pub use reader::{read_table, ColumnSpec, CsvFormat};
