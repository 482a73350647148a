//! # Traffic Dashboard CLI
//!
//! Loads the source CSV files once and prints any dashboard view as a
//! Markdown table or JSON.
//!
//! ```text
//!   traffic-dash top-states --start 2021-06-01 --end 2021-08-31
//!   traffic-dash number-of-flights --movement arrival --select APT_NAME=Vienna
//!   traffic-dash options --dataset area-centers --column STATE_NAME
//!   traffic-dash report --format json
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod cli;
pub mod config;

pub use cli::{run, Args, Command, OutputFormat};
pub use config::{Config, LogFormat};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
