//! # Dashboard Configuration
//!
//! Environment-based configuration for the `traffic-dash` binary. Command
//! line flags override these values.

use std::env;
use std::path::PathBuf;
use traffic_analytics::EngineSettings;
use traffic_ingest::IngestConfig;

/// Log output style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Binary configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding the source CSV files
    pub data_dir: PathBuf,

    /// Logging level, used when `RUST_LOG` is unset
    pub log_level: String,

    pub log_format: LogFormat,

    /// Join ISO codes onto states and airports
    pub attach_iso_codes: bool,

    /// Refuse state data without the network total row
    pub require_total_row: bool,

    /// Length of the ranking views
    pub top_n: usize,

    /// Moving-average window in days
    pub rolling_window: usize,
}

impl Config {
    /// Load configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup. Unset or unparsable values
    /// fall back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let flag = |key: &str, default: bool| {
            lookup(key)
                .map(|v| v == "true" || v == "1")
                .unwrap_or(default)
        };
        let count = |key: &str, default: usize| {
            lookup(key)
                .and_then(|v| v.trim().parse::<usize>().ok())
                .filter(|n| *n > 0)
                .unwrap_or(default)
        };
        let defaults = EngineSettings::default();

        Self {
            data_dir: lookup("TRAFFIC_DATA_DIR")
                .map_or_else(|| PathBuf::from("datasets"), PathBuf::from),

            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),

            log_format: match lookup("LOG_FORMAT").as_deref() {
                Some("json") => LogFormat::Json,
                _ => LogFormat::Pretty,
            },

            attach_iso_codes: flag("ATTACH_ISO_CODES", true),
            require_total_row: flag("REQUIRE_TOTAL_ROW", true),
            top_n: count("TOP_N", defaults.top_n),
            rolling_window: count("ROLLING_WINDOW", defaults.rolling_window),
        }
    }

    #[must_use]
    pub fn ingest_config(&self) -> IngestConfig {
        IngestConfig::new(&self.data_dir)
            .with_iso_codes(self.attach_iso_codes)
            .with_total_row_check(self.require_total_row)
    }

    #[must_use]
    pub const fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            top_n: self.top_n,
            rolling_window: self.rolling_window,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
