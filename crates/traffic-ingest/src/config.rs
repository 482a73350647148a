//! Where the source files live and how they are combined.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Last day taken from the previous year's state and ACC files; later days
/// come from the newest file.
pub const STATES_CUTOFF: NaiveDate = ymd(2021, 12, 24);
/// Same boundary for the aircraft operator files.
pub const OPERATORS_CUTOFF: NaiveDate = ymd(2021, 12, 31);

const fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => date,
        None => panic!("invalid calendar date"),
    }
}

pub const STATES_FILE: &str = "States";
pub const AREA_CENTERS_FILE: &str = "ACCs";
pub const OPERATORS_FILE: &str = "Aircraft_Operators";
pub const AIRPORTS_FILE: &str = "Airport_Traffic.csv";
pub const ISO_CODES_FILE: &str = "iso_codes.csv";

/// Ingestion settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Directory holding every source file.
    pub data_dir: PathBuf,
    /// Years of the `{year}-{name}.csv` files, oldest first.
    pub years: Vec<i32>,
    pub states_cutoff: NaiveDate,
    pub operators_cutoff: NaiveDate,
    /// Join `ISO Code` onto states and airports from `iso_codes.csv`.
    pub attach_iso_codes: bool,
    /// Fail unless the states data carries the network total row.
    pub require_total_row: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("datasets"),
            years: vec![2020, 2021, 2022],
            states_cutoff: STATES_CUTOFF,
            operators_cutoff: OPERATORS_CUTOFF,
            attach_iso_codes: true,
            require_total_row: true,
        }
    }
}

impl IngestConfig {
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_years(mut self, years: Vec<i32>) -> Self {
        self.years = years;
        self
    }

    #[must_use]
    pub const fn with_iso_codes(mut self, attach: bool) -> Self {
        self.attach_iso_codes = attach;
        self
    }

    #[must_use]
    pub const fn with_total_row_check(mut self, require: bool) -> Self {
        self.require_total_row = require;
        self
    }

    /// `{data_dir}/{year}-{name}.csv`
    #[must_use]
    pub fn yearly_file(&self, year: i32, name: &str) -> PathBuf {
        self.data_dir.join(format!("{year}-{name}.csv"))
    }

    #[must_use]
    pub fn file(&self, name: &str) -> PathBuf {
        self.data_dir.join(name)
    }

    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
