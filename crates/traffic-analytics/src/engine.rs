//! Loaded datasets and the engine that serves views over them.

use crate::error::{AnalyticsError, Result};
use crate::frame::Frame;
use crate::queries::reference_period;
use crate::rolling::DEFAULT_WINDOW;
use crate::store::Store;
use crate::top_n::DEFAULT_TOP_N;
use serde::{Deserialize, Serialize};
use tracing::info;
use traffic_domain::{Dataset, DatasetKind};

/// Current year of the operator files and the year it is compared against.
pub const OPERATORS_YEAR: i32 = 2021;
pub const REFERENCE_YEAR: i32 = 2019;

/// Table holding the operator reference year.
pub const OPERATORS_REFERENCE_TABLE: &str = "operators_reference";

/// The four loaded datasets plus the operator reference year derived from
/// them, held in one in-memory store. Read-only once built; clones share the
/// store.
#[derive(Debug, Clone)]
pub struct DashboardData {
    states: Frame,
    area_centers: Frame,
    airports: Frame,
    aircraft_operators: Frame,
    operators_reference: Frame,
}

impl DashboardData {
    /// Load the datasets into a fresh store, checking each one is of the
    /// expected kind.
    pub fn new(
        states: Dataset,
        area_centers: Dataset,
        airports: Dataset,
        aircraft_operators: Dataset,
    ) -> Result<Self> {
        expect_kind(&states, DatasetKind::States)?;
        expect_kind(&area_centers, DatasetKind::AreaCenters)?;
        expect_kind(&airports, DatasetKind::Airports)?;
        expect_kind(&aircraft_operators, DatasetKind::AircraftOperators)?;

        let store = Store::open_in_memory()?;
        let states = store.load_dataset(&states)?;
        let area_centers = store.load_dataset(&area_centers)?;
        let airports = store.load_dataset(&airports)?;
        let aircraft_operators = store.load_dataset(&aircraft_operators)?;
        let operators_reference = store.materialize(
            OPERATORS_REFERENCE_TABLE,
            &reference_period(&aircraft_operators, OPERATORS_YEAR, REFERENCE_YEAR)?,
        )?;

        info!(
            states = states.count()?,
            area_centers = area_centers.count()?,
            airports = airports.count()?,
            aircraft_operators = aircraft_operators.count()?,
            operators_reference = operators_reference.count()?,
            "Dashboard data ready"
        );

        Ok(Self {
            states,
            area_centers,
            airports,
            aircraft_operators,
            operators_reference,
        })
    }

    #[must_use]
    pub const fn states(&self) -> &Frame {
        &self.states
    }

    #[must_use]
    pub const fn area_centers(&self) -> &Frame {
        &self.area_centers
    }

    #[must_use]
    pub const fn airports(&self) -> &Frame {
        &self.airports
    }

    #[must_use]
    pub const fn aircraft_operators(&self) -> &Frame {
        &self.aircraft_operators
    }

    /// 2019 operator traffic as `[Entity, FLT_DATE, Flights]`.
    #[must_use]
    pub const fn operators_reference(&self) -> &Frame {
        &self.operators_reference
    }

    #[must_use]
    pub const fn frame(&self, kind: DatasetKind) -> &Frame {
        match kind {
            DatasetKind::States => self.states(),
            DatasetKind::AreaCenters => self.area_centers(),
            DatasetKind::Airports => self.airports(),
            DatasetKind::AircraftOperators => self.aircraft_operators(),
        }
    }
}

fn expect_kind(dataset: &Dataset, expected: DatasetKind) -> Result<()> {
    if dataset.kind() == expected {
        Ok(())
    } else {
        Err(AnalyticsError::InvalidParameter(format!(
            "expected {} dataset, got {}",
            expected.as_str(),
            dataset.kind().as_str()
        )))
    }
}

/// Ranking length and moving-average window used by the views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    pub top_n: usize,
    pub rolling_window: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            rolling_window: DEFAULT_WINDOW,
        }
    }
}

/// Serves dashboard views over shared, immutable data.
///
/// Cheap to clone and safe to share between threads; every view runs its
/// query against the shared store and returns a fresh table.
#[derive(Debug, Clone)]
pub struct AnalyticsEngine {
    data: DashboardData,
    settings: EngineSettings,
}

impl AnalyticsEngine {
    #[must_use]
    pub fn new(data: DashboardData) -> Self {
        Self::with_settings(data, EngineSettings::default())
    }

    #[must_use]
    pub const fn with_settings(data: DashboardData, settings: EngineSettings) -> Self {
        Self { data, settings }
    }

    #[must_use]
    pub const fn data(&self) -> &DashboardData {
        &self.data
    }

    #[must_use]
    pub const fn settings(&self) -> EngineSettings {
        self.settings
    }
}

#[cfg(test)]
pub(crate) fn test_engine() -> AnalyticsEngine {
    use crate::fixtures;

    let data = DashboardData::new(
        fixtures::states(),
        fixtures::area_centers(),
        fixtures::airports(true),
        fixtures::operators(),
    )
    .unwrap();
    AnalyticsEngine::new(data)
}
