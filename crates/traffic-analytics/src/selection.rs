//! Which airport movement columns a view reads.

use crate::error::AnalyticsError;
use crate::frame::Frame;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use traffic_domain::columns as c;

/// IFR movement direction picked on the airport tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IfrMovement {
    Arrival,
    Departure,
}

impl fmt::Display for IfrMovement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Arrival => write!(f, "Arrival"),
            Self::Departure => write!(f, "Departure"),
        }
    }
}

impl FromStr for IfrMovement {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "arrival" | "arr" => Ok(Self::Arrival),
            "departure" | "dep" => Ok(Self::Departure),
            other => Err(AnalyticsError::InvalidParameter(format!(
                "unknown IFR movement: {other}"
            ))),
        }
    }
}

/// Network Manager column and its airport-reported counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlightColumns {
    pub network: &'static str,
    pub airport: &'static str,
}

impl FlightColumns {
    #[must_use]
    pub const fn as_array(self) -> [&'static str; 2] {
        [self.network, self.airport]
    }
}

/// Single direction selected, or totals when both or neither are.
fn single_direction(movements: &[IfrMovement]) -> Option<IfrMovement> {
    match movements {
        [only] => Some(*only),
        [first, rest @ ..] if rest.iter().all(|m| m == first) => Some(*first),
        _ => None,
    }
}

/// Network Manager column for the selected movements.
#[must_use]
pub fn flight_column(movements: &[IfrMovement]) -> &'static str {
    flight_columns(movements).network
}

/// Network Manager and airport columns for the selected movements.
#[must_use]
pub fn flight_columns(movements: &[IfrMovement]) -> FlightColumns {
    match single_direction(movements) {
        Some(IfrMovement::Arrival) => FlightColumns {
            network: c::NM_ARR_FLIGHTS,
            airport: c::AIRPORT_ARR_FLIGHTS,
        },
        Some(IfrMovement::Departure) => FlightColumns {
            network: c::NM_DEP_FLIGHTS,
            airport: c::AIRPORT_DEP_FLIGHTS,
        },
        None => FlightColumns {
            network: c::NM_TOTAL_FLIGHTS,
            airport: c::AIRPORT_TOTAL_FLIGHTS,
        },
    }
}

/// Whether any airport-reported movement column is present.
#[must_use]
pub fn has_airport_data(frame: &Frame) -> bool {
    c::AIRPORT_REPORTED
        .iter()
        .any(|column| frame.has_column(column))
}
