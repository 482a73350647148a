//! Canonical column names shared by every dataset variant.
//!
//! Loaders rename source headers onto these names, so analytics code never
//! sees the raw file headers.

/// Calendar day of the observation.
pub const DATE: &str = "FLT_DATE";
/// State, aircraft operator (or the total row) the figures belong to.
pub const ENTITY: &str = "Entity";
pub const FLIGHTS: &str = "Flights";
pub const DATE_2019: &str = "Day 2019";
pub const DATE_PREVIOUS_YEAR: &str = "Day Previous Year";
pub const FLIGHTS_2019: &str = "Flights 2019 (Reference)";
pub const FLIGHTS_PREVIOUS_YEAR: &str = "Flights Previous Year";
pub const MOVING_AVERAGE: &str = "Flights (7-day moving average)";
pub const MOVING_AVERAGE_2019: &str = "Flights (7-day moving average) 2019";
pub const VARIATION_2019: &str = "% vs 2019 (Daily)";

pub const ISO: &str = "ISO Code";
pub const YEAR: &str = "YEAR";
pub const SEASON: &str = "Season";
pub const WEEK: &str = "Week";
pub const MONTH_NUM: &str = "MONTH_NUM";
pub const MONTH_MON: &str = "MONTH_MON";

pub const AIRPORT_CODE: &str = "APT_ICAO";
pub const AIRPORT_NAME: &str = "APT_NAME";
pub const STATE_NAME: &str = "STATE_NAME";
/// Area control center name.
pub const ACC: &str = "ACC";

// Network Manager reported IFR movements.
pub const NM_DEP_FLIGHTS: &str = "FLT_DEP_1";
pub const NM_ARR_FLIGHTS: &str = "FLT_ARR_1";
pub const NM_TOTAL_FLIGHTS: &str = "FLT_TOT_1";

// Airport reported IFR movements. Optional per dataset.
pub const AIRPORT_DEP_FLIGHTS: &str = "FLT_DEP_IFR_2";
pub const AIRPORT_ARR_FLIGHTS: &str = "FLT_ARR_IFR_2";
pub const AIRPORT_TOTAL_FLIGHTS: &str = "FLT_TOT_IFR_2";

pub const NM_MOVING_AVERAGE: &str = "NM 7-day moving average";
pub const AIRPORT_MOVING_AVERAGE: &str = "Airport 7-day moving average";
/// Metric column of the busiest-airports ranking.
pub const DAILY_AVERAGE: &str = "Daily Average";

/// Entity value of the aggregate row covering the whole network area.
pub const TOTAL_NETWORK_AREA: &str = "-Total Network Manager Area";

/// Every airport-reported metric column.
pub const AIRPORT_REPORTED: [&str; 3] = [
    AIRPORT_DEP_FLIGHTS,
    AIRPORT_ARR_FLIGHTS,
    AIRPORT_TOTAL_FLIGHTS,
];
