//! Calendar columns derived from `FLT_DATE`.

use crate::error::Result;
use crate::frame::{quote, Frame};
use serde::{Deserialize, Serialize};
use std::fmt;
use traffic_domain::columns as c;
use traffic_domain::Column;

/// Season of an ISO week number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Autumn,
}

/// Inclusive week ranges of the seasons; every other week is winter.
pub const SEASON_WEEKS: [(Season, i64, i64); 3] = [
    (Season::Spring, 10, 21),
    (Season::Summer, 22, 35),
    (Season::Autumn, 36, 47),
];

impl Season {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Winter => "Winter",
            Self::Spring => "Spring",
            Self::Summer => "Summer",
            Self::Autumn => "Autumn",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Add `YEAR` unless present.
pub fn with_year(frame: &Frame) -> Result<Frame> {
    derive_from_date(frame, Column::integer(c::YEAR), |date| {
        format!("CAST(year({date}) AS BIGINT)")
    })
}

/// Add `MONTH_NUM` and `MONTH_MON` (`JAN`, `FEB`, ...) unless present.
pub fn with_month(frame: &Frame) -> Result<Frame> {
    let frame = derive_from_date(frame, Column::integer(c::MONTH_NUM), |date| {
        format!("CAST(month({date}) AS BIGINT)")
    })?;
    derive_from_date(&frame, Column::text(c::MONTH_MON), |date| {
        format!("upper(strftime({date}, '%b'))")
    })
}

/// Add the ISO `Week` unless present.
pub fn with_week(frame: &Frame) -> Result<Frame> {
    derive_from_date(frame, Column::integer(c::WEEK), |date| {
        format!("CAST(week({date}) AS BIGINT)")
    })
}

/// Add `Season` from `Week`, deriving the week first when needed.
pub fn with_season(frame: &Frame) -> Result<Frame> {
    let frame = with_week(frame)?;
    if frame.has_column(c::SEASON) {
        return Ok(frame);
    }
    frame.with_column(Column::text(c::SEASON), &season_expression(&quote(c::WEEK)))
}

fn season_expression(week: &str) -> String {
    let week = format!("floor(CAST({week} AS DOUBLE))");
    let arms: String = SEASON_WEEKS
        .iter()
        .map(|(season, first, last)| format!(" WHEN {week} BETWEEN {first} AND {last} THEN '{season}'"))
        .collect();
    format!(
        "CASE WHEN {week} IS NULL THEN NULL{arms} ELSE '{}' END",
        Season::Winter
    )
}

fn derive_from_date(
    frame: &Frame,
    column: Column,
    expression: impl Fn(&str) -> String,
) -> Result<Frame> {
    if frame.has_column(&column.name) {
        return Ok(frame.clone());
    }
    frame.require_column(c::DATE)?;
    frame.with_column(column, &expression(&quote(c::DATE)))
}
