use serde::{Deserialize, Serialize};
use time::Date;

use crate::nutrition::MacroTotals;

use super::ring::RingGeometry;

#[derive(Debug, Deserialize)]
pub struct DailyQuery {
    pub date: Date,
}

#[derive(Debug, Deserialize)]
pub struct WeeklyQuery {
    pub end: Date,
}

#[derive(Debug, Deserialize)]
pub struct RingQuery {
    #[serde(default)]
    pub date: Option<Date>,
    pub target: f64,
}

/// Totals tagged with the date they answer for, so clients navigating
/// between days can drop responses from superseded requests.
#[derive(Debug, Serialize)]
pub struct DayTotalsResponse {
    pub date: Date,
    #[serde(flatten)]
    pub totals: MacroTotals,
}

#[derive(Debug, Serialize)]
pub struct RingResponse {
    pub date: Date,
    pub target: f64,
    #[serde(flatten)]
    pub totals: MacroTotals,
    pub ring: RingGeometry,
}
