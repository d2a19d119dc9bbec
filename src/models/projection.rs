use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionPoint {
    pub date: NaiveDate,
    pub total_scope: f64,
    pub optimistic: f64,
    pub expected: f64,
    pub pessimistic: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandingDays {
    pub optimistic: u32,
    pub expected: u32,
    pub pessimistic: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandingDates {
    pub optimistic_date: NaiveDate,
    pub expected_date: NaiveDate,
    pub pessimistic_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandingZone {
    pub total_scope_points: f64,
    pub daily_throughput: f64,
    /// Day 0 through the horizon, chronological.
    pub series: Vec<ProjectionPoint>,
    pub landing_days: LandingDays,
    pub landing_dates: LandingDates,
    /// The series hit `max_horizon_days` (or the end of the calendar) before
    /// the pessimistic curve landed.
    #[serde(default)]
    pub truncated: bool,
}

impl LandingZone {
    pub fn horizon_days(&self) -> usize {
        self.series.len().saturating_sub(1)
    }
}
