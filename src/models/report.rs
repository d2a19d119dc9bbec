use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaleItem {
    pub id: String,
    pub key: String,
    pub summary: String,
    pub days_since_update: i64,
    pub assignee: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributorStat {
    pub name: String,
    pub tickets_completed: usize,
    pub points_completed: f64,
    pub avg_points: f64,
    /// Percent difference of `avg_points` against the team's mean average.
    pub delta_percent: f64,
    pub comparison: String, // "Avg" | "+N% (Higher Complexity)" | "-N% (Lower Complexity)"
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeSummary {
    pub item_count: usize,
    pub estimated_points: f64,
    pub unestimated_count: usize,
    /// Points the projection runs against, unestimated items floored.
    pub scope_points: f64,
}
