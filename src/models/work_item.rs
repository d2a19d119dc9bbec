use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusCategory {
    #[serde(rename = "To Do")]
    ToDo,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Done")]
    Done,
}

impl StatusCategory {
    /// Maps the tracker's status category name. Anything that is neither
    /// "Done" nor "To Do" counts as in progress.
    pub fn from_tracker_name(name: &str) -> Self {
        match name {
            "Done" => StatusCategory::Done,
            "To Do" => StatusCategory::ToDo,
            _ => StatusCategory::InProgress,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkUser {
    pub account_id: String,
    pub display_name: String,
    #[serde(default)]
    pub avatar_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueType {
    pub name: String,
    #[serde(default)]
    pub subtask: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItem {
    pub id: String,
    pub key: String,
    pub summary: String,
    pub status: String,
    pub status_category: StatusCategory,
    #[serde(default)]
    pub points: f64, // 0 = unestimated
    #[serde(default)]
    pub assignee: Option<WorkUser>,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default, rename = "issuetype", alias = "issueType")]
    pub issue_type: Option<IssueType>,
}

impl WorkItem {
    pub fn is_subtask(&self) -> bool {
        self.issue_type.as_ref().is_some_and(|t| t.subtask)
    }

    pub fn is_estimated(&self) -> bool {
        self.points > 0.0
    }

    pub fn is_done(&self) -> bool {
        self.status_category == StatusCategory::Done
    }

    /// Normalize one raw issue-tracker issue (`{id, key, fields: {...}}`).
    ///
    /// Story points are read from `points_field`, which differs per tracker
    /// instance (e.g. `customfield_10014`). Missing, non-numeric or negative
    /// values become 0. Timestamps that fail to parse become `None`.
    pub fn from_raw_issue(raw: &Value, points_field: &str) -> Option<WorkItem> {
        let key = raw.get("key").and_then(Value::as_str)?.to_string();
        let id = match raw.get("id") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => key.clone(),
        };

        let empty = Value::Null;
        let fields = raw.get("fields").unwrap_or(&empty);

        let status_value = fields.get("status").unwrap_or(&empty);
        let status = status_value
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or("Unknown")
            .to_string();
        let status_category = status_value
            .get("statusCategory")
            .and_then(|c| c.get("name"))
            .and_then(Value::as_str)
            .map(StatusCategory::from_tracker_name)
            .unwrap_or(StatusCategory::InProgress);

        let points = fields
            .get(points_field)
            .and_then(Value::as_f64)
            .filter(|p| p.is_finite() && *p > 0.0)
            .unwrap_or(0.0);

        let assignee = fields
            .get("assignee")
            .filter(|a| a.is_object())
            .map(|a| WorkUser {
                account_id: str_field(a, "accountId"),
                display_name: str_field(a, "displayName"),
                avatar_url: a
                    .get("avatarUrls")
                    .and_then(|urls| urls.get("48x48"))
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            });

        let labels = fields
            .get("labels")
            .and_then(Value::as_array)
            .map(|labels| {
                labels
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let issue_type = fields
            .get("issuetype")
            .filter(|t| t.is_object())
            .map(|t| IssueType {
                name: str_field(t, "name"),
                subtask: t.get("subtask").and_then(Value::as_bool).unwrap_or(false),
            });

        Some(WorkItem {
            id,
            key,
            summary: str_field(fields, "summary"),
            status,
            status_category,
            points,
            assignee,
            created: parse_timestamp(fields.get("created")),
            updated: parse_timestamp(fields.get("updated")),
            labels,
            issue_type,
        })
    }
}

/// Normalize a tracker search response (`{issues: [...]}`), dropping sub-tasks
/// and issues without a key.
pub fn normalize_search_response(raw: &Value, points_field: &str) -> Vec<WorkItem> {
    raw.get("issues")
        .and_then(Value::as_array)
        .map(|issues| {
            issues
                .iter()
                .filter_map(|issue| WorkItem::from_raw_issue(issue, points_field))
                .filter(|item| !item.is_subtask())
                .collect()
        })
        .unwrap_or_default()
}

fn str_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Tracker timestamps come as RFC 3339 (`2024-03-01T10:00:00.000Z`) or with a
/// compact offset (`2024-03-01T10:00:00.000+0000`).
fn parse_timestamp(value: Option<&Value>) -> Option<DateTime<Utc>> {
    let raw = value?.as_str()?.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z")
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}
