use super::WorkItemSource;
use crate::models::work_item::{IssueType, StatusCategory, WorkItem, WorkUser};
use chrono::{DateTime, Duration, Utc};

const DEMO_STATUSES: [&str; 3] = ["To Do", "In Progress", "Code Review"];
const DEMO_LABELS: [&str; 7] = ["frontend", "backend", "bug", "feature", "urgent", "idea", "build"];
const DEMO_SUMMARIES: [&str; 5] = [
    "Implement auth flow",
    "Fix migration bug",
    "Optimize database",
    "Design UI components",
    "Refactor state management",
];
const DEMO_USERS: [(&str, &str); 5] = [
    ("u1", "Alice Engineer"),
    ("u2", "Bob Builder"),
    ("u3", "Charlie Designer"),
    ("u4", "David Dev"),
    ("u5", "Eve Expert"),
];

/// In-memory work-item source for demo mode and tests.
///
/// Understands the handful of clauses the demo proxy does: current-user
/// assignment, `labels = x` or `labels in (x, y)`, a project key prefix,
/// `statusCategory != Done` and `status = Done`. Anything else in the filter
/// is ignored.
#[derive(Debug, Clone)]
pub struct FixtureSource {
    items: Vec<WorkItem>,
    current_user: String,
}

impl FixtureSource {
    pub fn new(items: Vec<WorkItem>) -> Self {
        Self {
            items,
            current_user: "u1".to_string(),
        }
    }

    pub fn with_current_user(mut self, account_id: &str) -> Self {
        self.current_user = account_id.to_string();
        self
    }

    /// A deterministic demo backlog of `count` tickets relative to `now`.
    /// Every fifth ticket is stale and every tenth is a sub-task.
    pub fn demo(count: usize, now: DateTime<Utc>) -> Self {
        Self::new((0..count).map(|i| demo_item(i, now)).collect())
    }

    pub fn items(&self) -> &[WorkItem] {
        &self.items
    }
}

impl WorkItemSource for FixtureSource {
    fn search(&self, filter: &str, _points_field: &str) -> Result<Vec<WorkItem>, String> {
        let lower = filter.to_lowercase();
        let labels = assigned_value(filter, "labels")
            .map(|label| vec![label])
            .or_else(|| listed_values(filter, "labels"));
        let project = assigned_value(filter, "project");

        let matched = self
            .items
            .iter()
            .filter(|item| !item.is_subtask())
            .filter(|item| {
                !lower.contains("assignee = currentuser()")
                    || item
                        .assignee
                        .as_ref()
                        .is_some_and(|a| a.account_id == self.current_user)
            })
            .filter(|item| {
                labels.as_ref().map_or(true, |wanted| {
                    item.labels.iter().any(|l| wanted.contains(&l.to_lowercase()))
                })
            })
            .filter(|item| {
                project
                    .as_ref()
                    .map_or(true, |project| item.key.to_lowercase().starts_with(project.as_str()))
            })
            .filter(|item| {
                !(lower.contains("statuscategory != done") || lower.contains("statuscategory !~ done"))
                    || item.status_category != StatusCategory::Done
            })
            .filter(|item| {
                !(lower.contains("status = done") || lower.contains("status = \"done\""))
                    || item.status.eq_ignore_ascii_case("done")
            })
            .cloned()
            .collect();

        Ok(matched)
    }
}

/// Value of a `field = value` clause, lowercased, quotes optional.
fn assigned_value(filter: &str, field: &str) -> Option<String> {
    let lower = filter.to_lowercase();
    let mut search_from = 0;

    while let Some(found) = lower[search_from..].find(field) {
        let start = search_from + found;
        search_from = start + field.len();

        let boundary_ok = lower[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_ascii_alphanumeric() && c != '_');
        if !boundary_ok {
            continue;
        }

        let rest = lower[search_from..].trim_start();
        let Some(rest) = rest.strip_prefix('=') else {
            continue;
        };
        let rest = rest.trim_start();
        let rest = rest.strip_prefix('"').unwrap_or(rest);

        let value: String = rest
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
            .collect();
        if !value.is_empty() {
            return Some(value);
        }
    }

    None
}

/// Values of a `field in (a, b)` clause, lowercased, quotes optional.
fn listed_values(filter: &str, field: &str) -> Option<Vec<String>> {
    let lower = filter.to_lowercase();
    let start = lower.find(&format!("{field} in"))? + field.len() + 3;
    let rest = lower[start..].trim_start().strip_prefix('(')?;
    let list = &rest[..rest.find(')')?];

    let values: Vec<String> = list
        .split(',')
        .map(|v| v.trim().trim_matches('"').to_string())
        .filter(|v| !v.is_empty())
        .collect();
    (!values.is_empty()).then_some(values)
}

fn demo_item(i: usize, now: DateTime<Utc>) -> WorkItem {
    let is_done = i % 10 == 3 || i % 10 == 7 || i % 10 == 9;
    let status = if is_done {
        "Done"
    } else {
        DEMO_STATUSES[i % DEMO_STATUSES.len()]
    };
    let is_subtask = i % 10 == 0;
    let updated_days_ago = if i % 5 == 0 { 31 + (i % 30) } else { i % 5 };

    let mut labels = vec![DEMO_LABELS[i % DEMO_LABELS.len()].to_string()];
    if i % 5 != 4 && !labels.iter().any(|l| l == "build") {
        labels.push("build".to_string());
    }

    let assignee = (i % 5 != 2).then(|| {
        let (account_id, display_name) = DEMO_USERS[i % DEMO_USERS.len()];
        WorkUser {
            account_id: account_id.to_string(),
            display_name: display_name.to_string(),
            avatar_url: format!("https://api.dicebear.com/7.x/avataaars/svg?seed={account_id}"),
        }
    });

    WorkItem {
        id: format!("mock-{i}"),
        key: format!("CAD-{}", 1000 + i),
        summary: format!("Mock Task {i}: {}", DEMO_SUMMARIES[i % DEMO_SUMMARIES.len()]),
        status: status.to_string(),
        status_category: match status {
            "Done" => StatusCategory::Done,
            "To Do" => StatusCategory::ToDo,
            _ => StatusCategory::InProgress,
        },
        points: if is_subtask { 0.0 } else { ((i * 7) % 8 + 1) as f64 },
        assignee,
        created: Some(now - Duration::days(updated_days_ago as i64 + 10)),
        updated: Some(now - Duration::days(updated_days_ago as i64)),
        labels,
        issue_type: Some(IssueType {
            name: if is_subtask { "Sub-task" } else { "Story" }.to_string(),
            subtask: is_subtask,
        }),
    }
}
