use crate::analysis::calendar::round_to_tenth;
use crate::models::report::ContributorStat;
use crate::models::work_item::WorkItem;
use std::collections::HashMap;

/// Band (in percent) around the team mean that still reads as "Avg".
const COMPARISON_BAND: f64 = 5.0;

/// League table of completed work per assignee, sorted by points completed.
///
/// Each person's average points per ticket is compared against the mean of
/// everyone's averages; unassigned items are skipped.
pub fn contributor_report(completed: &[WorkItem]) -> Vec<ContributorStat> {
    let mut order: Vec<String> = Vec::new();
    let mut totals: HashMap<String, (usize, f64)> = HashMap::new();

    for item in completed.iter().filter(|item| !item.is_subtask()) {
        let Some(assignee) = item.assignee.as_ref() else {
            continue;
        };
        let name = assignee.display_name.clone();
        let entry = totals.entry(name.clone()).or_insert_with(|| {
            order.push(name);
            (0, 0.0)
        });
        entry.0 += 1;
        entry.1 += item.points.max(0.0);
    }

    let mut stats: Vec<ContributorStat> = order
        .into_iter()
        .filter_map(|name| {
            let (tickets, points) = totals.get(&name).copied()?;
            Some(ContributorStat {
                avg_points: round_to_tenth(points / tickets as f64),
                name,
                tickets_completed: tickets,
                points_completed: points,
                delta_percent: 0.0,
                comparison: "Avg".to_string(),
            })
        })
        .collect();

    let team_avg = if stats.is_empty() {
        0.0
    } else {
        stats.iter().map(|s| s.avg_points).sum::<f64>() / stats.len() as f64
    };

    if team_avg > 0.0 {
        for stat in &mut stats {
            let diff = (stat.avg_points - team_avg) / team_avg * 100.0;
            stat.delta_percent = diff;
            stat.comparison = compare_label(diff);
        }
    }

    stats.sort_by(|a, b| b.points_completed.total_cmp(&a.points_completed));
    stats
}

fn compare_label(diff: f64) -> String {
    if diff > COMPARISON_BAND {
        format!("+{diff:.0}% (Higher Complexity)")
    } else if diff < -COMPARISON_BAND {
        format!("{diff:.0}% (Lower Complexity)")
    } else {
        "Avg".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::work_item::{StatusCategory, WorkUser};

    fn done_by(key: &str, who: Option<&str>, points: f64) -> WorkItem {
        WorkItem {
            id: key.to_string(),
            key: key.to_string(),
            summary: String::new(),
            status: "Done".to_string(),
            status_category: StatusCategory::Done,
            points,
            assignee: who.map(|name| WorkUser {
                account_id: name.to_lowercase(),
                display_name: name.to_string(),
                avatar_url: String::new(),
            }),
            created: None,
            updated: None,
            labels: vec![],
            issue_type: None,
        }
    }

    #[test]
    fn aggregates_per_assignee_and_sorts_by_points() {
        let items = vec![
            done_by("CAD-1", Some("Alice"), 8.0),
            done_by("CAD-2", Some("Bob"), 2.0),
            done_by("CAD-3", Some("Alice"), 4.0),
            done_by("CAD-4", None, 13.0),
            done_by("CAD-5", Some("Bob"), 2.0),
        ];

        let stats = contributor_report(&items);

        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].name, "Alice");
        assert_eq!(stats[0].tickets_completed, 2);
        assert_eq!(stats[0].points_completed, 12.0);
        assert_eq!(stats[0].avg_points, 6.0);
        // team mean of averages = (6 + 2) / 2 = 4
        assert_eq!(stats[0].comparison, "+50% (Higher Complexity)");
        assert_eq!(stats[1].comparison, "-50% (Lower Complexity)");
    }

    #[test]
    fn close_to_mean_reads_as_average() {
        let items = vec![
            done_by("CAD-1", Some("Alice"), 5.0),
            done_by("CAD-2", Some("Bob"), 5.2),
        ];
        let stats = contributor_report(&items);
        assert!(stats.iter().all(|s| s.comparison == "Avg"));
    }

    #[test]
    fn empty_input_gives_empty_table() {
        assert!(contributor_report(&[]).is_empty());
    }
}
