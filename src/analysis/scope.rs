use crate::analysis::landing_zone::total_scope_points;
use crate::models::report::ScopeSummary;
use crate::models::settings::ProjectionParams;
use crate::models::work_item::WorkItem;

pub fn without_subtasks(items: &[WorkItem]) -> Vec<WorkItem> {
    items.iter().filter(|item| !item.is_subtask()).cloned().collect()
}

/// Finished, non-sub-task items: the history the velocity estimator reads.
pub fn completed_items(items: &[WorkItem]) -> Vec<WorkItem> {
    items
        .iter()
        .filter(|item| !item.is_subtask() && item.is_done())
        .cloned()
        .collect()
}

pub fn summarize_scope(items: &[WorkItem], params: &ProjectionParams) -> ScopeSummary {
    let scoped: Vec<&WorkItem> = items.iter().filter(|item| !item.is_subtask()).collect();

    ScopeSummary {
        item_count: scoped.len(),
        estimated_points: scoped
            .iter()
            .filter(|item| item.is_estimated())
            .map(|item| item.points)
            .sum(),
        unestimated_count: scoped.iter().filter(|item| !item.is_estimated()).count(),
        scope_points: total_scope_points(items, &params.sanitized()),
    }
}
