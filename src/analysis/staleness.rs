use crate::analysis::calendar::days_between;
use crate::models::report::StaleItem;
use crate::models::work_item::WorkItem;
use chrono::{DateTime, Utc};

/// Whole days since the item was last touched, if it has a valid `updated`.
pub fn days_since_update(item: &WorkItem, now: DateTime<Utc>) -> Option<i64> {
    item.updated.map(|updated| days_between(updated, now))
}

/// An item is stale once it has gone strictly more than `threshold_days`
/// without an update. Items with no `updated` timestamp are never stale.
pub fn is_stale(item: &WorkItem, threshold_days: u32, now: DateTime<Utc>) -> bool {
    days_since_update(item, now).is_some_and(|days| days > i64::from(threshold_days))
}

/// Stale open-scope items, in input order.
pub fn find_stale_items(items: &[WorkItem], threshold_days: u32, now: DateTime<Utc>) -> Vec<StaleItem> {
    items
        .iter()
        .filter(|item| !item.is_subtask())
        .filter_map(|item| {
            let days = days_since_update(item, now)?;
            if days <= i64::from(threshold_days) {
                return None;
            }
            Some(StaleItem {
                id: item.id.clone(),
                key: item.key.clone(),
                summary: item.summary.clone(),
                days_since_update: days,
                assignee: item.assignee.as_ref().map(|a| a.display_name.clone()),
            })
        })
        .collect()
}
