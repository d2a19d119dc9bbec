pub mod fixture;

use crate::models::work_item::WorkItem;

/// Supplies work items for a tracker query.
///
/// The filter is handed through untouched; nothing in the analysis layer
/// parses or depends on its syntax.
pub trait WorkItemSource {
    fn search(&self, filter: &str, points_field: &str) -> Result<Vec<WorkItem>, String>;
}
