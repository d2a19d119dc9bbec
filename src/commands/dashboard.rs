use crate::analysis::contributors::contributor_report as build_contributor_report;
use crate::analysis::landing_zone::project_landing_zone as project;
use crate::analysis::scope::{completed_items, summarize_scope, without_subtasks};
use crate::analysis::staleness::find_stale_items;
use crate::analysis::velocity::{calculate_velocity, resolve_team_velocity};
use crate::commands::settings::load_effective_settings;
use crate::models::projection::LandingZone;
use crate::models::report::{ContributorStat, ScopeSummary, StaleItem};
use crate::models::settings::DashboardSettings;
use crate::models::velocity::{ResolvedVelocity, VelocityMetrics};
use crate::models::work_item::WorkItem;
use crate::source::WorkItemSource;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VelocityReport {
    pub metrics: VelocityMetrics,
    pub resolved: ResolvedVelocity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub generated_at: DateTime<Utc>,
    pub velocity: VelocityReport,
    pub scope: ScopeSummary,
    pub landing_zone: LandingZone,
    pub stale_items: Vec<StaleItem>,
    /// Backlog parked for later, from the future-ideas filter.
    pub ideas: Vec<WorkItem>,
}

/// Velocity from completed work the frontend already fetched, resolved
/// against the stored manual override.
#[cfg_attr(feature = "desktop", tauri::command)]
pub async fn compute_velocity(data_dir: String, items: Vec<WorkItem>) -> Result<VelocityReport, String> {
    let settings = load_effective_settings(&data_dir)?;
    Ok(velocity_report(&items, &settings))
}

/// Landing zone for the active scope. Without an explicit throughput the
/// stored manual override or the fallback default is used.
#[cfg_attr(feature = "desktop", tauri::command)]
pub async fn project_landing_zone(
    data_dir: String,
    items: Vec<WorkItem>,
    points_per_week: Option<f64>,
    today: Option<DateTime<Utc>>,
) -> Result<LandingZone, String> {
    let settings = load_effective_settings(&data_dir)?;
    let points_per_week = points_per_week
        .unwrap_or_else(|| resolve_team_velocity(settings.manual_velocity, None, &settings.velocity).points_per_week);
    let today = today.unwrap_or_else(Utc::now);

    let zone = project(&without_subtasks(&items), points_per_week, today, &settings.projection);
    warn_if_truncated(&zone);
    log::debug!(
        "projected {:.1} points at {:.1}/week: expected landing {}",
        zone.total_scope_points,
        points_per_week,
        zone.landing_dates.expected_date
    );
    Ok(zone)
}

#[cfg_attr(feature = "desktop", tauri::command)]
pub async fn find_stale(
    data_dir: String,
    items: Vec<WorkItem>,
    now: Option<DateTime<Utc>>,
) -> Result<Vec<StaleItem>, String> {
    let settings = load_effective_settings(&data_dir)?;
    Ok(find_stale_items(
        &items,
        settings.stale_threshold_days,
        now.unwrap_or_else(Utc::now),
    ))
}

#[cfg_attr(feature = "desktop", tauri::command)]
pub async fn contributor_report(items: Vec<WorkItem>) -> Result<Vec<ContributorStat>, String> {
    Ok(build_contributor_report(&completed_items(&items)))
}

fn warn_if_truncated(zone: &LandingZone) {
    if zone.truncated {
        log::warn!(
            "projection cut at {} days, pessimistic landing is day {}",
            zone.horizon_days(),
            zone.landing_days.pessimistic
        );
    }
}

/// Items matching the future-ideas filter. A failed query yields no ideas.
pub fn future_ideas_internal(source: &dyn WorkItemSource, settings: &DashboardSettings) -> Vec<WorkItem> {
    if settings.future_ideas_filter.trim().is_empty() {
        return Vec::new();
    }
    match source.search(&settings.future_ideas_filter, &settings.story_point_field) {
        Ok(items) => without_subtasks(&items),
        Err(e) => {
            log::warn!("future ideas query failed: {e}");
            Vec::new()
        }
    }
}

fn velocity_report(completed: &[WorkItem], settings: &DashboardSettings) -> VelocityReport {
    let metrics = calculate_velocity(&completed_items(completed), &settings.velocity);
    let resolved = resolve_team_velocity(settings.manual_velocity, Some(&metrics), &settings.velocity);

    if metrics.is_fallback() {
        log::info!(
            "no completed history, using {:.1} points/week ({:?})",
            resolved.points_per_week,
            resolved.source
        );
    } else {
        log::debug!(
            "velocity from {} items: {:.1} points/week, {:.1} days/point",
            metrics.sample_size,
            metrics.points_per_week,
            metrics.days_per_point
        );
    }

    VelocityReport { metrics, resolved }
}

/// Full refresh: completed work → velocity → active scope → landing zone.
///
/// A failed history query degrades to the fallback velocity rather than
/// failing the dashboard; a failed scope query is an error.
pub fn build_dashboard_internal(
    source: &dyn WorkItemSource,
    settings: &DashboardSettings,
    now: DateTime<Utc>,
) -> Result<DashboardSnapshot, String> {
    let completed = match source.search(&settings.completed_work_filter, &settings.story_point_field) {
        Ok(items) => items,
        Err(e) => {
            log::warn!("velocity history query failed, falling back: {e}");
            Vec::new()
        }
    };
    let velocity = velocity_report(&completed, settings);

    let active_filter = settings.effective_active_filter();
    let scope_items = without_subtasks(
        &source
            .search(&active_filter, &settings.story_point_field)
            .map_err(|e| format!("Active scope query failed: {e}"))?,
    );

    let landing_zone = project(
        &scope_items,
        velocity.resolved.points_per_week,
        now,
        &settings.projection,
    );
    warn_if_truncated(&landing_zone);
    let stale_items = find_stale_items(&scope_items, settings.stale_threshold_days, now);
    let ideas = future_ideas_internal(source, settings);

    log::info!(
        "dashboard: {} scope items, {} stale, expected landing {}",
        scope_items.len(),
        stale_items.len(),
        landing_zone.landing_dates.expected_date
    );

    Ok(DashboardSnapshot {
        generated_at: now,
        velocity,
        scope: summarize_scope(&scope_items, &settings.projection),
        landing_zone,
        stale_items,
        ideas,
    })
}
