use crate::analysis::calendar::{business_days_between, round_to_tenth};
use crate::models::settings::VelocityParams;
use crate::models::velocity::{ResolvedVelocity, VelocityMetrics, VelocitySource};
use crate::models::work_item::WorkItem;
use chrono::Duration;

const WEEK_SECONDS: f64 = 7.0 * 86_400.0;

/// Estimate throughput (points/week) and cycle time (days/point) from
/// completed work.
///
/// Only finished, estimated, non-sub-task items with an `updated` timestamp
/// take part. With no such items the fallback throughput is returned with
/// `sample_size == 0`. Throughput is measured over calendar time with a
/// one-week floor on the observed span; cycle time uses business days, at
/// least one per item, and ignores items without a `created` timestamp.
pub fn calculate_velocity(items: &[WorkItem], params: &VelocityParams) -> VelocityMetrics {
    let mut qualifying: Vec<&WorkItem> = items
        .iter()
        .filter(|item| !item.is_subtask() && item.is_done() && item.points > 0.0)
        .filter(|item| item.points.is_finite() && item.updated.is_some())
        .collect();

    if qualifying.is_empty() {
        return fallback_metrics(params);
    }

    qualifying.sort_by_key(|item| item.updated);

    let first = qualifying.first().and_then(|item| item.updated);
    let last = qualifying.last().and_then(|item| item.updated);
    let observed = match (first, last) {
        (Some(first), Some(last)) => last.signed_duration_since(first),
        _ => Duration::zero(),
    };
    let span = observed.max(Duration::days(7));
    let weeks = span.num_seconds() as f64 / WEEK_SECONDS;

    let total_points: f64 = qualifying.iter().map(|item| item.points).sum();
    let points_per_week = round_to_tenth(total_points / weeks);

    let total_cycle_days: i64 = qualifying
        .iter()
        .filter_map(|item| Some(business_days_between(item.created?, item.updated?).max(1)))
        .sum();

    let days_per_point = if total_points > 0.0 {
        round_to_tenth(total_cycle_days as f64 / total_points)
    } else {
        params.fallback_days_per_point.max(0.0)
    };

    VelocityMetrics {
        points_per_week,
        days_per_point,
        sample_size: qualifying.len(),
    }
}

fn fallback_metrics(params: &VelocityParams) -> VelocityMetrics {
    let points_per_week = if params.fallback_points_per_week.is_finite() {
        params.fallback_points_per_week.max(0.0)
    } else {
        VelocityParams::default().fallback_points_per_week
    };

    // Five working days per week spread over the fallback throughput.
    let days_per_point = if points_per_week > 0.0 {
        5.0 / points_per_week
    } else {
        params.fallback_days_per_point.max(0.0)
    };

    VelocityMetrics {
        points_per_week,
        days_per_point,
        sample_size: 0,
    }
}

/// Pick the throughput the projection runs with: a manual override wins, then
/// a computed value backed by real history, then the configured default.
pub fn resolve_team_velocity(
    manual: Option<f64>,
    computed: Option<&VelocityMetrics>,
    params: &VelocityParams,
) -> ResolvedVelocity {
    if let Some(value) = manual.filter(|v| v.is_finite() && *v >= 0.0) {
        return ResolvedVelocity {
            points_per_week: value,
            source: VelocitySource::Manual,
        };
    }

    match computed.filter(|metrics| !metrics.is_fallback()) {
        Some(metrics) => ResolvedVelocity {
            points_per_week: metrics.points_per_week,
            source: VelocitySource::Computed,
        },
        None => ResolvedVelocity {
            points_per_week: fallback_metrics(params).points_per_week,
            source: VelocitySource::Default,
        },
    }
}

/// Estimated working days for a single ticket, for per-ticket badges.
/// Unestimated tickets have no estimate.
pub fn estimated_days(item: &WorkItem, days_per_point: f64) -> Option<f64> {
    if !item.is_estimated() || !days_per_point.is_finite() {
        return None;
    }
    Some(round_to_tenth(item.points * days_per_point.max(0.0)))
}
