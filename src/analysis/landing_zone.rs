use crate::analysis::calendar::add_days;
use crate::models::projection::{LandingDates, LandingDays, LandingZone, ProjectionPoint};
use crate::models::settings::ProjectionParams;
use crate::models::work_item::WorkItem;
use chrono::{DateTime, Days, Utc};

/// Scope points of the open work, with unestimated items floored to
/// `unestimated_points` so missing estimates never shrink the scope.
pub fn total_scope_points(items: &[WorkItem], params: &ProjectionParams) -> f64 {
    items
        .iter()
        .filter(|item| !item.is_subtask())
        .map(|item| {
            if item.points > 0.0 && item.points.is_finite() {
                item.points
            } else {
                params.unestimated_points
            }
        })
        .sum()
}

pub fn daily_throughput(points_per_week: f64, params: &ProjectionParams) -> f64 {
    (points_per_week / 7.0).max(params.min_daily_throughput)
}

/// First whole day on which `day * rate` reaches `scope`, using the same
/// float comparison the series uses. Saturates at `u32::MAX`.
pub fn landing_day(scope: f64, rate: f64) -> u32 {
    if scope <= 0.0 {
        return 0;
    }
    let estimate = (scope / rate).ceil();
    if !estimate.is_finite() || estimate >= f64::from(u32::MAX) {
        return u32::MAX;
    }

    let mut day = estimate as u32;
    while day > 0 && f64::from(day - 1) * rate >= scope {
        day -= 1;
    }
    while day < u32::MAX && f64::from(day) * rate < scope {
        day += 1;
    }
    day
}

/// Project cumulative completion of `items` day by day from `today` under
/// optimistic, expected and pessimistic throughput, and derive the first
/// calendar date each curve reaches the full scope.
///
/// The series runs to the pessimistic landing day plus `buffer_days`, capped
/// at `max_horizon_days` and at the last representable date. Landing days are
/// computed directly and stay exact when the series is cut short.
pub fn project_landing_zone(
    items: &[WorkItem],
    points_per_week: f64,
    today: DateTime<Utc>,
    params: &ProjectionParams,
) -> LandingZone {
    let params = params.sanitized();
    let scope = total_scope_points(items, &params);
    let daily = daily_throughput(points_per_week, &params);

    let optimistic_rate = daily * params.optimistic_factor;
    let expected_rate = daily;
    let pessimistic_rate = daily * params.pessimistic_factor;

    let landing_days = LandingDays {
        optimistic: landing_day(scope, optimistic_rate),
        expected: landing_day(scope, expected_rate),
        pessimistic: landing_day(scope, pessimistic_rate),
    };

    let full_horizon = landing_days.pessimistic.saturating_add(params.buffer_days);
    let horizon = full_horizon.min(params.max_horizon_days);
    let start = today.date_naive();

    let mut series = Vec::with_capacity(horizon as usize + 1);
    for day in 0..=horizon {
        let Some(date) = start.checked_add_days(Days::new(u64::from(day))) else {
            break;
        };
        let elapsed = f64::from(day);
        series.push(ProjectionPoint {
            date,
            total_scope: scope,
            optimistic: (elapsed * optimistic_rate).min(scope),
            expected: (elapsed * expected_rate).min(scope),
            pessimistic: (elapsed * pessimistic_rate).min(scope),
        });
    }
    let truncated = series.len() <= landing_days.pessimistic as usize;

    LandingZone {
        total_scope_points: scope,
        daily_throughput: daily,
        series,
        landing_days,
        landing_dates: LandingDates {
            optimistic_date: add_days(start, landing_days.optimistic),
            expected_date: add_days(start, landing_days.expected),
            pessimistic_date: add_days(start, landing_days.pessimistic),
        },
        truncated,
    }
}
