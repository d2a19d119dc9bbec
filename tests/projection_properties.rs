use cadence_lib::analysis::landing_zone::project_landing_zone;
use cadence_lib::analysis::velocity::calculate_velocity;
use cadence_lib::models::settings::{ProjectionParams, VelocityParams};
use cadence_lib::models::work_item::{IssueType, StatusCategory, WorkItem};
use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

fn arb_category() -> impl Strategy<Value = StatusCategory> {
    prop_oneof![
        Just(StatusCategory::ToDo),
        Just(StatusCategory::InProgress),
        Just(StatusCategory::Done),
    ]
}

fn arb_params() -> impl Strategy<Value = ProjectionParams> {
    (
        0.0f64..5.0,
        0.01f64..2.0,
        1.0f64..3.0,
        0.1f64..1.0,
        prop_oneof![Just(0u32), 0u32..60],
        30u32..2_000,
    )
        .prop_map(
            |(unestimated_points, min_daily_throughput, optimistic_factor, pessimistic_factor, buffer_days, max_horizon_days)| {
                ProjectionParams {
                    unestimated_points,
                    min_daily_throughput,
                    optimistic_factor,
                    pessimistic_factor,
                    buffer_days,
                    max_horizon_days,
                }
            },
        )
}

fn arb_item() -> impl Strategy<Value = WorkItem> {
    (
        arb_category(),
        prop_oneof![Just(0.0), 0.5f64..21.0],
        proptest::option::of(0i64..400),
        proptest::option::of(-30i64..400),
        any::<bool>(),
    )
        .prop_map(|(category, points, created_offset, updated_offset, subtask)| WorkItem {
            id: "id".to_string(),
            key: "CAD-1".to_string(),
            summary: String::new(),
            status: String::new(),
            status_category: category,
            points,
            assignee: None,
            created: created_offset.map(|d| base() + Duration::hours(d * 7)),
            updated: updated_offset.map(|d| base() + Duration::hours(d * 11)),
            labels: vec![],
            issue_type: Some(IssueType {
                name: "Story".to_string(),
                subtask,
            }),
        })
}

proptest! {
    #[test]
    fn velocity_is_never_negative_or_nan(items in prop::collection::vec(arb_item(), 0..40)) {
        let metrics = calculate_velocity(&items, &VelocityParams::default());
        prop_assert!(metrics.points_per_week.is_finite() && metrics.points_per_week >= 0.0);
        prop_assert!(metrics.days_per_point.is_finite() && metrics.days_per_point >= 0.0);
    }

    #[test]
    fn no_qualifying_history_means_fallback(items in prop::collection::vec(arb_item(), 0..40)) {
        let qualifying = items.iter().any(|item| {
            item.is_done() && !item.is_subtask() && item.points > 0.0 && item.updated.is_some()
        });
        let metrics = calculate_velocity(&items, &VelocityParams::default());

        if qualifying {
            prop_assert!(metrics.sample_size > 0);
        } else {
            prop_assert_eq!(metrics.sample_size, 0);
            prop_assert_eq!(metrics.points_per_week, 10.0);
        }
    }

    #[test]
    fn projection_curves_are_ordered_clamped_and_monotone(
        items in prop::collection::vec(arb_item(), 0..60),
        points_per_week in prop_oneof![Just(0.0), 0.0f64..80.0],
        params in arb_params(),
    ) {
        let zone = project_landing_zone(&items, points_per_week, base(), &params);
        let scope = zone.total_scope_points;

        prop_assert!(zone.horizon_days() <= params.max_horizon_days as usize);
        for pair in zone.series.windows(2) {
            prop_assert!(pair[1].date > pair[0].date);
            prop_assert!(pair[1].optimistic >= pair[0].optimistic);
            prop_assert!(pair[1].expected >= pair[0].expected);
            prop_assert!(pair[1].pessimistic >= pair[0].pessimistic);
        }
        for point in &zone.series {
            prop_assert!(point.optimistic <= scope);
            prop_assert!(point.optimistic >= point.expected);
            prop_assert!(point.expected >= point.pessimistic);
            prop_assert_eq!(point.total_scope, scope);
        }

        let dates = zone.landing_dates;
        prop_assert!(dates.optimistic_date <= dates.expected_date);
        prop_assert!(dates.expected_date <= dates.pessimistic_date);

        let landing = zone.landing_days.pessimistic as usize;
        if zone.truncated {
            prop_assert!(landing > zone.horizon_days());
            prop_assert_eq!(zone.horizon_days(), params.max_horizon_days as usize);
        } else {
            // The series reaches the pessimistic landing and lands exactly there.
            prop_assert!(landing <= zone.horizon_days());
            prop_assert_eq!(zone.series[landing].pessimistic, scope);
            prop_assert!(landing == 0 || zone.series[landing - 1].pessimistic < scope);
        }
    }

    #[test]
    fn projection_is_idempotent(
        items in prop::collection::vec(arb_item(), 0..30),
        points_per_week in 0.0f64..50.0,
    ) {
        let first = project_landing_zone(&items, points_per_week, base(), &ProjectionParams::default());
        let second = project_landing_zone(&items, points_per_week, base(), &ProjectionParams::default());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn unestimated_stories_count_one_point(
        items in prop::collection::vec(arb_item(), 0..30),
    ) {
        let expected: f64 = items
            .iter()
            .filter(|item| !item.is_subtask())
            .map(|item| if item.points > 0.0 { item.points } else { 1.0 })
            .sum();
        let zone = project_landing_zone(&items, 10.0, base(), &ProjectionParams::default());
        prop_assert_eq!(zone.total_scope_points, expected);
    }
}
