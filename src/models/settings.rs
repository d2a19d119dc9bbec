use serde::{Deserialize, Serialize};

/// Tuning for the velocity estimator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VelocityParams {
    pub fallback_points_per_week: f64,
    /// Cycle time used when no points were completed at all.
    pub fallback_days_per_point: f64,
}

impl Default for VelocityParams {
    fn default() -> Self {
        Self {
            fallback_points_per_week: 10.0,
            fallback_days_per_point: 5.0,
        }
    }
}

/// Tuning for the landing-zone projector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectionParams {
    /// Scope worth of an unestimated (0-point) item.
    pub unestimated_points: f64,
    pub min_daily_throughput: f64,
    pub optimistic_factor: f64,
    pub pessimistic_factor: f64,
    pub buffer_days: u32,
    /// Longest series the projector will build. Landing days past it are
    /// still reported, the series just stops short of them.
    pub max_horizon_days: u32,
}

pub const MIN_HORIZON_DAYS: u32 = 30;
pub const MAX_HORIZON_DAYS: u32 = 36_500;

impl Default for ProjectionParams {
    fn default() -> Self {
        Self {
            unestimated_points: 1.0,
            min_daily_throughput: 0.1,
            optimistic_factor: 1.25,
            pessimistic_factor: 0.75,
            buffer_days: 14,
            max_horizon_days: 3_650,
        }
    }
}

impl ProjectionParams {
    /// Keeps factors ordered around 1.0 and strictly positive so the horizon
    /// is always finite.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let finite_or = |v: f64, d: f64| if v.is_finite() { v } else { d };

        Self {
            unestimated_points: finite_or(self.unestimated_points, defaults.unestimated_points)
                .max(0.0),
            min_daily_throughput: finite_or(self.min_daily_throughput, defaults.min_daily_throughput)
                .max(0.01),
            optimistic_factor: finite_or(self.optimistic_factor, defaults.optimistic_factor)
                .max(1.0),
            pessimistic_factor: finite_or(self.pessimistic_factor, defaults.pessimistic_factor)
                .clamp(0.1, 1.0),
            buffer_days: self.buffer_days,
            max_horizon_days: self.max_horizon_days.clamp(MIN_HORIZON_DAYS, MAX_HORIZON_DAYS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: String,
    pub name: String,
    pub role: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataMode {
    Mock,
    Live,
}

/// Everything the dashboard is parameterized by. Passed explicitly into the
/// estimator and projector; there is no process-wide settings state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardSettings {
    pub stale_threshold_days: u32,
    /// Opaque tracker query selecting the active scope.
    pub active_work_filter: String,
    pub future_ideas_filter: String,
    pub completed_work_filter: String,
    pub build_label: String,
    pub story_point_field: String,
    pub board_id: String,
    pub team_name: String,
    pub team_members: Vec<TeamMember>,
    pub data_mode: DataMode,
    /// When set, suppresses recomputation of velocity from history.
    pub manual_velocity: Option<f64>,
    pub velocity: VelocityParams,
    pub projection: ProjectionParams,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            stale_threshold_days: 30,
            active_work_filter: "statusCategory != Done".to_string(),
            future_ideas_filter: "labels = future".to_string(),
            completed_work_filter: "status = Done".to_string(),
            build_label: "build".to_string(),
            story_point_field: "customfield_10014".to_string(),
            board_id: String::new(),
            team_name: "Core Team".to_string(),
            team_members: Vec::new(),
            data_mode: DataMode::Mock,
            manual_velocity: None,
            velocity: VelocityParams::default(),
            projection: ProjectionParams::default(),
        }
    }
}

impl DashboardSettings {
    /// Active-scope filter, falling back to the build label when unset.
    pub fn effective_active_filter(&self) -> String {
        if self.active_work_filter.trim().is_empty() {
            format!("labels = {} AND statusCategory != Done", self.build_label)
        } else {
            self.active_work_filter.clone()
        }
    }
}
