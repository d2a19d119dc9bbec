use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VelocityMetrics {
    pub points_per_week: f64,
    pub days_per_point: f64,
    /// 0 means the fallback defaults were used, no real history.
    pub sample_size: usize,
}

impl VelocityMetrics {
    pub fn is_fallback(&self) -> bool {
        self.sample_size == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VelocitySource {
    Manual,
    Computed,
    Default,
}

/// The throughput the landing-zone projection actually runs with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedVelocity {
    pub points_per_week: f64,
    pub source: VelocitySource,
}
