//! Per-axis limit configuration.

use serde::Deserialize;

/// Kinematic limits of one axis, as read from configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AxisConfig {
    /// Maximum velocity (>= 0).
    pub max_velocity: f64,

    /// Maximum acceleration (>= 0).
    pub max_acceleration: f64,

    /// Maximum jerk (> 0).
    pub max_jerk: f64,

    /// Minimum velocity (<= 0); defaults to the negated maximum.
    #[serde(default)]
    pub min_velocity: Option<f64>,

    /// Minimum acceleration (<= 0); defaults to the negated maximum.
    #[serde(default)]
    pub min_acceleration: Option<f64>,

    /// Whether the axis takes part in planning.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}
