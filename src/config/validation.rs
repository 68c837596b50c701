//! Configuration validation.

use crate::error::{ConfigError, Error, Result};

use super::ControllerConfig;

/// Validate a controller configuration.
///
/// Checks:
/// - Control cycle duration is finite and positive
/// - Per-axis limits carry the required signs
/// - Declared min limits are non-positive
pub fn validate_config(config: &ControllerConfig) -> Result<()> {
    if !config.delta_time.is_finite() || config.delta_time <= 0.0 {
        return Err(Error::Config(ConfigError::InvalidDeltaTime(
            config.delta_time,
        )));
    }

    for axis in config.axes.values() {
        if !axis.max_velocity.is_finite() || axis.max_velocity < 0.0 {
            return Err(Error::Config(ConfigError::InvalidMaxVelocity(
                axis.max_velocity,
            )));
        }
        if !axis.max_acceleration.is_finite() || axis.max_acceleration < 0.0 {
            return Err(Error::Config(ConfigError::InvalidMaxAcceleration(
                axis.max_acceleration,
            )));
        }
        if !axis.max_jerk.is_finite() || axis.max_jerk <= 0.0 {
            return Err(Error::Config(ConfigError::InvalidMaxJerk(axis.max_jerk)));
        }
        for min in [axis.min_velocity, axis.min_acceleration].into_iter().flatten() {
            if !min.is_finite() || min > 0.0 {
                return Err(Error::Config(ConfigError::InvalidMinLimit(min)));
            }
        }
    }

    Ok(())
}
