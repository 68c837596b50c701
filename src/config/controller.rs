//! Root controller configuration.

use heapless::{FnvIndexMap, String};
use serde::Deserialize;

use crate::error::{ConfigError, Error, Result};
use crate::input::Input;
use crate::otg::Otg;

use super::axis::AxisConfig;

/// Root configuration structure from TOML.
///
/// Axes are ordered; their order in the configuration maps onto the axis
/// indices of [`Input`].
#[derive(Debug, Clone, Deserialize)]
pub struct ControllerConfig {
    /// Control cycle duration in seconds.
    #[serde(default = "default_delta_time")]
    pub delta_time: f64,

    /// Named axis configurations, in axis order.
    pub axes: FnvIndexMap<String<32>, AxisConfig, 16>,
}

fn default_delta_time() -> f64 {
    0.001
}

impl ControllerConfig {
    /// Get an axis configuration by name.
    pub fn axis(&self, name: &str) -> Option<&AxisConfig> {
        self.axes
            .iter()
            .find(|(k, _)| k.as_str() == name)
            .map(|(_, v)| v)
    }

    /// List all axis names in order.
    pub fn axis_names(&self) -> impl Iterator<Item = &str> {
        self.axes.keys().map(|s| s.as_str())
    }

    /// Get an axis configuration by name, or an error naming the miss.
    pub fn axis_or_error(&self, name: &str) -> Result<&AxisConfig> {
        self.axis(name).ok_or_else(|| {
            Error::Config(ConfigError::AxisNotFound(
                String::try_from(name).unwrap_or_default(),
            ))
        })
    }

    /// Build an [`Input`] whose limit arrays follow the configured axes.
    ///
    /// The configuration must declare exactly `D` axes.
    pub fn to_input<const D: usize>(&self) -> Result<Input<D>> {
        if self.axes.len() != D {
            return Err(Error::Config(ConfigError::AxisCountMismatch {
                configured: self.axes.len(),
                expected: D,
            }));
        }

        let mut input = Input::new();
        let mut any_min_velocity = false;
        let mut any_min_acceleration = false;
        let mut min_velocity = [0.0; D];
        let mut min_acceleration = [0.0; D];

        for (dof, axis) in self.axes.values().enumerate() {
            input.max_velocity[dof] = axis.max_velocity;
            input.max_acceleration[dof] = axis.max_acceleration;
            input.max_jerk[dof] = axis.max_jerk;
            input.enabled[dof] = axis.enabled;

            min_velocity[dof] = axis.min_velocity.unwrap_or(-axis.max_velocity);
            min_acceleration[dof] = axis.min_acceleration.unwrap_or(-axis.max_acceleration);
            any_min_velocity |= axis.min_velocity.is_some();
            any_min_acceleration |= axis.min_acceleration.is_some();
        }

        if any_min_velocity {
            input.min_velocity = Some(min_velocity);
        }
        if any_min_acceleration {
            input.min_acceleration = Some(min_acceleration);
        }
        Ok(input)
    }

    /// Build a generator with the configured control cycle.
    pub fn to_otg<const D: usize>(&self) -> Result<Otg<D>> {
        if self.axes.len() != D {
            return Err(Error::Config(ConfigError::AxisCountMismatch {
                configured: self.axes.len(),
                expected: D,
            }));
        }
        Otg::new(self.delta_time)
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            delta_time: default_delta_time(),
            axes: FnvIndexMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_AXIS_CONFIG: &str = r#"
delta_time = 0.002

[axes.x]
max_velocity = 1.0
max_acceleration = 2.0
max_jerk = 4.0

[axes.y]
max_velocity = 0.5
max_acceleration = 1.0
max_jerk = 2.0
min_velocity = -0.25
"#;

    #[test]
    fn test_axis_lookup() {
        let config: ControllerConfig = toml::from_str(TWO_AXIS_CONFIG).unwrap();
        assert!(config.axis("x").is_some());
        assert!(config.axis("z").is_none());
        assert!(matches!(
            config.axis_or_error("z"),
            Err(Error::Config(ConfigError::AxisNotFound(_)))
        ));
        let names: heapless::Vec<&str, 4> = config.axis_names().collect();
        assert_eq!(&names[..], &["x", "y"]);
    }

    #[test]
    fn test_to_input_maps_axis_order() {
        let config: ControllerConfig = toml::from_str(TWO_AXIS_CONFIG).unwrap();
        let input: Input<2> = config.to_input().unwrap();
        assert_eq!(input.max_velocity, [1.0, 0.5]);
        assert_eq!(input.max_jerk, [4.0, 2.0]);
        // One axis declares a lower velocity bound; the other falls back to
        // the negated maximum.
        assert_eq!(input.min_velocity, Some([-1.0, -0.25]));
        assert_eq!(input.min_acceleration, None);
    }

    #[test]
    fn test_axis_count_mismatch() {
        let config: ControllerConfig = toml::from_str(TWO_AXIS_CONFIG).unwrap();
        let result: Result<Input<3>> = config.to_input();
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::AxisCountMismatch {
                configured: 2,
                expected: 3,
            }))
        ));
    }

    #[test]
    fn test_to_otg_uses_delta_time() {
        let config: ControllerConfig = toml::from_str(TWO_AXIS_CONFIG).unwrap();
        let otg: Otg<2> = config.to_otg().unwrap();
        assert_eq!(otg.delta_time, 0.002);
    }
}
