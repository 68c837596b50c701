//! Per-cycle input record of the trajectory generator.

use core::fmt;

use crate::error::{InputError, Result};
use crate::path::Path;

/// Which target the generator drives toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlInterface {
    /// Drive position, velocity and acceleration to the target state.
    #[default]
    Position,
    /// Drive velocity and acceleration only; position runs free.
    Velocity,
}

/// How axes are coupled in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Synchronization {
    /// All enabled axes share a common duration.
    #[default]
    Time,
    /// Axes synchronize unless their target is a full stop.
    TimeIfNecessary,
    /// Every axis runs its own minimum-time profile.
    None,
}

/// Whether the trajectory duration snaps to the control cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DurationDiscretization {
    /// Any duration is allowed.
    #[default]
    Continuous,
    /// The duration must be a multiple of the control cycle.
    Discrete,
}

/// Input state of one control cycle.
///
/// Field-wise equality against the previous cycle's input decides whether a
/// new trajectory is calculated, so every field participates in
/// `PartialEq`.
#[derive(Debug, Clone, PartialEq)]
pub struct Input<const D: usize> {
    /// Target interface.
    pub interface: ControlInterface,
    /// Inter-axis synchronization behavior.
    pub synchronization: Synchronization,
    /// Duration discretization behavior.
    pub duration_discretization: DurationDiscretization,

    /// Current position per axis.
    pub current_position: [f64; D],
    /// Current velocity per axis.
    pub current_velocity: [f64; D],
    /// Current acceleration per axis.
    pub current_acceleration: [f64; D],

    /// Target position per axis.
    pub target_position: [f64; D],
    /// Target velocity per axis.
    pub target_velocity: [f64; D],
    /// Target acceleration per axis.
    pub target_acceleration: [f64; D],

    /// Maximum velocity per axis (>= 0).
    pub max_velocity: [f64; D],
    /// Maximum acceleration per axis (>= 0).
    pub max_acceleration: [f64; D],
    /// Maximum jerk per axis (> 0).
    pub max_jerk: [f64; D],
    /// Minimum velocity per axis (<= 0); negated maximum when absent.
    pub min_velocity: Option<[f64; D]>,
    /// Minimum acceleration per axis (<= 0); negated maximum when absent.
    pub min_acceleration: Option<[f64; D]>,

    /// Per-axis enable flags; disabled axes are frozen at their state.
    pub enabled: [bool; D],
    /// Lower bound on the trajectory duration.
    pub minimum_duration: Option<f64>,

    /// Geometric path to follow instead of direct waypoint interpolation.
    pub path: Option<Path<D>>,
}

impl<const D: usize> Default for Input<D> {
    fn default() -> Self {
        Self {
            interface: ControlInterface::default(),
            synchronization: Synchronization::default(),
            duration_discretization: DurationDiscretization::default(),
            current_position: [0.0; D],
            current_velocity: [0.0; D],
            current_acceleration: [0.0; D],
            target_position: [0.0; D],
            target_velocity: [0.0; D],
            target_acceleration: [0.0; D],
            max_velocity: [0.0; D],
            max_acceleration: [0.0; D],
            max_jerk: [0.0; D],
            min_velocity: None,
            min_acceleration: None,
            enabled: [true; D],
            minimum_duration: None,
            path: None,
        }
    }
}

impl<const D: usize> Input<D> {
    /// An input with all states zeroed and every axis enabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// An input following a geometric path.
    pub fn with_path(path: Path<D>) -> Self {
        Self {
            path: Some(path),
            ..Self::default()
        }
    }

    /// Effective lower velocity bound of an axis.
    #[inline]
    pub(crate) fn min_velocity_for(&self, dof: usize) -> f64 {
        match &self.min_velocity {
            Some(min) => min[dof],
            None => -self.max_velocity[dof],
        }
    }

    /// Effective lower acceleration bound of an axis.
    #[inline]
    pub(crate) fn min_acceleration_for(&self, dof: usize) -> f64 {
        match &self.min_acceleration {
            Some(min) => min[dof],
            None => -self.max_acceleration[dof],
        }
    }

    /// Validate the record.
    ///
    /// Checks finiteness of every numeric field, the sign conventions of
    /// the limits, and the minimum duration.
    pub fn validate(&self) -> Result<()> {
        let arrays: [(&str, &[f64; D]); 9] = [
            ("current_position", &self.current_position),
            ("current_velocity", &self.current_velocity),
            ("current_acceleration", &self.current_acceleration),
            ("target_position", &self.target_position),
            ("target_velocity", &self.target_velocity),
            ("target_acceleration", &self.target_acceleration),
            ("max_velocity", &self.max_velocity),
            ("max_acceleration", &self.max_acceleration),
            ("max_jerk", &self.max_jerk),
        ];
        for (field, array) in arrays {
            for (dof, value) in array.iter().enumerate() {
                if !value.is_finite() {
                    return Err(InputError::NonFinite { field, dof }.into());
                }
            }
        }

        for dof in 0..D {
            if self.max_velocity[dof] < 0.0 {
                return Err(InputError::NegativeLimit {
                    field: "max_velocity",
                    dof,
                }
                .into());
            }
            if self.max_acceleration[dof] < 0.0 {
                return Err(InputError::NegativeLimit {
                    field: "max_acceleration",
                    dof,
                }
                .into());
            }
            if !(self.max_jerk[dof] > 0.0) {
                return Err(InputError::InvalidJerkLimit { dof }.into());
            }
        }

        for (field, min) in [
            ("min_velocity", &self.min_velocity),
            ("min_acceleration", &self.min_acceleration),
        ] {
            if let Some(min) = min {
                for (dof, value) in min.iter().enumerate() {
                    if !value.is_finite() {
                        return Err(InputError::NonFinite { field, dof }.into());
                    }
                    if *value > 0.0 {
                        return Err(InputError::PositiveMinLimit { field, dof }.into());
                    }
                }
            }
        }

        if let Some(minimum_duration) = self.minimum_duration {
            if !minimum_duration.is_finite() || minimum_duration < 0.0 {
                return Err(InputError::InvalidMinimumDuration.into());
            }
        }

        Ok(())
    }

    /// Render the input as a diagnostic dump into `out`.
    pub fn write_debug<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        fn join<W: fmt::Write, const D: usize>(out: &mut W, array: &[f64; D]) -> fmt::Result {
            for (i, value) in array.iter().enumerate() {
                if i > 0 {
                    write!(out, ", ")?;
                }
                write!(out, "{}", value)?;
            }
            Ok(())
        }

        macro_rules! dump {
            ($name:literal, $field:expr) => {
                write!(out, concat!("inp.", $name, " = ["))?;
                join(out, $field)?;
                writeln!(out, "]")?;
            };
        }

        dump!("current_position", &self.current_position);
        dump!("current_velocity", &self.current_velocity);
        dump!("current_acceleration", &self.current_acceleration);
        dump!("target_position", &self.target_position);
        dump!("target_velocity", &self.target_velocity);
        dump!("target_acceleration", &self.target_acceleration);
        dump!("max_velocity", &self.max_velocity);
        dump!("max_acceleration", &self.max_acceleration);
        dump!("max_jerk", &self.max_jerk);
        if let Some(min_velocity) = &self.min_velocity {
            dump!("min_velocity", min_velocity);
        }
        if let Some(min_acceleration) = &self.min_acceleration {
            dump!("min_acceleration", min_acceleration);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn valid_input() -> Input<2> {
        let mut input = Input::new();
        input.max_velocity = [1.0, 1.0];
        input.max_acceleration = [1.0, 1.0];
        input.max_jerk = [1.0, 1.0];
        input.target_position = [1.0, 2.0];
        input
    }

    #[test]
    fn test_valid_input_passes() {
        assert!(valid_input().validate().is_ok());
    }

    #[test]
    fn test_nan_rejected() {
        let mut input = valid_input();
        input.current_velocity[1] = f64::NAN;
        assert!(matches!(
            input.validate(),
            Err(Error::InvalidInput(InputError::NonFinite { dof: 1, .. }))
        ));
    }

    #[test]
    fn test_zero_jerk_rejected() {
        let mut input = valid_input();
        input.max_jerk[0] = 0.0;
        assert!(matches!(
            input.validate(),
            Err(Error::InvalidInput(InputError::InvalidJerkLimit { dof: 0 }))
        ));
    }

    #[test]
    fn test_positive_min_velocity_rejected() {
        let mut input = valid_input();
        input.min_velocity = Some([0.5, -1.0]);
        assert!(matches!(
            input.validate(),
            Err(Error::InvalidInput(InputError::PositiveMinLimit { dof: 0, .. }))
        ));
    }

    #[test]
    fn test_equality_detects_target_change() {
        let a = valid_input();
        let mut b = a.clone();
        assert_eq!(a, b);
        b.target_position[0] += 1e-9;
        assert_ne!(a, b);
    }

    #[test]
    fn test_min_limit_defaults_to_negated_max() {
        let mut input = valid_input();
        assert_eq!(input.min_velocity_for(0), -1.0);
        input.min_velocity = Some([-0.25, -0.5]);
        assert_eq!(input.min_velocity_for(0), -0.25);
    }

    #[test]
    fn test_debug_dump_lists_fields() {
        let input = valid_input();
        let mut buf = heapless::String::<512>::new();
        input.write_debug(&mut buf).unwrap();
        assert!(buf.as_str().contains("inp.current_position = [0, 0]"));
        assert!(buf.as_str().contains("inp.max_jerk = [1, 1]"));
    }
}
