//! The cycle-driving generator object.
//!
//! [`Otg`] owns the control-cycle timing and the change detection that
//! decides when to replan. Call [`Otg::update`] once per cycle with the
//! current input; the output carries the next setpoint sampled from the
//! active trajectory.

use crate::error::{Error, InputError, Result, Status};
use crate::input::{ControlInterface, Input};
use crate::output::Output;
use crate::trajectory::{PathTrajectory, Trajectory, WaypointTrajectory};

/// Default ceiling on the synchronized duration; longer trajectories are
/// treated as degenerate inputs.
pub const MAX_TRAJECTORY_DURATION: f64 = 7.6e3;

/// Online trajectory generator for `D` axes.
#[derive(Debug, Clone)]
pub struct Otg<const D: usize> {
    /// Control cycle duration in seconds.
    pub delta_time: f64,
    /// Duration ceiling; `None` disables the check.
    pub max_duration: Option<f64>,

    current_input: Option<Input<D>>,
    time: f64,
}

impl<const D: usize> Otg<D> {
    /// Create a generator with the given control cycle duration.
    pub fn new(delta_time: f64) -> Result<Self> {
        if !delta_time.is_finite() || !(delta_time > 0.0) {
            return Err(Error::Config(crate::error::ConfigError::InvalidDeltaTime(
                delta_time,
            )));
        }
        Ok(Self {
            delta_time,
            max_duration: Some(MAX_TRAJECTORY_DURATION),
            current_input: None,
            time: 0.0,
        })
    }

    /// Number of axes.
    #[inline]
    pub const fn degrees_of_freedom(&self) -> usize {
        D
    }

    /// Time on the current trajectory in seconds.
    #[inline]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Drop the stored input so the next update replans unconditionally.
    pub fn reset(&mut self) {
        self.current_input = None;
        self.time = 0.0;
    }

    /// Run one control cycle.
    ///
    /// Replans when the input differs from the previous cycle, then samples
    /// the active trajectory one cycle further. On error the previous
    /// trajectory and time are left untouched, so the caller can keep
    /// sampling the old plan.
    pub fn update(&mut self, input: &Input<D>, output: &mut Output<D>) -> Result<Status> {
        input.validate()?;

        let needs_plan =
            output.trajectory.is_none() || self.current_input.as_ref() != Some(input);

        if needs_plan {
            #[cfg(feature = "std")]
            let started = std::time::Instant::now();

            let trajectory = match &input.path {
                Some(path) => {
                    if input.interface != ControlInterface::Position {
                        return Err(Error::InvalidInput(InputError::PathBoundaryMismatch));
                    }
                    Trajectory::Path(PathTrajectory::generate(input, path.clone())?)
                }
                None => Trajectory::Waypoint(WaypointTrajectory::generate(
                    input,
                    self.delta_time,
                    self.max_duration,
                )?),
            };

            #[cfg(feature = "std")]
            {
                output.calculation_duration = started.elapsed().as_secs_f64() * 1e6;
            }
            #[cfg(not(feature = "std"))]
            {
                output.calculation_duration = 0.0;
            }

            output.trajectory_type = Some(trajectory.trajectory_type());
            output.trajectory = Some(trajectory);
            output.new_calculation = true;
            self.time = 0.0;
        } else {
            output.new_calculation = false;
        }

        self.time += self.delta_time;
        output.time = self.time;

        let Some(trajectory) = output.trajectory.as_ref() else {
            // Unreachable: a plan was just produced or carried over.
            return Err(Error::SynchronizationCalculation { dof: None });
        };
        trajectory.at_time(
            self.time,
            &mut output.new_position,
            &mut output.new_velocity,
            &mut output.new_acceleration,
        );

        let duration = trajectory.duration();
        self.current_input = Some(input.clone());

        if self.time >= duration {
            Ok(Status::Finished)
        } else {
            Ok(Status::Working)
        }
    }
}
