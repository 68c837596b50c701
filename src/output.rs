//! Per-cycle output record of the trajectory generator.

use crate::trajectory::{Trajectory, TrajectoryType};

/// Output state of one control cycle: the new setpoint, bookkeeping about
/// the calculation, and the trajectory being sampled.
#[derive(Debug, Clone)]
pub struct Output<const D: usize> {
    /// Commanded position per axis.
    pub new_position: [f64; D],
    /// Commanded velocity per axis.
    pub new_velocity: [f64; D],
    /// Commanded acceleration per axis.
    pub new_acceleration: [f64; D],

    /// Whether a new trajectory was calculated this cycle.
    pub new_calculation: bool,
    /// Duration of the last calculation in microseconds.
    pub calculation_duration: f64,

    /// Time on the current trajectory in seconds.
    pub time: f64,
    /// The trajectory being sampled; `None` before the first calculation.
    pub trajectory: Option<Trajectory<D>>,
    /// Kind of the current trajectory.
    pub trajectory_type: Option<TrajectoryType>,
}

impl<const D: usize> Default for Output<D> {
    fn default() -> Self {
        Self {
            new_position: [0.0; D],
            new_velocity: [0.0; D],
            new_acceleration: [0.0; D],
            new_calculation: false,
            calculation_duration: 0.0,
            time: 0.0,
            trajectory: None,
            trajectory_type: None,
        }
    }
}

impl<const D: usize> Output<D> {
    /// An output with zeroed setpoints and no trajectory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy the commanded setpoint into an input's current state, the usual
    /// hand-off at the end of a control cycle.
    pub fn pass_to_input(&self, input: &mut crate::Input<D>) {
        input.current_position = self.new_position;
        input.current_velocity = self.new_velocity;
        input.current_acceleration = self.new_acceleration;
    }
}
