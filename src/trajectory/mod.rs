//! Trajectory objects produced by the planner and sampled by the control
//! loop.
//!
//! A [`Trajectory`] is either waypoint-based (per-axis jerk-limited
//! profiles, time-synchronized) or path-based (a scalar profile driven
//! along a geometric path). The set of kinds is closed; dispatch is an
//! exhaustive match.

mod path;
mod waypoint;

pub use path::PathTrajectory;
pub use waypoint::WaypointTrajectory;

use crate::profile::PositionExtrema;

/// Kind of a trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TrajectoryType {
    /// Direct waypoint interpolation.
    Waypoint,
    /// Geometric path following.
    Path,
}

/// A sampled trajectory of either kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Trajectory<const D: usize> {
    /// Waypoint-based trajectory.
    Waypoint(WaypointTrajectory<D>),
    /// Path-based trajectory.
    Path(PathTrajectory<D>),
}

impl<const D: usize> Trajectory<D> {
    /// Kind of this trajectory.
    pub fn trajectory_type(&self) -> TrajectoryType {
        match self {
            Trajectory::Waypoint(_) => TrajectoryType::Waypoint,
            Trajectory::Path(_) => TrajectoryType::Path,
        }
    }

    /// Duration of the synchronized trajectory.
    pub fn duration(&self) -> f64 {
        match self {
            Trajectory::Waypoint(t) => t.duration(),
            Trajectory::Path(t) => t.duration(),
        }
    }

    /// Minimum duration of each independent axis.
    pub fn independent_min_durations(&self) -> &[f64; D] {
        match self {
            Trajectory::Waypoint(t) => t.independent_min_durations(),
            Trajectory::Path(t) => t.independent_min_durations(),
        }
    }

    /// Sample the trajectory at `time`.
    pub fn at_time(
        &self,
        time: f64,
        new_position: &mut [f64; D],
        new_velocity: &mut [f64; D],
        new_acceleration: &mut [f64; D],
    ) {
        match self {
            Trajectory::Waypoint(t) => t.at_time(time, new_position, new_velocity, new_acceleration),
            Trajectory::Path(t) => t.at_time(time, new_position, new_velocity, new_acceleration),
        }
    }

    /// Minimum and maximum position of each axis over the trajectory.
    pub fn position_extrema(&self) -> [PositionExtrema; D] {
        match self {
            Trajectory::Waypoint(t) => t.position_extrema(),
            Trajectory::Path(t) => t.position_extrema(),
        }
    }
}
