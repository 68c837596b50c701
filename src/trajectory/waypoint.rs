//! Waypoint-mode trajectories.
//!
//! Orchestrates the per-axis pipeline of a control cycle: brake ramp for
//! out-of-envelope states, minimum-time solve, inter-axis synchronization,
//! and the fixed-time re-solve that stretches non-limiting axes onto the
//! common duration.

use libm::fabs;

use crate::error::{Error, Result};
use crate::input::{ControlInterface, DurationDiscretization, Input, Synchronization};
use crate::profile::{
    brake, synchronize, Block, PositionExtrema, PositionFixedTime, PositionMinTime, Profile,
    VelocityFixedTime, VelocityMinTime, EPS_SYNC,
};

/// A time-synchronized set of per-axis jerk-limited profiles.
#[derive(Debug, Clone, PartialEq)]
pub struct WaypointTrajectory<const D: usize> {
    duration: f64,
    independent_min_durations: [f64; D],
    profiles: [Profile; D],
}

impl<const D: usize> WaypointTrajectory<D> {
    /// Plan a trajectory for the given input.
    ///
    /// `delta_time` is the control cycle used for discrete durations;
    /// `max_duration` optionally rejects degenerate inputs whose
    /// synchronized duration explodes.
    pub fn generate(
        input: &Input<D>,
        delta_time: f64,
        max_duration: Option<f64>,
    ) -> Result<Self> {
        let mut profiles: [Profile; D] = core::array::from_fn(|_| Profile::default());
        let mut blocks: [Block; D] = core::array::from_fn(|_| Block::default());
        let mut independent_min_durations = [0.0; D];

        // Starting states of the profiles, after any brake ramp.
        let mut p0s = [0.0; D];
        let mut v0s = [0.0; D];
        let mut a0s = [0.0; D];

        for dof in 0..D {
            if !input.enabled[dof] {
                // Frozen: zero-duration profile holding the current state.
                profiles[dof].set_arcs(
                    [0.0; 7],
                    [0.0; 7],
                    input.current_position[dof],
                    input.current_velocity[dof],
                    input.current_acceleration[dof],
                );
                continue;
            }

            let v_max = input.max_velocity[dof];
            let v_min = input.min_velocity_for(dof);
            let a_max = input.max_acceleration[dof];
            let a_min = input.min_acceleration_for(dof);
            let j_max = input.max_jerk[dof];

            let (t_brakes, j_brakes) = match input.interface {
                ControlInterface::Position => brake::position_brake(
                    input.current_velocity[dof],
                    input.current_acceleration[dof],
                    v_max,
                    v_min,
                    a_max,
                    a_min,
                    j_max,
                ),
                ControlInterface::Velocity => brake::velocity_brake(
                    input.current_acceleration[dof],
                    a_max,
                    a_min,
                    j_max,
                ),
            };
            profiles[dof].t_brakes = t_brakes;
            profiles[dof].j_brakes = j_brakes;
            let (p0, v0, a0) = profiles[dof].integrate_brake(
                input.current_position[dof],
                input.current_velocity[dof],
                input.current_acceleration[dof],
            );
            p0s[dof] = p0;
            v0s[dof] = v0;
            a0s[dof] = a0;

            let mut block = match input.interface {
                ControlInterface::Position => PositionMinTime::new(
                    p0,
                    v0,
                    a0,
                    input.target_position[dof],
                    input.target_velocity[dof],
                    input.target_acceleration[dof],
                    v_max,
                    v_min,
                    a_max,
                    a_min,
                    j_max,
                )
                .solve(),
                ControlInterface::Velocity => VelocityMinTime::new(
                    p0,
                    v0,
                    a0,
                    input.target_velocity[dof],
                    input.target_acceleration[dof],
                    a_max,
                    a_min,
                    j_max,
                )
                .solve(),
            }
            .ok_or(Error::ExecutionTimeCalculation { dof })?;

            // Durations compare across axes including the brake prefix.
            shift_block(&mut block, profiles[dof].t_brake.unwrap_or(0.0));

            independent_min_durations[dof] = block.t_min;
            profiles[dof] = with_brake_of(&block.p_min, &profiles[dof]);
            blocks[dof] = block;
        }

        let discrete = input.duration_discretization == DurationDiscretization::Discrete;
        let outcome = synchronize(
            &blocks,
            &input.enabled,
            input.minimum_duration,
            discrete,
            delta_time,
        )
        .ok_or(Error::SynchronizationCalculation { dof: None })?;
        let duration = outcome.duration;

        if let Some(ceiling) = max_duration {
            if duration > ceiling {
                return Err(Error::TrajectoryDuration { duration });
            }
        }

        if duration > 0.0 && input.synchronization != Synchronization::None {
            for dof in 0..D {
                if !input.enabled[dof] || outcome.limiting_dof == Some(dof) {
                    continue;
                }

                if input.synchronization == Synchronization::TimeIfNecessary
                    && fabs(input.target_velocity[dof]) < EPS_SYNC
                    && fabs(input.target_acceleration[dof]) < EPS_SYNC
                {
                    profiles[dof] = with_brake_of(&blocks[dof].p_min, &profiles[dof]);
                    continue;
                }

                // The synchronized duration may already correspond to a
                // profile from the minimum-time solve.
                if fabs(duration - blocks[dof].t_min) < EPS_SYNC {
                    profiles[dof] = with_brake_of(&blocks[dof].p_min, &profiles[dof]);
                    continue;
                }
                if let Some(interval) = &blocks[dof].a {
                    if fabs(duration - interval.right) < EPS_SYNC {
                        profiles[dof] = with_brake_of(&interval.profile, &profiles[dof]);
                        continue;
                    }
                }
                if let Some(interval) = &blocks[dof].b {
                    if fabs(duration - interval.right) < EPS_SYNC {
                        profiles[dof] = with_brake_of(&interval.profile, &profiles[dof]);
                        continue;
                    }
                }

                let t_profile = duration - profiles[dof].t_brake.unwrap_or(0.0);
                let stretched = match input.interface {
                    ControlInterface::Position => PositionFixedTime::new(
                        t_profile,
                        p0s[dof],
                        v0s[dof],
                        a0s[dof],
                        input.target_position[dof],
                        input.target_velocity[dof],
                        input.target_acceleration[dof],
                        input.max_velocity[dof],
                        input.min_velocity_for(dof),
                        input.max_acceleration[dof],
                        input.min_acceleration_for(dof),
                        input.max_jerk[dof],
                    )
                    .solve(),
                    ControlInterface::Velocity => VelocityFixedTime::new(
                        t_profile,
                        p0s[dof],
                        v0s[dof],
                        a0s[dof],
                        input.target_velocity[dof],
                        input.target_acceleration[dof],
                        input.max_acceleration[dof],
                        input.min_acceleration_for(dof),
                        input.max_jerk[dof],
                    )
                    .solve(),
                }
                .ok_or(Error::SynchronizationCalculation { dof: Some(dof) })?;

                profiles[dof] = with_brake_of(&stretched, &profiles[dof]);
            }
        }

        Ok(Self {
            duration,
            independent_min_durations,
            profiles,
        })
    }

    /// Common duration of the trajectory.
    #[inline]
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Minimum duration each axis could have achieved on its own.
    #[inline]
    pub fn independent_min_durations(&self) -> &[f64; D] {
        &self.independent_min_durations
    }

    /// Per-axis profiles.
    #[inline]
    pub fn profiles(&self) -> &[Profile; D] {
        &self.profiles
    }

    /// Sample the trajectory at `time`.
    pub fn at_time(
        &self,
        time: f64,
        new_position: &mut [f64; D],
        new_velocity: &mut [f64; D],
        new_acceleration: &mut [f64; D],
    ) {
        if time > self.duration {
            // Keep constant acceleration from the final state.
            for dof in 0..D {
                let p = &self.profiles[dof];
                let state = Profile::integrate(time - self.duration, p.pf(), p.vf(), p.af(), 0.0);
                new_position[dof] = state.0;
                new_velocity[dof] = state.1;
                new_acceleration[dof] = state.2;
            }
            return;
        }

        for dof in 0..D {
            let p = &self.profiles[dof];
            let mut t_local = time;

            if let Some(t_brake) = p.t_brake {
                if t_local < t_brake {
                    let index = if t_local < p.t_brakes[0] { 0 } else { 1 };
                    if index > 0 {
                        t_local -= p.t_brakes[0];
                    }
                    let state = Profile::integrate(
                        t_local,
                        p.p_brakes[index],
                        p.v_brakes[index],
                        p.a_brakes[index],
                        p.j_brakes[index],
                    );
                    new_position[dof] = state.0;
                    new_velocity[dof] = state.1;
                    new_acceleration[dof] = state.2;
                    continue;
                }
                t_local -= t_brake;
            }

            let state = if t_local >= p.t_sum[6] {
                Profile::integrate(t_local - p.t_sum[6], p.pf(), p.vf(), p.af(), 0.0)
            } else {
                p.state_at_time(t_local)
            };
            new_position[dof] = state.0;
            new_velocity[dof] = state.1;
            new_acceleration[dof] = state.2;
        }
    }

    /// Position extrema of every axis over its profile.
    pub fn position_extrema(&self) -> [PositionExtrema; D] {
        core::array::from_fn(|dof| self.profiles[dof].position_extrema())
    }
}

/// Shift a block's durations by the brake prefix so they compare in total
/// trajectory time.
fn shift_block(block: &mut Block, t_brake: f64) {
    if t_brake <= 0.0 {
        return;
    }
    block.t_min += t_brake;
    for interval in [&mut block.a, &mut block.b].into_iter().flatten() {
        interval.left += t_brake;
        interval.right += t_brake;
    }
}

/// A profile's arcs combined with the brake prefix of another.
fn with_brake_of(arcs: &Profile, brake_source: &Profile) -> Profile {
    let mut profile = arcs.clone();
    profile.t_brakes = brake_source.t_brakes;
    profile.j_brakes = brake_source.j_brakes;
    profile.p_brakes = brake_source.p_brakes;
    profile.v_brakes = brake_source.v_brakes;
    profile.a_brakes = brake_source.a_brakes;
    profile.t_brake = brake_source.t_brake;
    profile
}
