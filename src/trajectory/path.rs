//! Path-mode trajectories (experimental).
//!
//! A geometric path reduces the multi-axis problem to a single scalar
//! profile in the arc-length variable: every axis's boundary state must
//! project onto the same scalar speed and acceleration through the path
//! tangent, which is validated before planning. Sampling maps the scalar
//! state back through the path's chain-rule derivatives.

use libm::fabs;

use crate::error::{Error, InputError, Result};
use crate::input::Input;
use crate::path::Path;
use crate::profile::{PositionExtrema, PositionMinTime, Profile};

/// Cross-axis consistency tolerance of the reduced boundary scalars.
const EPS_PATH: f64 = 1e-10;

/// Tangent components below this magnitude cannot anchor the reduction.
const EPS_TANGENT: f64 = 1e-9;

/// Scalar boundary state reduced from the per-axis boundary conditions.
#[derive(Debug, Clone, Copy, PartialEq)]
struct BoundaryScalars {
    ds0: f64,
    dds0: f64,
    dsf: f64,
    ddsf: f64,
}

/// A trajectory following a geometric path.
#[derive(Debug, Clone, PartialEq)]
pub struct PathTrajectory<const D: usize> {
    duration: f64,
    independent_min_durations: [f64; D],
    path: Path<D>,
    /// Scalar profile over the arc-length variable.
    profile: Profile,
    final_position: [f64; D],
    final_velocity: [f64; D],
    final_acceleration: [f64; D],
}

impl<const D: usize> PathTrajectory<D> {
    /// Plan a path-following trajectory for the given input.
    ///
    /// Fails with an invalid-input error when the per-axis boundary states
    /// do not reduce to a consistent scalar state on the path.
    pub fn generate(input: &Input<D>, path: Path<D>) -> Result<Self> {
        let scalars = reduce_boundary(
            &path,
            &input.current_velocity,
            &input.current_acceleration,
            &input.target_velocity,
            &input.target_acceleration,
        )
        .ok_or(Error::InvalidInput(InputError::PathBoundaryMismatch))?;

        // Project the axis limits through the start tangent; the tightest
        // axis constrains the scalar profile.
        let tangent = path.pdq(0.0);
        let mut v_limit = f64::INFINITY;
        let mut a_limit = f64::INFINITY;
        let mut j_limit = f64::INFINITY;
        for dof in 0..D {
            let scale = fabs(tangent[dof]);
            if scale > EPS_TANGENT {
                v_limit = v_limit.min(input.max_velocity[dof] / scale);
                a_limit = a_limit.min(input.max_acceleration[dof] / scale);
                j_limit = j_limit.min(input.max_jerk[dof] / scale);
            }
        }
        if !j_limit.is_finite() || !(j_limit > 0.0) {
            return Err(Error::InvalidInput(InputError::PathBoundaryMismatch));
        }

        let block = PositionMinTime::new(
            0.0,
            scalars.ds0,
            scalars.dds0,
            path.length,
            scalars.dsf,
            scalars.ddsf,
            v_limit,
            -v_limit,
            a_limit,
            -a_limit,
            j_limit,
        )
        .solve()
        .ok_or(Error::ExecutionTimeCalculation { dof: 0 })?;

        let duration = block.t_min;
        let final_position = path.q(path.length);
        let final_velocity = path.dq(path.length, scalars.dsf);
        let final_acceleration = path.ddq(path.length, scalars.dsf, scalars.ddsf);

        Ok(Self {
            duration,
            independent_min_durations: [duration; D],
            path,
            profile: block.p_min,
            final_position,
            final_velocity,
            final_acceleration,
        })
    }

    /// Common duration of the trajectory.
    #[inline]
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Minimum duration per axis (identical in path mode).
    #[inline]
    pub fn independent_min_durations(&self) -> &[f64; D] {
        &self.independent_min_durations
    }

    /// The path being followed.
    #[inline]
    pub fn path(&self) -> &Path<D> {
        &self.path
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
                let state = Profile::integrate(
                    time - self.duration,
                    self.final_position[dof],
                    self.final_velocity[dof],
                    self.final_acceleration[dof],
                    0.0,
                );
                new_position[dof] = state.0;
                new_velocity[dof] = state.1;
                new_acceleration[dof] = state.2;
            }
            return;
        }

        let (s, ds, dds) = self.profile.state_at_time(time);
        let s = s.clamp(0.0, self.path.length);
        *new_position = self.path.q(s);
        *new_velocity = self.path.dq(s, ds);
        *new_acceleration = self.path.ddq(s, ds, dds);
    }

    /// Position extrema per axis, evaluated at the scalar profile's
    /// extremal arc lengths and the path endpoints.
    pub fn position_extrema(&self) -> [PositionExtrema; D] {
        let scalar = self.profile.position_extrema();
        let samples = [
            (0.0_f64, 0.0_f64),
            (scalar.min, scalar.t_min),
            (scalar.max, scalar.t_max),
            (self.path.length, self.duration),
        ];

        core::array::from_fn(|dof| {
            let mut ext = PositionExtrema {
                min: f64::INFINITY,
                max: f64::NEG_INFINITY,
                t_min: 0.0,
                t_max: 0.0,
            };
            for (s, t) in samples {
                let q = self.path.q(s.clamp(0.0, self.path.length));
                if q[dof] < ext.min {
                    ext.min = q[dof];
                    ext.t_min = t;
                }
                if q[dof] > ext.max {
                    ext.max = q[dof];
                    ext.t_max = t;
                }
            }
            ext
        })
    }
}

/// Reduce per-axis boundary states to scalar path speed and acceleration,
/// verifying consistency across axes.
fn reduce_boundary<const D: usize>(
    path: &Path<D>,
    v0: &[f64; D],
    a0: &[f64; D],
    vf: &[f64; D],
    af: &[f64; D],
) -> Option<BoundaryScalars> {
    let (ds0, dds0) = reduce_point(path, 0.0, v0, a0)?;
    let (dsf, ddsf) = reduce_point(path, path.length, vf, af)?;
    Some(BoundaryScalars {
        ds0,
        dds0,
        dsf,
        ddsf,
    })
}

fn reduce_point<const D: usize>(
    path: &Path<D>,
    s: f64,
    v: &[f64; D],
    a: &[f64; D],
) -> Option<(f64, f64)> {
    let pdq = path.pdq(s);
    let pddq = path.pddq(s);

    // Anchor on the largest tangent component.
    let mut anchor = 0;
    for dof in 1..D {
        if fabs(pdq[dof]) > fabs(pdq[anchor]) {
            anchor = dof;
        }
    }
    if fabs(pdq[anchor]) <= EPS_TANGENT {
        return None;
    }

    let ds = v[anchor] / pdq[anchor];
    let dds = (a[anchor] - pddq[anchor] * ds * ds) / pdq[anchor];

    for dof in 0..D {
        if dof == anchor {
            continue;
        }
        if fabs(pdq[dof]) > EPS_TANGENT {
            let ds_dof = v[dof] / pdq[dof];
            let dds_dof = (a[dof] - pddq[dof] * ds * ds) / pdq[dof];
            if fabs(ds - ds_dof) > EPS_PATH || fabs(dds - dds_dof) > EPS_PATH {
                return None;
            }
        } else {
            // Degenerate tangent component: the axis must carry no motion.
            let v_expected = pdq[dof] * ds;
            let a_expected = pddq[dof] * ds * ds + pdq[dof] * dds;
            if fabs(v[dof] - v_expected) > EPS_PATH || fabs(a[dof] - a_expected) > EPS_PATH {
                return None;
            }
        }
    }
    Some((ds, dds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::Waypoint;

    fn diagonal_path() -> Path<2> {
        Path::new([0.0, 0.0], &[Waypoint::absolute([3.0, 4.0])], 0.0).unwrap()
    }

    fn path_input() -> Input<2> {
        let mut input = Input::new();
        input.max_velocity = [1.0, 1.0];
        input.max_acceleration = [1.0, 1.0];
        input.max_jerk = [1.0, 1.0];
        input
    }

    #[test]
    fn test_rest_to_rest_along_line() {
        let trajectory = PathTrajectory::generate(&path_input(), diagonal_path()).unwrap();
        assert!(trajectory.duration() > 0.0);

        let mut p = [0.0; 2];
        let mut v = [0.0; 2];
        let mut a = [0.0; 2];
        trajectory.at_time(trajectory.duration(), &mut p, &mut v, &mut a);
        assert!((p[0] - 3.0).abs() < 1e-6);
        assert!((p[1] - 4.0).abs() < 1e-6);
        assert!(v[0].abs() < 1e-6 && v[1].abs() < 1e-6);
    }

    #[test]
    fn test_velocity_stays_on_tangent() {
        let trajectory = PathTrajectory::generate(&path_input(), diagonal_path()).unwrap();
        let mut p = [0.0; 2];
        let mut v = [0.0; 2];
        let mut a = [0.0; 2];
        trajectory.at_time(trajectory.duration() / 2.0, &mut p, &mut v, &mut a);
        // Velocity along the 3-4-5 direction: v_y / v_x = 4 / 3.
        assert!((v[1] * 3.0 - v[0] * 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_inconsistent_boundary_rejected() {
        let mut input = path_input();
        // Velocity orthogonal to the path tangent.
        input.current_velocity = [0.4, -0.3];
        let result = PathTrajectory::generate(&input, diagonal_path());
        assert!(matches!(
            result,
            Err(Error::InvalidInput(InputError::PathBoundaryMismatch))
        ));
    }

    #[test]
    fn test_consistent_boundary_accepted() {
        let mut input = path_input();
        // Velocity along the tangent (0.6, 0.8) scaled by 0.5.
        input.current_velocity = [0.3, 0.4];
        assert!(PathTrajectory::generate(&input, diagonal_path()).is_ok());
    }

    #[test]
    fn test_hold_past_duration() {
        let trajectory = PathTrajectory::generate(&path_input(), diagonal_path()).unwrap();
        let mut p = [0.0; 2];
        let mut v = [0.0; 2];
        let mut a = [0.0; 2];
        trajectory.at_time(trajectory.duration() + 5.0, &mut p, &mut v, &mut a);
        assert!((p[0] - 3.0).abs() < 1e-6);
        assert!((p[1] - 4.0).abs() < 1e-6);
    }
}
