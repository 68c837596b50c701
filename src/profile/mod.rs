//! Jerk-limited motion profiles.
//!
//! A [`Profile`] is the per-axis building block of every trajectory: seven
//! consecutive constant-jerk arcs, optionally preceded by a two-arc brake
//! ramp that returns an out-of-envelope start state to the feasible region.
//! The solvers in this module compute profiles ([`PositionMinTime`],
//! [`PositionFixedTime`], [`VelocityMinTime`], [`VelocityFixedTime`]), the
//! brake ramps ([`brake`]), and the per-axis feasibility record used for
//! inter-axis synchronization ([`Block`]).

pub mod brake;
mod block;
mod position;
mod ramp;
mod velocity;

pub use block::{synchronize, Block, BlockInterval, SyncOutcome};
pub use position::{PositionFixedTime, PositionMinTime};
pub use velocity::{VelocityFixedTime, VelocityMinTime};

use libm::fabs;

/// Equality tolerance for duration matching during synchronization.
pub(crate) const EPS_SYNC: f64 = 1e-12;

/// Tolerance for limit and boundary checks on computed profiles.
pub(crate) const EPS_LIMITS: f64 = 1e-9;

/// Minimum and maximum position over a profile, with the times at which
/// they occur (relative to the profile start, after any brake ramp).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PositionExtrema {
    /// Minimum position reached.
    pub min: f64,
    /// Maximum position reached.
    pub max: f64,
    /// Time of the minimum.
    pub t_min: f64,
    /// Time of the maximum.
    pub t_max: f64,
}

/// One axis's jerk-limited trajectory: seven constant-jerk arcs plus an
/// optional two-arc brake prefix.
///
/// `t[k]` and `j[k]` are the duration and jerk of arc `k`; `p[k]`, `v[k]`,
/// `a[k]` the state at the start of arc `k`, with index 7 holding the final
/// state. `t_sum[k]` is the cumulative duration through arc `k`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Profile {
    /// Arc durations.
    pub t: [f64; 7],
    /// Cumulative arc durations.
    pub t_sum: [f64; 7],
    /// Constant jerk per arc.
    pub j: [f64; 7],
    /// Position at arc boundaries; `p[7]` is the final position.
    pub p: [f64; 8],
    /// Velocity at arc boundaries; `v[7]` is the final velocity.
    pub v: [f64; 8],
    /// Acceleration at arc boundaries; `a[7]` is the final acceleration.
    pub a: [f64; 8],
    /// Brake arc durations (zero when unused).
    pub t_brakes: [f64; 2],
    /// Brake arc jerks.
    pub j_brakes: [f64; 2],
    /// Position at the start of each brake arc.
    pub p_brakes: [f64; 2],
    /// Velocity at the start of each brake arc.
    pub v_brakes: [f64; 2],
    /// Acceleration at the start of each brake arc.
    pub a_brakes: [f64; 2],
    /// Total brake duration; `None` when no brake is needed.
    pub t_brake: Option<f64>,
}

impl Profile {
    /// Integrate a constant-jerk arc over `dt` from state `(p, v, a)`.
    #[inline]
    pub fn integrate(dt: f64, p: f64, v: f64, a: f64, j: f64) -> (f64, f64, f64) {
        (
            p + dt * (v + dt * (a / 2.0 + dt * j / 6.0)),
            v + dt * (a + dt * j / 2.0),
            a + dt * j,
        )
    }

    /// Fill boundary states and cumulative times from arc durations and
    /// jerks, starting at `(p0, v0, a0)`.
    ///
    /// Durations are clamped at zero; the solvers reject candidates with
    /// meaningfully negative arcs before calling this.
    pub(crate) fn set_arcs(&mut self, t: [f64; 7], j: [f64; 7], p0: f64, v0: f64, a0: f64) {
        self.j = j;
        self.p[0] = p0;
        self.v[0] = v0;
        self.a[0] = a0;
        let mut sum = 0.0;
        for k in 0..7 {
            self.t[k] = t[k].max(0.0);
            sum += self.t[k];
            self.t_sum[k] = sum;
            let (p, v, a) = Self::integrate(self.t[k], self.p[k], self.v[k], self.a[k], self.j[k]);
            self.p[k + 1] = p;
            self.v[k + 1] = v;
            self.a[k + 1] = a;
        }
    }

    /// Total duration of the seven arcs (excluding any brake prefix).
    #[inline]
    pub fn duration(&self) -> f64 {
        self.t_sum[6]
    }

    /// Final position.
    #[inline]
    pub fn pf(&self) -> f64 {
        self.p[7]
    }

    /// Final velocity.
    #[inline]
    pub fn vf(&self) -> f64 {
        self.v[7]
    }

    /// Final acceleration.
    #[inline]
    pub fn af(&self) -> f64 {
        self.a[7]
    }

    /// State at time `time` on the seven arcs.
    ///
    /// `time` must be non-negative and is measured from the start of arc 0
    /// (after any brake prefix). Past the last arc the final state is held
    /// with zero jerk.
    pub fn state_at_time(&self, time: f64) -> (f64, f64, f64) {
        if time >= self.t_sum[6] {
            return Self::integrate(time - self.t_sum[6], self.p[7], self.v[7], self.a[7], 0.0);
        }
        // First arc whose cumulative end time exceeds `time`.
        let k = self.t_sum.partition_point(|&s| s <= time).min(6);
        let local = if k == 0 { time } else { time - self.t_sum[k - 1] };
        Self::integrate(local, self.p[k], self.v[k], self.a[k], self.j[k])
    }

    /// Integrate the brake arcs from `(p0, v0, a0)`, recording per-arc start
    /// states, and return the post-brake state. Sets `t_brake`.
    pub(crate) fn integrate_brake(&mut self, p0: f64, v0: f64, a0: f64) -> (f64, f64, f64) {
        let sum = self.t_brakes[0] + self.t_brakes[1];
        self.t_brake = if sum > 0.0 { Some(sum) } else { None };

        let (mut p, mut v, mut a) = (p0, v0, a0);
        for i in 0..2 {
            if self.t_brakes[i] <= 0.0 {
                break;
            }
            self.p_brakes[i] = p;
            self.v_brakes[i] = v;
            self.a_brakes[i] = a;
            let next = Self::integrate(self.t_brakes[i], p, v, a, self.j_brakes[i]);
            p = next.0;
            v = next.1;
            a = next.2;
        }
        (p, v, a)
    }

    /// Check velocity and acceleration bounds across all seven arcs.
    ///
    /// Acceleration is piecewise linear in time, so its extremes sit on arc
    /// boundaries. Velocity can peak inside an arc where the acceleration
    /// crosses zero.
    pub(crate) fn is_within_limits(&self, v_max: f64, v_min: f64, a_max: f64, a_min: f64) -> bool {
        let a_tol = EPS_LIMITS * (1.0 + fabs(a_max).max(fabs(a_min)));
        let v_tol = EPS_LIMITS * (1.0 + fabs(v_max).max(fabs(v_min)));

        for k in 0..7 {
            if self.a[k] > a_max + a_tol || self.a[k] < a_min - a_tol {
                return false;
            }
            if self.v[k] > v_max + v_tol || self.v[k] < v_min - v_tol {
                return false;
            }
            if let Some(v_ext) = self.interior_velocity_extremum(k) {
                if v_ext > v_max + v_tol || v_ext < v_min - v_tol {
                    return false;
                }
            }
        }
        self.a[7] <= a_max + a_tol
            && self.a[7] >= a_min - a_tol
            && self.v[7] <= v_max + v_tol
            && self.v[7] >= v_min - v_tol
    }

    /// Velocity extremum strictly inside arc `k`, where the acceleration
    /// crosses zero (if it does).
    fn interior_velocity_extremum(&self, k: usize) -> Option<f64> {
        if self.j[k] == 0.0 || self.t[k] <= 0.0 {
            return None;
        }
        let tau = -self.a[k] / self.j[k];
        if tau <= 0.0 || tau >= self.t[k] {
            return None;
        }
        // v at a = 0: v_k - a_k^2 / (2 j_k)
        Some(self.v[k] - self.a[k] * self.a[k] / (2.0 * self.j[k]))
    }

    /// Minimum and maximum position over the seven arcs.
    ///
    /// Candidates are the arc boundaries and the interior points where the
    /// velocity crosses zero, solved per arc from the local quadratic.
    pub fn position_extrema(&self) -> PositionExtrema {
        let mut ext = PositionExtrema {
            min: self.p[0],
            max: self.p[0],
            t_min: 0.0,
            t_max: 0.0,
        };

        let mut consider = |p: f64, t: f64, ext: &mut PositionExtrema| {
            if p < ext.min {
                ext.min = p;
                ext.t_min = t;
            }
            if p > ext.max {
                ext.max = p;
                ext.t_max = t;
            }
        };

        for k in 0..7 {
            let t_start = if k == 0 { 0.0 } else { self.t_sum[k - 1] };
            consider(self.p[k + 1], self.t_sum[k], &mut ext);

            for tau in self.interior_velocity_roots(k) {
                if tau <= 0.0 {
                    continue;
                }
                let (p, _, _) = Self::integrate(tau, self.p[k], self.v[k], self.a[k], self.j[k]);
                consider(p, t_start + tau, &mut ext);
            }
        }
        ext
    }

    /// Roots of v = 0 strictly inside arc `k`, as local offsets.
    fn interior_velocity_roots(&self, k: usize) -> [f64; 2] {
        // Sentinel -1 entries are filtered out by the interior check below.
        let mut roots = [-1.0; 2];
        let (v, a, j, t) = (self.v[k], self.a[k], self.j[k], self.t[k]);
        if t <= 0.0 {
            return roots;
        }
        if j == 0.0 {
            if a != 0.0 {
                roots[0] = -v / a;
            }
        } else {
            let disc = a * a - 2.0 * j * v;
            if disc >= 0.0 {
                let sq = libm::sqrt(disc);
                roots[0] = (-a + sq) / j;
                roots[1] = (-a - sq) / j;
            }
        }
        for r in &mut roots {
            if *r <= 0.0 || *r >= t {
                *r = -1.0;
            }
        }
        let mut out = [-1.0; 2];
        let mut n = 0;
        for r in roots {
            if r > 0.0 {
                out[n] = r;
                n += 1;
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple_profile() -> Profile {
        // Symmetric rest-to-rest move with unit limits: 2 s ramp up to
        // v = 1, 1 s coast, 2 s ramp down, covering three units.
        let mut profile = Profile::default();
        let t = [1.0, 0.0, 1.0, 1.0, 1.0, 0.0, 1.0];
        let j = [1.0, 0.0, -1.0, 0.0, -1.0, 0.0, 1.0];
        profile.set_arcs(t, j, 0.0, 0.0, 0.0);
        profile
    }

    #[test]
    fn test_integrate_identities() {
        let (p, v, a) = Profile::integrate(2.0, 1.0, 0.5, 0.25, 0.125);
        assert!((p - (1.0 + 0.5 * 2.0 + 0.125 * 4.0 + 0.125 * 8.0 / 6.0)).abs() < 1e-12);
        assert!((v - (0.5 + 0.25 * 2.0 + 0.0625 * 4.0)).abs() < 1e-12);
        assert!((a - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_arc_consistency() {
        let profile = simple_profile();
        for k in 0..7 {
            let (p, v, a) = Profile::integrate(
                profile.t[k],
                profile.p[k],
                profile.v[k],
                profile.a[k],
                profile.j[k],
            );
            assert!((p - profile.p[k + 1]).abs() < 1e-9);
            assert!((v - profile.v[k + 1]).abs() < 1e-9);
            assert!((a - profile.a[k + 1]).abs() < 1e-9);
        }
    }

    #[test]
    fn test_rest_to_rest_boundary() {
        let profile = simple_profile();
        assert!((profile.duration() - 5.0).abs() < 1e-12);
        assert!((profile.pf() - 3.0).abs() < 1e-9);
        assert!(profile.vf().abs() < 1e-9);
        assert!(profile.af().abs() < 1e-9);

        // Mid-coast: half a second past the ramp at unit velocity.
        let (p, v, a) = profile.state_at_time(2.5);
        assert!((p - 1.5).abs() < 1e-9);
        assert!((v - 1.0).abs() < 1e-9);
        assert!(a.abs() < 1e-9);
    }

    #[test]
    fn test_hold_past_end() {
        let profile = simple_profile();
        let (p, v, a) = profile.state_at_time(6.0);
        assert!((p - 3.0).abs() < 1e-9);
        assert!(v.abs() < 1e-9);
        assert!(a.abs() < 1e-9);
    }

    #[test]
    fn test_limits_check() {
        let profile = simple_profile();
        assert!(profile.is_within_limits(1.0, -1.0, 1.0, -1.0));
        assert!(!profile.is_within_limits(0.5, -0.5, 1.0, -1.0));
    }

    #[test]
    fn test_position_extrema() {
        let profile = simple_profile();
        let ext = profile.position_extrema();
        assert!((ext.max - 3.0).abs() < 1e-9);
        assert!(ext.min.abs() < 1e-9);
        assert!((ext.t_max - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_brake_integration() {
        let mut profile = Profile::default();
        profile.t_brakes = [0.5, 0.25];
        profile.j_brakes = [-1.0, 0.0];
        let (p, v, a) = profile.integrate_brake(0.0, 2.0, 0.0);
        assert_eq!(profile.t_brake, Some(0.75));
        // After 0.5 s of jerk -1: v = 2 - 0.125, a = -0.5; then 0.25 s hold.
        assert!((a - (-0.5)).abs() < 1e-12);
        assert!((v - (2.0 - 0.125 - 0.5 * 0.25)).abs() < 1e-12);
        assert!(p > 0.0);
    }
}
