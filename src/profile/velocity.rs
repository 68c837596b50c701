//! Velocity-interface profile solvers.
//!
//! The velocity interface targets a (velocity, acceleration) pair and
//! leaves the position unconstrained, so a single acceleration ramp solves
//! the minimum-time problem. The fixed-time variant lowers the peak
//! acceleration below its optimum and holds it, which closes the prescribed
//! duration in closed form as a quadratic in the peak.

use libm::{fabs, sqrt};

use super::block::Block;
use super::ramp::Ramp;
use super::Profile;

/// Minimum-time solver for the velocity interface.
#[derive(Debug, Clone, Copy)]
pub struct VelocityMinTime {
    p0: f64,
    v0: f64,
    a0: f64,
    vf: f64,
    af: f64,
    a_max: f64,
    a_min: f64,
    j_max: f64,
}

impl VelocityMinTime {
    /// Configure a solve toward target velocity `vf` and acceleration `af`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        p0: f64,
        v0: f64,
        a0: f64,
        vf: f64,
        af: f64,
        a_max: f64,
        a_min: f64,
        j_max: f64,
    ) -> Self {
        Self {
            p0,
            v0,
            a0,
            vf,
            af,
            a_max,
            a_min,
            j_max,
        }
    }

    /// Solve for the minimum-time profile and its feasibility block.
    pub fn solve(&self) -> Option<Block> {
        let ramp = Ramp::between(
            self.v0, self.a0, self.vf, self.af, self.j_max, self.a_max, self.a_min,
        )?;
        let t = [ramp.t[0], ramp.t[1], ramp.t[2], 0.0, 0.0, 0.0, 0.0];
        let j = [ramp.j[0], ramp.j[1], ramp.j[2], 0.0, 0.0, 0.0, 0.0];

        let mut profile = Profile::default();
        profile.set_arcs(t, j, self.p0, self.v0, self.a0);

        if fabs(profile.vf() - self.vf) > 1e-8 * (1.0 + fabs(self.vf))
            || fabs(profile.af() - self.af) > 1e-8 * (1.0 + fabs(self.af))
        {
            return None;
        }
        // Only the acceleration band constrains this interface.
        if !profile.is_within_limits(f64::INFINITY, f64::NEG_INFINITY, self.a_max, self.a_min) {
            return None;
        }
        Some(Block::new(profile))
    }
}

/// Fixed-time solver for the velocity interface.
#[derive(Debug, Clone, Copy)]
pub struct VelocityFixedTime {
    tf: f64,
    p0: f64,
    v0: f64,
    a0: f64,
    vf: f64,
    af: f64,
    a_max: f64,
    a_min: f64,
    j_max: f64,
}

impl VelocityFixedTime {
    /// Configure a solve that must take exactly `tf` seconds.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tf: f64,
        p0: f64,
        v0: f64,
        a0: f64,
        vf: f64,
        af: f64,
        a_max: f64,
        a_min: f64,
        j_max: f64,
    ) -> Self {
        Self {
            tf,
            p0,
            v0,
            a0,
            vf,
            af,
            a_max,
            a_min,
            j_max,
        }
    }

    /// Solve for a profile of duration exactly `tf`.
    pub fn solve(&self) -> Option<Profile> {
        let j = self.j_max;
        let dv = self.vf - self.v0;

        // Peak-above shape: jerk up to the peak, hold, jerk down.
        // Duration and velocity change close a quadratic in the peak:
        // 2 a^2 - 2 (j tf + a0 + af) a + (a0^2 + af^2 + 2 j dv) = 0.
        let b_up = j * self.tf + self.a0 + self.af;
        let c_up = self.a0 * self.a0 + self.af * self.af + 2.0 * j * dv;
        let disc_up = b_up * b_up - 2.0 * c_up;
        if disc_up >= 0.0 {
            let sq = sqrt(disc_up);
            // The smaller root keeps the peak closest to the endpoints.
            for a_pk in [(b_up - sq) / 2.0, (b_up + sq) / 2.0] {
                if let Some(profile) = self.assemble_up(a_pk) {
                    return Some(profile);
                }
            }
        }

        // Peak-below shape (mirror).
        let b_dn = j * self.tf - self.a0 - self.af;
        let c_dn = self.a0 * self.a0 + self.af * self.af - 2.0 * j * dv;
        let disc_dn = b_dn * b_dn - 2.0 * c_dn;
        if disc_dn >= 0.0 {
            let sq = sqrt(disc_dn);
            for a_pk in [(-b_dn + sq) / 2.0, (-b_dn - sq) / 2.0] {
                if let Some(profile) = self.assemble_down(a_pk) {
                    return Some(profile);
                }
            }
        }

        None
    }

    fn assemble_up(&self, a_pk: f64) -> Option<Profile> {
        let j = self.j_max;
        if a_pk > self.a_max + 1e-12 || a_pk + 1e-12 < self.a0.max(self.af) {
            return None;
        }
        let t0 = (a_pk - self.a0) / j;
        let t2 = (a_pk - self.af) / j;
        let t1 = self.tf - t0 - t2;
        self.assemble(t0, t1, t2, j)
    }

    fn assemble_down(&self, a_pk: f64) -> Option<Profile> {
        let j = self.j_max;
        if a_pk < self.a_min - 1e-12 || a_pk - 1e-12 > self.a0.min(self.af) {
            return None;
        }
        let t0 = (self.a0 - a_pk) / j;
        let t2 = (self.af - a_pk) / j;
        let t1 = self.tf - t0 - t2;
        self.assemble(t0, t1, t2, -j)
    }

    fn assemble(&self, t0: f64, t1: f64, t2: f64, j_in: f64) -> Option<Profile> {
        if t0 < -1e-9 || t1 < -1e-9 || t2 < -1e-9 {
            return None;
        }
        let t = [t0.max(0.0), t1.max(0.0), t2.max(0.0), 0.0, 0.0, 0.0, 0.0];
        let j = [j_in, 0.0, -j_in, 0.0, 0.0, 0.0, 0.0];

        let mut profile = Profile::default();
        profile.set_arcs(t, j, self.p0, self.v0, self.a0);

        if fabs(profile.vf() - self.vf) > 1e-8 * (1.0 + fabs(self.vf))
            || fabs(profile.af() - self.af) > 1e-8 * (1.0 + fabs(self.af))
            || fabs(profile.duration() - self.tf) > 1e-8 * (1.0 + self.tf)
        {
            return None;
        }
        if !profile.is_within_limits(f64::INFINITY, f64::NEG_INFINITY, self.a_max, self.a_min) {
            return None;
        }
        Some(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_velocity_reach_and_hold() {
        // 0 -> 2 with a <= 1, j = 1: ramp 1 s, hold 1 s, ramp 1 s.
        let block = VelocityMinTime::new(0.0, 0.0, 0.0, 2.0, 0.0, 1.0, -1.0, 1.0)
            .solve()
            .unwrap();
        assert!((block.t_min - 3.0).abs() < 1e-9);
        assert!((block.p_min.vf() - 2.0).abs() < 1e-9);
        assert!(block.p_min.af().abs() < 1e-9);
        assert!(block.a.is_none() && block.b.is_none());
    }

    #[test]
    fn test_velocity_deceleration() {
        let block = VelocityMinTime::new(0.0, 1.5, 0.0, -0.5, 0.0, 1.0, -1.0, 1.0)
            .solve()
            .unwrap();
        assert!((block.p_min.vf() + 0.5).abs() < 1e-9);
        // Position drifts freely; only the profile shape matters.
        assert!(block.p_min.pf() > 0.0);
    }

    #[test]
    fn test_velocity_fixed_time_stretch() {
        let block = VelocityMinTime::new(0.0, 0.0, 0.0, 2.0, 0.0, 1.0, -1.0, 1.0)
            .solve()
            .unwrap();
        let tf = block.t_min + 1.0;
        let profile = VelocityFixedTime::new(tf, 0.0, 0.0, 0.0, 2.0, 0.0, 1.0, -1.0, 1.0)
            .solve()
            .unwrap();
        assert!((profile.duration() - tf).abs() < 1e-8);
        assert!((profile.vf() - 2.0).abs() < 1e-8);
        // The stretched profile must use a lower peak acceleration.
        let peak = profile.a.iter().cloned().fold(f64::MIN, f64::max);
        assert!(peak < 1.0 - 1e-6);
    }

    #[test]
    fn test_velocity_fixed_time_below_minimum_fails() {
        let solver = VelocityFixedTime::new(1.0, 0.0, 0.0, 0.0, 2.0, 0.0, 1.0, -1.0, 1.0);
        assert!(solver.solve().is_none());
    }
}
