//! Position-interface profile solvers.
//!
//! Both solvers build the seven-arc profile as two acceleration ramps
//! joined at a junction velocity, with an optional constant-velocity coast
//! between them. The minimum-time solver enumerates coast candidates at the
//! velocity bounds plus the bracketed roots of the junction-velocity
//! displacement equation; the fixed-time solver re-solves the same equation
//! with the prescribed duration closing the coast arc.

use libm::fabs;

use super::block::{Block, BlockInterval};
use super::ramp::Ramp;
use super::{Profile, EPS_SYNC};

/// Grid resolution of the junction-velocity root scan.
const SCAN_INTERVALS: usize = 64;

/// Bisection refinement depth; converges to machine precision well before.
const BISECT_ITERATIONS: usize = 80;

/// Upper bound on simultaneously feasible profile candidates.
const MAX_CANDIDATES: usize = 6;

/// Boundary-state acceptance tolerance for assembled candidates.
fn boundary_tol(scale: f64) -> f64 {
    1e-8 * (1.0 + fabs(scale))
}

/// Feasible candidates ordered by total duration.
struct CandidateSet {
    profiles: [Profile; MAX_CANDIDATES],
    count: usize,
}

impl CandidateSet {
    fn new() -> Self {
        Self {
            profiles: core::array::from_fn(|_| Profile::default()),
            count: 0,
        }
    }

    fn push(&mut self, profile: Profile) {
        let duration = profile.duration();
        // Near-equal durations are the same solution reached twice.
        for existing in &self.profiles[..self.count] {
            if fabs(existing.duration() - duration) < 1e-9 * (1.0 + duration) {
                return;
            }
        }
        if self.count == MAX_CANDIDATES {
            return;
        }
        let mut idx = self.count;
        while idx > 0 && self.profiles[idx - 1].duration() > duration {
            self.profiles[idx] = self.profiles[idx - 1].clone();
            idx -= 1;
        }
        self.profiles[idx] = profile;
        self.count += 1;
    }
}

/// Shared state of the two position solvers.
#[derive(Debug, Clone, Copy)]
struct Bounds {
    p0: f64,
    v0: f64,
    a0: f64,
    pf: f64,
    vf: f64,
    af: f64,
    v_max: f64,
    v_min: f64,
    a_max: f64,
    a_min: f64,
    j_max: f64,
}

impl Bounds {
    /// Displacement to cover.
    #[inline]
    fn pd(&self) -> f64 {
        self.pf - self.p0
    }

    /// The two acceleration ramps joined at junction velocity `vp`.
    fn phases(&self, vp: f64) -> Option<(Ramp, Ramp)> {
        let r1 = Ramp::between(self.v0, self.a0, vp, 0.0, self.j_max, self.a_max, self.a_min)?;
        let r2 = Ramp::between(vp, 0.0, self.vf, self.af, self.j_max, self.a_max, self.a_min)?;
        Some((r1, r2))
    }

    /// Displacement of the coast-free profile through junction `vp`.
    fn displacement(&self, vp: f64) -> Option<f64> {
        let (r1, r2) = self.phases(vp)?;
        Some(r1.distance(self.v0, self.a0) + r2.distance(vp, 0.0))
    }

    /// Assemble and validate a full profile: ramp, coast of `coast` seconds
    /// at `vp`, ramp.
    fn assemble(&self, vp: f64, coast: f64) -> Option<Profile> {
        if coast < -1e-9 {
            return None;
        }
        let (r1, r2) = self.phases(vp)?;
        let t = [
            r1.t[0], r1.t[1], r1.t[2], coast.max(0.0), r2.t[0], r2.t[1], r2.t[2],
        ];
        let j = [r1.j[0], r1.j[1], r1.j[2], 0.0, r2.j[0], r2.j[1], r2.j[2]];

        let mut profile = Profile::default();
        profile.set_arcs(t, j, self.p0, self.v0, self.a0);

        if fabs(profile.pf() - self.pf) > boundary_tol(self.pf)
            || fabs(profile.vf() - self.vf) > boundary_tol(self.vf)
            || fabs(profile.af() - self.af) > boundary_tol(self.af)
        {
            return None;
        }
        if !profile.is_within_limits(self.v_max, self.v_min, self.a_max, self.a_min) {
            return None;
        }
        Some(profile)
    }

    /// Bisect `displacement(vp) = pd` on a bracketing interval.
    fn bisect_root(&self, mut lo: f64, mut hi: f64, g_lo: f64) -> Option<f64> {
        let pd = self.pd();
        for _ in 0..BISECT_ITERATIONS {
            let mid = 0.5 * (lo + hi);
            let g_mid = self.displacement(mid)? - pd;
            if g_mid == 0.0 {
                return Some(mid);
            }
            if (g_mid > 0.0) == (g_lo > 0.0) {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        Some(0.5 * (lo + hi))
    }
}

/// Minimum-time solver for the position interface.
///
/// Produces the time-optimal profile from the start state to the target and
/// the per-axis feasibility [`Block`] consumed by the synchronizer.
#[derive(Debug, Clone, Copy)]
pub struct PositionMinTime {
    bounds: Bounds,
}

impl PositionMinTime {
    /// Configure a solve from start state to target under the given limits.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        p0: f64,
        v0: f64,
        a0: f64,
        pf: f64,
        vf: f64,
        af: f64,
        v_max: f64,
        v_min: f64,
        a_max: f64,
        a_min: f64,
        j_max: f64,
    ) -> Self {
        Self {
            bounds: Bounds {
                p0,
                v0,
                a0,
                pf,
                vf,
                af,
                v_max,
                v_min,
                a_max,
                a_min,
                j_max,
            },
        }
    }

    /// Solve for the minimum-time profile and its feasibility block.
    ///
    /// Returns `None` when no candidate reaches the target within the
    /// limits.
    pub fn solve(&self) -> Option<Block> {
        let b = &self.bounds;
        let pd = b.pd();
        let mut candidates = CandidateSet::new();

        // Already at the target: the empty profile is optimal.
        if fabs(pd) < EPS_SYNC * (1.0 + fabs(b.pf))
            && fabs(b.v0 - b.vf) < EPS_SYNC
            && fabs(b.a0 - b.af) < EPS_SYNC
        {
            if let Some(profile) = b.assemble(b.v0, 0.0) {
                candidates.push(profile);
            }
        }

        // Coast at the upper velocity bound.
        if b.v_max > 0.0 {
            if let Some(d) = b.displacement(b.v_max) {
                let coast = (pd - d) / b.v_max;
                if coast >= 0.0 {
                    if let Some(profile) = b.assemble(b.v_max, coast) {
                        candidates.push(profile);
                    }
                }
            }
        }

        // Coast at the lower velocity bound (retreating moves).
        if b.v_min < 0.0 {
            if let Some(d) = b.displacement(b.v_min) {
                let coast = (pd - d) / b.v_min;
                if coast >= 0.0 {
                    if let Some(profile) = b.assemble(b.v_min, coast) {
                        candidates.push(profile);
                    }
                }
            }
        }

        // Coast-free profiles: bracketed roots of the displacement equation
        // over the junction-velocity range.
        let span = b.v_max - b.v_min;
        if span > 0.0 {
            let step = span / SCAN_INTERVALS as f64;
            let mut prev: Option<f64> = None;
            for i in 0..=SCAN_INTERVALS {
                let vp = b.v_min + step * i as f64;
                let g = b.displacement(vp).map(|d| d - pd);
                if let (Some(g_prev), Some(g_here)) = (prev, g) {
                    if g_prev == 0.0 {
                        if let Some(profile) = b.assemble(vp - step, 0.0) {
                            candidates.push(profile);
                        }
                    } else if g_prev * g_here < 0.0 {
                        if let Some(root) = b.bisect_root(vp - step, vp, g_prev) {
                            if let Some(profile) = b.assemble(root, 0.0) {
                                candidates.push(profile);
                            }
                        }
                    }
                }
                prev = g;
            }
            // Trailing grid point may itself be a root; the bound coasts
            // above already cover it with zero coast time.
        }

        if candidates.count == 0 {
            return None;
        }

        let mut block = Block::new(candidates.profiles[0].clone());
        match candidates.count {
            1 => {}
            2 => {
                // Two isolated solutions: conservatively treat the span
                // between them as unreachable.
                block.a = Some(BlockInterval {
                    left: candidates.profiles[0].duration(),
                    right: candidates.profiles[1].duration(),
                    profile: candidates.profiles[1].clone(),
                });
            }
            _ => {
                block.a = Some(BlockInterval {
                    left: candidates.profiles[1].duration(),
                    right: candidates.profiles[2].duration(),
                    profile: candidates.profiles[2].clone(),
                });
                if candidates.count >= 5 {
                    block.b = Some(BlockInterval {
                        left: candidates.profiles[3].duration(),
                        right: candidates.profiles[4].duration(),
                        profile: candidates.profiles[4].clone(),
                    });
                } else if candidates.count == 4 {
                    block.b = Some(BlockInterval {
                        left: candidates.profiles[3].duration(),
                        right: candidates.profiles[3].duration(),
                        profile: candidates.profiles[3].clone(),
                    });
                }
            }
        }
        Some(block)
    }
}

/// Fixed-time solver for the position interface.
///
/// Recomputes a profile that reaches the target in exactly the prescribed
/// duration, used to stretch non-limiting axes onto the synchronized time.
#[derive(Debug, Clone, Copy)]
pub struct PositionFixedTime {
    tf: f64,
    bounds: Bounds,
}

impl PositionFixedTime {
    /// Configure a solve that must take exactly `tf` seconds.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tf: f64,
        p0: f64,
        v0: f64,
        a0: f64,
        pf: f64,
        vf: f64,
        af: f64,
        v_max: f64,
        v_min: f64,
        a_max: f64,
        a_min: f64,
        j_max: f64,
    ) -> Self {
        Self {
            tf,
            bounds: Bounds {
                p0,
                v0,
                a0,
                pf,
                vf,
                af,
                v_max,
                v_min,
                a_max,
                a_min,
                j_max,
            },
        }
    }

    /// Residual of the fixed-time displacement equation at junction `vc`,
    /// with the coast arc absorbing the remaining duration.
    fn residual(&self, vc: f64) -> Option<f64> {
        let b = &self.bounds;
        let (r1, r2) = b.phases(vc)?;
        let coast = self.tf - r1.duration() - r2.duration();
        if coast < -1e-9 {
            return None;
        }
        let d = r1.distance(b.v0, b.a0) + vc * coast.max(0.0) + r2.distance(vc, 0.0);
        Some(d - b.pd())
    }

    fn bisect(&self, mut lo: f64, mut hi: f64, g_lo: f64) -> Option<f64> {
        for _ in 0..BISECT_ITERATIONS {
            let mid = 0.5 * (lo + hi);
            let g_mid = self.residual(mid)?;
            if g_mid == 0.0 {
                return Some(mid);
            }
            if (g_mid > 0.0) == (g_lo > 0.0) {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        Some(0.5 * (lo + hi))
    }

    /// Solve for a profile of duration exactly `tf`.
    pub fn solve(&self) -> Option<Profile> {
        let b = self.bounds;
        let span = b.v_max - b.v_min;
        if !(span > 0.0) || !(self.tf > 0.0) {
            return None;
        }

        let mut best: Option<(f64, Profile)> = None;
        let direction = if b.pd() >= 0.0 { 1.0 } else { -1.0 };

        let step = span / SCAN_INTERVALS as f64;
        let mut prev: Option<f64> = None;
        for i in 0..=SCAN_INTERVALS {
            let vc = b.v_min + step * i as f64;
            let g = self.residual(vc);
            if let (Some(g_prev), Some(g_here)) = (prev, g) {
                let root = if g_prev == 0.0 {
                    Some(vc - step)
                } else if g_prev * g_here < 0.0 {
                    self.bisect(vc - step, vc, g_prev)
                } else {
                    None
                };
                if let Some(vc_root) = root {
                    if let Some(profile) = self.assemble_at(vc_root) {
                        // Prefer the junction aligned with the displacement
                        // direction: the least-detour stretch.
                        let score = vc_root * direction;
                        if best.as_ref().map_or(true, |(s, _)| score > *s) {
                            best = Some((score, profile));
                        }
                    }
                }
            }
            prev = g;
        }

        best.map(|(_, profile)| profile)
    }

    fn assemble_at(&self, vc: f64) -> Option<Profile> {
        let b = &self.bounds;
        let (r1, r2) = b.phases(vc)?;
        let coast = self.tf - r1.duration() - r2.duration();
        let profile = b.assemble(vc, coast)?;
        if fabs(profile.duration() - self.tf) > 1e-7 * (1.0 + self.tf) {
            return None;
        }
        Some(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_solver(p0: f64, v0: f64, a0: f64, pf: f64, vf: f64, af: f64) -> PositionMinTime {
        PositionMinTime::new(p0, v0, a0, pf, vf, af, 1.0, -1.0, 1.0, -1.0, 1.0)
    }

    #[test]
    fn test_rest_to_rest_unit_move() {
        // The unit move with unit limits never reaches the velocity bound;
        // the optimum is the symmetric jerk profile of duration 4 * 2^(-1/3).
        let block = unit_solver(0.0, 0.0, 0.0, 1.0, 0.0, 0.0).solve().unwrap();
        let expected = 4.0 * libm::cbrt(0.5);
        assert!(
            (block.t_min - expected).abs() < 1e-6,
            "t_min = {}",
            block.t_min
        );
        assert!((block.p_min.pf() - 1.0).abs() < 1e-8);
        assert!(block.p_min.vf().abs() < 1e-8);

        // Symmetric profile: half the distance at half the time.
        let (p_mid, _, a_mid) = block.p_min.state_at_time(block.t_min / 2.0);
        assert!((p_mid - 0.5).abs() < 1e-6);
        assert!(a_mid.abs() < 1e-6);
    }

    #[test]
    fn test_short_move_no_coast() {
        let block = unit_solver(0.0, 0.0, 0.0, 0.1, 0.0, 0.0).solve().unwrap();
        // Too short to reach the velocity bound: strictly between the
        // jerk-bound floor and the unit-move duration.
        assert!(block.t_min > 0.5 && block.t_min < 3.2);
        assert!((block.p_min.pf() - 0.1).abs() < 1e-8);
        // No coast arc.
        assert!(block.p_min.t[3] < 1e-9);
    }

    #[test]
    fn test_negative_move_mirrors() {
        let fwd = unit_solver(0.0, 0.0, 0.0, 1.0, 0.0, 0.0).solve().unwrap();
        let bwd = unit_solver(0.0, 0.0, 0.0, -1.0, 0.0, 0.0).solve().unwrap();
        assert!((fwd.t_min - bwd.t_min).abs() < 1e-6);
        assert!((bwd.p_min.pf() + 1.0).abs() < 1e-8);
    }

    #[test]
    fn test_nonzero_target_velocity() {
        let block = unit_solver(0.0, 0.0, 0.0, 2.0, 0.5, 0.0).solve().unwrap();
        assert!((block.p_min.pf() - 2.0).abs() < 1e-8);
        assert!((block.p_min.vf() - 0.5).abs() < 1e-8);
        assert!(block.p_min.is_within_limits(1.0, -1.0, 1.0, -1.0));
    }

    #[test]
    fn test_moving_start_state() {
        let block = unit_solver(0.0, 0.8, 0.2, 3.0, 0.0, 0.0).solve().unwrap();
        assert!((block.p_min.pf() - 3.0).abs() < 1e-8);
        assert!(block.p_min.vf().abs() < 1e-8);
        assert!(block.p_min.af().abs() < 1e-8);
    }

    #[test]
    fn test_already_at_target() {
        let block = unit_solver(1.0, 0.0, 0.0, 1.0, 0.0, 0.0).solve().unwrap();
        assert!(block.t_min < 1e-9);
    }

    #[test]
    fn test_infeasible_returns_none() {
        // Positive displacement with a forbidden positive velocity.
        let solver = PositionMinTime::new(0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, -1.0, 1.0, -1.0, 1.0);
        assert!(solver.solve().is_none());
    }

    #[test]
    fn test_fixed_time_stretch() {
        // The 3 s unit move stretched to 5 s must still land exactly.
        let solver = PositionFixedTime::new(
            5.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, -1.0, 1.0, -1.0, 1.0,
        );
        let profile = solver.solve().unwrap();
        assert!((profile.duration() - 5.0).abs() < 1e-6);
        assert!((profile.pf() - 1.0).abs() < 1e-7);
        assert!(profile.vf().abs() < 1e-7);
        assert!(profile.is_within_limits(1.0, -1.0, 1.0, -1.0));
    }

    #[test]
    fn test_fixed_time_matches_min_time() {
        let block = unit_solver(0.0, 0.0, 0.0, 1.0, 0.0, 0.0).solve().unwrap();
        let solver = PositionFixedTime::new(
            block.t_min + 0.25,
            0.0,
            0.0,
            0.0,
            1.0,
            0.0,
            0.0,
            1.0,
            -1.0,
            1.0,
            -1.0,
            1.0,
        );
        let profile = solver.solve().unwrap();
        assert!((profile.duration() - (block.t_min + 0.25)).abs() < 1e-6);
        assert!((profile.pf() - 1.0).abs() < 1e-7);
    }

    #[test]
    fn test_fixed_time_below_minimum_fails() {
        let solver = PositionFixedTime::new(
            1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, -1.0, 1.0, -1.0, 1.0,
        );
        assert!(solver.solve().is_none());
    }
}
