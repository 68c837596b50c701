//! Brake pre-trajectories.
//!
//! When the current state already violates a limit (or would violate the
//! velocity limit as soon as the acceleration rings down), the planner
//! prepends up to two constant-jerk arcs that drive the state back into the
//! feasible envelope before the profile solvers run. The arcs are computed
//! in closed form from the quadratic time-to-limit roots; unused arcs keep
//! zero duration.

use libm::sqrt;

use super::Profile;

/// Brake arcs for the position interface.
///
/// Triggers on an acceleration outside `[a_min, a_max]`, a velocity outside
/// `[v_min, v_max]`, or a velocity that will leave the band while the
/// acceleration rings down to zero.
pub fn position_brake(
    v0: f64,
    a0: f64,
    v_max: f64,
    v_min: f64,
    a_max: f64,
    a_min: f64,
    j_max: f64,
) -> ([f64; 2], [f64; 2]) {
    let mut t_brakes = [0.0; 2];
    let mut j_brakes = [0.0; 2];

    if a0 > a_max {
        j_brakes[0] = -j_max;
        // Peak velocity if the acceleration rings straight down to zero.
        let v_at_zero = v0 + a0 * a0 / (2.0 * j_max);
        if v_at_zero > v_max {
            // The velocity must come down too: ramp the acceleration through
            // the band toward the decel bound, then ride it out.
            let t_to_v = upper_velocity_crossing(v0, a0, v_max, j_max).unwrap_or(f64::INFINITY);
            t_brakes[0] = t_to_v.min((a0 - a_min) / j_max);

            let (_, v1, a1) = Profile::integrate(t_brakes[0], 0.0, v0, a0, j_brakes[0]);
            if v1 > v_max && a1 < 0.0 {
                t_brakes[1] = (v1 - v_max) / -a1;
            }
        } else {
            t_brakes[0] = (a0 - a_max) / j_max;
            // The velocity may sit below the band while the acceleration is
            // capped; ride the cap until it recovers.
            let (_, v1, a1) = Profile::integrate(t_brakes[0], 0.0, v0, a0, j_brakes[0]);
            if v1 < v_min && a1 > 0.0 {
                t_brakes[1] = (v_min - v1) / a1;
            }
        }
    } else if a0 < a_min {
        j_brakes[0] = j_max;
        let v_at_zero = v0 - a0 * a0 / (2.0 * j_max);
        if v_at_zero < v_min {
            let t_to_v = lower_velocity_crossing(v0, a0, v_min, j_max).unwrap_or(f64::INFINITY);
            t_brakes[0] = t_to_v.min((a_max - a0) / j_max);

            let (_, v1, a1) = Profile::integrate(t_brakes[0], 0.0, v0, a0, j_brakes[0]);
            if v1 < v_min && a1 > 0.0 {
                t_brakes[1] = (v_min - v1) / a1;
            }
        } else {
            t_brakes[0] = (a_min - a0) / j_max;
            let (_, v1, a1) = Profile::integrate(t_brakes[0], 0.0, v0, a0, j_brakes[0]);
            if v1 > v_max && a1 < 0.0 {
                t_brakes[1] = (v1 - v_max) / -a1;
            }
        }
    } else {
        // Acceleration is inside the band; check the velocity side,
        // including the overshoot that a positive acceleration still
        // guarantees while it rings down.
        let v_reach_up = if a0 > 0.0 { v0 + a0 * a0 / (2.0 * j_max) } else { v0 };
        let v_reach_dn = if a0 < 0.0 { v0 - a0 * a0 / (2.0 * j_max) } else { v0 };

        if v0 > v_max || v_reach_up > v_max {
            j_brakes[0] = -j_max;
            let t_to_v = upper_velocity_crossing(v0, a0, v_max, j_max).unwrap_or(f64::INFINITY);
            t_brakes[0] = t_to_v.min((a0 - a_min) / j_max);

            let (_, v1, a1) = Profile::integrate(t_brakes[0], 0.0, v0, a0, j_brakes[0]);
            if v1 > v_max && a1 < 0.0 {
                // Acceleration bound was hit first; hold it until the
                // velocity re-enters the band.
                t_brakes[1] = (v1 - v_max) / -a1;
            }
        } else if v0 < v_min || v_reach_dn < v_min {
            j_brakes[0] = j_max;
            let t_to_v = lower_velocity_crossing(v0, a0, v_min, j_max).unwrap_or(f64::INFINITY);
            t_brakes[0] = t_to_v.min((a_max - a0) / j_max);

            let (_, v1, a1) = Profile::integrate(t_brakes[0], 0.0, v0, a0, j_brakes[0]);
            if v1 < v_min && a1 > 0.0 {
                t_brakes[1] = (v_min - v1) / a1;
            }
        }
    }

    for t in &mut t_brakes {
        if !t.is_finite() || *t < 0.0 {
            *t = 0.0;
        }
    }
    (t_brakes, j_brakes)
}

/// Brake arcs for the velocity interface: only acceleration bounds matter,
/// so a single jerk arc returns the acceleration to the nearer bound.
pub fn velocity_brake(a0: f64, a_max: f64, a_min: f64, j_max: f64) -> ([f64; 2], [f64; 2]) {
    let mut t_brakes = [0.0; 2];
    let mut j_brakes = [0.0; 2];

    if a0 > a_max {
        j_brakes[0] = -j_max;
        t_brakes[0] = (a0 - a_max) / j_max;
    } else if a0 < a_min {
        j_brakes[0] = j_max;
        t_brakes[0] = (a_min - a0) / j_max;
    }
    (t_brakes, j_brakes)
}

/// Time until `v(t) = v_bound` while applying jerk `-j`, taking the crossing
/// where the velocity is falling (the later root).
fn upper_velocity_crossing(v0: f64, a0: f64, v_bound: f64, j: f64) -> Option<f64> {
    // v(t) = v0 + a0 t - j t^2 / 2
    let disc = a0 * a0 + 2.0 * j * (v0 - v_bound);
    if disc < 0.0 {
        return None;
    }
    let t = (a0 + sqrt(disc)) / j;
    (t >= 0.0).then_some(t)
}

/// Mirror of [`upper_velocity_crossing`] for the lower bound with jerk `+j`.
fn lower_velocity_crossing(v0: f64, a0: f64, v_bound: f64, j: f64) -> Option<f64> {
    // v(t) = v0 + a0 t + j t^2 / 2
    let disc = a0 * a0 - 2.0 * j * (v0 - v_bound);
    if disc < 0.0 {
        return None;
    }
    let t = (-a0 + sqrt(disc)) / j;
    (t >= 0.0).then_some(t)
}
