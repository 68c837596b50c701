//! Per-axis feasibility blocks and inter-axis time synchronization.
//!
//! A [`Block`] records the minimum achievable duration of one axis together
//! with up to two intervals of durations the axis cannot realize (some
//! targets are reachable quickly or after a detour, but not in between).
//! [`synchronize`] picks the common duration all axes can realize.

use libm::{ceil, fabs};

use super::{Profile, EPS_SYNC};

/// A span of unreachable durations, bounded by two realizable profiles.
///
/// Durations strictly inside `(left, right)` cannot be realized; the stored
/// profile realizes `right` exactly and is reused verbatim when the
/// synchronized duration lands there.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockInterval {
    /// Last realizable duration before the gap.
    pub left: f64,
    /// First realizable duration after the gap.
    pub right: f64,
    /// Profile realizing `right`.
    pub profile: Profile,
}

/// Feasibility summary of one axis after the minimum-time solve.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    /// Minimum achievable duration.
    pub t_min: f64,
    /// Profile realizing `t_min`.
    pub p_min: Profile,
    /// First gap of unreachable durations, if any.
    pub a: Option<BlockInterval>,
    /// Second gap of unreachable durations, if any.
    pub b: Option<BlockInterval>,
}

impl Block {
    /// Build a block from its minimum-time profile.
    pub fn new(p_min: Profile) -> Self {
        Self {
            t_min: p_min.duration(),
            p_min,
            a: None,
            b: None,
        }
    }

    /// Whether duration `t` cannot be realized by this axis.
    pub fn is_blocked(&self, t: f64) -> bool {
        if t < self.t_min - EPS_SYNC {
            return true;
        }
        self.blocking_right(t).is_some()
    }

    /// The right edge of the gap containing `t`, if `t` falls strictly
    /// inside one.
    pub(crate) fn blocking_right(&self, t: f64) -> Option<f64> {
        for interval in [&self.a, &self.b].into_iter().flatten() {
            if t > interval.left + EPS_SYNC && t < interval.right - EPS_SYNC {
                return Some(interval.right);
            }
        }
        None
    }
}

/// Result of inter-axis synchronization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyncOutcome {
    /// Common duration all enabled axes can realize.
    pub duration: f64,
    /// Axis whose minimum duration equals the common duration, if any
    /// (lowest index wins on ties). `None` when the duration was forced by
    /// `minimum_duration` or a gap edge.
    pub limiting_dof: Option<usize>,
}

/// Choose the common trajectory duration across all enabled axes.
///
/// Starts from the largest per-axis minimum (bounded below by
/// `minimum_duration`), rounds up to the control cycle when `discrete`, and
/// walks past any per-axis gap until every axis can realize the candidate.
/// Returns `None` when the gap-closing walk fails to settle within its
/// iteration bound.
pub fn synchronize<const D: usize>(
    blocks: &[Block; D],
    enabled: &[bool; D],
    minimum_duration: Option<f64>,
    discrete: bool,
    delta_time: f64,
) -> Option<SyncOutcome> {
    let mut t_sync = minimum_duration.unwrap_or(0.0).max(0.0);
    for dof in 0..D {
        if enabled[dof] {
            t_sync = t_sync.max(blocks[dof].t_min);
        }
    }
    if discrete {
        t_sync = round_up_to_cycle(t_sync, delta_time);
    }

    // Each pass either settles or strictly advances past a gap edge; with
    // at most two gaps per axis the walk is bounded.
    let max_iterations = 3 * D + 2;
    let mut iterations = 0;
    loop {
        let mut bumped = false;
        for dof in 0..D {
            if !enabled[dof] {
                continue;
            }
            if let Some(right) = blocks[dof].blocking_right(t_sync) {
                if right > t_sync {
                    t_sync = right;
                    bumped = true;
                }
            }
        }
        if !bumped {
            break;
        }
        if discrete {
            t_sync = round_up_to_cycle(t_sync, delta_time);
        }
        iterations += 1;
        if iterations > max_iterations {
            return None;
        }
    }

    if !t_sync.is_finite() {
        return None;
    }

    let limiting_dof =
        (0..D).find(|&dof| enabled[dof] && fabs(blocks[dof].t_min - t_sync) < EPS_SYNC);
    Some(SyncOutcome {
        duration: t_sync,
        limiting_dof,
    })
}

/// Smallest multiple of `delta_time` not less than `t` (modulo a relative
/// guard so exact multiples stay put).
fn round_up_to_cycle(t: f64, delta_time: f64) -> f64 {
    if delta_time <= 0.0 {
        return t;
    }
    ceil(t / delta_time - EPS_SYNC / delta_time) * delta_time
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block_with_duration(t_min: f64) -> Block {
        let mut profile = Profile::default();
        profile.set_arcs(
            [t_min, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            [0.0; 7],
            0.0,
            0.0,
            0.0,
        );
        Block::new(profile)
    }

    #[test]
    fn test_sync_takes_slowest_axis() {
        let blocks = [block_with_duration(2.0), block_with_duration(3.5)];
        let outcome = synchronize(&blocks, &[true, true], None, false, 0.001).unwrap();
        assert!((outcome.duration - 3.5).abs() < 1e-12);
        assert_eq!(outcome.limiting_dof, Some(1));
    }

    #[test]
    fn test_sync_minimum_duration_floor() {
        let blocks = [block_with_duration(1.0)];
        let outcome = synchronize(&blocks, &[true], Some(4.0), false, 0.001).unwrap();
        assert!((outcome.duration - 4.0).abs() < 1e-12);
        assert_eq!(outcome.limiting_dof, None);
    }

    #[test]
    fn test_sync_discrete_rounding() {
        let blocks = [block_with_duration(3.1748)];
        let outcome = synchronize(&blocks, &[true], None, true, 0.01).unwrap();
        assert!((outcome.duration - 3.18).abs() < 1e-9);
    }

    #[test]
    fn test_sync_discrete_exact_multiple_stays() {
        let blocks = [block_with_duration(3.0)];
        let outcome = synchronize(&blocks, &[true], None, true, 0.01).unwrap();
        assert!((outcome.duration - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_sync_skips_blocked_gap() {
        let mut slow = block_with_duration(1.0);
        let mut gap_profile = Profile::default();
        gap_profile.set_arcs([2.5, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0], [0.0; 7], 0.0, 0.0, 0.0);
        slow.a = Some(BlockInterval {
            left: 1.0,
            right: 2.5,
            profile: gap_profile,
        });
        // The other axis wants 2.0, which falls inside the gap.
        let blocks = [slow, block_with_duration(2.0)];
        let outcome = synchronize(&blocks, &[true, true], None, false, 0.001).unwrap();
        assert!((outcome.duration - 2.5).abs() < 1e-12);
        assert_eq!(outcome.limiting_dof, None);
    }

    #[test]
    fn test_sync_ignores_disabled_axes() {
        let blocks = [block_with_duration(10.0), block_with_duration(1.0)];
        let outcome = synchronize(&blocks, &[false, true], None, false, 0.001).unwrap();
        assert!((outcome.duration - 1.0).abs() < 1e-12);
        assert_eq!(outcome.limiting_dof, Some(1));
    }

    #[test]
    fn test_blocked_query() {
        let mut block = block_with_duration(1.0);
        block.a = Some(BlockInterval {
            left: 1.0,
            right: 2.0,
            profile: Profile::default(),
        });
        assert!(block.is_blocked(0.5));
        assert!(block.is_blocked(1.5));
        assert!(!block.is_blocked(1.0));
        assert!(!block.is_blocked(2.0));
        assert!(!block.is_blocked(3.0));
    }
}
