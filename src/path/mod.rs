//! Geometric paths through configuration-space waypoints.
//!
//! A [`Path`] strings waypoints together with straight lines and, where a
//! blend distance is given, replaces each interior corner with a quartic
//! blend whose tangents match the adjacent lines. The composite curve is
//! parameterized by arc length and queried through [`Path::q`] and its
//! derivatives; time parameterization happens separately in the trajectory
//! layer.

mod segment;

pub use segment::{LinearSegment, QuarticBlendSegment, Segment};

use heapless::Vec;

use crate::error::PathError;

/// Maximum number of waypoints in a path.
pub const MAX_WAYPOINTS: usize = 32;

/// Maximum number of segments a path can decompose into (every interior
/// waypoint can contribute a line and a blend).
pub const MAX_SEGMENTS: usize = 2 * MAX_WAYPOINTS;

/// How a waypoint's coordinates are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WaypointReference {
    /// Coordinates are absolute positions.
    #[default]
    Absolute,
    /// Coordinates are offsets from the previous waypoint.
    Relative,
}

/// One waypoint of a path.
#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint<const D: usize> {
    /// Interpretation of `vector`.
    pub reference: WaypointReference,
    /// Waypoint coordinates.
    pub vector: [f64; D],
    /// Per-waypoint blend distance, overriding the path-wide value.
    pub max_blend_distance: Option<f64>,
}

impl<const D: usize> Waypoint<D> {
    /// An absolute waypoint.
    pub fn absolute(vector: [f64; D]) -> Self {
        Self {
            reference: WaypointReference::Absolute,
            vector,
            max_blend_distance: None,
        }
    }

    /// A waypoint relative to its predecessor.
    pub fn relative(vector: [f64; D]) -> Self {
        Self {
            reference: WaypointReference::Relative,
            vector,
            max_blend_distance: None,
        }
    }

    /// Override the blend distance at this waypoint's corner.
    pub fn with_blend(mut self, max_blend_distance: f64) -> Self {
        self.max_blend_distance = Some(max_blend_distance);
        self
    }
}

/// A composite curve through waypoints, parameterized by arc length.
#[derive(Debug, Clone, PartialEq)]
pub struct Path<const D: usize> {
    /// Total arc length.
    pub length: f64,
    /// Ordered segments.
    pub segments: Vec<Segment<D>, MAX_SEGMENTS>,
    /// Arc length at the start of each segment; starts at exactly zero and
    /// is strictly increasing.
    pub cumulative_lengths: Vec<f64, MAX_SEGMENTS>,
}

impl<const D: usize> Path<D> {
    /// Number of degrees of freedom of the path.
    pub const DEGREES_OF_FREEDOM: usize = D;

    /// Build a path from `start` through `waypoints`.
    ///
    /// `max_blend_distance` bounds the corner deviation of every blend;
    /// zero disables blending. Waypoints may override it individually.
    pub fn new(
        start: [f64; D],
        waypoints: &[Waypoint<D>],
        max_blend_distance: f64,
    ) -> Result<Self, PathError> {
        if waypoints.is_empty() {
            return Err(PathError::EmptyWaypoints);
        }
        if waypoints.len() > MAX_WAYPOINTS {
            return Err(PathError::TooManyWaypoints);
        }

        let mut lines: Vec<LinearSegment<D>, MAX_WAYPOINTS> = Vec::new();
        let mut previous = start;
        for (index, waypoint) in waypoints.iter().enumerate() {
            let next: [f64; D] = match waypoint.reference {
                WaypointReference::Absolute => waypoint.vector,
                WaypointReference::Relative => {
                    core::array::from_fn(|dof| previous[dof] + waypoint.vector[dof])
                }
            };
            let line = LinearSegment::new(previous, next);
            if !(line.length > 0.0) {
                return Err(PathError::DegenerateSegment { index });
            }
            // Capacity equals the waypoint cap checked above.
            let _ = lines.push(line);
            previous = next;
        }

        let mut path = Path {
            length: 0.0,
            segments: Vec::new(),
            cumulative_lengths: Vec::new(),
        };
        let _ = path.cumulative_lengths.push(0.0);

        let mut cumulative = 0.0;
        let line_count = lines.len();
        for i in 1..line_count {
            let blend_distance = waypoints[i]
                .max_blend_distance
                .unwrap_or(max_blend_distance);
            if blend_distance > 0.0 {
                let left = lines[i - 1].clone();
                let right = lines[i].clone();
                let lm = left.pdq(0.0);
                let rm = right.pdq(0.0);

                let s_abs_max = left.length.min(right.length) / 2.0;
                let blend =
                    QuarticBlendSegment::new(&left.start, &lm, &rm, left.length, blend_distance, s_abs_max);
                let s_abs = blend.length / 2.0;

                let new_left = LinearSegment::new(left.start, left.q(left.length - s_abs));
                let new_right = LinearSegment::new(right.q(s_abs), right.end);

                cumulative += new_left.length;
                let _ = path.segments.push(Segment::Linear(new_left));
                let _ = path.cumulative_lengths.push(cumulative);

                cumulative += blend.length;
                let _ = path.segments.push(Segment::QuarticBlend(blend));
                let _ = path.cumulative_lengths.push(cumulative);

                lines[i] = new_right;
            } else {
                cumulative += lines[i - 1].length;
                let _ = path.segments.push(Segment::Linear(lines[i - 1].clone()));
                let _ = path.cumulative_lengths.push(cumulative);
            }
        }

        let last = lines[line_count - 1].clone();
        cumulative += last.length;
        let _ = path.segments.push(Segment::Linear(last));
        path.length = cumulative;

        Ok(path)
    }

    /// Segment containing arc length `s` and the local offset into it.
    fn find_index(&self, s: f64) -> (usize, f64) {
        let upper = self.cumulative_lengths.partition_point(|&c| c <= s);
        let index = upper.max(1) - 1;
        (index, (s - self.cumulative_lengths[index]).max(0.0))
    }

    /// Position at arc length `s`.
    pub fn q(&self, s: f64) -> [f64; D] {
        let (i, local) = self.find_index(s);
        self.segments[i].q(local)
    }

    /// First derivative of position with respect to arc length.
    pub fn pdq(&self, s: f64) -> [f64; D] {
        let (i, local) = self.find_index(s);
        self.segments[i].pdq(local)
    }

    /// Second derivative of position with respect to arc length.
    pub fn pddq(&self, s: f64) -> [f64; D] {
        let (i, local) = self.find_index(s);
        self.segments[i].pddq(local)
    }

    /// Third derivative of position with respect to arc length.
    pub fn pdddq(&self, s: f64) -> [f64; D] {
        let (i, local) = self.find_index(s);
        self.segments[i].pdddq(local)
    }

    /// Velocity at arc length `s` for path speed `ds`.
    pub fn dq(&self, s: f64, ds: f64) -> [f64; D] {
        let pdq = self.pdq(s);
        core::array::from_fn(|dof| pdq[dof] * ds)
    }

    /// Acceleration at arc length `s` for path speed `ds` and path
    /// acceleration `dds`.
    pub fn ddq(&self, s: f64, ds: f64, dds: f64) -> [f64; D] {
        let (i, local) = self.find_index(s);
        let pdq = self.segments[i].pdq(local);
        let pddq = self.segments[i].pddq(local);
        core::array::from_fn(|dof| pddq[dof] * ds * ds + pdq[dof] * dds)
    }

    /// Jerk at arc length `s` for the path derivatives `ds`, `dds`, `ddds`.
    pub fn dddq(&self, s: f64, ds: f64, dds: f64, ddds: f64) -> [f64; D] {
        let (i, local) = self.find_index(s);
        let pdq = self.segments[i].pdq(local);
        let pddq = self.segments[i].pddq(local);
        let pdddq = self.segments[i].pdddq(local);
        core::array::from_fn(|dof| {
            3.0 * ds * pddq[dof] * dds + ds * ds * ds * pdddq[dof] + pdq[dof] * ddds
        })
    }
}
