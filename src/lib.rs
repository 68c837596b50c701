//! # otg-motion
//!
//! Online jerk-limited trajectory generation for multi-axis motion control.
//!
//! Given the instantaneous state (position, velocity, acceleration) of `D`
//! independent axes, a target state, and per-axis limits on velocity,
//! acceleration and jerk, the generator produces a time-optimal,
//! time-synchronized trajectory that can be sampled at any instant. It is
//! built for cyclic invocation inside a real-time control loop.
//!
//! ## Features
//!
//! - **Seven-arc profiles**: per-axis constant-jerk profiles with an
//!   automatic brake ramp when the start state violates the limits
//! - **Time synchronization**: all enabled axes share a common duration,
//!   optionally snapped to the control cycle
//! - **Geometric paths**: piecewise-linear waypoint paths with quartic
//!   corner blends, time-parameterized by a scalar profile (experimental)
//! - **Configuration-driven**: axis limits and cycle timing from TOML files
//! - **no_std compatible**: the planning core works without the standard
//!   library
//!
//! ## Quick start
//!
//! ```rust
//! use otg_motion::{Input, Otg, Output, Status};
//!
//! let mut otg = Otg::<1>::new(0.001)?;
//! let mut input = Input::new();
//! input.max_velocity = [1.0];
//! input.max_acceleration = [1.0];
//! input.max_jerk = [1.0];
//! input.target_position = [1.0];
//!
//! let mut output = Output::new();
//! while otg.update(&input, &mut output)? == Status::Working {
//!     // command output.new_position / new_velocity / new_acceleration
//!     output.pass_to_input(&mut input);
//! }
//! # Ok::<(), otg_motion::Error>(())
//! ```
//!
//! ## Feature flags
//!
//! - `std` (default): TOML file loading and calculation timing
//! - `defmt`: defmt formatting of status and error types for embedded
//!   targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

// Core modules
pub mod config;
pub mod error;
pub mod input;
pub mod otg;
pub mod output;
pub mod path;
pub mod profile;
pub mod trajectory;

// Re-exports for ergonomic API
pub use config::{validate_config, AxisConfig, ControllerConfig};
pub use error::{Error, Result, Status};
pub use input::{ControlInterface, DurationDiscretization, Input, Synchronization};
pub use otg::{Otg, MAX_TRAJECTORY_DURATION};
pub use output::Output;
pub use path::{Path, Segment, Waypoint, WaypointReference};
pub use profile::{PositionExtrema, Profile};
pub use trajectory::{PathTrajectory, Trajectory, TrajectoryType, WaypointTrajectory};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_config};
