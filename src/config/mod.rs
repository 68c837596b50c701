//! Configuration module for otg-motion.
//!
//! Provides types for loading and validating per-axis kinematic limits and
//! controller settings from TOML files (with the `std` feature) or
//! pre-parsed data, and for turning them into [`Input`](crate::Input)
//! records.

mod axis;
mod controller;
#[cfg(feature = "std")]
mod loader;
mod validation;

pub use axis::AxisConfig;
pub use controller::ControllerConfig;
pub use validation::validate_config;

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};
