//! Error types for the otg-motion library.
//!
//! All failures surface as values out of [`Otg::update`](crate::Otg::update);
//! the library never panics on malformed input. Every error maps onto a
//! stable integer code so existing supervisory tooling can keep matching on
//! the numeric result of the control cycle.

use core::fmt;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Outcome of a successful control cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    /// A trajectory is active and the output holds the next setpoint.
    Working,
    /// The end of the trajectory has been reached.
    Finished,
}

impl Status {
    /// Stable integer code of this status.
    #[inline]
    pub const fn code(self) -> i32 {
        match self {
            Status::Working => 0,
            Status::Finished => 1,
        }
    }
}

/// Unified error type for all otg-motion operations.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// Input record failed validation
    InvalidInput(InputError),
    /// No feasible minimum-time profile exists for an axis
    ExecutionTimeCalculation {
        /// Index of the failing axis
        dof: usize,
    },
    /// No common duration satisfies all axes, or the fixed-time re-solve failed
    SynchronizationCalculation {
        /// Index of the failing axis, if the failure is axis-specific
        dof: Option<usize>,
    },
    /// The synchronized duration exceeds the configured ceiling
    TrajectoryDuration {
        /// Computed duration in seconds
        duration: f64,
    },
}

impl Error {
    /// Stable integer code of this error.
    ///
    /// `-1` generic, `-100` invalid input, `-101` duration ceiling,
    /// `-110` execution-time calculation, `-111` synchronization.
    pub const fn code(&self) -> i32 {
        match self {
            Error::Config(_) => -1,
            Error::InvalidInput(_) => -100,
            Error::TrajectoryDuration { .. } => -101,
            Error::ExecutionTimeCalculation { .. } => -110,
            Error::SynchronizationCalculation { .. } => -111,
        }
    }
}

/// Input validation errors.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputError {
    /// A field contains a NaN or infinite value
    NonFinite {
        /// Name of the offending input field
        field: &'static str,
        /// Axis index of the offending entry
        dof: usize,
    },
    /// Jerk limit must be strictly positive
    InvalidJerkLimit {
        /// Axis index of the offending entry
        dof: usize,
    },
    /// Velocity or acceleration limit is negative on the max side
    NegativeLimit {
        /// Name of the offending input field
        field: &'static str,
        /// Axis index of the offending entry
        dof: usize,
    },
    /// A min limit is positive (the feasible envelope must contain zero)
    PositiveMinLimit {
        /// Name of the offending input field
        field: &'static str,
        /// Axis index of the offending entry
        dof: usize,
    },
    /// Minimum duration must be finite and non-negative
    InvalidMinimumDuration,
    /// Path construction failed
    Path(PathError),
    /// Path boundary state is inconsistent across axes
    PathBoundaryMismatch,
}

/// Path construction errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PathError {
    /// Waypoint list is empty
    EmptyWaypoints,
    /// Too many waypoints (max 32)
    TooManyWaypoints,
    /// Two consecutive waypoints coincide
    DegenerateSegment {
        /// Index of the zero-length segment
        index: usize,
    },
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Axis name not found in configuration
    AxisNotFound(heapless::String<32>),
    /// Configuration declares a different number of axes than the controller
    AxisCountMismatch {
        /// Axes declared in the configuration
        configured: usize,
        /// Axes expected by the controller
        expected: usize,
    },
    /// Invalid max velocity (must be >= 0)
    InvalidMaxVelocity(f64),
    /// Invalid max acceleration (must be >= 0)
    InvalidMaxAcceleration(f64),
    /// Invalid max jerk (must be > 0)
    InvalidMaxJerk(f64),
    /// Invalid min limit (must be <= 0)
    InvalidMinLimit(f64),
    /// Invalid control cycle duration (must be > 0)
    InvalidDeltaTime(f64),
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::InvalidInput(e) => write!(f, "Invalid input: {}", e),
            Error::ExecutionTimeCalculation { dof } => {
                write!(f, "No feasible profile for axis {}", dof)
            }
            Error::SynchronizationCalculation { dof: Some(dof) } => {
                write!(f, "Time synchronization failed for axis {}", dof)
            }
            Error::SynchronizationCalculation { dof: None } => {
                write!(f, "No common duration satisfies all axes")
            }
            Error::TrajectoryDuration { duration } => {
                write!(f, "Trajectory duration {} s exceeds ceiling", duration)
            }
        }
    }
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::NonFinite { field, dof } => {
                write!(f, "{}[{}] is not finite", field, dof)
            }
            InputError::InvalidJerkLimit { dof } => {
                write!(f, "max_jerk[{}] must be > 0", dof)
            }
            InputError::NegativeLimit { field, dof } => {
                write!(f, "{}[{}] must be >= 0", field, dof)
            }
            InputError::PositiveMinLimit { field, dof } => {
                write!(f, "{}[{}] must be <= 0", field, dof)
            }
            InputError::InvalidMinimumDuration => {
                write!(f, "minimum_duration must be finite and >= 0")
            }
            InputError::Path(e) => write!(f, "{}", e),
            InputError::PathBoundaryMismatch => {
                write!(f, "path boundary state is inconsistent across axes")
            }
        }
    }
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathError::EmptyWaypoints => write!(f, "Waypoint list is empty"),
            PathError::TooManyWaypoints => write!(f, "Too many waypoints (max 32)"),
            PathError::DegenerateSegment { index } => {
                write!(f, "Zero-length segment at waypoint {}", index)
            }
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::AxisNotFound(name) => write!(f, "Axis '{}' not found", name),
            ConfigError::AxisCountMismatch { configured, expected } => {
                write!(f, "Configured {} axes, controller expects {}", configured, expected)
            }
            ConfigError::InvalidMaxVelocity(v) => {
                write!(f, "Invalid max velocity: {}. Must be >= 0", v)
            }
            ConfigError::InvalidMaxAcceleration(v) => {
                write!(f, "Invalid max acceleration: {}. Must be >= 0", v)
            }
            ConfigError::InvalidMaxJerk(v) => write!(f, "Invalid max jerk: {}. Must be > 0", v),
            ConfigError::InvalidMinLimit(v) => write!(f, "Invalid min limit: {}. Must be <= 0", v),
            ConfigError::InvalidDeltaTime(v) => {
                write!(f, "Invalid control cycle duration: {}. Must be > 0", v)
            }
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<InputError> for Error {
    fn from(e: InputError) -> Self {
        Error::InvalidInput(e)
    }
}

impl From<PathError> for Error {
    fn from(e: PathError) -> Self {
        Error::InvalidInput(InputError::Path(e))
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for InputError {}

#[cfg(feature = "std")]
impl std::error::Error for PathError {}
