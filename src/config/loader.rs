//! Configuration loading from files (std only).

use std::fs;
use std::path::Path;

use crate::error::{ConfigError, Error, Result};

use super::ControllerConfig;

/// Load and validate a configuration from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed, or validated.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ControllerConfig> {
    let content = fs::read_to_string(path.as_ref()).map_err(|e| {
        let msg = heapless::String::try_from(e.to_string().as_str()).unwrap_or_default();
        Error::Config(ConfigError::IoError(msg))
    })?;

    parse_config(&content)
}

/// Parse and validate a configuration from a TOML string.
pub fn parse_config(content: &str) -> Result<ControllerConfig> {
    let config: ControllerConfig = toml::from_str(content).map_err(|e| {
        let msg = heapless::String::try_from(e.message()).unwrap_or_default();
        Error::Config(ConfigError::ParseError(msg))
    })?;

    super::validation::validate_config(&config)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_validate() {
        let config = parse_config(
            r#"
[axes.pan]
max_velocity = 3.0
max_acceleration = 6.0
max_jerk = 12.0
"#,
        )
        .unwrap();
        assert_eq!(config.axes.len(), 1);
        assert_eq!(config.delta_time, 0.001);
    }

    #[test]
    fn test_parse_error_surfaces() {
        assert!(matches!(
            parse_config("not valid toml ["),
            Err(Error::Config(ConfigError::ParseError(_)))
        ));
    }

    #[test]
    fn test_validation_runs_on_parse() {
        let result = parse_config(
            r#"
[axes.pan]
max_velocity = 3.0
max_acceleration = 6.0
max_jerk = 0.0
"#,
        );
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidMaxJerk(_)))
        ));
    }
}
