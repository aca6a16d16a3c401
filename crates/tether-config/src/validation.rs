//! Configuration validation.

use crate::schema::TetherConfig;
use tether_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &TetherConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_range(
        &mut errors,
        "view.initial_width",
        config.view.initial_width,
        1,
        16384,
    );
    validate_range(
        &mut errors,
        "view.initial_height",
        config.view.initial_height,
        1,
        16384,
    );

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_range(errors: &mut Vec<String>, name: &str, value: u32, min: u32, max: u32) {
    if value < min || value > max {
        errors.push(format!("{name} must be between {min} and {max}, got {value}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(validate(&TetherConfig::default()).is_ok());
    }

    #[test]
    fn zero_view_size_rejected() {
        let mut config = TetherConfig::default();
        config.view.initial_width = 0;
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("view.initial_width"));
    }

    #[test]
    fn oversized_view_rejected() {
        let mut config = TetherConfig::default();
        config.view.initial_height = 1 << 20;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn all_errors_collected() {
        let mut config = TetherConfig::default();
        config.view.initial_width = 0;
        config.view.initial_height = 0;
        let err = validate(&config).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("initial_width"));
        assert!(msg.contains("initial_height"));
    }
}
