//! TOML config file loading.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::schema::TetherConfig;
use crate::validation;
use tether_common::ConfigError;

/// Load config from a specific TOML file path.
///
/// Missing fields fall back to serde defaults. A config that parses but
/// fails validation is replaced by the defaults with a warning rather than
/// aborting the embedder.
pub fn load_from_path(path: &Path) -> Result<TetherConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ParseError(format!("failed to read {}: {e}", path.display())))?;

    let config: TetherConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    if let Err(e) = validation::validate(&config) {
        warn!("config validation warning: {e}");
        warn!("falling back to default config");
        return Ok(TetherConfig::default());
    }

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Load config from the platform-specific default path. A missing file is
/// not an error; defaults are returned.
pub fn load_default() -> Result<TetherConfig, ConfigError> {
    let path = default_config_path()?;
    if !path.exists() {
        return Ok(TetherConfig::default());
    }
    load_from_path(&path)
}

/// Platform-specific default config file path
/// (e.g. `~/.config/tether/config.toml` on Linux).
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::ParseError("could not determine config directory".into()))?;
    Ok(config_dir.join("tether").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(dir: &tempfile::TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn missing_file_is_an_error() {
        let result = load_from_path(Path::new("/nonexistent/tether.toml"));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn loads_partial_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            r#"
            [input]
            dispatch_mouse_events = true
            "#,
        );
        let config = load_from_path(&path).unwrap();
        assert!(config.input.dispatch_mouse_events);
        assert!(config.pan_zoom.handle_default_long_tap);
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "[input\ndispatch_mouse_events = yes");
        let result = load_from_path(&path);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn invalid_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            r#"
            [view]
            initial_width = 0
            "#,
        );
        let config = load_from_path(&path).unwrap();
        assert_eq!(config.view.initial_width, 480);
    }
}
