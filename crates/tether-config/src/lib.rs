//! Tether configuration.
//!
//! The protocol carries no global flags: everything that used to be a
//! process-wide preference is an explicit struct handed to the content
//! controller and the child-side view actor at construction. TOML-based,
//! with serde defaults so partial configs work out of the box.

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{InputConfig, PanZoomConfig, TetherConfig, ViewConfig};

use tether_common::ConfigError;

/// Load config from the platform default path, falling back to defaults if
/// no file exists.
pub fn load_config() -> Result<TetherConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}
