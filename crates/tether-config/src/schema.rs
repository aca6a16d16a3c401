//! Configuration schema types.
//!
//! All structs use `serde(default)` so partial configs work correctly.

use serde::{Deserialize, Serialize};

/// Top-level configuration handed to both sides of a view at construction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TetherConfig {
    pub view: ViewConfig,
    pub pan_zoom: PanZoomConfig,
    pub input: InputConfig,
}

/// Initial geometry for newly created views, before the embedder sets an
/// explicit size.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub initial_width: u32,
    pub initial_height: u32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            initial_width: 480,
            initial_height: 800,
        }
    }
}

/// Default-behavior and event-posting toggles for pan-zoom gesture
/// notifications.
///
/// `handle_default_*` decides whether the content side performs the built-in
/// reaction (viewport update, synthesized click, context menu, scroll
/// apply). `post_*_as_event` decides whether the gesture is additionally
/// posted toward the host as a gated async message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PanZoomConfig {
    pub handle_default_viewport: bool,
    pub handle_default_single_tap: bool,
    pub handle_default_double_tap: bool,
    pub handle_default_long_tap: bool,
    pub handle_default_scroll: bool,
    pub post_viewport_as_event: bool,
    pub post_single_tap_as_event: bool,
    pub post_double_tap_as_event: bool,
    pub post_long_tap_as_event: bool,
    pub post_scroll_as_event: bool,
}

impl Default for PanZoomConfig {
    fn default() -> Self {
        Self {
            handle_default_viewport: true,
            handle_default_single_tap: true,
            handle_default_double_tap: true,
            handle_default_long_tap: true,
            handle_default_scroll: true,
            post_viewport_as_event: false,
            post_single_tap_as_event: false,
            post_double_tap_as_event: false,
            post_long_tap_as_event: false,
            post_scroll_as_event: false,
        }
    }
}

/// Input-synthesis toggles for the content side.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Synthesize mouse events from unconsumed touch input.
    pub dispatch_mouse_events: bool,
    /// Allow keyword lookup for non-URL location input.
    pub allow_keyword_url: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            dispatch_mouse_events: false,
            allow_keyword_url: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_handle_everything_post_nothing() {
        let pz = PanZoomConfig::default();
        assert!(pz.handle_default_viewport);
        assert!(pz.handle_default_single_tap);
        assert!(pz.handle_default_double_tap);
        assert!(pz.handle_default_long_tap);
        assert!(pz.handle_default_scroll);
        assert!(!pz.post_viewport_as_event);
        assert!(!pz.post_single_tap_as_event);
        assert!(!pz.post_double_tap_as_event);
        assert!(!pz.post_long_tap_as_event);
        assert!(!pz.post_scroll_as_event);
    }

    #[test]
    fn input_defaults_conservative() {
        let input = InputConfig::default();
        assert!(!input.dispatch_mouse_events);
        assert!(!input.allow_keyword_url);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: TetherConfig = toml::from_str(
            r#"
            [pan_zoom]
            post_single_tap_as_event = true
            "#,
        )
        .unwrap();
        assert!(config.pan_zoom.post_single_tap_as_event);
        assert!(config.pan_zoom.handle_default_single_tap);
        assert_eq!(config.view.initial_width, 480);
    }

    #[test]
    fn empty_toml_is_default() {
        let config: TetherConfig = toml::from_str("").unwrap();
        assert!(!config.input.dispatch_mouse_events);
        assert_eq!(config.view.initial_height, 800);
    }
}
