use serde::{Deserialize, Serialize};

use crate::types::Size;

/// Identifies one scrollable frame for zoom/scroll operations.
///
/// `layers_id` is the compositor's root layer tree id and is unknown (zero)
/// until a compositor has attached to the view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScrollableLayerGuid {
    pub layers_id: u64,
    pub pres_shell_id: u32,
    pub scroll_id: u64,
}

impl ScrollableLayerGuid {
    pub fn new(layers_id: u64, pres_shell_id: u32, scroll_id: u64) -> Self {
        Self {
            layers_id,
            pres_shell_id,
            scroll_id,
        }
    }
}

/// Zoom policy for one scrollable frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomConstraints {
    pub allow_zoom: bool,
    pub allow_double_tap_zoom: bool,
    pub min_scale: f32,
    pub max_scale: f32,
}

impl Default for ZoomConstraints {
    fn default() -> Self {
        Self {
            allow_zoom: true,
            allow_double_tap_zoom: true,
            min_scale: 0.25,
            max_scale: 4.0,
        }
    }
}

/// Opaque snapshot of a scrollable frame's paint state, forwarded upward.
/// The protocol only ever extracts the identifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameMetrics {
    pub scroll_offset_x: f32,
    pub scroll_offset_y: f32,
    pub resolution: f32,
    pub content_size: Size,
    pub pres_shell_id: u32,
    pub scroll_id: u64,
    pub is_root: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guid_equality_and_hash() {
        use std::collections::HashSet;
        let a = ScrollableLayerGuid::new(1, 2, 3);
        let b = ScrollableLayerGuid::new(1, 2, 3);
        assert_eq!(a, b);
        let mut set = HashSet::new();
        set.insert(a);
        set.insert(b);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn guid_default_has_no_layer_tree() {
        let g = ScrollableLayerGuid::default();
        assert_eq!(g.layers_id, 0);
    }

    #[test]
    fn zoom_constraints_defaults() {
        let z = ZoomConstraints::default();
        assert!(z.allow_zoom);
        assert!(z.min_scale < z.max_scale);
    }

    #[test]
    fn frame_metrics_serialization() {
        let m = FrameMetrics {
            scroll_offset_x: 10.0,
            scroll_offset_y: 20.0,
            resolution: 1.5,
            content_size: Size::new(980.0, 4000.0),
            pres_shell_id: 2,
            scroll_id: 7,
            is_root: true,
        };
        let json = serde_json::to_string(&m).unwrap();
        let deserialized: FrameMetrics = serde_json::from_str(&json).unwrap();
        assert_eq!(m, deserialized);
    }
}
