use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer point in device/content pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Pixel format of a caller-provided render target, derived from its bit
/// depth. Depths outside the supported set have no format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceFormat {
    Rgba8,
    Rgbx8,
    Rgb565,
}

impl SurfaceFormat {
    pub fn from_depth(depth: u32) -> Option<Self> {
        match depth {
            32 => Some(Self::Rgba8),
            24 => Some(Self::Rgbx8),
            16 => Some(Self::Rgb565),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_display() {
        assert_eq!(Point::new(3, -4).to_string(), "(3,-4)");
    }

    #[test]
    fn size_empty() {
        assert!(Size::new(0.0, 100.0).is_empty());
        assert!(Size::new(100.0, -1.0).is_empty());
        assert!(!Size::new(1.0, 1.0).is_empty());
    }

    #[test]
    fn rect_serialization() {
        let r = Rect::new(1.0, 2.0, 30.0, 40.0);
        let json = serde_json::to_string(&r).unwrap();
        let deserialized: Rect = serde_json::from_str(&json).unwrap();
        assert_eq!(r, deserialized);
    }

    #[test]
    fn color_from_rgba() {
        let c = Color::from_rgba(255, 136, 0, 255);
        assert_eq!(c.r, 255);
        assert_eq!(c.g, 136);
        assert_eq!(c.a, 255);
    }

    #[test]
    fn surface_format_from_depth() {
        assert_eq!(SurfaceFormat::from_depth(32), Some(SurfaceFormat::Rgba8));
        assert_eq!(SurfaceFormat::from_depth(24), Some(SurfaceFormat::Rgbx8));
        assert_eq!(SurfaceFormat::from_depth(16), Some(SurfaceFormat::Rgb565));
        assert_eq!(SurfaceFormat::from_depth(8), None);
        assert_eq!(SurfaceFormat::from_depth(0), None);
    }
}
