use serde::{Deserialize, Serialize};

use crate::types::Point;

/// Keyboard modifier bits. Matches the DOM modifier mask the page engine
/// consumes.
pub mod modifiers {
    pub const SHIFT: u32 = 1 << 0;
    pub const CONTROL: u32 = 1 << 1;
    pub const ALT: u32 = 1 << 2;
    pub const META: u32 = 1 << 3;
}

/// DOM virtual key codes the protocol special-cases.
pub mod key_codes {
    pub const DOM_VK_SHIFT: i32 = 16;
    pub const DOM_VK_CONTROL: i32 = 17;
    pub const DOM_VK_ALT: i32 = 18;
    pub const DOM_VK_META: i32 = 224;
}

/// Outcome of dispatching an event into the page engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventStatus {
    /// Nothing consumed the event.
    Ignore,
    /// Consumed, default action still wanted.
    ConsumeDoDefault,
    /// Fully consumed, default action suppressed.
    ConsumeNoDefault,
}

impl EventStatus {
    pub fn is_consumed(self) -> bool {
        !matches!(self, Self::Ignore)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TouchPhase {
    Start,
    Move,
    End,
    Cancel,
}

impl TouchPhase {
    /// Whether this phase terminates the gesture.
    pub fn ends_gesture(self) -> bool {
        matches!(self, Self::End | Self::Cancel)
    }
}

/// One finger within a touch batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    pub id: i32,
    pub point: Point,
    pub radius_x: f32,
    pub radius_y: f32,
    pub rotation_angle: f32,
    pub force: f32,
}

impl TouchPoint {
    /// A nominal single-finger contact, used when synthesizing touch from
    /// mouse input.
    pub fn nominal(id: i32, point: Point) -> Self {
        Self {
            id,
            point,
            radius_x: 1.0,
            radius_y: 1.0,
            rotation_angle: 180.0,
            force: 1.0,
        }
    }
}

/// A coherent set of touch points delivered in one step of a gesture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouchBatch {
    pub phase: TouchPhase,
    pub time_ms: u64,
    pub modifiers: u32,
    pub points: Vec<TouchPoint>,
}

impl TouchBatch {
    pub fn single(phase: TouchPhase, time_ms: u64, modifiers: u32, point: Point) -> Self {
        Self {
            phase,
            time_ms,
            modifiers,
            points: vec![TouchPoint::nominal(0, point)],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MouseButton {
    Left = 0,
    Middle = 1,
    Right = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MouseEventKind {
    MouseDown,
    MouseUp,
    MouseMove,
    ContextMenu,
}

impl MouseEventKind {
    /// DOM event name the page engine expects.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MouseDown => "mousedown",
            Self::MouseUp => "mouseup",
            Self::MouseMove => "mousemove",
            Self::ContextMenu => "contextmenu",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PinchPhase {
    Start,
    Update,
    End,
}

/// Raw input fed to the host side's input routing. Touch batches may be
/// forwarded to the content side; pinch input is only ever interpreted by
/// the pan-zoom engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    Touch(TouchBatch),
    Pinch {
        phase: PinchPhase,
        focus: Point,
        scale: f32,
    },
}

/// One key press or release as injected by the embedder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyInput {
    pub dom_key_code: i32,
    pub modifiers: u32,
    pub char_code: i32,
}

impl KeyInput {
    /// Modifier keys never produce a keypress event, only keydown/keyup.
    pub fn is_modifier_key(&self) -> bool {
        matches!(
            self.dom_key_code,
            key_codes::DOM_VK_SHIFT
                | key_codes::DOM_VK_CONTROL
                | key_codes::DOM_VK_ALT
                | key_codes::DOM_VK_META
        )
    }
}

/// IME enablement snapshot pushed from the content side when input focus
/// moves. Cached host-side to gate text-event injection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImeStatus {
    pub enabled: bool,
    pub open: bool,
    pub cause: i32,
    pub focus_change: i32,
    pub input_type: String,
    pub input_mode: String,
}
