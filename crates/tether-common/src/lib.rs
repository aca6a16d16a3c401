pub mod errors;
pub mod id;
pub mod input;
pub mod metrics;
pub mod types;

pub use errors::{ConfigError, ViewError};
pub use id::{new_correlation_id, InputBlockId, ViewId};
pub use input::{
    EventStatus, ImeStatus, InputEvent, KeyInput, MouseButton, MouseEventKind, PinchPhase,
    TouchBatch, TouchPhase, TouchPoint,
};
pub use metrics::{FrameMetrics, ScrollableLayerGuid, ZoomConstraints};
pub use types::{Color, Point, Rect, Size, SurfaceFormat};

pub type Result<T> = std::result::Result<T, ViewError>;
