//! Host-process collaborator boundaries: the rendering/compositor engine and
//! the async pan-zoom engine. Both are external; the protocol only drives
//! them through these traits.

use std::sync::Arc;

use tether_common::{
    EventStatus, FrameMetrics, InputBlockId, InputEvent, Point, Rect, ScrollableLayerGuid, Size,
    SurfaceFormat, ViewError, ZoomConstraints,
};

/// Handle to a platform-native image produced by the compositor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformImage {
    pub handle: u64,
    pub width: u32,
    pub height: u32,
}

/// Rendering/compositor engine for one view's render surface. Synchronous
/// local calls, valid once attached.
pub trait Compositor: Send {
    fn root_layer_tree_id(&self) -> u64;
    fn set_surface_size(&mut self, size: Size);
    fn render_to_buffer(
        &mut self,
        buf: &mut [u8],
        width: u32,
        height: u32,
        stride: u32,
        format: SurfaceFormat,
    ) -> Result<(), ViewError>;
    fn suspend(&mut self);
    fn resume(&mut self);
    fn platform_image(&self) -> Option<PlatformImage>;
}

/// The local async pan-zoom engine. May run on a dedicated thread; all
/// methods must be callable from the host loop and the compositor thread.
pub trait PanZoom: Send + Sync {
    /// Install the per-view event sink for a layer tree. Called at
    /// compositor attach.
    fn install_event_sink(&self, layers_id: u64, sink: Arc<dyn PanZoomEventSink>);
    /// Interpret one raw input event; returns the consumption status and
    /// the hit scrollable frame.
    fn receive_input_event(&self, event: &InputEvent) -> (EventStatus, ScrollableLayerGuid);
    /// Resolve a device-space point into content space via the hit test.
    fn transform_to_content(&self, point: Point) -> Point;
    /// Deliver a touch block's consume/ignore decision so queued gesture
    /// processing can unblock.
    fn content_received_input_block(
        &self,
        guid: ScrollableLayerGuid,
        block_id: InputBlockId,
        prevent_default: bool,
    );
    fn update_zoom_constraints(&self, guid: ScrollableLayerGuid, constraints: ZoomConstraints);
    fn zoom_to_rect(&self, guid: ScrollableLayerGuid, rect: Rect);
}

/// Callbacks the pan-zoom engine delivers for one view. Implemented by the
/// content controller; may be invoked from the pan-zoom thread.
pub trait PanZoomEventSink: Send + Sync {
    fn request_content_repaint(&self, metrics: FrameMetrics);
    fn handle_single_tap(&self, point: Point, guid: ScrollableLayerGuid, block_id: InputBlockId);
    fn handle_double_tap(&self, point: Point, guid: ScrollableLayerGuid, block_id: InputBlockId);
    fn handle_long_tap(&self, point: Point, guid: ScrollableLayerGuid, block_id: InputBlockId);
    /// The visible subframe/content relation changed under async scrolling.
    fn notify_async_scroll(&self, content_rect: Rect, scrollable_size: Size);
    /// An async scroll offset update was composited and wants a content ack.
    fn acknowledge_scroll_update(&self, scroll_id: u64, generation: u32);
}
