//! The page/layout engine boundary.
//!
//! The engine is an external collaborator: it owns navigation, DOM and
//! focus. The view actor drives it through synchronous local calls and
//! receives upcalls back through a [`PageEventSender`] handed over at window
//! construction.

use tokio::sync::mpsc;

use crate::ime::ImeEvent;
use tether_common::{
    Color, EventStatus, FrameMetrics, ImeStatus, KeyInput, MouseButton, MouseEventKind, Point,
    Rect, Size, TouchBatch, ViewError, ViewId, ZoomConstraints,
};

/// Flags carried into a navigation/reload request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadFlags {
    /// Allow keyword lookup for input that does not parse as a URL.
    pub allow_keyword_lookup: bool,
    /// Hard reload: bypass the cache.
    pub bypass_cache: bool,
    /// Hard reload: bypass the proxy.
    pub bypass_proxy: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEventKind {
    KeyDown,
    KeyPress,
    KeyUp,
}

/// Synchronous interface to the page/layout engine, consumed by the
/// content-side view actor once its window has been constructed.
pub trait PageEngine: Send {
    fn navigate(&mut self, url: &str, flags: LoadFlags);
    fn go_back(&mut self);
    fn go_forward(&mut self);
    fn stop_load(&mut self);
    fn reload(&mut self, flags: LoadFlags);

    /// Raise/lower the window and toggle engine activity.
    fn set_active(&mut self, active: bool);
    /// Window focus activation. Distinct from [`PageEngine::clear_focus`].
    fn window_activated(&mut self);
    fn window_deactivated(&mut self);
    /// Drop input focus entirely.
    fn clear_focus(&mut self);

    fn resize(&mut self, size: Size);

    fn dispatch_touch(&mut self, batch: &TouchBatch) -> EventStatus;
    fn dispatch_mouse(
        &mut self,
        kind: MouseEventKind,
        point: Point,
        button: MouseButton,
        click_count: i32,
        modifiers: u32,
    ) -> EventStatus;
    fn dispatch_key(&mut self, kind: KeyEventKind, key: KeyInput);
    fn dispatch_composition(&mut self, event: &ImeEvent);

    /// Deliver a script message sent by the host-side embedder.
    fn receive_message(&mut self, name: &str, data: &str);

    fn acknowledge_scroll_update(&mut self, scroll_id: u64, generation: u32);
    fn apply_frame_metrics(&mut self, metrics: &FrameMetrics);

    fn suspend_timeouts(&mut self);
    fn resume_timeouts(&mut self);

    fn background_color(&self) -> Color;
    fn outer_window_id(&self) -> u64;
}

/// Builds the page/window instance for one view. Invoked from the posted
/// init task, never inline at actor construction.
pub trait PageEngineFactory: Send {
    fn build(
        &mut self,
        view: ViewId,
        size: Size,
        private: bool,
        events: PageEventSender,
    ) -> Result<Box<dyn PageEngine>, ViewError>;
}

/// Upcalls from the page engine, delivered to the content loop and forwarded
/// over the channel by the view actor.
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    LocationChanged {
        url: String,
        can_go_back: bool,
        can_go_forward: bool,
    },
    LoadStarted { url: String },
    LoadFinished,
    LoadRedirect,
    LoadProgress {
        progress: i32,
        cur_total: i32,
        max_total: i32,
    },
    SecurityChanged { status: String, state: u32 },
    FirstPaint { x: i32, y: i32 },
    ScrolledAreaChanged { width: u32, height: u32 },
    ScrollChanged { x: i32, y: i32 },
    TitleChanged { title: String },
    WindowCloseRequested,
    ImeStateChanged(ImeStatus),
    UpdateZoomConstraints {
        pres_shell_id: u32,
        scroll_id: u64,
        is_root: bool,
        constraints: ZoomConstraints,
    },
    ZoomToRect {
        pres_shell_id: u32,
        scroll_id: u64,
        rect: Rect,
    },
}

/// Handle the engine uses to push upcalls onto the content loop. Cloneable;
/// safe to call from engine-internal threads.
#[derive(Debug, Clone)]
pub struct PageEventSender {
    view: ViewId,
    tx: mpsc::UnboundedSender<(ViewId, PageEvent)>,
}

impl PageEventSender {
    pub(crate) fn new(view: ViewId, tx: mpsc::UnboundedSender<(ViewId, PageEvent)>) -> Self {
        Self { view, tx }
    }

    /// Post an upcall. Dropped silently once the endpoint has gone away.
    pub fn emit(&self, event: PageEvent) {
        let _ = self.tx.send((self.view, event));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sender_tags_events_with_view() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sender = PageEventSender::new(ViewId(4), tx);
        sender.emit(PageEvent::LoadFinished);

        let (view, event) = rx.recv().await.unwrap();
        assert_eq!(view, ViewId(4));
        assert_eq!(event, PageEvent::LoadFinished);
    }

    #[test]
    fn emit_after_endpoint_drop_is_silent() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let sender = PageEventSender::new(ViewId(1), tx);
        sender.emit(PageEvent::LoadFinished);
    }
}
