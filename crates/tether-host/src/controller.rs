//! Content controller: adapts the pan-zoom engine's callbacks to the view
//! protocol and caches zoom policy.
//!
//! The pan-zoom engine may invoke the sink methods from its own thread, so
//! every callback marshals onto the host's primary loop through a posted
//! task before any actor state is touched. Controller-local state (zoom
//! constraints, listeners, manager binding) sits behind a mutex and is safe
//! from both threads.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tracing::debug;

use crate::bridge::{PanZoom, PanZoomEventSink};
use tether_common::{
    FrameMetrics, InputBlockId, Point, Rect, ScrollableLayerGuid, Size, ViewId, ZoomConstraints,
};

/// Gesture/repaint notification relayed to content listeners.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentEvent {
    Repaint { metrics: FrameMetrics },
    SingleTap { point: Point },
    DoubleTap { point: Point },
    LongTap { point: Point },
}

/// An observer of content events, e.g. an overlay consumer. More than one
/// may be registered per view; delivery follows insertion order.
pub trait ContentListener: Send + Sync {
    /// Return true to consume the event and suppress default handling.
    fn on_content_event(&self, view: ViewId, event: &ContentEvent) -> bool;
}

/// Task marshaled from the pan-zoom thread onto the host loop.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ControllerTask {
    Repaint {
        view: ViewId,
        metrics: FrameMetrics,
    },
    SingleTap {
        view: ViewId,
        point: Point,
        guid: ScrollableLayerGuid,
        block_id: InputBlockId,
    },
    DoubleTap {
        view: ViewId,
        point: Point,
        guid: ScrollableLayerGuid,
        block_id: InputBlockId,
    },
    LongTap {
        view: ViewId,
        point: Point,
        guid: ScrollableLayerGuid,
        block_id: InputBlockId,
    },
    AsyncScroll {
        view: ViewId,
        content_rect: Rect,
        scrollable_size: Size,
    },
    AckScrollUpdate {
        view: ViewId,
        scroll_id: u64,
        generation: u32,
    },
}

struct ControllerInner {
    /// Root-frame zoom policy. Survives compositor re-attachment.
    constraints: Option<ZoomConstraints>,
    listeners: Vec<Arc<dyn ContentListener>>,
    manager: Option<Arc<dyn PanZoom>>,
    layers_id: u64,
    /// Set when the view API is gone; callbacks are dropped from here on.
    detached: bool,
}

pub struct ContentController {
    view: ViewId,
    tasks: mpsc::UnboundedSender<ControllerTask>,
    inner: Mutex<ControllerInner>,
}

impl ContentController {
    pub(crate) fn new(view: ViewId, tasks: mpsc::UnboundedSender<ControllerTask>) -> Self {
        Self {
            view,
            tasks,
            inner: Mutex::new(ControllerInner {
                constraints: None,
                listeners: Vec::new(),
                manager: None,
                layers_id: 0,
                detached: false,
            }),
        }
    }

    /// Cache root-frame constraints. Sub-frame constraints never reach this;
    /// they are forwarded straight to the pan-zoom manager.
    pub fn save_zoom_constraints(&self, constraints: ZoomConstraints) {
        self.inner.lock().unwrap().constraints = Some(constraints);
    }

    /// Cached root constraints, or `None` for "unset" so the pan-zoom
    /// manager falls back to page-provided policy.
    pub fn root_zoom_constraints(&self) -> Option<ZoomConstraints> {
        self.inner.lock().unwrap().constraints
    }

    pub fn add_content_listener(&self, listener: Arc<dyn ContentListener>) {
        self.inner.lock().unwrap().listeners.push(listener);
    }

    pub fn remove_content_listener(&self, listener: &Arc<dyn ContentListener>) {
        self.inner
            .lock()
            .unwrap()
            .listeners
            .retain(|l| !Arc::ptr_eq(l, listener));
    }

    /// Bind the per-view pan-zoom manager once a compositor has attached.
    pub(crate) fn set_manager(&self, manager: Arc<dyn PanZoom>, layers_id: u64) {
        let mut inner = self.inner.lock().unwrap();
        inner.manager = Some(manager);
        inner.layers_id = layers_id;
    }

    pub(crate) fn clear_manager(&self) {
        self.inner.lock().unwrap().manager = None;
    }

    pub(crate) fn manager(&self) -> Option<Arc<dyn PanZoom>> {
        self.inner.lock().unwrap().manager.clone()
    }

    pub(crate) fn layers_id(&self) -> u64 {
        self.inner.lock().unwrap().layers_id
    }

    /// Sever the view link. Pending and future callbacks are dropped; the
    /// cached constraints stay for any in-flight manager queries.
    pub(crate) fn clear_view(&self) {
        self.inner.lock().unwrap().detached = true;
    }

    /// Relay an event to all listeners in insertion order; true when any
    /// listener consumed it.
    pub(crate) fn relay(&self, event: &ContentEvent) -> bool {
        let listeners = self.inner.lock().unwrap().listeners.clone();
        let mut consumed = false;
        for listener in &listeners {
            consumed |= listener.on_content_event(self.view, event);
        }
        consumed
    }

    fn post(&self, task: ControllerTask) {
        if self.inner.lock().unwrap().detached {
            debug!(view = %self.view, "controller callback after detach dropped");
            return;
        }
        let _ = self.tasks.send(task);
    }
}

impl PanZoomEventSink for ContentController {
    fn request_content_repaint(&self, metrics: FrameMetrics) {
        self.post(ControllerTask::Repaint {
            view: self.view,
            metrics,
        });
    }

    fn handle_single_tap(&self, point: Point, guid: ScrollableLayerGuid, block_id: InputBlockId) {
        self.post(ControllerTask::SingleTap {
            view: self.view,
            point,
            guid,
            block_id,
        });
    }

    fn handle_double_tap(&self, point: Point, guid: ScrollableLayerGuid, block_id: InputBlockId) {
        self.post(ControllerTask::DoubleTap {
            view: self.view,
            point,
            guid,
            block_id,
        });
    }

    fn handle_long_tap(&self, point: Point, guid: ScrollableLayerGuid, block_id: InputBlockId) {
        self.post(ControllerTask::LongTap {
            view: self.view,
            point,
            guid,
            block_id,
        });
    }

    fn notify_async_scroll(&self, content_rect: Rect, scrollable_size: Size) {
        self.post(ControllerTask::AsyncScroll {
            view: self.view,
            content_rect,
            scrollable_size,
        });
    }

    fn acknowledge_scroll_update(&self, scroll_id: u64, generation: u32) {
        self.post(ControllerTask::AckScrollUpdate {
            view: self.view,
            scroll_id,
            generation,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingListener {
        seen: AtomicUsize,
        consume: bool,
    }

    impl ContentListener for CountingListener {
        fn on_content_event(&self, _view: ViewId, _event: &ContentEvent) -> bool {
            self.seen.fetch_add(1, Ordering::SeqCst);
            self.consume
        }
    }

    fn controller() -> (
        Arc<ContentController>,
        mpsc::UnboundedReceiver<ControllerTask>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(ContentController::new(ViewId(1), tx)), rx)
    }

    #[test]
    fn constraints_cached_until_replaced() {
        let (controller, _rx) = controller();
        assert!(controller.root_zoom_constraints().is_none());

        let constraints = ZoomConstraints {
            min_scale: 0.5,
            ..ZoomConstraints::default()
        };
        controller.save_zoom_constraints(constraints);
        assert_eq!(controller.root_zoom_constraints(), Some(constraints));
    }

    #[test]
    fn callbacks_marshal_to_tasks() {
        let (controller, mut rx) = controller();
        controller.handle_single_tap(Point::new(1, 2), ScrollableLayerGuid::default(), InputBlockId(3));

        match rx.try_recv().unwrap() {
            ControllerTask::SingleTap {
                view,
                point,
                block_id,
                ..
            } => {
                assert_eq!(view, ViewId(1));
                assert_eq!(point, Point::new(1, 2));
                assert_eq!(block_id, InputBlockId(3));
            }
            other => panic!("unexpected task: {other:?}"),
        }
    }

    #[test]
    fn detach_drops_callbacks() {
        let (controller, mut rx) = controller();
        controller.clear_view();
        controller.request_content_repaint(FrameMetrics::default());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn relay_reports_consumption() {
        let (controller, _rx) = controller();
        let passive = Arc::new(CountingListener {
            seen: AtomicUsize::new(0),
            consume: false,
        });
        let consuming = Arc::new(CountingListener {
            seen: AtomicUsize::new(0),
            consume: true,
        });
        controller.add_content_listener(passive.clone());

        let event = ContentEvent::SingleTap {
            point: Point::new(0, 0),
        };
        assert!(!controller.relay(&event));
        assert_eq!(passive.seen.load(Ordering::SeqCst), 1);

        controller.add_content_listener(consuming.clone());
        assert!(controller.relay(&event));
        // Both listeners still see the event; consumption does not stop
        // delivery.
        assert_eq!(passive.seen.load(Ordering::SeqCst), 2);
        assert_eq!(consuming.seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn remove_listener_stops_delivery() {
        let (controller, _rx) = controller();
        let listener = Arc::new(CountingListener {
            seen: AtomicUsize::new(0),
            consume: false,
        });
        let as_dyn: Arc<dyn ContentListener> = listener.clone();
        controller.add_content_listener(as_dyn.clone());
        controller.remove_content_listener(&as_dyn);

        controller.relay(&ContentEvent::Repaint {
            metrics: FrameMetrics::default(),
        });
        assert_eq!(listener.seen.load(Ordering::SeqCst), 0);
    }
}
