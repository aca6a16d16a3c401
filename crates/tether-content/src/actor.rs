//! Content-side view actor.

use std::collections::{HashMap, HashSet};

use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::engine::{KeyEventKind, LoadFlags, PageEngine, PageEvent};
use crate::ime::{self, ImeEvent, ImeState};
use tether_config::TetherConfig;
use tether_common::{
    EventStatus, FrameMetrics, InputBlockId, KeyInput, MouseButton, MouseEventKind, Point, Rect,
    ScrollableLayerGuid, Size, TouchBatch, TouchPhase, ViewError, ViewId,
};
use tether_protocol::{ChannelSender, Packet, ViewCommand, ViewStatus};

/// The content-process endpoint of one view.
///
/// The page/window is built asynchronously by a task posted to the content
/// loop; until then `engine` is `None` and every handler that needs it
/// returns the soft [`ViewError::NotReady`].
pub struct ContentViewActor {
    id: ViewId,
    config: TetherConfig,
    tx: ChannelSender,
    engine: Option<Box<dyn PageEngine>>,
    outer_window_id: u64,
    registered_messages: HashSet<String>,
    ime: ImeState,
    /// Block awaiting its consume/ignore decision; acknowledged when the
    /// next batch's dispatch result is known.
    pending_block: Option<InputBlockId>,
    last_acked_block: Option<InputBlockId>,
    dispatch_synth_mouse: bool,
    view_size: Size,
    surface_size: Size,
    pending_sync: HashMap<String, oneshot::Sender<Vec<String>>>,
}

impl ContentViewActor {
    pub fn new(id: ViewId, config: TetherConfig, tx: ChannelSender) -> Self {
        let initial = Size::new(
            config.view.initial_width as f32,
            config.view.initial_height as f32,
        );
        Self {
            id,
            config,
            tx,
            engine: None,
            outer_window_id: 0,
            registered_messages: HashSet::new(),
            ime: ImeState::Idle,
            pending_block: None,
            last_acked_block: None,
            dispatch_synth_mouse: true,
            view_size: initial,
            surface_size: initial,
            pending_sync: HashMap::new(),
        }
    }

    pub fn id(&self) -> ViewId {
        self.id
    }

    pub fn is_ready(&self) -> bool {
        self.engine.is_some()
    }

    pub fn outer_window_id(&self) -> u64 {
        self.outer_window_id
    }

    pub fn ime_state(&self) -> ImeState {
        self.ime
    }

    /// Last surface size pushed by the host; the widget layer reads this
    /// when (re)creating render targets.
    pub fn surface_size(&self) -> Size {
        self.surface_size
    }

    /// Called by the posted init task once the window exists. Applies any
    /// size that arrived before construction and announces readiness.
    pub fn window_ready(&mut self, mut engine: Box<dyn PageEngine>) {
        engine.resize(self.view_size);
        self.outer_window_id = engine.outer_window_id();
        self.engine = Some(engine);
        debug!(view = %self.id, outer = self.outer_window_id, "content window initialized");
        self.send_status(ViewStatus::Initialized);
    }

    /// Tear down on a destroy command: release the window, clear all
    /// per-view state, close the handshake.
    pub fn destroy(&mut self) {
        debug!(view = %self.id, "destroying content view");
        self.registered_messages.clear();
        self.pending_sync.clear();
        self.pending_block = None;
        self.engine = None;
        self.send_status(ViewStatus::DestroyAck);
    }

    pub fn handle_command(&mut self, command: ViewCommand) -> Result<(), ViewError> {
        match command {
            ViewCommand::LoadUrl { url } => self.on_load_url(&url),
            ViewCommand::GoBack => self.with_engine(|engine| engine.go_back()),
            ViewCommand::GoForward => self.with_engine(|engine| engine.go_forward()),
            ViewCommand::StopLoad => self.with_engine(|engine| engine.stop_load()),
            ViewCommand::Reload { hard } => self.on_reload(hard),
            ViewCommand::SetActive { active } => self.on_set_active(active),
            ViewCommand::SetFocused { focused } => self.on_set_focused(focused),
            ViewCommand::SetViewSize { size } => self.on_set_view_size(size),
            ViewCommand::SetSurfaceSize { size } => {
                self.surface_size = size;
                Ok(())
            }
            ViewCommand::SuspendTimeouts => self.with_engine(|engine| engine.suspend_timeouts()),
            ViewCommand::ResumeTimeouts => self.with_engine(|engine| engine.resume_timeouts()),

            ViewCommand::AddMessageListener { name } => {
                self.registered_messages.insert(name);
                Ok(())
            }
            ViewCommand::RemoveMessageListener { name } => {
                self.registered_messages.remove(&name);
                Ok(())
            }
            ViewCommand::AddMessageListeners { names } => {
                self.registered_messages.extend(names);
                Ok(())
            }
            ViewCommand::RemoveMessageListeners { names } => {
                for name in &names {
                    self.registered_messages.remove(name);
                }
                Ok(())
            }
            ViewCommand::AsyncMessage { name, data } => {
                self.with_engine(|engine| engine.receive_message(&name, &data))
            }
            ViewCommand::SyncReply {
                correlation,
                values,
            } => self.on_sync_reply(&correlation, values),

            ViewCommand::HandleTextEvent { commit, preedit } => {
                self.on_text_event(&commit, &preedit)
            }
            ViewCommand::KeyPress(key) => self.on_key_press(key),
            ViewCommand::KeyRelease(key) => self.on_key_release(key),
            ViewCommand::MouseEvent {
                kind,
                x,
                y,
                button,
                click_count,
                modifiers,
            } => self
                .dispatch_mouse(kind, Point::new(x, y), button, click_count, modifiers)
                .map(|_| ()),

            ViewCommand::Touch {
                guid,
                batch,
                block_id,
            }
            | ViewCommand::TouchMove {
                guid,
                batch,
                block_id,
            } => self.on_touch_input(guid, batch, block_id),

            ViewCommand::HandleSingleTap { point } => self.on_single_tap(point),
            ViewCommand::HandleDoubleTap { point } => self.on_double_tap(point),
            ViewCommand::HandleLongTap {
                point,
                guid,
                block_id,
            } => self.on_long_tap(point, guid, block_id),

            ViewCommand::UpdateFrame { metrics } => self.on_update_frame(metrics),
            ViewCommand::AsyncScrollEvent {
                content_rect,
                scrollable_size,
            } => self.on_async_scroll_event(content_rect, scrollable_size),
            ViewCommand::AcknowledgeScrollUpdate {
                scroll_id,
                generation,
            } => self.with_engine(|engine| engine.acknowledge_scroll_update(scroll_id, generation)),

            ViewCommand::Destroy => {
                // Routed by the endpoint, which owns actor lifetime.
                debug!(view = %self.id, "destroy command reached actor directly");
                Ok(())
            }
        }
    }

    /// Forward a page-engine upcall over the channel.
    pub fn on_page_event(&mut self, event: PageEvent) {
        match event {
            PageEvent::LocationChanged {
                url,
                can_go_back,
                can_go_forward,
            } => self.send_status(ViewStatus::LocationChanged {
                url,
                can_go_back,
                can_go_forward,
            }),
            PageEvent::LoadStarted { url } => self.send_status(ViewStatus::LoadStarted { url }),
            PageEvent::LoadFinished => self.send_status(ViewStatus::LoadFinished),
            PageEvent::LoadRedirect => self.send_status(ViewStatus::LoadRedirect),
            PageEvent::LoadProgress {
                progress,
                cur_total,
                max_total,
            } => self.send_status(ViewStatus::LoadProgress {
                progress,
                cur_total,
                max_total,
            }),
            PageEvent::SecurityChanged { status, state } => {
                self.send_status(ViewStatus::SecurityChanged { status, state });
            }
            PageEvent::FirstPaint { x, y } => self.on_first_paint(x, y),
            PageEvent::ScrolledAreaChanged { width, height } => {
                self.send_status(ViewStatus::ScrolledAreaChanged { width, height });
            }
            PageEvent::ScrollChanged { x, y } => {
                self.send_status(ViewStatus::ScrollChanged { x, y });
            }
            PageEvent::TitleChanged { title } => {
                self.send_status(ViewStatus::TitleChanged { title });
            }
            PageEvent::WindowCloseRequested => self.send_status(ViewStatus::WindowCloseRequested),
            PageEvent::ImeStateChanged(status) => {
                self.send_status(ViewStatus::ImeStateChanged(status));
            }
            PageEvent::UpdateZoomConstraints {
                pres_shell_id,
                scroll_id,
                is_root,
                constraints,
            } => self.send_status(ViewStatus::UpdateZoomConstraints {
                pres_shell_id,
                scroll_id,
                is_root,
                constraints,
            }),
            PageEvent::ZoomToRect {
                pres_shell_id,
                scroll_id,
                rect,
            } => self.send_status(ViewStatus::ZoomToRect {
                pres_shell_id,
                scroll_id,
                rect,
            }),
        }
    }

    // ---- outbound script messages (gated) ----

    pub fn has_message_listener(&self, name: &str) -> bool {
        self.registered_messages.contains(name)
    }

    /// Send a script message toward the host. Unregistered names are a
    /// successful no-op so callers cannot observe the gate.
    pub fn send_async_message(&mut self, name: &str, data: &str) {
        if !self.has_message_listener(name) {
            return;
        }
        self.send_status(ViewStatus::AsyncMessage {
            name: name.to_owned(),
            data: data.to_owned(),
        });
    }

    /// Send a sync script message; the returned receiver resolves with the
    /// host's reply values. Unregistered names resolve immediately empty.
    pub fn send_sync_message(&mut self, name: &str, data: &str) -> oneshot::Receiver<Vec<String>> {
        self.send_with_reply(name, data, false)
    }

    /// Rpc variant; shares the sync reply path.
    pub fn call_rpc(&mut self, name: &str, data: &str) -> oneshot::Receiver<Vec<String>> {
        self.send_with_reply(name, data, true)
    }

    fn send_with_reply(
        &mut self,
        name: &str,
        data: &str,
        rpc: bool,
    ) -> oneshot::Receiver<Vec<String>> {
        let (reply_tx, reply_rx) = oneshot::channel();
        if !self.has_message_listener(name) {
            let _ = reply_tx.send(Vec::new());
            return reply_rx;
        }
        let correlation = tether_common::new_correlation_id();
        self.pending_sync.insert(correlation.clone(), reply_tx);
        let status = if rpc {
            ViewStatus::RpcMessage {
                correlation,
                name: name.to_owned(),
                data: data.to_owned(),
            }
        } else {
            ViewStatus::SyncMessage {
                correlation,
                name: name.to_owned(),
                data: data.to_owned(),
            }
        };
        self.send_status(status);
        reply_rx
    }

    // ---- command handlers ----

    fn on_load_url(&mut self, url: &str) -> Result<(), ViewError> {
        let flags = LoadFlags {
            allow_keyword_lookup: self.config.input.allow_keyword_url,
            ..LoadFlags::default()
        };
        self.with_engine(|engine| engine.navigate(url, flags))
    }

    fn on_reload(&mut self, hard: bool) -> Result<(), ViewError> {
        let flags = LoadFlags {
            bypass_cache: hard,
            bypass_proxy: hard,
            ..LoadFlags::default()
        };
        self.with_engine(|engine| engine.reload(flags))
    }

    fn on_set_active(&mut self, active: bool) -> Result<(), ViewError> {
        self.with_engine(|engine| {
            engine.set_active(active);
            debug!(active, "browser activation toggled");
        })
    }

    fn on_set_focused(&mut self, focused: bool) -> Result<(), ViewError> {
        self.with_engine(|engine| {
            if focused {
                engine.window_activated();
            } else {
                engine.window_deactivated();
                // Deactivation alone keeps the focused node; drop it too.
                engine.clear_focus();
            }
        })
    }

    fn on_set_view_size(&mut self, size: Size) -> Result<(), ViewError> {
        self.view_size = size;
        debug!(view = %self.id, width = size.width, height = size.height, "view resized");
        self.with_engine(|engine| engine.resize(size))
    }

    fn on_text_event(&mut self, commit: &str, preedit: &str) -> Result<(), ViewError> {
        let engine = self.engine.as_mut().ok_or(ViewError::NotReady)?;
        let (next, events) = ime::step(self.ime, commit, preedit);
        self.ime = next;
        for event in &events {
            engine.dispatch_composition(event);
        }
        Ok(())
    }

    fn on_key_press(&mut self, key: KeyInput) -> Result<(), ViewError> {
        self.with_engine(|engine| {
            engine.dispatch_key(KeyEventKind::KeyDown, key);
            if !key.is_modifier_key() {
                engine.dispatch_key(KeyEventKind::KeyPress, key);
            }
        })
    }

    fn on_key_release(&mut self, key: KeyInput) -> Result<(), ViewError> {
        self.with_engine(|engine| engine.dispatch_key(KeyEventKind::KeyUp, key))
    }

    fn dispatch_mouse(
        &mut self,
        kind: MouseEventKind,
        point: Point,
        button: MouseButton,
        click_count: i32,
        modifiers: u32,
    ) -> Result<EventStatus, ViewError> {
        let engine = self.engine.as_mut().ok_or(ViewError::NotReady)?;
        Ok(engine.dispatch_mouse(kind, point, button, click_count, modifiers))
    }

    fn on_touch_input(
        &mut self,
        guid: ScrollableLayerGuid,
        batch: TouchBatch,
        block_id: InputBlockId,
    ) -> Result<(), ViewError> {
        let engine = self.engine.as_mut().ok_or(ViewError::NotReady)?;
        let status = engine.dispatch_touch(&batch);
        let prevent_default = status == EventStatus::ConsumeNoDefault;

        // The decision observed now settles the block dispatched previously;
        // the current block stays pending until the next batch.
        if let Some(previous) = self.pending_block.take() {
            self.send_input_block_ack(guid, previous, prevent_default);
        }
        self.pending_block = Some(block_id);

        if status != EventStatus::ConsumeNoDefault
            && self.dispatch_synth_mouse
            && self.config.input.dispatch_mouse_events
        {
            self.synthesize_mouse(&batch);
        }

        if batch.phase.ends_gesture() {
            self.dispatch_synth_mouse = true;
        }
        Ok(())
    }

    fn synthesize_mouse(&mut self, batch: &TouchBatch) {
        let kind = match batch.phase {
            TouchPhase::Start => MouseEventKind::MouseDown,
            TouchPhase::Move => MouseEventKind::MouseMove,
            TouchPhase::End => MouseEventKind::MouseUp,
            TouchPhase::Cancel => return,
        };
        let Some(first) = batch.points.first() else {
            return;
        };
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        let status = engine.dispatch_mouse(
            kind,
            first.point,
            MouseButton::Left,
            1,
            batch.modifiers,
        );
        if status == EventStatus::ConsumeNoDefault {
            self.dispatch_synth_mouse = false;
        }
    }

    fn on_single_tap(&mut self, point: Point) -> Result<(), ViewError> {
        if self.engine.is_none() {
            return Err(ViewError::NotReady);
        }

        // An open composition must be closed before the tap moves focus,
        // otherwise the editor is left composing against the wrong node.
        if self.ime.is_composing() {
            if let Some(engine) = self.engine.as_mut() {
                engine.dispatch_composition(&ImeEvent::CompositionEnd);
            }
            self.ime = ImeState::Idle;
        }

        if self.config.pan_zoom.post_single_tap_as_event {
            self.post_gesture_message(
                "gesture:single_tap",
                serde_json::json!({ "x": point.x, "y": point.y }),
            );
        }

        if self.config.pan_zoom.handle_default_single_tap {
            self.dispatch_mouse(MouseEventKind::MouseMove, point, MouseButton::Left, 1, 0)?;
            self.dispatch_mouse(MouseEventKind::MouseDown, point, MouseButton::Left, 1, 0)?;
            self.dispatch_mouse(MouseEventKind::MouseUp, point, MouseButton::Left, 1, 0)?;
        }
        Ok(())
    }

    fn on_double_tap(&mut self, point: Point) -> Result<(), ViewError> {
        if self.config.pan_zoom.post_double_tap_as_event {
            self.post_gesture_message(
                "gesture:double_tap",
                serde_json::json!({ "x": point.x, "y": point.y }),
            );
        }
        Ok(())
    }

    /// Long-tap is acknowledged immediately with the context-menu dispatch
    /// result, never deferred to the next block.
    fn on_long_tap(
        &mut self,
        point: Point,
        guid: ScrollableLayerGuid,
        block_id: InputBlockId,
    ) -> Result<(), ViewError> {
        if self.config.pan_zoom.post_long_tap_as_event {
            self.post_gesture_message(
                "gesture:long_tap",
                serde_json::json!({ "x": point.x, "y": point.y }),
            );
        }

        let mut handled = false;
        if self.config.pan_zoom.handle_default_long_tap {
            if let Ok(status) = self.dispatch_mouse(
                MouseEventKind::ContextMenu,
                point,
                MouseButton::Right,
                1,
                0,
            ) {
                handled = status.is_consumed();
            }
        }

        self.send_input_block_ack(guid, block_id, handled);
        Ok(())
    }

    fn on_update_frame(&mut self, metrics: FrameMetrics) -> Result<(), ViewError> {
        let apply = if metrics.is_root {
            self.config.pan_zoom.handle_default_viewport
        } else {
            self.config.pan_zoom.handle_default_scroll
        };
        if self.config.pan_zoom.post_viewport_as_event {
            self.post_gesture_message(
                "azpc:viewport",
                serde_json::json!({
                    "presShellId": metrics.pres_shell_id,
                    "scrollId": metrics.scroll_id,
                    "resolution": metrics.resolution,
                }),
            );
        }
        if apply {
            self.with_engine(|engine| engine.apply_frame_metrics(&metrics))
        } else {
            Ok(())
        }
    }

    fn on_async_scroll_event(
        &mut self,
        content_rect: Rect,
        scrollable_size: Size,
    ) -> Result<(), ViewError> {
        if self.config.pan_zoom.post_scroll_as_event {
            self.post_gesture_message(
                "azpc:scroll",
                serde_json::json!({
                    "contentRect": {
                        "x": content_rect.x,
                        "y": content_rect.y,
                        "width": content_rect.width,
                        "height": content_rect.height,
                    },
                    "scrollSize": {
                        "width": scrollable_size.width,
                        "height": scrollable_size.height,
                    },
                }),
            );
        }
        Ok(())
    }

    fn on_first_paint(&mut self, x: i32, y: i32) {
        if let Some(engine) = self.engine.as_mut() {
            let color = engine.background_color();
            engine.resize(self.view_size);
            self.send_status(ViewStatus::BackgroundColor { color });
        }
        self.send_status(ViewStatus::FirstPaint { x, y });
    }

    fn on_sync_reply(&mut self, correlation: &str, values: Vec<String>) -> Result<(), ViewError> {
        match self.pending_sync.remove(correlation) {
            Some(reply_tx) => {
                let _ = reply_tx.send(values);
                Ok(())
            }
            None => {
                debug!(view = %self.id, correlation, "sync reply without pending message");
                Ok(())
            }
        }
    }

    // ---- helpers ----

    fn with_engine(
        &mut self,
        f: impl FnOnce(&mut Box<dyn PageEngine>),
    ) -> Result<(), ViewError> {
        match self.engine.as_mut() {
            Some(engine) => {
                f(engine);
                Ok(())
            }
            None => Err(ViewError::NotReady),
        }
    }

    fn post_gesture_message(&mut self, name: &str, payload: serde_json::Value) {
        self.send_async_message(name, &payload.to_string());
    }

    fn send_input_block_ack(
        &mut self,
        guid: ScrollableLayerGuid,
        block_id: InputBlockId,
        prevent_default: bool,
    ) {
        debug_assert!(
            self.last_acked_block.map_or(true, |last| block_id > last),
            "input block {block_id} acknowledged out of order (last {:?})",
            self.last_acked_block
        );
        self.last_acked_block = Some(block_id);
        self.send_status(ViewStatus::ContentReceivedInputBlock {
            guid,
            block_id,
            prevent_default,
        });
    }

    fn send_status(&mut self, status: ViewStatus) {
        if self
            .tx
            .send(Packet::Status {
                view: self.id,
                status,
            })
            .is_err()
        {
            warn!(view = %self.id, "status dropped, view link closed");
        }
    }
}
