//! Host-side view actor: command dispatch, compositor/pan-zoom wiring, and
//! status fan-out to the listener.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::bridge::{Compositor, PanZoom, PlatformImage};
use crate::controller::{ContentController, ContentEvent, ControllerTask};
use crate::listener::{ViewEvent, ViewListener};
use tether_common::{
    EventStatus, InputBlockId, InputEvent, Point, ScrollableLayerGuid, Size, SurfaceFormat,
    TouchPhase, TouchPoint, ViewError, ViewId,
};
use tether_config::TetherConfig;
use tether_protocol::{ChannelSender, Packet, ViewCommand, ViewStatus};

/// Destroy-protocol state of the host-side actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Both halves exist; commands route normally.
    Active,
    /// Destroy sent; the actor is non-routable and waits for the teardown
    /// acknowledgement or channel close.
    DestroyRequested,
    /// Teardown complete. Terminal.
    Destroyed,
}

/// The host-process endpoint of one view.
pub struct ViewActor {
    id: ViewId,
    state: LifecycleState,
    tx: ChannelSender,
    config: TetherConfig,
    listener: Option<Arc<dyn ViewListener>>,
    /// Once the owning handle detaches, status is swallowed rather than
    /// delivered: a closed-but-draining link, not an error.
    detached: bool,
    controller: Arc<ContentController>,
    pan_zoom: Arc<dyn PanZoom>,
    compositor: Option<Box<dyn Compositor>>,
    had_compositor: bool,
    next_block_id: InputBlockId,
    view_size: Size,
    surface_size: Size,
    ime_enabled: bool,
}

impl ViewActor {
    pub(crate) fn new(
        id: ViewId,
        config: TetherConfig,
        tx: ChannelSender,
        pan_zoom: Arc<dyn PanZoom>,
        tasks: mpsc::UnboundedSender<ControllerTask>,
    ) -> Self {
        let initial = Size::new(
            config.view.initial_width as f32,
            config.view.initial_height as f32,
        );
        Self {
            id,
            state: LifecycleState::Active,
            tx,
            config,
            listener: None,
            detached: false,
            controller: Arc::new(ContentController::new(id, tasks)),
            pan_zoom,
            compositor: None,
            had_compositor: false,
            next_block_id: InputBlockId(0),
            view_size: initial,
            surface_size: initial,
            ime_enabled: false,
        }
    }

    pub fn id(&self) -> ViewId {
        self.id
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn controller(&self) -> &Arc<ContentController> {
        &self.controller
    }

    pub(crate) fn had_compositor(&self) -> bool {
        self.had_compositor
    }

    pub fn set_listener(&mut self, listener: Arc<dyn ViewListener>) {
        self.listener = Some(listener);
    }

    /// Detach the owning handle: no further status reaches the application,
    /// pending pan-zoom callbacks are dropped.
    pub fn detach_listener(&mut self) {
        self.listener = None;
        self.detached = true;
        self.controller.clear_view();
    }

    // ---- command path ----

    /// Enqueue an outbound command. Never blocks; silently logged once
    /// destruction has begun.
    pub fn send_command(&self, command: ViewCommand) {
        if self.state != LifecycleState::Active {
            debug!(view = %self.id, "command dropped, view {:?}", self.state);
            return;
        }
        if self.tx.send(Packet::Command {
            view: self.id,
            command,
        })
        .is_err()
        {
            debug!(view = %self.id, "command dropped, view link closed");
        }
    }

    /// Begin the destroy handshake and mark the actor non-routable.
    pub fn request_destroy(&mut self) {
        if self.state != LifecycleState::Active {
            return;
        }
        let _ = self.tx.send(Packet::Command {
            view: self.id,
            command: ViewCommand::Destroy,
        });
        self.state = LifecycleState::DestroyRequested;
        self.controller.clear_view();
        debug!(view = %self.id, "destroy requested");
    }

    /// Advance to `Destroyed` (teardown ack or channel close; idempotent).
    /// True when this call performed the transition.
    pub(crate) fn complete_destroy(&mut self) -> bool {
        if self.state == LifecycleState::Destroyed {
            return false;
        }
        self.state = LifecycleState::Destroyed;
        debug!(view = %self.id, "destroyed");
        true
    }

    // ---- compositor wiring ----

    /// Attach a render surface. Records the root layer tree id, installs the
    /// content controller as the pan-zoom event sink, and pushes the current
    /// surface size. May be called again after [`Self::detach_compositor`];
    /// cached root zoom constraints survive.
    pub fn attach_compositor(&mut self, mut compositor: Box<dyn Compositor>) {
        let layers_id = compositor.root_layer_tree_id();
        compositor.set_surface_size(self.surface_size);
        self.controller
            .set_manager(Arc::clone(&self.pan_zoom), layers_id);
        let sink: Arc<dyn crate::bridge::PanZoomEventSink> = self.controller.clone();
        self.pan_zoom.install_event_sink(layers_id, sink);
        self.compositor = Some(compositor);
        self.had_compositor = true;
        debug!(view = %self.id, layers_id, "compositor attached");
    }

    pub fn detach_compositor(&mut self) {
        self.compositor = None;
        self.controller.clear_manager();
        debug!(view = %self.id, "compositor detached");
    }

    pub fn view_size(&self) -> Size {
        self.view_size
    }

    pub fn set_view_size(&mut self, size: Size) {
        self.view_size = size;
        self.send_command(ViewCommand::SetViewSize { size });
    }

    pub fn set_surface_size(&mut self, size: Size) {
        self.surface_size = size;
        if let Some(compositor) = self.compositor.as_mut() {
            compositor.set_surface_size(size);
        }
        self.send_command(ViewCommand::SetSurfaceSize { size });
    }

    pub fn suspend_rendering(&mut self) {
        if let Some(compositor) = self.compositor.as_mut() {
            compositor.suspend();
        }
    }

    pub fn resume_rendering(&mut self) {
        if let Some(compositor) = self.compositor.as_mut() {
            compositor.resume();
        }
    }

    /// Software-render the view into a caller-provided buffer. A soft no-op
    /// before a compositor attaches; engine failures propagate.
    pub fn render_to_buffer(
        &mut self,
        buf: &mut [u8],
        width: u32,
        height: u32,
        stride: u32,
        depth: u32,
    ) -> Result<(), ViewError> {
        let format = SurfaceFormat::from_depth(depth).ok_or(ViewError::UnsupportedDepth(depth))?;
        match self.compositor.as_mut() {
            Some(compositor) => compositor.render_to_buffer(buf, width, height, stride, format),
            None => Ok(()),
        }
    }

    pub fn platform_image(&self) -> Option<PlatformImage> {
        self.compositor.as_ref().and_then(|c| c.platform_image())
    }

    // ---- input path ----

    /// Route raw input. Touch-family events allocate the next block id, go
    /// through the pan-zoom engine first, and are forwarded translated only
    /// when not fully consumed. No-op until a compositor has attached.
    pub fn route_input_event(&mut self, event: InputEvent) -> Option<InputBlockId> {
        if self.compositor.is_none() {
            return None;
        }
        let (status, guid) = self.pan_zoom.receive_input_event(&event);
        let InputEvent::Touch(batch) = event else {
            return None;
        };

        let block_id = self.next_block_id.next();
        self.next_block_id = block_id;

        if status == EventStatus::ConsumeNoDefault {
            debug!(view = %self.id, %block_id, "touch block consumed by pan-zoom");
            return Some(block_id);
        }

        let translated: Vec<TouchPoint> = batch
            .points
            .iter()
            .map(|p| TouchPoint {
                point: self.pan_zoom.transform_to_content(p.point),
                ..*p
            })
            .collect();
        let translated = tether_common::TouchBatch {
            points: translated,
            ..batch
        };
        let command = if translated.phase == TouchPhase::Move {
            ViewCommand::TouchMove {
                guid,
                batch: translated,
                block_id,
            }
        } else {
            ViewCommand::Touch {
                guid,
                batch: translated,
                block_id,
            }
        };
        self.send_command(command);
        Some(block_id)
    }

    /// Inject an embedder-level mouse event: the pan-zoom engine sees a
    /// synthesized one-point touch so its gesture state stays coherent, and
    /// the content side receives the named mouse event.
    pub fn mouse_event(
        &mut self,
        kind: tether_common::MouseEventKind,
        point: Point,
        time_ms: u64,
        button: tether_common::MouseButton,
        modifiers: u32,
    ) {
        let phase = match kind {
            tether_common::MouseEventKind::MouseDown => TouchPhase::Start,
            tether_common::MouseEventKind::MouseUp => TouchPhase::End,
            _ => TouchPhase::Move,
        };
        let batch = tether_common::TouchBatch::single(phase, time_ms, modifiers, point);
        let _ = self.pan_zoom.receive_input_event(&InputEvent::Touch(batch));
        self.send_command(ViewCommand::MouseEvent {
            kind,
            x: point.x,
            y: point.y,
            button,
            click_count: 1,
            modifiers,
        });
    }

    /// Forward an input-method update. Dropped with a warning while the
    /// content side reports IME disabled.
    pub fn text_event(&self, commit: &str, preedit: &str) {
        if !self.ime_enabled {
            warn!(view = %self.id, "text event dropped, IME disabled");
            return;
        }
        self.send_command(ViewCommand::HandleTextEvent {
            commit: commit.to_owned(),
            preedit: preedit.to_owned(),
        });
    }

    pub fn ime_enabled(&self) -> bool {
        self.ime_enabled
    }

    // ---- inbound status ----

    /// Demultiplex one inbound status message.
    pub fn on_child_status(&mut self, status: ViewStatus) {
        if self.state == LifecycleState::Destroyed {
            debug!(view = %self.id, "status after destroy discarded");
            return;
        }
        match status {
            ViewStatus::DestroyAck => {
                // Handled by the registry via complete_destroy; nothing here.
            }
            ViewStatus::ContentReceivedInputBlock {
                guid,
                block_id,
                prevent_default,
            } => {
                if self.state == LifecycleState::DestroyRequested {
                    debug!(view = %self.id, %block_id, "ack after destroy request discarded");
                    return;
                }
                if self.compositor.is_some() {
                    self.pan_zoom
                        .content_received_input_block(guid, block_id, prevent_default);
                }
            }
            ViewStatus::UpdateZoomConstraints {
                pres_shell_id,
                scroll_id,
                is_root,
                constraints,
            } => {
                if is_root {
                    self.controller.save_zoom_constraints(constraints);
                }
                if self.controller.manager().is_some() {
                    let guid = ScrollableLayerGuid::new(
                        self.controller.layers_id(),
                        pres_shell_id,
                        scroll_id,
                    );
                    self.pan_zoom.update_zoom_constraints(guid, constraints);
                }
            }
            ViewStatus::ZoomToRect {
                pres_shell_id,
                scroll_id,
                rect,
            } => {
                if self.controller.manager().is_some() {
                    let guid = ScrollableLayerGuid::new(
                        self.controller.layers_id(),
                        pres_shell_id,
                        scroll_id,
                    );
                    self.pan_zoom.zoom_to_rect(guid, rect);
                }
            }
            ViewStatus::SyncMessage {
                correlation,
                name,
                data,
            }
            | ViewStatus::RpcMessage {
                correlation,
                name,
                data,
            } => {
                let values = self
                    .deliverable_listener()
                    .and_then(|l| l.recv_sync_message(self.id, &name, &data))
                    .map(|v| vec![v])
                    .unwrap_or_default();
                self.send_command(ViewCommand::SyncReply {
                    correlation,
                    values,
                });
            }
            ViewStatus::ImeStateChanged(status) => {
                self.ime_enabled = status.enabled;
                self.deliver(ViewEvent::ImeStateChanged(status));
            }
            other => {
                if let Some(event) = Self::status_to_event(other) {
                    self.deliver(event);
                }
            }
        }
    }

    /// Apply one marshaled pan-zoom callback on the host loop.
    pub(crate) fn on_controller_task(&mut self, task: ControllerTask) {
        match task {
            ControllerTask::Repaint { metrics, .. } => {
                let consumed = self.controller.relay(&ContentEvent::Repaint { metrics });
                if !consumed {
                    self.send_command(ViewCommand::UpdateFrame { metrics });
                }
            }
            ControllerTask::SingleTap { point, .. } => {
                let consumed = self.controller.relay(&ContentEvent::SingleTap { point });
                if !consumed {
                    self.send_command(ViewCommand::HandleSingleTap { point });
                }
            }
            ControllerTask::DoubleTap { point, .. } => {
                let consumed = self.controller.relay(&ContentEvent::DoubleTap { point });
                let wanted = self.config.pan_zoom.handle_default_double_tap
                    || self.config.pan_zoom.post_double_tap_as_event;
                if !consumed && wanted {
                    self.send_command(ViewCommand::HandleDoubleTap { point });
                }
            }
            ControllerTask::LongTap {
                point,
                guid,
                block_id,
                ..
            } => {
                let consumed = self.controller.relay(&ContentEvent::LongTap { point });
                if consumed {
                    // The block still needs its decision, exactly once.
                    self.pan_zoom
                        .content_received_input_block(guid, block_id, true);
                } else {
                    self.send_command(ViewCommand::HandleLongTap {
                        point,
                        guid,
                        block_id,
                    });
                }
            }
            ControllerTask::AsyncScroll {
                content_rect,
                scrollable_size,
                ..
            } => {
                self.send_command(ViewCommand::AsyncScrollEvent {
                    content_rect,
                    scrollable_size,
                });
            }
            ControllerTask::AckScrollUpdate {
                scroll_id,
                generation,
                ..
            } => {
                self.send_command(ViewCommand::AcknowledgeScrollUpdate {
                    scroll_id,
                    generation,
                });
            }
        }
    }

    fn status_to_event(status: ViewStatus) -> Option<ViewEvent> {
        Some(match status {
            ViewStatus::Initialized => ViewEvent::Initialized,
            ViewStatus::LocationChanged {
                url,
                can_go_back,
                can_go_forward,
            } => ViewEvent::LocationChanged {
                url,
                can_go_back,
                can_go_forward,
            },
            ViewStatus::LoadStarted { url } => ViewEvent::LoadStarted { url },
            ViewStatus::LoadFinished => ViewEvent::LoadFinished,
            ViewStatus::LoadRedirect => ViewEvent::LoadRedirect,
            ViewStatus::LoadProgress {
                progress,
                cur_total,
                max_total,
            } => ViewEvent::LoadProgress {
                progress,
                cur_total,
                max_total,
            },
            ViewStatus::SecurityChanged { status, state } => {
                ViewEvent::SecurityChanged { status, state }
            }
            ViewStatus::FirstPaint { x, y } => ViewEvent::FirstPaint { x, y },
            ViewStatus::ScrolledAreaChanged { width, height } => {
                ViewEvent::ScrolledAreaChanged { width, height }
            }
            ViewStatus::ScrollChanged { x, y } => ViewEvent::ScrollChanged { x, y },
            ViewStatus::TitleChanged { title } => ViewEvent::TitleChanged { title },
            ViewStatus::BackgroundColor { color } => ViewEvent::BackgroundColor { color },
            ViewStatus::WindowCloseRequested => ViewEvent::WindowCloseRequested,
            ViewStatus::AsyncMessage { name, data } => ViewEvent::AsyncMessage { name, data },
            _ => return None,
        })
    }

    fn deliverable_listener(&self) -> Option<&Arc<dyn ViewListener>> {
        if self.detached || self.state == LifecycleState::Destroyed {
            return None;
        }
        self.listener.as_ref()
    }

    fn deliver(&self, event: ViewEvent) {
        match self.deliverable_listener() {
            Some(listener) => listener.on_view_event(self.id, event),
            None => debug!(view = %self.id, "status swallowed, no deliverable listener"),
        }
    }
}
