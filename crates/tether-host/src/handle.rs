//! Public, process-local façade for one view. Owns the host-side actor and
//! delegates; embedding code never touches the actor directly.

use std::sync::Arc;

use crate::actor::{LifecycleState, ViewActor};
use crate::bridge::{Compositor, PlatformImage};
use crate::controller::ContentController;
use crate::listener::ViewListener;
use tether_common::{
    InputEvent, KeyInput, MouseButton, MouseEventKind, PinchPhase, Point, Size, ViewError, ViewId,
};
use tether_protocol::ViewCommand;

pub struct ViewHandle {
    actor: ViewActor,
}

impl ViewHandle {
    pub(crate) fn new(actor: ViewActor) -> Self {
        Self { actor }
    }

    pub fn id(&self) -> ViewId {
        self.actor.id()
    }

    pub fn state(&self) -> LifecycleState {
        self.actor.state()
    }

    pub fn controller(&self) -> &Arc<ContentController> {
        self.actor.controller()
    }

    /// Install the status listener. Call [`Self::detach_listener`] if the
    /// listener object goes away before the view does.
    pub fn set_listener(&mut self, listener: Arc<dyn ViewListener>) {
        self.actor.set_listener(listener);
    }

    pub fn detach_listener(&mut self) {
        self.actor.detach_listener();
    }

    // ---- embed interface ----

    pub fn load_url(&self, url: &str) {
        self.actor.send_command(ViewCommand::LoadUrl {
            url: url.to_owned(),
        });
    }

    pub fn go_back(&self) {
        self.actor.send_command(ViewCommand::GoBack);
    }

    pub fn go_forward(&self) {
        self.actor.send_command(ViewCommand::GoForward);
    }

    pub fn stop_load(&self) {
        self.actor.send_command(ViewCommand::StopLoad);
    }

    pub fn reload(&self, hard: bool) {
        self.actor.send_command(ViewCommand::Reload { hard });
    }

    pub fn set_active(&self, active: bool) {
        self.actor.send_command(ViewCommand::SetActive { active });
    }

    pub fn set_focused(&self, focused: bool) {
        self.actor.send_command(ViewCommand::SetFocused { focused });
    }

    pub fn suspend_timeouts(&self) {
        self.actor.send_command(ViewCommand::SuspendTimeouts);
    }

    pub fn resume_timeouts(&self) {
        self.actor.send_command(ViewCommand::ResumeTimeouts);
    }

    pub fn view_size(&self) -> Size {
        self.actor.view_size()
    }

    pub fn set_view_size(&mut self, size: Size) {
        self.actor.set_view_size(size);
    }

    // ---- input interface ----

    pub fn send_text_event(&self, commit: &str, preedit: &str) {
        self.actor.text_event(commit, preedit);
    }

    pub fn send_key_press(&self, key: KeyInput) {
        self.actor.send_command(ViewCommand::KeyPress(key));
    }

    pub fn send_key_release(&self, key: KeyInput) {
        self.actor.send_command(ViewCommand::KeyRelease(key));
    }

    pub fn receive_input_event(&mut self, event: InputEvent) {
        self.actor.route_input_event(event);
    }

    pub fn mouse_press(&mut self, point: Point, time_ms: u64, button: MouseButton, modifiers: u32) {
        self.actor
            .mouse_event(MouseEventKind::MouseDown, point, time_ms, button, modifiers);
    }

    pub fn mouse_release(
        &mut self,
        point: Point,
        time_ms: u64,
        button: MouseButton,
        modifiers: u32,
    ) {
        self.actor
            .mouse_event(MouseEventKind::MouseUp, point, time_ms, button, modifiers);
    }

    pub fn mouse_move(&mut self, point: Point, time_ms: u64, button: MouseButton, modifiers: u32) {
        self.actor
            .mouse_event(MouseEventKind::MouseMove, point, time_ms, button, modifiers);
    }

    pub fn pinch_start(&mut self, focus: Point) {
        self.pinch(PinchPhase::Start, focus, 1.0);
    }

    pub fn pinch_update(&mut self, focus: Point, scale: f32) {
        self.pinch(PinchPhase::Update, focus, scale);
    }

    pub fn pinch_end(&mut self, focus: Point, scale: f32) {
        self.pinch(PinchPhase::End, focus, scale);
    }

    fn pinch(&mut self, phase: PinchPhase, focus: Point, scale: f32) {
        // Pinch input is interpreted entirely by the pan-zoom engine.
        self.actor
            .route_input_event(InputEvent::Pinch { phase, focus, scale });
    }

    // ---- scripting interface ----

    pub fn add_message_listener(&self, name: &str) {
        self.actor.send_command(ViewCommand::AddMessageListener {
            name: name.to_owned(),
        });
    }

    pub fn remove_message_listener(&self, name: &str) {
        self.actor.send_command(ViewCommand::RemoveMessageListener {
            name: name.to_owned(),
        });
    }

    pub fn add_message_listeners(&self, names: Vec<String>) {
        self.actor
            .send_command(ViewCommand::AddMessageListeners { names });
    }

    pub fn remove_message_listeners(&self, names: Vec<String>) {
        self.actor
            .send_command(ViewCommand::RemoveMessageListeners { names });
    }

    pub fn send_async_message(&self, name: &str, data: &str) {
        self.actor.send_command(ViewCommand::AsyncMessage {
            name: name.to_owned(),
            data: data.to_owned(),
        });
    }

    // ---- compositor interface ----

    pub fn attach_compositor(&mut self, compositor: Box<dyn Compositor>) {
        self.actor.attach_compositor(compositor);
    }

    pub fn detach_compositor(&mut self) {
        self.actor.detach_compositor();
    }

    pub fn set_surface_size(&mut self, size: Size) {
        self.actor.set_surface_size(size);
    }

    pub fn render_to_buffer(
        &mut self,
        buf: &mut [u8],
        width: u32,
        height: u32,
        stride: u32,
        depth: u32,
    ) -> Result<(), ViewError> {
        self.actor.render_to_buffer(buf, width, height, stride, depth)
    }

    pub fn suspend_rendering(&mut self) {
        self.actor.suspend_rendering();
    }

    pub fn resume_rendering(&mut self) {
        self.actor.resume_rendering();
    }

    pub fn platform_image(&self) -> Option<PlatformImage> {
        self.actor.platform_image()
    }

    // ---- teardown ----

    pub fn request_destroy(&mut self) {
        self.actor.request_destroy();
    }

    pub(crate) fn actor_mut(&mut self) -> &mut ViewActor {
        &mut self.actor
    }

    pub(crate) fn actor(&self) -> &ViewActor {
        &self.actor
    }
}
