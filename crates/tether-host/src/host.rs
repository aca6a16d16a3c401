//! Host endpoint: allocates views, routes inbound status packets and
//! marshaled pan-zoom tasks onto the owning actors, and surfaces host-level
//! lifecycle events to the application.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::actor::ViewActor;
use crate::bridge::PanZoom;
use crate::controller::ControllerTask;
use crate::handle::ViewHandle;
use tether_common::ViewId;
use tether_config::TetherConfig;
use tether_protocol::{ChannelReceiver, ChannelSender, Packet, ViewStatus};

/// Application-level notifications that outlive any single listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// The view is gone and will produce nothing further. Emitted from the
    /// destroy handshake or channel close; for views that never had a
    /// compositor attached this is the only teardown signal the application
    /// receives.
    ViewGone(ViewId),
}

pub struct ViewHost {
    tx: ChannelSender,
    rx: ChannelReceiver,
    tasks_tx: mpsc::UnboundedSender<ControllerTask>,
    tasks_rx: mpsc::UnboundedReceiver<ControllerTask>,
    pan_zoom: Arc<dyn PanZoom>,
    config: TetherConfig,
    views: HashMap<ViewId, ViewHandle>,
    events: Vec<HostEvent>,
    next_view_id: u32,
    closed: bool,
}

impl ViewHost {
    pub fn new(
        pan_zoom: Arc<dyn PanZoom>,
        config: TetherConfig,
        tx: ChannelSender,
        rx: ChannelReceiver,
    ) -> Self {
        let (tasks_tx, tasks_rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx,
            tasks_tx,
            tasks_rx,
            pan_zoom,
            config,
            views: HashMap::new(),
            events: Vec::new(),
            next_view_id: 0,
            closed: false,
        }
    }

    /// Create a view pair: allocates the id, builds the host-side actor and
    /// asks the content process to build its half.
    pub fn create_view(&mut self, private: bool) -> ViewId {
        self.next_view_id += 1;
        let id = ViewId(self.next_view_id);
        let actor = ViewActor::new(
            id,
            self.config.clone(),
            self.tx.clone(),
            Arc::clone(&self.pan_zoom),
            self.tasks_tx.clone(),
        );
        self.views.insert(id, ViewHandle::new(actor));
        if self.tx.send(Packet::CreateView { view: id, private }).is_err() {
            warn!(view = %id, "create request dropped, view link closed");
        }
        debug!(view = %id, private, "view created");
        id
    }

    pub fn view(&self, id: ViewId) -> Option<&ViewHandle> {
        self.views.get(&id)
    }

    pub fn view_mut(&mut self, id: ViewId) -> Option<&mut ViewHandle> {
        self.views.get_mut(&id)
    }

    pub fn view_count(&self) -> usize {
        self.views.len()
    }

    /// Drain host-level events collected since the last call.
    pub fn drain_events(&mut self) -> Vec<HostEvent> {
        std::mem::take(&mut self.events)
    }

    /// Route one inbound packet from the content side.
    pub fn handle_packet(&mut self, packet: Packet) {
        match packet {
            Packet::Status { view, status } => {
                let destroy_ack = matches!(status, ViewStatus::DestroyAck);
                match self.views.get_mut(&view) {
                    Some(handle) => {
                        handle.actor_mut().on_child_status(status);
                        if destroy_ack {
                            self.finish_view(view);
                        }
                    }
                    None => debug!(view = %view, "status for unknown view discarded"),
                }
            }
            other => debug!("non-status packet on host side discarded: {other:?}"),
        }
    }

    /// Apply one marshaled pan-zoom callback.
    pub fn process_task(&mut self, task: ControllerTask) {
        let view = match task {
            ControllerTask::Repaint { view, .. }
            | ControllerTask::SingleTap { view, .. }
            | ControllerTask::DoubleTap { view, .. }
            | ControllerTask::LongTap { view, .. }
            | ControllerTask::AsyncScroll { view, .. }
            | ControllerTask::AckScrollUpdate { view, .. } => view,
        };
        match self.views.get_mut(&view) {
            Some(handle) => handle.actor_mut().on_controller_task(task),
            None => debug!(view = %view, "task for unknown view discarded"),
        }
    }

    /// The channel-closed notification: every remaining view completes its
    /// destroy transition, whether or not a handshake was in flight.
    pub fn on_channel_closed(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        debug!("view link closed, tearing down {} views", self.views.len());
        let ids: Vec<ViewId> = self.views.keys().copied().collect();
        for id in ids {
            self.finish_view(id);
        }
    }

    /// Drain everything currently queued without waiting.
    pub fn pump_pending(&mut self) {
        while let Ok(task) = self.tasks_rx.try_recv() {
            self.process_task(task);
        }
        while let Some(packet) = self.rx.try_recv() {
            self.handle_packet(packet);
        }
    }

    /// Process inbound traffic until the channel closes.
    pub async fn run(&mut self) {
        loop {
            tokio::select! {
                packet = self.rx.recv() => match packet {
                    Some(packet) => self.handle_packet(packet),
                    None => {
                        self.on_channel_closed();
                        break;
                    }
                },
                Some(task) = self.tasks_rx.recv() => self.process_task(task),
            }
        }
    }

    fn finish_view(&mut self, id: ViewId) {
        let Some(handle) = self.views.get_mut(&id) else {
            return;
        };
        if handle.actor_mut().complete_destroy() {
            // Without a compositor there is nobody else to tell the
            // application the view is gone.
            if !handle.actor().had_compositor() {
                self.events.push(HostEvent::ViewGone(id));
            }
        }
        self.views.remove(&id);
    }
}
