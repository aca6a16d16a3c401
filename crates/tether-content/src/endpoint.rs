//! Content-process endpoint: drains the view link, owns the per-view actors,
//! and runs the posted window-construction tasks.

use std::collections::HashMap;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::actor::ContentViewActor;
use crate::engine::{PageEngineFactory, PageEvent, PageEventSender};
use tether_common::{Size, ViewId};
use tether_config::TetherConfig;
use tether_protocol::{ChannelReceiver, ChannelSender, Packet, ViewCommand};

pub struct ContentEndpoint {
    tx: ChannelSender,
    rx: ChannelReceiver,
    page_tx: mpsc::UnboundedSender<(ViewId, PageEvent)>,
    page_rx: mpsc::UnboundedReceiver<(ViewId, PageEvent)>,
    factory: Box<dyn PageEngineFactory>,
    config: TetherConfig,
    views: HashMap<ViewId, ContentViewActor>,
    /// Views whose init task has been posted but not yet run. Destruction
    /// cancels the entry before it runs.
    pending_init: Vec<(ViewId, bool)>,
}

impl ContentEndpoint {
    pub fn new(
        factory: Box<dyn PageEngineFactory>,
        config: TetherConfig,
        tx: ChannelSender,
        rx: ChannelReceiver,
    ) -> Self {
        let (page_tx, page_rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx,
            page_tx,
            page_rx,
            factory,
            config,
            views: HashMap::new(),
            pending_init: Vec::new(),
        }
    }

    pub fn view(&self, id: ViewId) -> Option<&ContentViewActor> {
        self.views.get(&id)
    }

    pub fn view_mut(&mut self, id: ViewId) -> Option<&mut ContentViewActor> {
        self.views.get_mut(&id)
    }

    /// Route one inbound packet. Unknown views and commands in states that
    /// no longer accept them are discarded, never an error.
    pub fn handle_packet(&mut self, packet: Packet) {
        match packet {
            Packet::CreateView { view, private } => self.create_view(view, private),
            Packet::Command {
                view,
                command: ViewCommand::Destroy,
            } => self.destroy_view(view),
            Packet::Command { view, command } => match self.views.get_mut(&view) {
                Some(actor) => {
                    if let Err(e) = actor.handle_command(command) {
                        if e.is_soft() {
                            debug!(view = %view, "command deferred: {e}");
                        } else {
                            warn!(view = %view, "command failed: {e}");
                        }
                    }
                }
                None => debug!(view = %view, "command for unknown view discarded"),
            },
            Packet::Status { view, .. } => {
                debug!(view = %view, "status packet on content side discarded");
            }
        }
    }

    fn create_view(&mut self, view: ViewId, private: bool) {
        if self.views.contains_key(&view) {
            warn!(view = %view, "duplicate create ignored");
            return;
        }
        let actor = ContentViewActor::new(view, self.config.clone(), self.tx.clone());
        self.views.insert(view, actor);
        // Window construction happens on a later loop turn, never inline.
        self.pending_init.push((view, private));
        debug!(view = %view, private, "view created, window init posted");
    }

    fn destroy_view(&mut self, view: ViewId) {
        self.pending_init.retain(|(id, _)| *id != view);
        match self.views.remove(&view) {
            Some(mut actor) => actor.destroy(),
            None => debug!(view = %view, "destroy for unknown view discarded"),
        }
    }

    /// Run any posted window-construction tasks. One loop turn's worth of
    /// deferred work; called between message batches by [`Self::run`].
    pub fn run_posted_tasks(&mut self) {
        let pending = std::mem::take(&mut self.pending_init);
        for (view, private) in pending {
            let Some(actor) = self.views.get_mut(&view) else {
                continue;
            };
            let size = Size::new(
                self.config.view.initial_width as f32,
                self.config.view.initial_height as f32,
            );
            let events = PageEventSender::new(view, self.page_tx.clone());
            match self.factory.build(view, size, private, events) {
                Ok(engine) => actor.window_ready(engine),
                Err(e) => warn!(view = %view, "window construction failed: {e}"),
            }
        }
    }

    pub fn handle_page_event(&mut self, view: ViewId, event: PageEvent) {
        match self.views.get_mut(&view) {
            Some(actor) => actor.on_page_event(event),
            None => debug!(view = %view, "page event for unknown view discarded"),
        }
    }

    /// Drain everything currently queued without waiting, then run the
    /// posted tasks that became due. One loop turn's worth of work.
    pub fn pump_pending(&mut self) {
        while let Some(packet) = self.rx.try_recv() {
            self.handle_packet(packet);
        }
        while let Ok((view, event)) = self.page_rx.try_recv() {
            self.handle_page_event(view, event);
        }
        self.run_posted_tasks();
    }

    /// Drive the endpoint until the channel closes.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                packet = self.rx.recv() => match packet {
                    Some(packet) => self.handle_packet(packet),
                    None => {
                        debug!("view link closed, content endpoint stopping");
                        break;
                    }
                },
                Some((view, event)) = self.page_rx.recv() => {
                    self.handle_page_event(view, event);
                }
            }
            self.run_posted_tasks();
        }
    }
}
