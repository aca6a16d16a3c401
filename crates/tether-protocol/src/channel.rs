//! In-process reference implementation of the view link: ordered, reliable
//! delivery with no timing guarantee. One direction of the link; endpoints
//! hold a sender for their outbound direction and a receiver for inbound.

use tokio::sync::mpsc;
use tracing::debug;

use crate::messages::Packet;
use tether_common::ViewError;

/// Sending half. Cheap to clone; all clones feed the same ordered queue.
#[derive(Debug, Clone)]
pub struct ChannelSender {
    tx: mpsc::UnboundedSender<Packet>,
}

impl ChannelSender {
    /// Enqueue a packet. Never blocks. Fails only when the receiving side
    /// has gone away.
    pub fn send(&self, packet: Packet) -> Result<(), ViewError> {
        self.tx.send(packet).map_err(|_| ViewError::ChannelClosed)
    }

    /// Whether the peer endpoint has dropped its receiver.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Receiving half of one direction of the link.
#[derive(Debug)]
pub struct ChannelReceiver {
    rx: mpsc::UnboundedReceiver<Packet>,
}

impl ChannelReceiver {
    /// Await the next packet. `None` is the channel-closed notification.
    pub async fn recv(&mut self) -> Option<Packet> {
        let packet = self.rx.recv().await;
        if packet.is_none() {
            debug!("view link closed");
        }
        packet
    }

    /// Drain without waiting. Used by single-threaded loop turns and tests.
    pub fn try_recv(&mut self) -> Option<Packet> {
        self.rx.try_recv().ok()
    }
}

/// Build one direction of a view link.
pub fn channel() -> (ChannelSender, ChannelReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ChannelSender { tx }, ChannelReceiver { rx })
}
