//! Wire contract between the two halves of a view.
//!
//! Every command/status crossing the process boundary is a discrete, named
//! message with a fixed payload shape. The transport itself (framing, actual
//! serialization) is an external collaborator; the [`channel`] module
//! provides the ordered, reliable, asynchronous in-process link used to wire
//! two endpoints together and to drive the protocol in tests.

pub mod channel;
pub mod messages;

pub use channel::{channel, ChannelReceiver, ChannelSender};
pub use messages::{Packet, ViewCommand, ViewStatus};
