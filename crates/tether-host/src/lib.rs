//! Host-process half of a view.
//!
//! `ViewHost` owns the host-side actors, one per view, and routes inbound
//! status from the channel plus marshaled pan-zoom callbacks onto them. The
//! embedding application talks to a view through its [`ViewHandle`] façade
//! and observes it through a [`ViewListener`].

pub mod actor;
pub mod bridge;
pub mod controller;
pub mod handle;
pub mod host;
pub mod listener;

pub use actor::{LifecycleState, ViewActor};
pub use bridge::{Compositor, PanZoom, PanZoomEventSink, PlatformImage};
pub use controller::{ContentController, ContentEvent, ContentListener};
pub use handle::ViewHandle;
pub use host::{HostEvent, ViewHost};
pub use listener::{ViewEvent, ViewListener};
