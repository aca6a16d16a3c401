//! Content-process half of a view.
//!
//! `ContentEndpoint` drains the view link and routes commands to per-view
//! `ContentViewActor`s. Each actor owns its page/window instance (built by a
//! task posted to the content loop, so commands can arrive before the window
//! exists), the registered-message-listener gate, touch-block
//! acknowledgement, synthetic mouse dispatch, and the IME composition state
//! machine.

pub mod actor;
pub mod endpoint;
pub mod engine;
pub mod ime;

pub use actor::ContentViewActor;
pub use endpoint::ContentEndpoint;
pub use engine::{
    KeyEventKind, LoadFlags, PageEngine, PageEngineFactory, PageEvent, PageEventSender,
};
pub use ime::{ImeEvent, ImeState, TextRange};
