//! Status interface toward the embedding application.
//!
//! One flat capability: status arrives as a single enum, and the only
//! pull-style capability (sync-message replies) is an optional method with a
//! no-answer default. No inheritance chain to implement.

use tether_common::{Color, ImeStatus, ViewId};

/// Everything a view reports back to its embedder.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    /// The content-side window is up; the view accepts API calls.
    Initialized,
    LocationChanged {
        url: String,
        can_go_back: bool,
        can_go_forward: bool,
    },
    LoadStarted { url: String },
    LoadFinished,
    LoadRedirect,
    LoadProgress {
        progress: i32,
        cur_total: i32,
        max_total: i32,
    },
    SecurityChanged { status: String, state: u32 },
    FirstPaint { x: i32, y: i32 },
    ScrolledAreaChanged { width: u32, height: u32 },
    ScrollChanged { x: i32, y: i32 },
    TitleChanged { title: String },
    BackgroundColor { color: Color },
    WindowCloseRequested,
    /// A script message that passed the content-side listener gate.
    AsyncMessage { name: String, data: String },
    ImeStateChanged(ImeStatus),
}

pub trait ViewListener: Send + Sync {
    fn on_view_event(&self, view: ViewId, event: ViewEvent);

    /// Answer a sync/rpc script message. `None` produces an empty reply.
    fn recv_sync_message(&self, _view: ViewId, _name: &str, _data: &str) -> Option<String> {
        None
    }
}
