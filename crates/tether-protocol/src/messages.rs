//! Message shapes for the view link. Commands flow host → content, status
//! flows content → host; both directions are multiplexed per view by the
//! enclosing [`Packet`].

use serde::{Deserialize, Serialize};

use tether_common::{
    Color, FrameMetrics, ImeStatus, InputBlockId, KeyInput, MouseButton, MouseEventKind, Point,
    Rect, ScrollableLayerGuid, Size, TouchBatch, ViewId, ZoomConstraints,
};

/// Top-level frame on the channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Packet {
    /// Host asks the content process to build the child half of a view.
    CreateView { view: ViewId, private: bool },
    /// Host → content command for one view.
    Command { view: ViewId, command: ViewCommand },
    /// Content → host status for one view.
    Status { view: ViewId, status: ViewStatus },
}

/// Commands the host-side actor sends to its content-side peer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ViewCommand {
    LoadUrl { url: String },
    GoBack,
    GoForward,
    StopLoad,
    Reload { hard: bool },
    SetActive { active: bool },
    SetFocused { focused: bool },
    SetViewSize { size: Size },
    SetSurfaceSize { size: Size },
    SuspendTimeouts,
    ResumeTimeouts,

    AddMessageListener { name: String },
    RemoveMessageListener { name: String },
    AddMessageListeners { names: Vec<String> },
    RemoveMessageListeners { names: Vec<String> },
    AsyncMessage { name: String, data: String },
    /// Reply to a content-side sync/rpc message, paired by correlation id.
    SyncReply { correlation: String, values: Vec<String> },

    HandleTextEvent { commit: String, preedit: String },
    KeyPress(KeyInput),
    KeyRelease(KeyInput),
    MouseEvent {
        kind: MouseEventKind,
        x: i32,
        y: i32,
        button: MouseButton,
        click_count: i32,
        modifiers: u32,
    },

    /// One non-move touch batch, tagged with its input block.
    Touch {
        guid: ScrollableLayerGuid,
        batch: TouchBatch,
        block_id: InputBlockId,
    },
    /// A move batch. Split out so the transport may coalesce moves without
    /// touching gesture boundaries.
    TouchMove {
        guid: ScrollableLayerGuid,
        batch: TouchBatch,
        block_id: InputBlockId,
    },

    HandleSingleTap { point: Point },
    HandleDoubleTap { point: Point },
    HandleLongTap {
        point: Point,
        guid: ScrollableLayerGuid,
        block_id: InputBlockId,
    },

    UpdateFrame { metrics: FrameMetrics },
    AsyncScrollEvent { content_rect: Rect, scrollable_size: Size },
    AcknowledgeScrollUpdate { scroll_id: u64, generation: u32 },

    Destroy,
}

/// Status the content-side actor sends to its host-side peer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ViewStatus {
    /// The asynchronously constructed window is up; the view accepts
    /// navigation from here on.
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

    AsyncMessage { name: String, data: String },
    SyncMessage {
        correlation: String,
        name: String,
        data: String,
    },
    RpcMessage {
        correlation: String,
        name: String,
        data: String,
    },

    ImeStateChanged(ImeStatus),

    UpdateZoomConstraints {
        pres_shell_id: u32,
        scroll_id: u64,
        is_root: bool,
        constraints: ZoomConstraints,
    },
    ZoomToRect {
        pres_shell_id: u32,
        scroll_id: u64,
        rect: Rect,
    },

    /// Consume/ignore decision for a routed touch block. Must be emitted at
    /// most once per block id, in non-decreasing block id order.
    ContentReceivedInputBlock {
        guid: ScrollableLayerGuid,
        block_id: InputBlockId,
        prevent_default: bool,
    },

    /// Channel-level teardown acknowledgement closing the destroy handshake.
    DestroyAck,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tether_common::TouchPhase;

    #[test]
    fn packet_roundtrip() {
        let packet = Packet::Command {
            view: ViewId(3),
            command: ViewCommand::LoadUrl {
                url: "https://example.org".into(),
            },
        };
        let json = serde_json::to_string(&packet).unwrap();
        let deserialized: Packet = serde_json::from_str(&json).unwrap();
        assert_eq!(packet, deserialized);
    }

    #[test]
    fn packet_tagging() {
        let packet = Packet::CreateView {
            view: ViewId(1),
            private: true,
        };
        let json = serde_json::to_string(&packet).unwrap();
        assert!(json.contains("\"type\":\"CreateView\""));
    }

    #[test]
    fn touch_command_carries_block() {
        let cmd = ViewCommand::Touch {
            guid: ScrollableLayerGuid::new(1, 1, 4),
            batch: TouchBatch::single(TouchPhase::Start, 0, 0, Point::new(5, 5)),
            block_id: InputBlockId(11),
        };
        let json = serde_json::to_string(&cmd).unwrap();
        let deserialized: ViewCommand = serde_json::from_str(&json).unwrap();
        match deserialized {
            ViewCommand::Touch { block_id, .. } => assert_eq!(block_id, InputBlockId(11)),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn ack_status_roundtrip() {
        let status = ViewStatus::ContentReceivedInputBlock {
            guid: ScrollableLayerGuid::default(),
            block_id: InputBlockId(2),
            prevent_default: false,
        };
        let json = serde_json::to_string(&status).unwrap();
        let deserialized: ViewStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(status, deserialized);
    }
}
