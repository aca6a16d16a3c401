use serde::{Deserialize, Serialize};
use std::fmt;

/// Short hex correlation id used to pair a sync/rpc message with its reply.
pub fn new_correlation_id() -> String {
    let uuid = uuid::Uuid::new_v4();
    let bytes = uuid.as_bytes();
    format!(
        "{:02x}{:02x}{:02x}{:02x}",
        bytes[0], bytes[1], bytes[2], bytes[3]
    )
}

/// Process-wide unique view identifier. Allocated by the host side at view
/// creation, stable for the view's lifetime, never reused while either actor
/// half still references it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewId(pub u32);

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view-{}", self.0)
    }
}

/// Identifier of one routed touch block. Monotonically increasing, assigned
/// by the host per discrete touch gesture; correlates an injected touch
/// sequence with the content side's consume/ignore decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InputBlockId(pub u64);

impl InputBlockId {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for InputBlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "block-{}", self.0)
    }
}
