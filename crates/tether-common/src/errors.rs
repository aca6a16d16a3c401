use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    /// A required local resource (window, navigation interface) is not yet
    /// constructed. Soft result; callers log and continue.
    #[error("view not ready")]
    NotReady,

    /// The view has entered destruction and no longer accepts the operation.
    #[error("view destroyed")]
    Destroyed,

    /// The message channel to the peer process has closed.
    #[error("channel closed")]
    ChannelClosed,

    /// The page/layout or rendering engine reported a failure. Propagated to
    /// the immediate caller, never retried.
    #[error("engine error: {0}")]
    Engine(String),

    #[error("unsupported surface depth: {0}")]
    UnsupportedDepth(u32),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ViewError {
    /// Soft errors are expected runtime conditions, not failures.
    pub fn is_soft(&self) -> bool {
        matches!(self, Self::NotReady | Self::Destroyed)
    }
}
