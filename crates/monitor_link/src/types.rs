use std::time::Duration;

pub type ConnectionId = u64;
pub type TimerId = u64;

/// Notifications posted back from the link runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    Opened { connection: ConnectionId },
    /// Closed by either side, or the open attempt failed.
    Closed { connection: ConnectionId },
    Frame { connection: ConnectionId, text: String },
    TimerFired { timer: TimerId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LinkCommand {
    Open { connection: ConnectionId, url: String },
    Send { connection: ConnectionId, payload: String },
    Close { connection: ConnectionId },
    Schedule { timer: TimerId, after: Duration },
    Cancel { timer: TimerId },
    Shutdown,
}

#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error("failed to connect to {url}: {message}")]
    Connect { url: String, message: String },
    #[error("connection lost: {0}")]
    Io(String),
    #[error("failed to start link runtime: {0}")]
    Runtime(#[from] std::io::Error),
}
