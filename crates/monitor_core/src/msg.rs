use chrono::{DateTime, Local};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Page is ready: open the connection.
    Started,
    /// Tear down the connection and the pending tick.
    Stopped,
    FocusGained,
    FocusLost,
    /// The available label width changed.
    Resized { width: usize },
    /// A scheduled tick elapsed.
    TimerFired { timer: crate::TimerId },
    ConnectionOpened { connection: crate::ConnectionId },
    /// Connection closed or failed to open.
    ConnectionClosed { connection: crate::ConnectionId },
    FrameReceived {
        connection: crate::ConnectionId,
        text: String,
        received_at: DateTime<Local>,
    },
}
