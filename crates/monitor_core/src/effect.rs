use std::time::Duration;

use crate::{ConnectionId, TimerId};

/// IO requested by [`crate::update`]; executed by the platform layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    OpenConnection { connection: ConnectionId, url: String },
    SendFrame { connection: ConnectionId, payload: String },
    CloseConnection { connection: ConnectionId },
    ScheduleTick { timer: TimerId, after: Duration },
    CancelTick { timer: TimerId },
}
