//! Monitor link: websocket transport, timers and the runtime thread that owns them.
mod link;
mod sink;
mod transport;
mod types;

pub use link::LinkHandle;
pub use sink::EventSink;
pub use transport::{Channel, Transport, TungsteniteTransport};
pub use types::{ConnectionId, LinkError, LinkEvent, TimerId};
