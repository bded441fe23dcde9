//! Monitor core: pure synchronization state machine and view-model helpers.
mod connection;
pub mod duration;
mod effect;
pub mod label;
mod msg;
pub mod protocol;
pub mod router;
mod scheduler;
mod sink;
pub mod statistics;
mod state;
mod update;
mod view_model;

pub use connection::{
    endpoint_for_page, ConnectionEvent, ConnectionId, ConnectionManager, ConnectionState,
    EndpointError, SOCKET_ROUTE_SUFFIX,
};
pub use effect::Effect;
pub use label::{CellWidth, LabelFormatter, TextMeasure};
pub use msg::Msg;
pub use router::LabelLayout;
pub use scheduler::{PollScheduler, SchedulerPhase, TimerId, DEFAULT_TICK_INTERVAL};
pub use sink::{render, StatusSink};
pub use state::{AppState, ClientSettings, Lifecycle};
pub use update::update;
pub use view_model::{
    ActiveStatusView, AppViewModel, LabeledValue, ListView, StatusView, NO_FILES_CONVERTED,
    NO_FILES_TO_CONVERT, NO_FILE_CONVERTING, NO_STATISTICS,
};
