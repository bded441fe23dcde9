//! Connection lifecycle as an explicit state machine.
//!
//! The manager never touches a socket. It decides when a connection should be
//! opened, sent to or closed and expresses that as [`Effect`]s; the transport
//! reports back through `opened`/`closed` with the id it was given.

use monitor_logging::{monitor_debug, monitor_info};
use url::Url;

use crate::Effect;

pub type ConnectionId = u64;

/// Route appended to the page path to reach the status socket.
pub const SOCKET_ROUTE_SUFFIX: &str = "ws";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    Connecting,
    Open,
    #[default]
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionEvent {
    OpenRequested,
    Opened,
    Closed,
}

impl ConnectionState {
    /// Transition table; `None` means the event is not valid in this state.
    pub fn on(self, event: ConnectionEvent) -> Option<ConnectionState> {
        use ConnectionEvent as E;
        use ConnectionState as S;
        match (self, event) {
            (S::Closed, E::OpenRequested) => Some(S::Connecting),
            (S::Connecting, E::Opened) => Some(S::Open),
            (S::Connecting, E::Closed) | (S::Open, E::Closed) => Some(S::Closed),
            (S::Connecting, E::OpenRequested)
            | (S::Open, E::OpenRequested)
            | (S::Open, E::Opened)
            | (S::Closed, E::Opened)
            | (S::Closed, E::Closed) => None,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EndpointError {
    #[error("page address {0} cannot carry a websocket scheme")]
    UnsupportedScheme(String),
}

/// Derives the status socket address from the page address.
///
/// `https` pages map to `wss`, everything else to `ws`; the route suffix is
/// appended to the page path.
pub fn endpoint_for_page(page: &Url) -> Result<Url, EndpointError> {
    let scheme = if page.scheme() == "https" { "wss" } else { "ws" };
    let mut endpoint = page.clone();
    endpoint.set_query(None);
    endpoint.set_fragment(None);
    let path = format!("{}{}", endpoint.path(), SOCKET_ROUTE_SUFFIX);
    endpoint.set_path(&path);
    endpoint
        .set_scheme(scheme)
        .map_err(|()| EndpointError::UnsupportedScheme(page.to_string()))?;
    if !endpoint.has_host() {
        return Err(EndpointError::UnsupportedScheme(page.to_string()));
    }
    Ok(endpoint)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionManager {
    endpoint: Url,
    state: ConnectionState,
    current: Option<ConnectionId>,
    next_id: ConnectionId,
}

impl ConnectionManager {
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            state: ConnectionState::Closed,
            current: None,
            next_id: 1,
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn current(&self) -> Option<ConnectionId> {
        self.current
    }

    pub fn is_open(&self) -> bool {
        self.state == ConnectionState::Open
    }

    pub fn is_connecting(&self) -> bool {
        self.state == ConnectionState::Connecting
    }

    /// Opens a new connection unless one is open or already opening.
    pub fn ensure_open(&mut self, effects: &mut Vec<Effect>) {
        let Some(next) = self.state.on(ConnectionEvent::OpenRequested) else {
            return;
        };
        let connection = self.next_id;
        self.next_id += 1;
        self.current = Some(connection);
        self.state = next;
        monitor_info!("Opening connection {} to {}", connection, self.endpoint);
        effects.push(Effect::OpenConnection {
            connection,
            url: self.endpoint.to_string(),
        });
    }

    /// Applies `Opened`; true only the first time the live connection opens.
    pub fn opened(&mut self, connection: ConnectionId) -> bool {
        if !self.accepts(connection) {
            monitor_debug!("Ignoring open of superseded connection {}", connection);
            return false;
        }
        self.apply(ConnectionEvent::Opened)
    }

    pub fn closed(&mut self, connection: ConnectionId) -> bool {
        if !self.accepts(connection) {
            monitor_debug!("Ignoring close of superseded connection {}", connection);
            return false;
        }
        self.apply(ConnectionEvent::Closed)
    }

    pub fn accepts(&self, connection: ConnectionId) -> bool {
        self.current == Some(connection)
    }

    /// Sends only while open; otherwise silently dropped.
    pub fn send(&self, payload: String, effects: &mut Vec<Effect>) {
        if let (ConnectionState::Open, Some(connection)) = (self.state, self.current) {
            effects.push(Effect::SendFrame {
                connection,
                payload,
            });
        }
    }

    pub fn close(&mut self, effects: &mut Vec<Effect>) {
        if let Some(connection) = self.current {
            if self.state != ConnectionState::Closed {
                effects.push(Effect::CloseConnection { connection });
            }
        }
        self.state = ConnectionState::Closed;
    }

    fn apply(&mut self, event: ConnectionEvent) -> bool {
        match self.state.on(event) {
            Some(next) => {
                monitor_debug!("Connection {:?} -> {:?} on {:?}", self.state, next, event);
                self.state = next;
                true
            }
            None => {
                monitor_debug!("Connection event {:?} rejected in {:?}", event, self.state);
                false
            }
        }
    }
}
