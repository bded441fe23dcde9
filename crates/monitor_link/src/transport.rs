use futures_util::{SinkExt, StreamExt};
use monitor_logging::{monitor_debug, monitor_warn};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::LinkError;

/// An open, bidirectional text channel.
#[async_trait::async_trait]
pub trait Channel: Send {
    async fn send(&mut self, text: String) -> Result<(), LinkError>;

    /// Next text frame; `None` once the peer has gone away.
    async fn recv(&mut self) -> Option<String>;

    async fn close(&mut self);
}

#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn connect(&self, url: &str) -> Result<Box<dyn Channel>, LinkError>;
}

/// Websocket transport; `wss` goes through rustls.
#[derive(Debug, Default, Clone, Copy)]
pub struct TungsteniteTransport;

impl TungsteniteTransport {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl Transport for TungsteniteTransport {
    async fn connect(&self, url: &str) -> Result<Box<dyn Channel>, LinkError> {
        let (stream, response) = connect_async(url).await.map_err(|err| LinkError::Connect {
            url: url.to_string(),
            message: err.to_string(),
        })?;
        monitor_debug!("Websocket handshake with {} returned {}", url, response.status());
        Ok(Box::new(TungsteniteChannel { stream }))
    }
}

struct TungsteniteChannel {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait::async_trait]
impl Channel for TungsteniteChannel {
    async fn send(&mut self, text: String) -> Result<(), LinkError> {
        self.stream
            .send(Message::Text(text))
            .await
            .map_err(|err| LinkError::Io(err.to_string()))
    }

    async fn recv(&mut self) -> Option<String> {
        while let Some(message) = self.stream.next().await {
            match message {
                Ok(Message::Text(text)) => return Some(text),
                Ok(Message::Close(frame)) => {
                    monitor_debug!("Peer closed websocket: {:?}", frame);
                    return None;
                }
                // Control and binary frames carry nothing for the view.
                Ok(_) => continue,
                Err(err) => {
                    monitor_warn!("Websocket read failed: {}", err);
                    return None;
                }
            }
        }
        None
    }

    async fn close(&mut self) {
        if let Err(err) = self.stream.close(None).await {
            monitor_debug!("Websocket close failed: {}", err);
        }
    }
}
