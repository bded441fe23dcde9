use std::sync::mpsc;
use std::sync::Arc;

use chrono::Local;
use monitor_core::{Effect, Msg};
use monitor_link::{EventSink, LinkError, LinkEvent, LinkHandle, Transport};
use monitor_logging::monitor_debug;

/// Executes core effects on the link runtime.
pub struct EffectRunner {
    link: LinkHandle,
}

impl EffectRunner {
    pub fn new(transport: Arc<dyn Transport>, msg_tx: mpsc::Sender<Msg>) -> Result<Self, LinkError> {
        let link = LinkHandle::new(transport, Arc::new(MsgEventSink { msg_tx }))?;
        Ok(Self { link })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::OpenConnection { connection, url } => self.link.open(connection, url),
                Effect::SendFrame {
                    connection,
                    payload,
                } => self.link.send(connection, payload),
                Effect::CloseConnection { connection } => {
                    monitor_debug!("Closing connection {}", connection);
                    self.link.close(connection);
                }
                Effect::ScheduleTick { timer, after } => self.link.schedule(timer, after),
                Effect::CancelTick { timer } => self.link.cancel(timer),
            }
        }
    }

    pub fn shutdown(&mut self) {
        self.link.shutdown();
    }
}

/// Posts link events into the client inbox.
struct MsgEventSink {
    msg_tx: mpsc::Sender<Msg>,
}

impl EventSink for MsgEventSink {
    fn emit(&self, event: LinkEvent) {
        if self.msg_tx.send(map_event(event)).is_err() {
            monitor_debug!("Client inbox closed; link event dropped");
        }
    }
}

fn map_event(event: LinkEvent) -> Msg {
    match event {
        LinkEvent::Opened { connection } => Msg::ConnectionOpened { connection },
        LinkEvent::Closed { connection } => Msg::ConnectionClosed { connection },
        LinkEvent::Frame { connection, text } => Msg::FrameReceived {
            connection,
            text,
            received_at: Local::now(),
        },
        LinkEvent::TimerFired { timer } => Msg::TimerFired { timer },
    }
}
