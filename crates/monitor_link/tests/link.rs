use std::collections::HashSet;
use std::sync::mpsc;
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use monitor_link::{Channel, EventSink, LinkError, LinkEvent, LinkHandle, Transport};
use tokio::sync::mpsc as async_mpsc;

const WAIT: Duration = Duration::from_secs(2);
const QUIET: Duration = Duration::from_millis(200);

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(monitor_logging::initialize_for_tests);
}

struct ChannelSink {
    tx: mpsc::Sender<LinkEvent>,
}

impl EventSink for ChannelSink {
    fn emit(&self, event: LinkEvent) {
        let _ = self.tx.send(event);
    }
}

/// Channel that answers every payload with `echo:<payload>`.
/// A `bye` payload hangs up from the peer side.
struct EchoChannel {
    echo_tx: Option<async_mpsc::UnboundedSender<String>>,
    echo_rx: async_mpsc::UnboundedReceiver<String>,
    closed: Arc<Mutex<u32>>,
}

#[async_trait::async_trait]
impl Channel for EchoChannel {
    async fn send(&mut self, text: String) -> Result<(), LinkError> {
        if text == "bye" {
            self.echo_tx = None;
            return Ok(());
        }
        match &self.echo_tx {
            Some(tx) => {
                let _ = tx.send(format!("echo:{text}"));
                Ok(())
            }
            None => Err(LinkError::Io("hung up".to_string())),
        }
    }

    async fn recv(&mut self) -> Option<String> {
        self.echo_rx.recv().await
    }

    async fn close(&mut self) {
        *self.closed.lock().unwrap() += 1;
    }
}

#[derive(Default)]
struct EchoTransport {
    refuse: bool,
    closed: Arc<Mutex<u32>>,
    urls: Arc<Mutex<Vec<String>>>,
}

#[async_trait::async_trait]
impl Transport for EchoTransport {
    async fn connect(&self, url: &str) -> Result<Box<dyn Channel>, LinkError> {
        self.urls.lock().unwrap().push(url.to_string());
        if self.refuse {
            return Err(LinkError::Connect {
                url: url.to_string(),
                message: "refused".to_string(),
            });
        }
        let (echo_tx, echo_rx) = async_mpsc::unbounded_channel();
        Ok(Box::new(EchoChannel {
            echo_tx: Some(echo_tx),
            echo_rx,
            closed: self.closed.clone(),
        }))
    }
}

fn start(transport: EchoTransport) -> (LinkHandle, mpsc::Receiver<LinkEvent>) {
    init_logging();
    let (tx, rx) = mpsc::channel();
    let handle = LinkHandle::new(Arc::new(transport), Arc::new(ChannelSink { tx }))
        .expect("link runtime starts");
    (handle, rx)
}

fn drain(rx: &mpsc::Receiver<LinkEvent>) -> Vec<LinkEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.recv_timeout(QUIET) {
        events.push(event);
    }
    events
}

#[test]
fn open_send_and_receive_frames() {
    let transport = EchoTransport::default();
    let urls = transport.urls.clone();
    let (handle, rx) = start(transport);

    handle.open(1, "ws://localhost:8000/ws");
    assert_eq!(rx.recv_timeout(WAIT).unwrap(), LinkEvent::Opened { connection: 1 });
    assert_eq!(urls.lock().unwrap().as_slice(), ["ws://localhost:8000/ws"]);

    handle.send(1, "ping");
    assert_eq!(
        rx.recv_timeout(WAIT).unwrap(),
        LinkEvent::Frame {
            connection: 1,
            text: "echo:ping".to_string()
        }
    );
}

#[test]
fn failed_connect_reports_closed() {
    let (handle, rx) = start(EchoTransport {
        refuse: true,
        ..EchoTransport::default()
    });

    handle.open(3, "ws://unreachable.invalid/ws");
    assert_eq!(rx.recv_timeout(WAIT).unwrap(), LinkEvent::Closed { connection: 3 });
    assert!(drain(&rx).is_empty());
}

#[test]
fn peer_hangup_reports_closed() {
    let (handle, rx) = start(EchoTransport::default());

    handle.open(1, "ws://localhost/ws");
    assert_eq!(rx.recv_timeout(WAIT).unwrap(), LinkEvent::Opened { connection: 1 });
    handle.send(1, "bye");
    assert_eq!(rx.recv_timeout(WAIT).unwrap(), LinkEvent::Closed { connection: 1 });
}

#[test]
fn close_shuts_the_channel_gracefully() {
    let transport = EchoTransport::default();
    let closed = transport.closed.clone();
    let (handle, rx) = start(transport);

    handle.open(1, "ws://localhost/ws");
    assert_eq!(rx.recv_timeout(WAIT).unwrap(), LinkEvent::Opened { connection: 1 });
    handle.close(1);
    assert_eq!(rx.recv_timeout(WAIT).unwrap(), LinkEvent::Closed { connection: 1 });
    assert_eq!(*closed.lock().unwrap(), 1);
}

#[test]
fn reopening_replaces_the_previous_connection() {
    let (handle, rx) = start(EchoTransport::default());

    handle.open(1, "ws://localhost/ws");
    handle.open(2, "ws://localhost/ws");
    handle.send(1, "stale");
    handle.send(2, "fresh");

    let events: HashSet<_> = drain(&rx).into_iter().map(|e| format!("{e:?}")).collect();
    let expected: HashSet<_> = [
        LinkEvent::Opened { connection: 1 },
        LinkEvent::Closed { connection: 1 },
        LinkEvent::Opened { connection: 2 },
        LinkEvent::Frame {
            connection: 2,
            text: "echo:fresh".to_string(),
        },
    ]
    .iter()
    .map(|e| format!("{e:?}"))
    .collect();
    assert_eq!(events, expected);
}

#[test]
fn timers_fire_once_and_cancel_suppresses() {
    let (handle, rx) = start(EchoTransport::default());

    handle.schedule(7, Duration::from_millis(20));
    assert_eq!(rx.recv_timeout(WAIT).unwrap(), LinkEvent::TimerFired { timer: 7 });

    handle.schedule(8, Duration::from_millis(80));
    handle.cancel(8);
    assert!(drain(&rx).is_empty());
}

#[test]
fn shutdown_closes_live_connection() {
    let (mut handle, rx) = start(EchoTransport::default());

    handle.open(1, "ws://localhost/ws");
    assert_eq!(rx.recv_timeout(WAIT).unwrap(), LinkEvent::Opened { connection: 1 });
    handle.schedule(1, Duration::from_secs(30));

    handle.shutdown();
    assert_eq!(drain(&rx), vec![LinkEvent::Closed { connection: 1 }]);
    // Second shutdown is a no-op.
    handle.shutdown();
}
