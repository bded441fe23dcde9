use std::collections::HashMap;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use monitor_logging::{monitor_debug, monitor_info, monitor_warn};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::types::LinkCommand;
use crate::{ConnectionId, EventSink, LinkError, LinkEvent, TimerId, Transport};

/// Time allowed for a close handshake when the runtime shuts down.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(500);

/// Handle to the IO runtime thread that owns the socket and the timers.
pub struct LinkHandle {
    cmd_tx: mpsc::UnboundedSender<LinkCommand>,
    thread: Option<thread::JoinHandle<()>>,
}

impl LinkHandle {
    pub fn new(transport: Arc<dyn Transport>, sink: Arc<dyn EventSink>) -> Result<Self, LinkError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();

        let thread = thread::Builder::new()
            .name("monitor-link".to_string())
            .spawn(move || runtime.block_on(run(cmd_rx, transport, sink)))?;

        Ok(Self {
            cmd_tx,
            thread: Some(thread),
        })
    }

    /// Opens `url`, replacing any live connection.
    pub fn open(&self, connection: ConnectionId, url: impl Into<String>) {
        self.submit(LinkCommand::Open {
            connection,
            url: url.into(),
        });
    }

    pub fn send(&self, connection: ConnectionId, payload: impl Into<String>) {
        self.submit(LinkCommand::Send {
            connection,
            payload: payload.into(),
        });
    }

    pub fn close(&self, connection: ConnectionId) {
        self.submit(LinkCommand::Close { connection });
    }

    pub fn schedule(&self, timer: TimerId, after: Duration) {
        self.submit(LinkCommand::Schedule { timer, after });
    }

    pub fn cancel(&self, timer: TimerId) {
        self.submit(LinkCommand::Cancel { timer });
    }

    /// Stops the runtime and waits for the thread. Idempotent.
    pub fn shutdown(&mut self) {
        let Some(thread) = self.thread.take() else {
            return;
        };
        let _ = self.cmd_tx.send(LinkCommand::Shutdown);
        if thread.join().is_err() {
            monitor_warn!("Link runtime thread panicked");
        }
    }

    fn submit(&self, command: LinkCommand) {
        if self.cmd_tx.send(command).is_err() {
            monitor_warn!("Link runtime is gone; dropping command");
        }
    }
}

impl Drop for LinkHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

struct LiveConnection {
    connection: ConnectionId,
    outbound: mpsc::UnboundedSender<String>,
    task: JoinHandle<()>,
}

async fn run(
    mut cmd_rx: mpsc::UnboundedReceiver<LinkCommand>,
    transport: Arc<dyn Transport>,
    sink: Arc<dyn EventSink>,
) {
    let mut live: Option<LiveConnection> = None;
    let mut timers: HashMap<TimerId, JoinHandle<()>> = HashMap::new();

    while let Some(command) = cmd_rx.recv().await {
        match command {
            LinkCommand::Open { connection, url } => {
                // Dropping the old sender lets its task close gracefully.
                if let Some(previous) = live.take() {
                    monitor_debug!("Connection {} replaced by {}", previous.connection, connection);
                }
                let (outbound, outbound_rx) = mpsc::unbounded_channel();
                let task = tokio::spawn(drive_connection(
                    transport.clone(),
                    sink.clone(),
                    connection,
                    url,
                    outbound_rx,
                ));
                live = Some(LiveConnection {
                    connection,
                    outbound,
                    task,
                });
            }
            LinkCommand::Send {
                connection,
                payload,
            } => match &live {
                Some(current) if current.connection == connection => {
                    if current.outbound.send(payload).is_err() {
                        monitor_debug!("Connection {} already finished; send dropped", connection);
                    }
                }
                _ => monitor_debug!("Send to inactive connection {} dropped", connection),
            },
            LinkCommand::Close { connection } => {
                if live.as_ref().is_some_and(|current| current.connection == connection) {
                    live = None;
                }
            }
            LinkCommand::Schedule { timer, after } => {
                timers.retain(|_, handle| !handle.is_finished());
                let sink = sink.clone();
                let handle = tokio::spawn(async move {
                    tokio::time::sleep(after).await;
                    sink.emit(LinkEvent::TimerFired { timer });
                });
                if let Some(replaced) = timers.insert(timer, handle) {
                    replaced.abort();
                }
            }
            LinkCommand::Cancel { timer } => {
                if let Some(handle) = timers.remove(&timer) {
                    handle.abort();
                }
            }
            LinkCommand::Shutdown => break,
        }
    }

    for (_, handle) in timers {
        handle.abort();
    }
    if let Some(current) = live {
        drop(current.outbound);
        if tokio::time::timeout(SHUTDOWN_GRACE, current.task).await.is_err() {
            monitor_debug!("Connection {} did not close in time", current.connection);
        }
    }
    monitor_info!("Link runtime stopped");
}

async fn drive_connection(
    transport: Arc<dyn Transport>,
    sink: Arc<dyn EventSink>,
    connection: ConnectionId,
    url: String,
    mut outbound: mpsc::UnboundedReceiver<String>,
) {
    let mut channel = match transport.connect(&url).await {
        Ok(channel) => channel,
        Err(err) => {
            monitor_warn!("Connection {} failed: {}", connection, err);
            sink.emit(LinkEvent::Closed { connection });
            return;
        }
    };
    sink.emit(LinkEvent::Opened { connection });

    loop {
        tokio::select! {
            payload = outbound.recv() => match payload {
                Some(payload) => {
                    if let Err(err) = channel.send(payload).await {
                        monitor_warn!("Connection {} send failed: {}", connection, err);
                        break;
                    }
                }
                None => {
                    channel.close().await;
                    break;
                }
            },
            frame = channel.recv() => match frame {
                Some(text) => sink.emit(LinkEvent::Frame { connection, text }),
                None => break,
            },
        }
    }
    sink.emit(LinkEvent::Closed { connection });
}
