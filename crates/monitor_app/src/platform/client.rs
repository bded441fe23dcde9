use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use monitor_core::{
    render, update, AppState, AppViewModel, ClientSettings, Lifecycle, Msg, StatusSink,
};
use monitor_link::{LinkError, Transport};

use super::effects::EffectRunner;

const IDLE_WAIT: Duration = Duration::from_millis(250);

/// Owns the client state and drives it from a single inbox.
pub struct SyncClient<S: StatusSink> {
    state: Option<AppState>,
    msg_tx: mpsc::Sender<Msg>,
    msg_rx: mpsc::Receiver<Msg>,
    runner: EffectRunner,
    sink: S,
}

impl<S: StatusSink> SyncClient<S> {
    pub fn new(
        settings: ClientSettings,
        transport: Arc<dyn Transport>,
        sink: S,
    ) -> Result<Self, LinkError> {
        let (msg_tx, msg_rx) = mpsc::channel();
        let runner = EffectRunner::new(transport, msg_tx.clone())?;
        Ok(Self {
            state: Some(AppState::new(settings)),
            msg_tx,
            msg_rx,
            runner,
            sink,
        })
    }

    /// Inbox handle for input sources.
    pub fn sender(&self) -> mpsc::Sender<Msg> {
        self.msg_tx.clone()
    }

    pub fn start(&mut self) {
        self.dispatch_msg(Msg::Started);
    }

    /// Closes the connection, cancels the tick and stops the link runtime.
    pub fn stop(&mut self) {
        self.dispatch_msg(Msg::Stopped);
        self.runner.shutdown();
    }

    pub fn is_running(&self) -> bool {
        self.state
            .as_ref()
            .is_some_and(|state| state.lifecycle() == Lifecycle::Running)
    }

    /// Handles at most one message; returns whether the client is still running.
    pub fn step(&mut self, timeout: Duration) -> bool {
        match self.msg_rx.recv_timeout(timeout) {
            Ok(msg) => self.dispatch_msg(msg),
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => return false,
        }
        self.is_running()
    }

    /// Runs until a `Stopped` message arrives, then shuts the link down.
    pub fn run(&mut self) {
        while self.step(IDLE_WAIT) {}
        self.runner.shutdown();
    }

    pub fn view(&self) -> Option<AppViewModel> {
        self.state.as_ref().map(AppState::view)
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    fn dispatch_msg(&mut self, msg: Msg) {
        let Some(state) = self.state.take() else {
            return;
        };
        let (mut state, effects) = update(state, msg);
        self.runner.enqueue(effects);
        if state.consume_dirty() {
            render(&state.view(), &mut self.sink);
        }
        self.state = Some(state);
    }
}
