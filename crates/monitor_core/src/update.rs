use chrono::{DateTime, Local};
use monitor_logging::{monitor_debug, monitor_error, monitor_info, set_current_tick};

use crate::protocol::{decode_frame, ClientMessage};
use crate::router::{route, Routed};
use crate::state::Lifecycle;
use crate::{AppState, ConnectionId, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let connection_before = state.connection().state();
    let focus_before = state.scheduler().is_focused();
    let mut effects = Vec::new();

    match state.lifecycle() {
        Lifecycle::Created => handle_before_start(&mut state, msg, &mut effects),
        Lifecycle::Running => handle_running(&mut state, msg, &mut effects),
        Lifecycle::Stopped => {
            monitor_debug!("Client stopped; ignoring {:?}", msg);
        }
    }

    if state.connection().state() != connection_before
        || state.scheduler().is_focused() != focus_before
    {
        state.mark_dirty();
    }
    (state, effects)
}

fn handle_before_start(state: &mut AppState, msg: Msg, effects: &mut Vec<Effect>) {
    match msg {
        Msg::Started => {
            state.set_lifecycle(Lifecycle::Running);
            let (connection, scheduler) = state.parts_mut();
            connection.ensure_open(effects);
            // Keeps the reopen path alive if this first attempt never opens.
            scheduler.arm(effects);
            state.mark_dirty();
        }
        Msg::FocusGained => state.parts_mut().1.set_focused(true),
        Msg::FocusLost => state.parts_mut().1.set_focused(false),
        Msg::Resized { width } => state.apply_width(width),
        other => monitor_debug!("Client not started; ignoring {:?}", other),
    }
}

fn handle_running(state: &mut AppState, msg: Msg, effects: &mut Vec<Effect>) {
    match msg {
        Msg::Started => {}
        Msg::Stopped => {
            let (connection, scheduler) = state.parts_mut();
            scheduler.cancel(effects);
            connection.close(effects);
            state.set_lifecycle(Lifecycle::Stopped);
            monitor_info!("Client stopped");
        }
        Msg::FocusGained => {
            let (_, scheduler) = state.parts_mut();
            if scheduler.focus_gained(effects) {
                run_tick(state, effects);
            }
        }
        Msg::FocusLost => {
            let (_, scheduler) = state.parts_mut();
            scheduler.focus_lost(effects);
        }
        Msg::Resized { width } => state.apply_width(width),
        Msg::TimerFired { timer } => {
            let (_, scheduler) = state.parts_mut();
            if scheduler.timer_fired(timer) {
                run_tick(state, effects);
            }
        }
        Msg::ConnectionOpened { connection } => {
            let (manager, scheduler) = state.parts_mut();
            if manager.opened(connection) {
                monitor_info!("Connection {} open", connection);
                if scheduler.is_focused() {
                    run_tick(state, effects);
                }
            }
        }
        Msg::ConnectionClosed { connection } => {
            if state.parts_mut().0.closed(connection) {
                monitor_info!("Connection {} closed", connection);
            }
        }
        Msg::FrameReceived {
            connection,
            text,
            received_at,
        } => handle_frame(state, connection, &text, received_at, effects),
    }
}

/// Keepalive when open, reopen when neither open nor opening; then re-arm.
fn run_tick(state: &mut AppState, effects: &mut Vec<Effect>) {
    let (connection, scheduler) = state.parts_mut();
    let tick = scheduler.begin_tick();
    set_current_tick(tick);
    if connection.is_open() {
        connection.send(ClientMessage::Ping.to_frame(), effects);
    } else if !connection.is_connecting() {
        monitor_info!("Tick {}: connection not open, reopening", tick);
        connection.ensure_open(effects);
    }
    scheduler.arm(effects);
}

fn handle_frame(
    state: &mut AppState,
    connection: ConnectionId,
    text: &str,
    received_at: DateTime<Local>,
    effects: &mut Vec<Effect>,
) {
    if !state.connection().accepts(connection) {
        monitor_debug!("Dropping frame from superseded connection {}", connection);
        return;
    }

    let message = match decode_frame(text) {
        Ok(message) => message,
        Err(err) => {
            monitor_error!("Failed to handle frame {:?}: {}", text, err);
            return;
        }
    };

    let layout = *state.layout();
    match route(message, received_at, &layout, state.formatter()) {
        Routed::Status(status) => {
            state.set_status(status);
            // A status reply closes one round trip; schedule the next query.
            state.parts_mut().1.arm(effects);
        }
        Routed::Pending { names, view } => state.set_pending(names, view),
        Routed::Completed { entries, view } => state.set_completed(entries, view),
        Routed::Statistics(statistics) => state.set_statistics(statistics),
        Routed::Ignored => {}
    }
}
