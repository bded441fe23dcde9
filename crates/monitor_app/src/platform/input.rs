use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossterm::cursor::{Hide, Show};
use crossterm::event::{
    self, DisableFocusChange, EnableFocusChange, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use monitor_core::Msg;
use monitor_logging::{monitor_debug, monitor_warn};

const INPUT_POLL: Duration = Duration::from_millis(100);

/// Raw mode, alternate screen and focus reporting, undone on drop.
pub struct TerminalGuard;

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(err) = execute!(stdout, EnterAlternateScreen, EnableFocusChange, Hide) {
            let _ = disable_raw_mode();
            return Err(err);
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), Show, DisableFocusChange, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

/// Forwards terminal events into the client inbox.
pub struct InputThread {
    running: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl InputThread {
    pub fn spawn(msg_tx: mpsc::Sender<Msg>) -> io::Result<Self> {
        let running = Arc::new(AtomicBool::new(true));
        let flag = running.clone();
        let handle = thread::Builder::new()
            .name("monitor-input".to_string())
            .spawn(move || read_events(&flag, &msg_tx))?;
        Ok(Self {
            running,
            handle: Some(handle),
        })
    }

    pub fn stop(mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                monitor_warn!("Input thread panicked");
            }
        }
    }
}

fn read_events(running: &AtomicBool, msg_tx: &mpsc::Sender<Msg>) {
    while running.load(Ordering::Relaxed) {
        match event::poll(INPUT_POLL) {
            Ok(true) => {}
            Ok(false) => continue,
            Err(err) => {
                monitor_warn!("Terminal input failed: {}", err);
                break;
            }
        }
        let event = match event::read() {
            Ok(event) => event,
            Err(err) => {
                monitor_warn!("Terminal input failed: {}", err);
                break;
            }
        };
        let Some(msg) = map_event(event) else {
            continue;
        };
        monitor_debug!("Terminal event -> {:?}", msg);
        if msg_tx.send(msg).is_err() {
            break;
        }
    }
}

fn map_event(event: Event) -> Option<Msg> {
    match event {
        Event::FocusGained => Some(Msg::FocusGained),
        Event::FocusLost => Some(Msg::FocusLost),
        Event::Resize(columns, _) => Some(Msg::Resized {
            width: usize::from(columns),
        }),
        Event::Key(key) if is_quit(&key) => Some(Msg::Stopped),
        _ => None,
    }
}

fn is_quit(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}
