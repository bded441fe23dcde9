#![deny(missing_docs)]
//! Shared logging utilities for the monitor workspace.
//!
//! This crate provides the `monitor_*` logging macros used across the codebase,
//! a per-thread tick context for scheduler diagnostics, and a minimal test
//! initializer for the global logger.

use std::cell::Cell;

thread_local! {
    /// Thread-local storage for the current poll tick count.
    static CURRENT_TICK: Cell<u64> = const { Cell::new(0) };
}

/// Sets the poll tick count for the current thread.
/// The scheduler calls this once per tick so diagnostics can be correlated.
pub fn set_current_tick(tick: u64) {
    CURRENT_TICK.with(|v| v.set(tick));
}

/// Retrieves the poll tick count for the current thread.
/// Returns 0 if no tick has run yet.
pub fn current_tick() -> u64 {
    CURRENT_TICK.with(|v| v.get())
}

/// Log-line prefix naming the current thread's poll tick.
///
/// Displays as `[tick N] `, or as nothing before the first tick so threads
/// that never tick keep plain messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickPrefix(u64);

impl std::fmt::Display for TickPrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0 == 0 {
            Ok(())
        } else {
            write!(f, "[tick {}] ", self.0)
        }
    }
}

/// Prefix for the current thread; used by the `monitor_*` macros.
pub fn tick_prefix() -> TickPrefix {
    TickPrefix(current_tick())
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! monitor_trace {
    ($($arg:tt)*) => {{
        log::trace!("{}{}", $crate::tick_prefix(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! monitor_info {
    ($($arg:tt)*) => {{
        log::info!("{}{}", $crate::tick_prefix(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! monitor_debug {
    ($($arg:tt)*) => {{
        log::debug!("{}{}", $crate::tick_prefix(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! monitor_warn {
    ($($arg:tt)*) => {{
        log::warn!("{}{}", $crate::tick_prefix(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! monitor_error {
    ($($arg:tt)*) => {{
        log::error!("{}{}", $crate::tick_prefix(), format_args!($($arg)*));
    }};
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_context_is_per_thread() {
        set_current_tick(7);
        assert_eq!(current_tick(), 7);

        let other = std::thread::spawn(current_tick).join().unwrap();
        assert_eq!(other, 0);
    }

    #[test]
    fn prefix_names_the_tick_once_one_has_run() {
        let before = std::thread::spawn(|| tick_prefix().to_string())
            .join()
            .unwrap();
        assert_eq!(before, "");

        let after = std::thread::spawn(|| {
            set_current_tick(42);
            tick_prefix().to_string()
        })
        .join()
        .unwrap();
        assert_eq!(after, "[tick 42] ");
    }
}
