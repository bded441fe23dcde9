use std::time::Duration;

use monitor_logging::monitor_trace;

use crate::Effect;

pub type TimerId = u64;

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerPhase {
    Idle,
    Scheduled,
}

/// Focus-aware keepalive timer with at most one pending tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollScheduler {
    focused: bool,
    pending: Option<TimerId>,
    next_timer: TimerId,
    interval: Duration,
    ticks: u64,
}

impl Default for PollScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_INTERVAL)
    }
}

impl PollScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            focused: true,
            pending: None,
            next_timer: 1,
            interval,
            ticks: 0,
        }
    }

    pub fn phase(&self) -> SchedulerPhase {
        if self.pending.is_some() {
            SchedulerPhase::Scheduled
        } else {
            SchedulerPhase::Idle
        }
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn pending(&self) -> Option<TimerId> {
        self.pending
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Sets focus without side effects; used before the client starts.
    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    /// Returns true: the caller runs the tick action immediately.
    pub fn focus_gained(&mut self, effects: &mut Vec<Effect>) -> bool {
        self.focused = true;
        self.cancel(effects);
        true
    }

    pub fn focus_lost(&mut self, effects: &mut Vec<Effect>) {
        self.focused = false;
        self.cancel(effects);
    }

    /// Schedules the next tick while focused, replacing any pending one.
    pub fn arm(&mut self, effects: &mut Vec<Effect>) {
        if !self.focused {
            return;
        }
        self.cancel(effects);
        let timer = self.next_timer;
        self.next_timer += 1;
        self.pending = Some(timer);
        effects.push(Effect::ScheduleTick {
            timer,
            after: self.interval,
        });
    }

    /// Accepts only the pending timer; stale ids never fire a tick.
    pub fn timer_fired(&mut self, timer: TimerId) -> bool {
        if self.pending == Some(timer) {
            self.pending = None;
            true
        } else {
            monitor_trace!("Ignoring stale timer {}", timer);
            false
        }
    }

    /// Counts a tick and returns its number.
    pub fn begin_tick(&mut self) -> u64 {
        self.ticks += 1;
        self.ticks
    }

    pub fn cancel(&mut self, effects: &mut Vec<Effect>) {
        if let Some(timer) = self.pending.take() {
            effects.push(Effect::CancelTick { timer });
        }
    }
}
