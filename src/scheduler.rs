//! Auto-advance timer state and the recurring-timer host facility.

use std::collections::BTreeMap;
use std::time::Duration;

use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// Recurring timers provided by the host.
pub trait Timers {
    fn schedule_repeating(&mut self, every: Duration) -> TimerId;
    fn cancel(&mut self, id: TimerId);
}

/// Instance-scoped handle for the auto-advance timer.
///
/// Starting while already running is a no-op (logged), so one instance never
/// owns two live timers.
#[derive(Debug, Clone)]
pub struct AutoAdvance {
    every: Duration,
    handle: Option<TimerId>,
}

impl AutoAdvance {
    pub fn new(every: Duration) -> Self {
        Self {
            every,
            handle: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    pub fn handle(&self) -> Option<TimerId> {
        self.handle
    }

    /// Returns `true` when a new timer was scheduled.
    pub fn start(&mut self, timers: &mut dyn Timers) -> bool {
        if let Some(id) = self.handle {
            warn!(timer = id.0, "auto-advance already running; start ignored");
            return false;
        }
        let id = timers.schedule_repeating(self.every);
        info!(timer = id.0, every_ms = self.every.as_millis() as u64, "auto-advance started");
        self.handle = Some(id);
        true
    }

    /// Returns `true` when a running timer was cancelled.
    pub fn stop(&mut self, timers: &mut dyn Timers) -> bool {
        match self.handle.take() {
            Some(id) => {
                timers.cancel(id);
                info!(timer = id.0, "auto-advance stopped");
                true
            }
            None => false,
        }
    }

    /// Whether a firing of `id` belongs to this scheduler.
    pub fn owns(&self, id: TimerId) -> bool {
        self.handle == Some(id)
    }
}

/// Timers fired by hand; for tests and dry runs.
#[derive(Debug, Default)]
pub struct ManualTimers {
    next_id: u64,
    active: BTreeMap<TimerId, Duration>,
    cancelled: Vec<TimerId>,
}

impl ManualTimers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> impl Iterator<Item = (TimerId, Duration)> + '_ {
        self.active.iter().map(|(id, every)| (*id, *every))
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn cancelled(&self) -> &[TimerId] {
        &self.cancelled
    }

    pub fn is_active(&self, id: TimerId) -> bool {
        self.active.contains_key(&id)
    }
}

impl Timers for ManualTimers {
    fn schedule_repeating(&mut self, every: Duration) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.active.insert(id, every);
        id
    }

    fn cancel(&mut self, id: TimerId) {
        if self.active.remove(&id).is_some() {
            self.cancelled.push(id);
        }
    }
}
