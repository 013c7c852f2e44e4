//! Per-turn countdown.
//!
//! [`Clock`] is a plain state machine: something else calls [`Clock::tick`]
//! once per second and [`Clock::grace_elapsed`] once the expiry grace delay
//! has passed. Every scheduled call carries the [`Epoch`] that was current
//! when it was scheduled; `start`, `stop` and `reset` all bump the epoch, so
//! a call from an older schedule is dropped instead of touching the new turn.
//! [`driver::ClockDriver`] does the scheduling with real threads.

pub mod driver;

use crate::signal::Signal;
use serde::Serialize;
use tracing::debug;

pub const WARNING_AT_SECONDS: u32 = 10;
pub const DANGER_FROM_SECONDS: u32 = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Epoch(u64);

impl Epoch {
    pub const fn value(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Alert {
    None,
    Warning,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// The tick belonged to a schedule that has since been cancelled.
    Stale,
    Running {
        remaining: u32,
        signals: Vec<Signal>,
    },
    /// Countdown hit zero. The grace callback for `epoch` is now armed.
    Expired { epoch: Epoch, signals: Vec<Signal> },
}

impl TickOutcome {
    pub fn signals(&self) -> &[Signal] {
        match self {
            TickOutcome::Stale => &[],
            TickOutcome::Running { signals, .. } | TickOutcome::Expired { signals, .. } => signals,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Clock {
    limit: u32,
    remaining: u32,
    running: bool,
    grace_pending: bool,
    alert: Alert,
    epoch: Epoch,
}

impl Clock {
    pub fn new(limit_seconds: u32) -> Self {
        let limit = limit_seconds.max(1);
        Self {
            limit,
            remaining: limit,
            running: false,
            grace_pending: false,
            alert: Alert::None,
            epoch: Epoch::default(),
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn alert(&self) -> Alert {
        self.alert
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    fn invalidate(&mut self) {
        self.epoch = Epoch(self.epoch.0 + 1);
        self.running = false;
        self.grace_pending = false;
    }

    /// Restarts the countdown from `limit_seconds`, cancelling any schedule
    /// already in flight. Returns the epoch the new schedule must carry.
    pub fn start(&mut self, limit_seconds: u32) -> Epoch {
        self.invalidate();
        self.limit = limit_seconds.max(1);
        self.remaining = self.limit;
        self.alert = Alert::None;
        self.running = true;
        debug!(
            target: "handcount_core::clock",
            epoch = self.epoch.0,
            limit = self.limit,
            "clock started"
        );
        self.epoch
    }

    pub fn stop(&mut self) {
        let was_running = self.running;
        self.invalidate();
        if was_running {
            debug!(
                target: "handcount_core::clock",
                epoch = self.epoch.0,
                remaining = self.remaining,
                "clock stopped"
            );
        }
    }

    pub fn reset(&mut self, limit_seconds: u32) {
        self.invalidate();
        self.limit = limit_seconds.max(1);
        self.remaining = self.limit;
        self.alert = Alert::None;
    }

    pub fn tick(&mut self, epoch: Epoch) -> TickOutcome {
        if epoch != self.epoch || !self.running {
            return TickOutcome::Stale;
        }

        self.remaining = self.remaining.saturating_sub(1);
        let mut signals = Vec::new();

        if self.remaining == WARNING_AT_SECONDS {
            self.alert = Alert::Warning;
            signals.push(Signal::WarningThresholdReached {
                remaining: self.remaining,
            });
        }

        if (1..=DANGER_FROM_SECONDS).contains(&self.remaining) {
            self.alert = Alert::Danger;
            signals.push(Signal::DangerThresholdReached {
                remaining: self.remaining,
            });
        }

        if self.remaining == 0 {
            self.running = false;
            self.grace_pending = true;
            self.alert = Alert::Danger;
            signals.push(Signal::TimerExpired);
            debug!(target: "handcount_core::clock", epoch = self.epoch.0, "clock expired");
            return TickOutcome::Expired {
                epoch: self.epoch,
                signals,
            };
        }

        TickOutcome::Running {
            remaining: self.remaining,
            signals,
        }
    }

    /// Consumes the armed grace callback. True exactly once per expiry, and
    /// only if nothing restarted or stopped the clock in the meantime.
    pub fn grace_elapsed(&mut self, epoch: Epoch) -> bool {
        if epoch != self.epoch || !self.grace_pending {
            return false;
        }
        self.grace_pending = false;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::{Alert, Clock, TickOutcome};
    use crate::signal::Signal;

    fn run_ticks(clock: &mut Clock, count: u32) -> Vec<TickOutcome> {
        let epoch = clock.epoch();
        (0..count).map(|_| clock.tick(epoch)).collect()
    }

    #[test]
    fn start_sets_remaining_to_limit() {
        let mut clock = Clock::new(60);
        clock.start(45);
        assert_eq!(clock.remaining(), 45);
        assert_eq!(clock.limit(), 45);
        assert!(clock.is_running());
    }

    #[test]
    fn warning_fires_once_at_ten() {
        let mut clock = Clock::new(30);
        clock.start(30);
        let outcomes = run_ticks(&mut clock, 25);
        let warnings = outcomes
            .iter()
            .flat_map(|o| o.signals())
            .filter(|s| matches!(s, Signal::WarningThresholdReached { .. }))
            .count();
        assert_eq!(warnings, 1);
        assert_eq!(clock.alert(), Alert::Danger);
    }

    #[test]
    fn danger_persists_from_five_to_one() {
        let mut clock = Clock::new(60);
        clock.start(60);
        let outcomes = run_ticks(&mut clock, 59);
        let danger: Vec<u32> = outcomes
            .iter()
            .flat_map(|o| o.signals())
            .filter_map(|s| match s {
                Signal::DangerThresholdReached { remaining } => Some(*remaining),
                _ => None,
            })
            .collect();
        assert_eq!(danger, vec![5, 4, 3, 2, 1]);
        assert_eq!(clock.remaining(), 1);
    }

    #[test]
    fn expiry_stops_and_arms_grace_once() {
        let mut clock = Clock::new(60);
        let epoch = clock.start(3);
        run_ticks(&mut clock, 2);
        let last = clock.tick(epoch);
        assert_eq!(
            last,
            TickOutcome::Expired {
                epoch,
                signals: vec![Signal::TimerExpired],
            }
        );
        assert!(!clock.is_running());
        assert_eq!(clock.tick(epoch), TickOutcome::Stale);
        assert!(clock.grace_elapsed(epoch));
        assert!(!clock.grace_elapsed(epoch));
    }

    #[test]
    fn stale_epoch_tick_is_ignored() {
        let mut clock = Clock::new(60);
        let old = clock.start(60);
        let fresh = clock.start(60);
        assert_ne!(old, fresh);
        assert_eq!(clock.tick(old), TickOutcome::Stale);
        assert_eq!(clock.remaining(), 60);
        assert!(matches!(clock.tick(fresh), TickOutcome::Running { remaining: 59, .. }));
    }

    #[test]
    fn stop_is_idempotent() {
        let mut clock = Clock::new(60);
        clock.start(60);
        clock.stop();
        assert!(!clock.is_running());
        clock.stop();
        assert!(!clock.is_running());
    }

    #[test]
    fn stop_after_expiry_cancels_grace() {
        let mut clock = Clock::new(1);
        let epoch = clock.start(1);
        assert!(matches!(clock.tick(epoch), TickOutcome::Expired { .. }));
        clock.stop();
        assert!(!clock.grace_elapsed(epoch));
    }

    #[test]
    fn reset_restores_limit_without_running() {
        let mut clock = Clock::new(60);
        let epoch = clock.start(60);
        clock.tick(epoch);
        clock.reset(90);
        assert_eq!(clock.remaining(), 90);
        assert!(!clock.is_running());
        assert_eq!(clock.alert(), Alert::None);
        assert_eq!(clock.tick(epoch), TickOutcome::Stale);
    }

    #[test]
    fn zero_limit_is_clamped() {
        let mut clock = Clock::new(0);
        assert_eq!(clock.limit(), 1);
        clock.start(0);
        assert_eq!(clock.remaining(), 1);
    }
}
