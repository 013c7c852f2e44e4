use super::{Epoch, TickOutcome};
use crate::error::ValidationError;
use crate::game::session::Session;
use crate::signal::SignalSink;
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTiming {
    pub tick: Duration,
    /// Pause between expiry and the turn advance, so the expiry cue is not cut off.
    pub grace: Duration,
}

impl Default for ClockTiming {
    fn default() -> Self {
        Self {
            tick: Duration::from_secs(1),
            grace: Duration::from_secs(1),
        }
    }
}

pub type SharedSession<S> = Arc<Mutex<Session<S>>>;

/// Schedules ticks for a shared [`Session`] on a background thread.
///
/// Each call to [`ClockDriver::start_turn`] spawns one ticker bound to the
/// epoch it was started with. Stopping, restarting or advancing the turn
/// bumps the epoch, after which the old ticker sees `Stale` on its next wake
/// and exits without touching anything.
#[derive(Debug)]
pub struct ClockDriver<S> {
    session: SharedSession<S>,
    timing: ClockTiming,
}

impl<S> Clone for ClockDriver<S> {
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
            timing: self.timing,
        }
    }
}

#[derive(Debug)]
pub struct TickerHandle {
    epoch: Epoch,
    handle: JoinHandle<bool>,
}

impl TickerHandle {
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the ticker to exit. True if it advanced the turn on expiry.
    pub fn join(self) -> bool {
        self.handle.join().unwrap_or(false)
    }
}

impl<S: SignalSink + Send + 'static> ClockDriver<S> {
    pub fn new(session: SharedSession<S>, timing: ClockTiming) -> Self {
        Self { session, timing }
    }

    pub fn session(&self) -> &SharedSession<S> {
        &self.session
    }

    pub fn start_turn(&self) -> Result<TickerHandle, ValidationError> {
        let epoch = self.session.lock().start_turn_clock()?;
        let session = Arc::clone(&self.session);
        let timing = self.timing;
        let handle = thread::spawn(move || run_ticker(&session, timing, epoch));
        Ok(TickerHandle { epoch, handle })
    }

    pub fn stop(&self) {
        self.session.lock().state_mut().stop_clock();
    }
}

fn run_ticker<S: SignalSink>(session: &Mutex<Session<S>>, timing: ClockTiming, epoch: Epoch) -> bool {
    loop {
        thread::sleep(timing.tick);
        match session.lock().on_tick(epoch) {
            TickOutcome::Stale => {
                trace!(target: "handcount_core::clock", epoch = epoch.value(), "ticker retired");
                return false;
            }
            TickOutcome::Running { .. } => {}
            TickOutcome::Expired { .. } => break,
        }
    }
    thread::sleep(timing.grace);
    session.lock().on_grace(epoch)
}

#[cfg(test)]
mod tests {
    use super::{ClockDriver, ClockTiming};
    use crate::game::session::Session;
    use crate::signal::{Signal, SignalLog};
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::time::Duration;

    fn fast() -> ClockTiming {
        ClockTiming {
            tick: Duration::from_millis(2),
            grace: Duration::from_millis(2),
        }
    }

    #[test]
    fn default_timing_is_one_second_each() {
        let timing = ClockTiming::default();
        assert_eq!(timing.tick, Duration::from_secs(1));
        assert_eq!(timing.grace, Duration::from_secs(1));
    }

    #[test]
    fn start_outside_turn_is_rejected() {
        let session = Arc::new(Mutex::new(Session::new(SignalLog::new())));
        let driver = ClockDriver::new(session, fast());
        assert!(driver.start_turn().is_err());
    }

    #[test]
    fn ticker_expires_and_advances() {
        let mut session = Session::new(SignalLog::new());
        session.state_mut().initialize_match(["a", "b"]).unwrap();
        session.state_mut().select_first_player(0).unwrap();
        session.state_mut().start_round().unwrap();
        let driver = ClockDriver::new(Arc::new(Mutex::new(session)), fast());

        let handle = driver.start_turn().unwrap();
        assert!(handle.join());

        let session = driver.session().lock();
        assert_eq!(session.state().current_player().index(), 1);
        assert_eq!(
            session.sink().count(|s| matches!(s, Signal::TimerExpired)),
            1
        );
    }
}
