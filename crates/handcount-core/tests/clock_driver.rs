use handcount_core::clock::driver::{ClockDriver, ClockTiming};
use handcount_core::game::session::Session;
use handcount_core::model::player::Seat;
use handcount_core::signal::{Signal, SignalLog};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

fn driver_in_turn(names: &[&str], timing: ClockTiming) -> ClockDriver<SignalLog> {
    let mut session = Session::new(SignalLog::new());
    session
        .state_mut()
        .set_player_count(names.len())
        .expect("supported player count");
    session
        .state_mut()
        .initialize_match(names.iter().copied())
        .unwrap();
    session.state_mut().select_first_player(0).unwrap();
    session.state_mut().start_round().unwrap();
    ClockDriver::new(Arc::new(Mutex::new(session)), timing)
}

fn quick() -> ClockTiming {
    ClockTiming {
        tick: Duration::from_millis(1),
        grace: Duration::from_millis(1),
    }
}

#[test]
fn expiry_advances_turn_exactly_once() {
    let driver = driver_in_turn(&["a", "b", "c"], quick());
    let ticker = driver.start_turn().unwrap();
    assert!(ticker.join());

    let session = driver.session().lock();
    assert_eq!(session.state().current_player(), Seat::new(1));
    assert!(!session.state().clock().is_running());
    assert_eq!(session.state().time_remaining(), 60);
    let log = session.sink();
    assert_eq!(log.count(|s| matches!(s, Signal::TimerExpired)), 1);
    assert_eq!(
        log.count(|s| matches!(s, Signal::WarningThresholdReached { .. })),
        1
    );
}

#[test]
fn restarting_retires_previous_ticker() {
    let driver = driver_in_turn(&["a", "b"], quick());
    let first = driver.start_turn().unwrap();
    let second = driver.start_turn().unwrap();
    assert_ne!(first.epoch(), second.epoch());

    assert!(!first.join());
    assert!(second.join());

    let session = driver.session().lock();
    assert_eq!(session.state().current_player(), Seat::new(1));
    assert_eq!(
        session.sink().count(|s| matches!(s, Signal::TimerExpired)),
        1
    );
}

#[test]
fn stop_before_first_tick_leaves_turn_alone() {
    let timing = ClockTiming {
        tick: Duration::from_millis(20),
        grace: Duration::from_millis(1),
    };
    let driver = driver_in_turn(&["a", "b"], timing);
    let ticker = driver.start_turn().unwrap();
    driver.stop();
    assert!(!ticker.join());

    let session = driver.session().lock();
    assert_eq!(session.state().current_player(), Seat::new(0));
    assert_eq!(session.state().time_remaining(), 60);
    assert!(session.sink().signals().is_empty());
}

#[test]
fn manual_advance_mid_countdown_cancels_ticker() {
    let timing = ClockTiming {
        tick: Duration::from_millis(5),
        grace: Duration::from_millis(1),
    };
    let driver = driver_in_turn(&["a", "b", "c"], timing);
    let ticker = driver.start_turn().unwrap();
    driver.session().lock().advance_turn().unwrap();
    assert!(!ticker.join());

    let session = driver.session().lock();
    assert_eq!(session.state().current_player(), Seat::new(1));
    assert!(!session.state().clock().is_running());
}
