#![deny(warnings)]
//! Scorekeeping core for "hand count down" card games: a round ends with
//! every player revealing the points still in hand, and whoever holds
//! nothing collects the lot.
//!
//! The crate has no I/O. A presentation layer holds a [`game::session::Session`],
//! calls its commands, reads its attributes, and receives [`signal::Signal`]s.

pub mod clock;
pub mod error;
pub mod game;
pub mod gate;
pub mod model;
pub mod signal;

pub use clock::driver::{ClockDriver, ClockTiming, SharedSession, TickerHandle};
pub use clock::{Alert, Clock, Epoch, TickOutcome};
pub use error::ValidationError;
pub use game::match_state::{MatchState, Phase};
pub use game::serialization::{FinalStandings, MatchSnapshot, ScoreboardRow, StandingEntry};
pub use game::session::Session;
pub use gate::{ConfirmAction, ConfirmationGate};
pub use model::player::{Player, Roster, Seat};
pub use model::round::{RoundInput, ScoringProgress, parse_held_points};
pub use model::score::{RoundResult, ScoreBoard, compute_round_result};
pub use model::settings::{MatchSettings, PlayerCount, TimeLimit, format_clock};
pub use signal::{AudioCue, NullSink, Signal, SignalLog, SignalSink, ToneSpec};

pub struct AppInfo;

impl AppInfo {
    pub const fn name() -> &'static str {
        "handcount"
    }

    pub const fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}
