use crate::game::match_state::Phase;
use crate::model::player::Seat;
use thiserror::Error;

/// Input rejected at the boundary. State is never mutated when one of these
/// is returned, so the presentation layer can simply re-prompt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("player count must be between {min} and {max}, got {actual}")]
    InvalidPlayerCount { min: usize, max: usize, actual: usize },
    #[error("{seat} needs a name")]
    EmptyPlayerName { seat: Seat },
    #[error("held points cannot be negative (got {0})")]
    NegativePoints(i64),
    #[error("'{0}' is not a whole number")]
    NotANumber(String),
    #[error("held points {0} are out of range")]
    PointsOutOfRange(String),
    #[error("seat index {index} is out of range for {player_count} players")]
    SeatOutOfRange { index: usize, player_count: usize },
    #[error("expected points for {expected}, got {actual}")]
    ScoringOutOfOrder { expected: Seat, actual: Seat },
    #[error("a first player must be selected before the round starts")]
    FirstPlayerNotSelected,
    #[error("command needs the {expected} phase, match is in {actual}")]
    WrongPhase { expected: Phase, actual: Phase },
    #[error("{expected} players are configured but {actual} names were given")]
    NameCountMismatch { expected: usize, actual: usize },
    #[error("{rounds} round(s) already scored; restart the match to change players")]
    RoundsAlreadyPlayed { rounds: usize },
    #[error("time limit must be one of the presets, got {0}s")]
    InvalidTimeLimit(u32),
}
