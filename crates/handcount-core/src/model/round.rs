use crate::error::ValidationError;
use crate::model::player::Seat;
use crate::model::score::{RoundResult, compute_round_result};
use std::num::{IntErrorKind, ParseIntError};

/// Points each seat reports holding at the end of a round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundInput {
    held: Vec<u32>,
}

impl RoundInput {
    pub fn from_held(held: Vec<u32>) -> Self {
        Self { held }
    }

    pub fn held(&self) -> &[u32] {
        &self.held
    }

    pub fn len(&self) -> usize {
        self.held.len()
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }
}

/// Parses the points text typed for a seat. Blank input counts as zero.
pub fn parse_held_points(raw: &str) -> Result<u32, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    let value: i64 = trimmed.parse().map_err(|err: ParseIntError| match err.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
            ValidationError::PointsOutOfRange(trimmed.to_string())
        }
        _ => ValidationError::NotANumber(trimmed.to_string()),
    })?;
    validate_held_points(value)
}

pub fn validate_held_points(value: i64) -> Result<u32, ValidationError> {
    if value < 0 {
        return Err(ValidationError::NegativePoints(value));
    }
    u32::try_from(value).map_err(|_| ValidationError::PointsOutOfRange(value.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoringProgress {
    Next(Seat),
    Complete(RoundResult),
}

/// Collects held points seat by seat, in seat order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoringPhase {
    player_count: usize,
    input: RoundInput,
}

impl ScoringPhase {
    pub fn new(player_count: usize) -> Self {
        Self {
            player_count,
            input: RoundInput::from_held(Vec::with_capacity(player_count)),
        }
    }

    pub fn cursor(&self) -> usize {
        self.input.len()
    }

    pub fn is_complete(&self) -> bool {
        self.player_count > 0 && self.cursor() >= self.player_count
    }

    pub fn input(&self) -> &RoundInput {
        &self.input
    }

    pub fn submit(&mut self, seat: Seat, value: i64) -> Result<ScoringProgress, ValidationError> {
        if seat.index() >= self.player_count {
            return Err(ValidationError::SeatOutOfRange {
                index: seat.index(),
                player_count: self.player_count,
            });
        }
        let expected = Seat::new(self.cursor() as u8);
        if seat != expected || self.is_complete() {
            return Err(ValidationError::ScoringOutOfOrder {
                expected,
                actual: seat,
            });
        }
        let points = validate_held_points(value)?;
        self.input.held.push(points);

        if self.is_complete() {
            Ok(ScoringProgress::Complete(compute_round_result(&self.input)))
        } else {
            Ok(ScoringProgress::Next(Seat::new(self.cursor() as u8)))
        }
    }
}
