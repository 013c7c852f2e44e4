use crate::error::ValidationError;
use core::fmt;
use serde::{Deserialize, Serialize};

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 4;

/// Fixed position at the table, assigned at setup (0-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Seat(u8);

impl Seat {
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    /// Checked constructor for indices coming from the presentation layer.
    pub fn from_index(index: usize, player_count: usize) -> Result<Self, ValidationError> {
        if index < player_count && index < MAX_PLAYERS {
            Ok(Self(index as u8))
        } else {
            Err(ValidationError::SeatOutOfRange {
                index,
                player_count,
            })
        }
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn next(self, player_count: usize) -> Seat {
        Seat(((self.0 as usize + 1) % player_count) as u8)
    }

    pub fn all(player_count: usize) -> impl Iterator<Item = Seat> {
        (0..player_count.min(MAX_PLAYERS) as u8).map(Seat)
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {}", self.0 + 1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub seat: Seat,
    pub name: String,
}

/// Ordered list of players; immutable once the match starts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    players: Vec<Player>,
}

impl Roster {
    /// Builds a roster from raw name inputs. Names are trimmed; every seat is
    /// checked so the first empty one is reported.
    pub fn new<I, S>(names: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<String> = names
            .into_iter()
            .map(|name| name.as_ref().trim().to_string())
            .collect();

        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&names.len()) {
            return Err(ValidationError::InvalidPlayerCount {
                min: MIN_PLAYERS,
                max: MAX_PLAYERS,
                actual: names.len(),
            });
        }

        let players = names
            .into_iter()
            .zip(Seat::all(MAX_PLAYERS))
            .map(|(name, seat)| {
                if name.is_empty() {
                    Err(ValidationError::EmptyPlayerName { seat })
                } else {
                    Ok(Player { seat, name })
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { players })
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn get(&self, seat: Seat) -> Option<&Player> {
        self.players.get(seat.index())
    }

    pub fn name(&self, seat: Seat) -> &str {
        self.get(seat).map(|p| p.name.as_str()).unwrap_or("")
    }

    pub fn seats(&self) -> impl Iterator<Item = Seat> {
        Seat::all(self.players.len())
    }
}
