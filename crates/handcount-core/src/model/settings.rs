use crate::error::ValidationError;
use crate::model::player::{MAX_PLAYERS, MIN_PLAYERS};
use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct PlayerCount(u8);

impl PlayerCount {
    pub const DEFAULT: PlayerCount = PlayerCount(MIN_PLAYERS as u8);

    pub fn new(count: usize) -> Result<Self, ValidationError> {
        if (MIN_PLAYERS..=MAX_PLAYERS).contains(&count) {
            Ok(Self(count as u8))
        } else {
            Err(ValidationError::InvalidPlayerCount {
                min: MIN_PLAYERS,
                max: MAX_PLAYERS,
                actual: count,
            })
        }
    }

    pub const fn get(self) -> usize {
        self.0 as usize
    }

    /// Setup toggle: 2 -> 3 -> 4 -> 2.
    pub const fn cycled(self) -> PlayerCount {
        if self.0 as usize >= MAX_PLAYERS {
            PlayerCount(MIN_PLAYERS as u8)
        } else {
            PlayerCount(self.0 + 1)
        }
    }
}

impl Default for PlayerCount {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<usize> for PlayerCount {
    type Error = ValidationError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        PlayerCount::new(value)
    }
}

impl From<PlayerCount> for usize {
    fn from(value: PlayerCount) -> Self {
        value.get()
    }
}

/// Per-turn time limit, restricted to the presets offered at setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct TimeLimit(u32);

impl TimeLimit {
    pub const PRESETS: [TimeLimit; 5] = [
        TimeLimit(30),
        TimeLimit(45),
        TimeLimit(60),
        TimeLimit(90),
        TimeLimit(120),
    ];

    pub const DEFAULT: TimeLimit = TimeLimit(60);

    pub fn from_seconds(seconds: u32) -> Result<Self, ValidationError> {
        Self::PRESETS
            .iter()
            .copied()
            .find(|preset| preset.0 == seconds)
            .ok_or(ValidationError::InvalidTimeLimit(seconds))
    }

    pub const fn seconds(self) -> u32 {
        self.0
    }

    /// Setup toggle through the presets, wrapping after two minutes.
    pub fn cycled(self) -> TimeLimit {
        let position = Self::PRESETS
            .iter()
            .position(|preset| *preset == self)
            .unwrap_or(0);
        Self::PRESETS[(position + 1) % Self::PRESETS.len()]
    }

    pub const fn label(self) -> &'static str {
        match self.0 {
            30 => "30 seconds",
            45 => "45 seconds",
            60 => "1 minute",
            90 => "1 minute 30 seconds",
            _ => "2 minutes",
        }
    }
}

impl Default for TimeLimit {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u32> for TimeLimit {
    type Error = ValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        TimeLimit::from_seconds(value)
    }
}

impl From<TimeLimit> for u32 {
    fn from(value: TimeLimit) -> Self {
        value.seconds()
    }
}

impl fmt::Display for TimeLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSettings {
    pub player_count: PlayerCount,
    pub time_limit: TimeLimit,
}

/// Renders remaining seconds as `MM:SS`.
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::{MatchSettings, PlayerCount, TimeLimit, format_clock};
    use crate::error::ValidationError;

    #[test]
    fn player_count_cycles_two_to_four() {
        let mut count = PlayerCount::default();
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(count.get());
            count = count.cycled();
        }
        assert_eq!(seen, vec![2, 3, 4, 2]);
    }

    #[test]
    fn player_count_rejects_out_of_range() {
        assert!(PlayerCount::new(1).is_err());
        assert!(PlayerCount::new(5).is_err());
        assert_eq!(PlayerCount::new(4).unwrap().get(), 4);
    }

    #[test]
    fn time_limit_cycles_through_presets() {
        let mut limit = TimeLimit::default();
        let mut seen = Vec::new();
        for _ in 0..6 {
            seen.push(limit.seconds());
            limit = limit.cycled();
        }
        assert_eq!(seen, vec![60, 90, 120, 30, 45, 60]);
    }

    #[test]
    fn time_limit_only_accepts_presets() {
        assert_eq!(
            TimeLimit::from_seconds(50),
            Err(ValidationError::InvalidTimeLimit(50))
        );
        assert_eq!(TimeLimit::from_seconds(90).unwrap().label(), "1 minute 30 seconds");
    }

    #[test]
    fn settings_default_to_two_players_one_minute() {
        let settings = MatchSettings::default();
        assert_eq!(settings.player_count.get(), 2);
        assert_eq!(settings.time_limit.seconds(), 60);
    }

    #[test]
    fn settings_deserialize_from_plain_numbers() {
        let settings: MatchSettings =
            serde_json::from_str(r#"{"player_count": 3, "time_limit": 45}"#).unwrap();
        assert_eq!(settings.player_count.get(), 3);
        assert_eq!(settings.time_limit.seconds(), 45);

        let bad = serde_json::from_str::<MatchSettings>(r#"{"player_count": 7, "time_limit": 45}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn clock_format_pads_minutes_and_seconds() {
        assert_eq!(format_clock(60), "01:00");
        assert_eq!(format_clock(5), "00:05");
        assert_eq!(format_clock(125), "02:05");
    }
}
