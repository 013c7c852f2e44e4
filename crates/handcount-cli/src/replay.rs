use crate::config::{ConfigError, read_yaml};
use handcount_core::gate::ConfirmAction;
use handcount_core::model::settings::{MatchSettings, PlayerCount, TimeLimit};
use handcount_core::signal::{Signal, SignalLog};
use handcount_core::{FinalStandings, MatchSnapshot, Session, ValidationError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// A whole match written down in advance: who plays, and what each seat
/// held at the end of every round.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ReplayScript {
    pub players: Vec<String>,
    #[serde(default = "default_time_limit_seconds")]
    pub time_limit_seconds: u32,
    pub rounds: Vec<ScriptedRound>,
    #[serde(default)]
    pub finish: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ScriptedRound {
    #[serde(default)]
    pub first_player: usize,
    pub held: Vec<i64>,
}

fn default_time_limit_seconds() -> u32 {
    TimeLimit::DEFAULT.seconds()
}

impl ReplayScript {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        read_yaml(path.as_ref())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub snapshot: MatchSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standings: Option<FinalStandings>,
    pub signals: Vec<Signal>,
}

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("match setup rejected: {0}")]
    Setup(#[source] ValidationError),
    #[error("round {round}: expected {expected} held values, got {actual}")]
    HeldCountMismatch {
        round: usize,
        expected: usize,
        actual: usize,
    },
    #[error("round {round} rejected: {source}")]
    Round {
        round: usize,
        #[source]
        source: ValidationError,
    },
    #[error("finishing the match was rejected: {0}")]
    Finish(#[source] ValidationError),
}

pub fn run(script: &ReplayScript) -> Result<ReplayReport, ReplayError> {
    let settings = MatchSettings {
        player_count: PlayerCount::new(script.players.len()).map_err(ReplayError::Setup)?,
        time_limit: TimeLimit::from_seconds(script.time_limit_seconds)
            .map_err(ReplayError::Setup)?,
    };
    let mut session = Session::with_settings(settings, SignalLog::new());
    session
        .state_mut()
        .initialize_match(&script.players)
        .map_err(ReplayError::Setup)?;

    let player_count = session.state().player_count();
    for (index, round) in script.rounds.iter().enumerate() {
        let number = index + 1;
        if round.held.len() != player_count {
            return Err(ReplayError::HeldCountMismatch {
                round: number,
                expected: player_count,
                actual: round.held.len(),
            });
        }
        play_round(&mut session, round).map_err(|source| ReplayError::Round {
            round: number,
            source,
        })?;
    }

    if script.finish && !script.rounds.is_empty() {
        session
            .request(ConfirmAction::FinishMatch)
            .map_err(ReplayError::Finish)?;
        session.confirm().map_err(ReplayError::Finish)?;
    }

    info!(
        target: "handcount_cli::replay",
        rounds = script.rounds.len(),
        finished = script.finish,
        "replay complete"
    );

    let standings = FinalStandings::capture(session.state());
    let snapshot = session.snapshot();
    let signals = session.sink_mut().drain();
    Ok(ReplayReport {
        snapshot,
        standings,
        signals,
    })
}

fn play_round(
    session: &mut Session<SignalLog>,
    round: &ScriptedRound,
) -> Result<(), ValidationError> {
    // Initialisation already opened the first selection.
    if !session.state().rounds().is_empty() {
        session.state_mut().start_next_round()?;
    }
    session.state_mut().select_first_player(round.first_player)?;
    session.state_mut().start_round()?;
    session.request(ConfirmAction::EndRound)?;
    session.confirm()?;
    for (seat, value) in round.held.iter().enumerate() {
        session.submit_score(seat, *value)?;
    }
    Ok(())
}
