use super::match_state::{MatchState, Phase};
use crate::clock::Alert;
use crate::gate::ConfirmAction;
use crate::model::player::Seat;
use serde::Serialize;

/// Read-only view of everything a presentation layer may display.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MatchSnapshot {
    pub phase: Phase,
    pub players: Vec<String>,
    pub scores: Vec<i64>,
    pub rounds: Vec<ScoreboardRow>,
    pub current_player: Seat,
    pub first_player: Seat,
    pub time_limit_seconds: u32,
    pub time_remaining_seconds: u32,
    pub clock_running: bool,
    pub alert: Alert,
    pub scoring_cursor: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_confirmation: Option<ConfirmAction>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ScoreboardRow {
    pub round: usize,
    pub deltas: Vec<i64>,
}

impl MatchSnapshot {
    pub fn capture(state: &MatchState, pending: Option<ConfirmAction>) -> Self {
        MatchSnapshot {
            phase: state.phase(),
            players: state.players().iter().map(|p| p.name.clone()).collect(),
            scores: state.scores().standings().to_vec(),
            rounds: scoreboard_rows(state),
            current_player: state.current_player(),
            first_player: state.first_player(),
            time_limit_seconds: state.settings().time_limit.seconds(),
            time_remaining_seconds: state.time_remaining(),
            clock_running: state.clock().is_running(),
            alert: state.clock().alert(),
            scoring_cursor: state.scoring_cursor(),
            pending_confirmation: pending,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Round history with 1-based round numbers, oldest first.
pub fn scoreboard_rows(state: &MatchState) -> Vec<ScoreboardRow> {
    state
        .rounds()
        .iter()
        .enumerate()
        .map(|(index, result)| ScoreboardRow {
            round: index + 1,
            deltas: result.deltas().to_vec(),
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StandingEntry {
    pub seat: Seat,
    pub name: String,
    pub score: i64,
}

/// Winner first, then everyone else in seat order.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FinalStandings {
    pub winner: StandingEntry,
    pub others: Vec<StandingEntry>,
}

impl FinalStandings {
    pub fn capture(state: &MatchState) -> Option<Self> {
        let winner_seat = state.determine_winner()?;
        let entry = |seat: Seat| StandingEntry {
            seat,
            name: state.roster().name(seat).to_string(),
            score: state.scores().score(seat),
        };
        Some(FinalStandings {
            winner: entry(winner_seat),
            others: state
                .roster()
                .seats()
                .filter(|seat| *seat != winner_seat)
                .map(entry)
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{FinalStandings, MatchSnapshot};
    use crate::game::match_state::MatchState;
    use crate::gate::ConfirmAction;
    use crate::model::player::Seat;

    fn played() -> MatchState {
        let mut state = MatchState::new();
        state.set_player_count(3).unwrap();
        state.initialize_match(["Ana", "Bruno", "Caio"]).unwrap();
        state.select_first_player(1).unwrap();
        state.start_round().unwrap();
        state.begin_scoring().unwrap();
        for (seat, held) in [6, 0, 2].into_iter().enumerate() {
            state.submit_score(seat, held).unwrap();
        }
        state
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let state = played();
        let json = MatchSnapshot::capture(&state, None).to_json().unwrap();
        assert!(json.contains("\"phase\": \"scoreboard\""));
        assert!(json.contains("\"Bruno\""));
        assert!(json.contains("\"round\": 1"));
        assert!(!json.contains("pending_confirmation"));
    }

    #[test]
    fn snapshot_reflects_observable_attributes() {
        let state = played();
        let snapshot = MatchSnapshot::capture(&state, Some(ConfirmAction::FinishMatch));
        assert_eq!(snapshot.scores, vec![-6, 8, -2]);
        assert_eq!(snapshot.rounds[0].deltas, vec![-6, 8, -2]);
        assert_eq!(snapshot.first_player, Seat::new(1));
        assert_eq!(snapshot.time_remaining_seconds, 60);
        assert_eq!(snapshot.pending_confirmation, Some(ConfirmAction::FinishMatch));
    }

    #[test]
    fn standings_put_winner_first_and_skip_them_in_others() {
        let state = played();
        let standings = FinalStandings::capture(&state).unwrap();
        assert_eq!(standings.winner.name, "Bruno");
        assert_eq!(standings.winner.score, 8);
        let others: Vec<_> = standings.others.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(others, vec!["Ana", "Caio"]);
    }

    #[test]
    fn standings_need_players() {
        assert!(FinalStandings::capture(&MatchState::new()).is_none());
    }
}
