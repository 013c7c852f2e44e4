use crate::clock::{Clock, Epoch, TickOutcome};
use crate::error::ValidationError;
use crate::model::player::{Player, Roster, Seat};
use crate::model::round::{ScoringPhase, ScoringProgress};
use crate::model::score::{RoundResult, ScoreBoard};
use crate::model::settings::{MatchSettings, PlayerCount, TimeLimit};
use core::fmt;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Setup,
    FirstPlayerSelect,
    Turn,
    Scoring,
    Scoreboard,
    Result,
}

impl Phase {
    pub const fn as_str(self) -> &'static str {
        match self {
            Phase::Setup => "setup",
            Phase::FirstPlayerSelect => "first player selection",
            Phase::Turn => "turn",
            Phase::Scoring => "scoring",
            Phase::Scoreboard => "scoreboard",
            Phase::Result => "result",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct MatchState {
    settings: MatchSettings,
    roster: Roster,
    scores: ScoreBoard,
    rounds: Vec<RoundResult>,
    current_player: Seat,
    first_player: Seat,
    first_player_selected: bool,
    phase: Phase,
    clock: Clock,
    scoring: ScoringPhase,
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchState {
    pub fn new() -> Self {
        Self::with_settings(MatchSettings::default())
    }

    pub fn with_settings(settings: MatchSettings) -> Self {
        Self {
            settings,
            roster: Roster::default(),
            scores: ScoreBoard::default(),
            rounds: Vec::new(),
            current_player: Seat::new(0),
            first_player: Seat::new(0),
            first_player_selected: false,
            phase: Phase::Setup,
            clock: Clock::new(settings.time_limit.seconds()),
            scoring: ScoringPhase::default(),
        }
    }

    pub fn settings(&self) -> MatchSettings {
        self.settings
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn players(&self) -> &[Player] {
        self.roster.players()
    }

    pub fn player_count(&self) -> usize {
        self.roster.len()
    }

    pub fn scores(&self) -> &ScoreBoard {
        &self.scores
    }

    pub fn rounds(&self) -> &[RoundResult] {
        &self.rounds
    }

    pub fn current_player(&self) -> Seat {
        self.current_player
    }

    pub fn first_player(&self) -> Seat {
        self.first_player
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn time_remaining(&self) -> u32 {
        self.clock.remaining()
    }

    pub fn scoring_cursor(&self) -> usize {
        self.scoring.cursor()
    }

    fn expect_phase(&self, expected: Phase) -> Result<(), ValidationError> {
        if self.phase == expected {
            Ok(())
        } else {
            warn!(
                target: "handcount_core::match_state",
                expected = %expected,
                actual = %self.phase,
                "command rejected in current phase"
            );
            Err(ValidationError::WrongPhase {
                expected,
                actual: self.phase,
            })
        }
    }

    fn enter(&mut self, phase: Phase) {
        debug!(
            target: "handcount_core::match_state",
            from = %self.phase,
            to = %phase,
            "phase transition"
        );
        self.phase = phase;
    }

    // === Setup ===

    pub fn set_player_count(&mut self, count: usize) -> Result<(), ValidationError> {
        self.expect_phase(Phase::Setup)?;
        self.settings.player_count = PlayerCount::new(count)?;
        Ok(())
    }

    pub fn cycle_player_count(&mut self) -> Result<PlayerCount, ValidationError> {
        self.expect_phase(Phase::Setup)?;
        self.settings.player_count = self.settings.player_count.cycled();
        Ok(self.settings.player_count)
    }

    pub fn set_time_limit(&mut self, seconds: u32) -> Result<(), ValidationError> {
        self.expect_phase(Phase::Setup)?;
        self.settings.time_limit = TimeLimit::from_seconds(seconds)?;
        self.clock.reset(seconds);
        Ok(())
    }

    pub fn cycle_time_limit(&mut self) -> Result<TimeLimit, ValidationError> {
        self.expect_phase(Phase::Setup)?;
        self.settings.time_limit = self.settings.time_limit.cycled();
        self.clock.reset(self.settings.time_limit.seconds());
        Ok(self.settings.time_limit)
    }

    /// Seats the named players, zeroes every total and moves on to first
    /// player selection.
    pub fn initialize_match<I, S>(&mut self, names: I) -> Result<(), ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.expect_phase(Phase::Setup)?;
        let roster = Roster::new(names)?;
        let expected = self.settings.player_count.get();
        if roster.len() != expected {
            return Err(ValidationError::NameCountMismatch {
                expected,
                actual: roster.len(),
            });
        }

        self.scores = ScoreBoard::new(roster.len());
        self.rounds.clear();
        self.roster = roster;
        self.current_player = Seat::new(0);
        self.first_player = Seat::new(0);
        self.first_player_selected = false;
        self.scoring = ScoringPhase::default();
        self.clock.reset(self.settings.time_limit.seconds());

        info!(
            target: "handcount_core::match_state",
            players = self.roster.len(),
            time_limit = self.settings.time_limit.seconds(),
            "match initialized"
        );
        self.enter(Phase::FirstPlayerSelect);
        Ok(())
    }

    // === Rounds and turns ===

    pub fn select_first_player(&mut self, index: usize) -> Result<Seat, ValidationError> {
        self.expect_phase(Phase::FirstPlayerSelect)?;
        let seat = Seat::from_index(index, self.roster.len())?;
        self.first_player = seat;
        self.current_player = seat;
        self.first_player_selected = true;
        Ok(seat)
    }

    pub fn start_round(&mut self) -> Result<(), ValidationError> {
        self.expect_phase(Phase::FirstPlayerSelect)?;
        if !self.first_player_selected {
            return Err(ValidationError::FirstPlayerNotSelected);
        }
        self.clock.reset(self.settings.time_limit.seconds());
        self.enter(Phase::Turn);
        Ok(())
    }

    /// Leaves the turn screen without scoring; the round has to be started again.
    pub fn return_to_first_player_select(&mut self) -> Result<(), ValidationError> {
        self.expect_phase(Phase::Turn)?;
        self.clock.reset(self.settings.time_limit.seconds());
        self.first_player_selected = false;
        self.enter(Phase::FirstPlayerSelect);
        Ok(())
    }

    /// Goes back to setup before any round is scored. The seated names stay
    /// readable through [`MatchState::players`] so they can be re-seated or
    /// edited; count and time limit can be changed again.
    pub fn return_to_setup(&mut self) -> Result<(), ValidationError> {
        self.expect_phase(Phase::FirstPlayerSelect)?;
        if !self.rounds.is_empty() {
            return Err(ValidationError::RoundsAlreadyPlayed {
                rounds: self.rounds.len(),
            });
        }
        self.first_player_selected = false;
        self.current_player = Seat::new(0);
        self.first_player = Seat::new(0);
        self.clock.reset(self.settings.time_limit.seconds());
        self.enter(Phase::Setup);
        Ok(())
    }

    pub fn start_turn_clock(&mut self) -> Result<Epoch, ValidationError> {
        self.expect_phase(Phase::Turn)?;
        Ok(self.clock.start(self.settings.time_limit.seconds()))
    }

    pub fn stop_clock(&mut self) {
        self.clock.stop();
    }

    pub fn tick_clock(&mut self, epoch: Epoch) -> TickOutcome {
        if self.phase != Phase::Turn {
            return TickOutcome::Stale;
        }
        self.clock.tick(epoch)
    }

    /// Grace-delay callback after expiry. Advances the turn only if the clock
    /// that expired is still the current one.
    pub fn expire_turn(&mut self, epoch: Epoch) -> bool {
        if self.phase != Phase::Turn || !self.clock.grace_elapsed(epoch) {
            return false;
        }
        self.pass_turn();
        true
    }

    pub fn advance_turn(&mut self) -> Result<Seat, ValidationError> {
        self.expect_phase(Phase::Turn)?;
        Ok(self.pass_turn())
    }

    fn pass_turn(&mut self) -> Seat {
        self.current_player = self.current_player.next(self.roster.len());
        self.clock.reset(self.settings.time_limit.seconds());
        debug!(
            target: "handcount_core::match_state",
            current = %self.current_player,
            "turn advanced"
        );
        self.current_player
    }

    // === Scoring ===

    pub fn begin_scoring(&mut self) -> Result<(), ValidationError> {
        self.expect_phase(Phase::Turn)?;
        self.clock.stop();
        self.scoring = ScoringPhase::new(self.roster.len());
        self.enter(Phase::Scoring);
        Ok(())
    }

    /// Drops whatever was entered so far and returns to the turn screen.
    pub fn abandon_scoring(&mut self) -> Result<(), ValidationError> {
        self.expect_phase(Phase::Scoring)?;
        self.scoring = ScoringPhase::default();
        self.clock.reset(self.settings.time_limit.seconds());
        self.enter(Phase::Turn);
        Ok(())
    }

    pub fn submit_score(
        &mut self,
        seat_index: usize,
        value: i64,
    ) -> Result<ScoringProgress, ValidationError> {
        self.expect_phase(Phase::Scoring)?;
        let seat = Seat::from_index(seat_index, self.roster.len())?;
        let progress = self.scoring.submit(seat, value).inspect_err(|err| {
            warn!(
                target: "handcount_core::match_state",
                seat = %seat,
                value,
                error = %err,
                "score rejected"
            );
        })?;

        if let ScoringProgress::Complete(result) = &progress {
            self.scores.apply_round(result);
            self.rounds.push(result.clone());
            self.scoring = ScoringPhase::default();
            info!(
                target: "handcount_core::match_state",
                round = self.rounds.len(),
                deltas = ?result.deltas(),
                totals = ?self.scores.standings(),
                "round scored"
            );
            self.enter(Phase::Scoreboard);
        }

        Ok(progress)
    }

    pub fn start_next_round(&mut self) -> Result<(), ValidationError> {
        self.expect_phase(Phase::Scoreboard)?;
        self.first_player_selected = false;
        self.enter(Phase::FirstPlayerSelect);
        Ok(())
    }

    pub fn finish_match(&mut self) -> Result<(), ValidationError> {
        self.expect_phase(Phase::Scoreboard)?;
        self.clock.stop();
        info!(
            target: "handcount_core::match_state",
            rounds = self.rounds.len(),
            winner = ?self.determine_winner(),
            totals = ?self.scores.standings(),
            "match finished"
        );
        self.enter(Phase::Result);
        Ok(())
    }

    // === Restarts ===

    pub fn restart_same_players(&mut self) -> Result<(), ValidationError> {
        if self.phase == Phase::Setup || self.roster.is_empty() {
            return Err(ValidationError::WrongPhase {
                expected: Phase::Result,
                actual: self.phase,
            });
        }
        self.scores.reset();
        self.rounds.clear();
        self.current_player = Seat::new(0);
        self.first_player = Seat::new(0);
        self.first_player_selected = false;
        self.scoring = ScoringPhase::default();
        self.clock.reset(self.settings.time_limit.seconds());
        self.enter(Phase::FirstPlayerSelect);
        Ok(())
    }

    pub fn restart_new_players(&mut self) {
        self.clock.stop();
        let previous_clock = self.clock.clone();
        *self = Self::new();
        // Keep epochs monotonic so callbacks scheduled before the restart stay stale.
        self.clock = previous_clock;
        self.clock.reset(self.settings.time_limit.seconds());
        debug!(target: "handcount_core::match_state", "match reset to setup");
    }

    pub fn determine_winner(&self) -> Option<Seat> {
        self.scores.leading_player()
    }
}
