use super::match_state::{MatchState, Phase};
use super::serialization::MatchSnapshot;
use crate::clock::{Epoch, TickOutcome};
use crate::error::ValidationError;
use crate::gate::{ConfirmAction, ConfirmationGate};
use crate::model::player::Seat;
use crate::model::round::ScoringProgress;
use crate::model::settings::MatchSettings;
use crate::signal::{Signal, SignalSink};

/// What a presentation layer holds: the match, the confirmation prompt and
/// the place signals are delivered to.
#[derive(Debug)]
pub struct Session<S> {
    state: MatchState,
    gate: ConfirmationGate<ConfirmAction>,
    sink: S,
}

impl<S: SignalSink> Session<S> {
    pub fn new(sink: S) -> Self {
        Self::with_settings(MatchSettings::default(), sink)
    }

    pub fn with_settings(settings: MatchSettings, sink: S) -> Self {
        Self {
            state: MatchState::with_settings(settings),
            gate: ConfirmationGate::new(),
            sink,
        }
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut MatchState {
        &mut self.state
    }

    pub fn pending_confirmation(&self) -> Option<ConfirmAction> {
        self.gate.pending().copied()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot::capture(&self.state, self.pending_confirmation())
    }

    // === Confirmation ===

    /// Asks for confirmation of `action`. Rejected up front when the action
    /// could not run in the current phase.
    pub fn request(&mut self, action: ConfirmAction) -> Result<&'static str, ValidationError> {
        let expected = Self::phase_for(action);
        if self.state.phase() != expected {
            return Err(ValidationError::WrongPhase {
                expected,
                actual: self.state.phase(),
            });
        }
        self.gate.request(action);
        Ok(action.prompt())
    }

    pub fn confirm(&mut self) -> Result<Option<ConfirmAction>, ValidationError> {
        let state = &mut self.state;
        let sink = &mut self.sink;
        self.gate
            .accept(|action| Self::dispatch(state, sink, action).map(|()| action))
            .transpose()
    }

    pub fn decline(&mut self) -> Option<ConfirmAction> {
        self.gate.decline()
    }

    const fn phase_for(action: ConfirmAction) -> Phase {
        match action {
            ConfirmAction::EndRound => Phase::Turn,
            ConfirmAction::FinishMatch => Phase::Scoreboard,
        }
    }

    fn dispatch(
        state: &mut MatchState,
        sink: &mut S,
        action: ConfirmAction,
    ) -> Result<(), ValidationError> {
        match action {
            ConfirmAction::EndRound => state.begin_scoring(),
            ConfirmAction::FinishMatch => {
                state.finish_match()?;
                sink.emit(Signal::MatchReadyForResult);
                Ok(())
            }
        }
    }

    // === Turn clock ===

    pub fn start_turn_clock(&mut self) -> Result<Epoch, ValidationError> {
        self.state.start_turn_clock()
    }

    pub fn on_tick(&mut self, epoch: Epoch) -> TickOutcome {
        let outcome = self.state.tick_clock(epoch);
        for signal in outcome.signals() {
            self.sink.emit(*signal);
        }
        outcome
    }

    pub fn on_grace(&mut self, epoch: Epoch) -> bool {
        self.state.expire_turn(epoch)
    }

    pub fn advance_turn(&mut self) -> Result<Seat, ValidationError> {
        self.state.advance_turn()
    }

    // === Scoring ===

    pub fn submit_score(
        &mut self,
        seat_index: usize,
        value: i64,
    ) -> Result<ScoringProgress, ValidationError> {
        let progress = self.state.submit_score(seat_index, value)?;
        if matches!(progress, ScoringProgress::Complete(_)) {
            self.sink.emit(Signal::RoundComplete {
                round_number: self.state.rounds().len(),
            });
        }
        Ok(progress)
    }

    pub fn restart_same_players(&mut self) -> Result<(), ValidationError> {
        self.gate.decline();
        self.state.restart_same_players()
    }

    pub fn restart_new_players(&mut self) {
        self.gate.decline();
        self.state.restart_new_players();
    }
}
