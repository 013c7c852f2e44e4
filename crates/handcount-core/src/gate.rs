use serde::Serialize;
use tracing::debug;

/// Irreversible commands that must be confirmed before they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmAction {
    EndRound,
    FinishMatch,
}

impl ConfirmAction {
    pub const fn prompt(self) -> &'static str {
        match self {
            ConfirmAction::EndRound => "End this round and count the points?",
            ConfirmAction::FinishMatch => "Finish the match and show the result?",
        }
    }
}

/// Single-slot holder for an action awaiting a yes/no answer. A new request
/// replaces whatever was pending.
#[derive(Debug, Clone)]
pub struct ConfirmationGate<A = ConfirmAction> {
    pending: Option<A>,
}

impl<A> Default for ConfirmationGate<A> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<A: std::fmt::Debug> ConfirmationGate<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> Option<&A> {
        self.pending.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn request(&mut self, action: A) {
        if let Some(previous) = self.pending.as_ref() {
            debug!(target: "handcount_core::gate", ?previous, "replacing unresolved confirmation");
        }
        self.pending = Some(action);
    }

    /// Runs `dispatch` on the pending action, if any. The slot is emptied
    /// before dispatch, so it stays clear whatever the action does.
    pub fn accept<R>(&mut self, dispatch: impl FnOnce(A) -> R) -> Option<R> {
        let action = self.pending.take()?;
        debug!(target: "handcount_core::gate", ?action, "confirmation accepted");
        Some(dispatch(action))
    }

    pub fn decline(&mut self) -> Option<A> {
        let action = self.pending.take();
        if let Some(action) = action.as_ref() {
            debug!(target: "handcount_core::gate", ?action, "confirmation declined");
        }
        action
    }
}
