use super::decisions::DecisionStore;
use crate::backend::types::Ticket;

/// The editable field values staged for the ticket under the cursor.
///
/// Staging is not saving: nothing reaches the [`DecisionStore`] until the
/// reviewer confirms via the orchestrator's save transition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormFields {
    pub intent: String,
    pub issue: String,
    pub safe: bool,
}

impl FormFields {
    /// Reconcile the staged fields with the current ticket: a previously
    /// saved decision wins, otherwise blank defaults. Called on every
    /// navigation and on entry to review, so re-visits are idempotent and
    /// never show another ticket's stale labels.
    pub fn sync(&mut self, ticket: &Ticket, store: &DecisionStore) {
        match store.get(ticket.id) {
            Some(saved) => {
                self.intent = saved.intent.clone();
                self.issue = saved.issue.clone();
                self.safe = saved.safe_for_automation;
            }
            None => {
                self.intent.clear();
                self.issue.clear();
                self.safe = false;
            }
        }
    }

    /// One-shot prefill from the classifier's suggestions. Overwrites
    /// `intent`/`issue` only, never `safe`; an absent suggestion leaves the
    /// corresponding field untouched. Does not touch the store.
    pub fn apply_suggestion(&mut self, ticket: &Ticket) {
        if let Some(intent) = &ticket.intent {
            self.intent = intent.clone();
        }
        if let Some(issue) = &ticket.issue {
            self.issue = issue.clone();
        }
    }
}
