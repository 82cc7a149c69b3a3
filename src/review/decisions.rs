use crate::backend::types::TicketId;
use serde::{Deserialize, Serialize};

/// The human-confirmed labeling for one ticket. Created or overwritten only
/// by an explicit save; uniquely keyed by `ticket_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub ticket_id: TicketId,
    pub intent: String,
    pub issue: String,
    pub safe_for_automation: bool,
}

/// In-memory mapping from ticket to decision, kept in insertion order so the
/// bulk submission sees decisions in the order the reviewer first made them.
///
/// Invariant: at most one decision per ticket; the last upsert wins and keeps
/// the original position. Nothing here outlives the session.
#[derive(Debug, Default)]
pub struct DecisionStore {
    decisions: Vec<Decision>,
}

impl DecisionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entry for `decision.ticket_id`. Infallible; the
    /// caller validates before staging a decision here.
    pub fn upsert(&mut self, decision: Decision) {
        match self
            .decisions
            .iter_mut()
            .find(|existing| existing.ticket_id == decision.ticket_id)
        {
            Some(existing) => *existing = decision,
            None => self.decisions.push(decision),
        }
    }

    pub fn get(&self, ticket_id: TicketId) -> Option<&Decision> {
        self.decisions
            .iter()
            .find(|decision| decision.ticket_id == ticket_id)
    }

    /// Snapshot of all decisions in insertion order. Does not mutate the
    /// store: the caller clears separately, and only after the external
    /// submission is confirmed, so a failed submit loses nothing.
    pub fn drain_all(&self) -> Vec<Decision> {
        self.decisions.clone()
    }

    pub fn clear(&mut self) {
        self.decisions.clear();
    }

    pub fn len(&self) -> usize {
        self.decisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decisions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{Decision, DecisionStore};
    use crate::backend::types::TicketId;

    fn decision(id: u64, intent: &str) -> Decision {
        Decision {
            ticket_id: TicketId(id),
            intent: intent.to_string(),
            issue: "GENERAL_SUPPORT".to_string(),
            safe_for_automation: false,
        }
    }

    #[test]
    fn upsert_inserts_then_replaces_in_place() {
        let mut store = DecisionStore::new();
        store.upsert(decision(1, "WANTS_INFO"));
        store.upsert(decision(2, "WANTS_ACTION"));
        store.upsert(decision(1, "WANTS_SUPPORT"));

        assert_eq!(store.len(), 2);
        assert_eq!(store.get(TicketId(1)).unwrap().intent, "WANTS_SUPPORT");

        // Replacement keeps the original position.
        let all = store.drain_all();
        assert_eq!(all[0].ticket_id, TicketId(1));
        assert_eq!(all[1].ticket_id, TicketId(2));
    }

    #[test]
    fn get_returns_none_for_unknown_ticket() {
        let store = DecisionStore::new();
        assert!(store.get(TicketId(9)).is_none());
    }

    #[test]
    fn drain_all_does_not_mutate() {
        let mut store = DecisionStore::new();
        store.upsert(decision(1, "WANTS_INFO"));

        let snapshot = store.drain_all();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn clear_empties_the_store() {
        let mut store = DecisionStore::new();
        store.upsert(decision(1, "WANTS_INFO"));
        store.clear();
        assert!(store.is_empty());
    }
}
