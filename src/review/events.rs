use super::form::FormFields;
use super::session::SessionPhase;
use crate::backend::types::{SessionStats, Ticket, TicketId};

/// State-change notifications emitted by the orchestrator.
///
/// Observers (rendering, logging) subscribe via
/// [`ReviewSession::subscribe`](super::session::ReviewSession::subscribe)
/// instead of intercepting mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    FileSelected { name: String },
    ProcessingStarted,
    ReviewEntered { flagged: usize },
    FullyAutomated,
    TicketChanged { position: usize },
    DecisionSaved { ticket_id: TicketId },
    ReviewComplete,
    ExportStarted { pending: usize },
    ExportFinished { accepted: u64 },
    ErrorSurfaced { message: String },
    SessionReset,
}

/// Cheap copy of the user-visible session state, taken at a transition
/// boundary. Everything a renderer needs; none of the machinery.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub loading: bool,
    pub processed: bool,
    pub error_message: Option<String>,
    pub file_name: Option<String>,
    pub stats: Option<SessionStats>,
    pub position: usize,
    pub flagged: usize,
    pub current_ticket: Option<Ticket>,
    pub form: FormFields,
    pub pending_decisions: usize,
}
