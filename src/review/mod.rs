pub mod cursor;
pub mod decisions;
pub mod events;
pub mod form;
pub mod session;
pub mod taxonomy;

pub use cursor::TicketCursor;
pub use decisions::{Decision, DecisionStore};
pub use events::{SessionEvent, SessionSnapshot};
pub use form::FormFields;
pub use session::{
    ExportOutcome, ExportRequest, ExportStart, ProcessingRequest, ReviewSession, SaveOutcome,
    SessionPhase, SubmitOutcome,
};
