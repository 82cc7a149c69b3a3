pub mod http;
pub mod traits;
pub mod types;

pub use http::HttpTriageBackend;
pub use traits::TriageBackend;
pub use types::{ArtifactKind, ProcessOutcome, RiskTolerance, SessionStats, Ticket, TicketId};
