use serde::{Deserialize, Serialize};
use std::fmt;

// ─── Identifiers ─────────────────────────────────────────────────────────────

/// Backend-assigned ticket identity (row id in the analyzed dataset).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(pub u64);

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ─── Wire types ──────────────────────────────────────────────────────────────

/// One record the classifier flagged for human review.
///
/// Immutable once received; `intent`/`issue` are the classifier's suggestions
/// and may be absent when the model had nothing usable to offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    pub text: String,
    #[serde(default)]
    pub intent: Option<String>,
    #[serde(default)]
    pub issue: Option<String>,
    #[serde(default)]
    pub risk_score: Option<f64>,
}

/// Batch statistics reported by the backend. Displayed, never computed here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub auto: u64,
    pub human: u64,
    pub auto_coverage: f64,
}

/// Successful `/process` response: stats plus the flagged subset.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProcessOutcome {
    pub stats: SessionStats,
    #[serde(default)]
    pub needs_human: Vec<Ticket>,
}

// ─── Configuration enums ─────────────────────────────────────────────────────

/// How aggressively the backend auto-resolves records without human review.
/// Policy is owned by the backend; this is only the knob.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RiskTolerance {
    Conservative,
    #[default]
    Balanced,
    Aggressive,
}

/// Downloadable artifacts produced by the backend's export center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ArtifactKind {
    /// Records the classifier resolved on its own.
    AutomationQueue,
    /// Human-corrected records, suitable as training data.
    CorrectionQueue,
    /// The complete audit log for the batch.
    AuditLog,
}

impl ArtifactKind {
    /// Path segment under `/download/`. An external contract, preserved
    /// verbatim.
    pub fn path_segment(self) -> &'static str {
        match self {
            Self::AutomationQueue => "automation_queue",
            Self::CorrectionQueue => "human_training_data",
            Self::AuditLog => "full_audit_log",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}
