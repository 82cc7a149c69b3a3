use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `triagedesk`.
///
/// Each subsystem defines its own error variant. Library callers can match on
/// these to decide recovery strategy; internal code continues to use
/// `anyhow::Result` for ad-hoc context chains.
#[derive(Debug, Error)]
pub enum TriageError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Backend / External calls ────────────────────────────────────────
    #[error("backend: {0}")]
    Backend(#[from] BackendError),

    // ── Review session ──────────────────────────────────────────────────
    #[error("session: {0}")]
    Session(#[from] SessionError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Backend / external-call errors ─────────────────────────────────────────

/// Failures at the classification-backend boundary.
///
/// All variants are recoverable: the orchestrator surfaces them as a single
/// user-visible message and leaves session state untouched so the triggering
/// action can be retried.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The service answered with an explicit error payload (`{"error": ...}`).
    #[error("{message}")]
    Service { message: String },

    #[error("request failed with status {code}")]
    Status { code: u16 },

    #[error("http: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Review session errors ──────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum SessionError {
    /// Save rejected because the staged labels are incomplete. Blocks only
    /// the single save; no store mutation, no navigation.
    #[error("select both an intent and an issue before saving")]
    MissingLabels { intent: bool, issue: bool },

    /// A transition was invoked outside the phase that permits it.
    #[error("operation requires the {expected} phase (session is in {found})")]
    Phase {
        expected: crate::review::SessionPhase,
        found: crate::review::SessionPhase,
    },

    /// A review-phase transition was invoked with no ticket under the cursor.
    #[error("no ticket is currently selected")]
    NoTicket,

    /// Submit was invoked before a dataset file was selected.
    #[error("no dataset file selected")]
    NoFile,
}
