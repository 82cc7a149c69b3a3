use super::cursor::TicketCursor;
use super::decisions::{Decision, DecisionStore};
use super::events::{SessionEvent, SessionSnapshot};
use super::form::FormFields;
use crate::backend::traits::TriageBackend;
use crate::backend::types::{ProcessOutcome, RiskTolerance, SessionStats, Ticket};
use crate::error::{BackendError, SessionError};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{info, warn};

/// Which half of the workflow the session is in. Cursor, decision store, and
/// form are only meaningful during `Review`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum SessionPhase {
    Upload,
    Review,
}

/// Result of the upload-then-process transition.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Flagged tickets arrived; the session is now in review.
    EnteredReview { flagged: usize },
    /// The whole batch was auto-resolved. Stats are recorded, there is
    /// nothing to review, and the session stays in the upload phase. This is
    /// information, not an error.
    FullyAutomated,
    /// The external call failed; the message is also stored as the session's
    /// user-visible error. State is otherwise unchanged and the submit can be
    /// retried.
    Failed { message: String },
    /// A submit was already in flight; this call was a benign no-op.
    AlreadyRunning,
    /// The completion belonged to a generation that was reset away; it was
    /// discarded without touching state.
    Stale,
}

/// Result of a confirmed save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Saved and auto-advanced to the next ticket.
    Advanced,
    /// Saved the last ticket; the queue is fully reviewed.
    ReviewComplete,
}

/// Result of the batched decision export.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportOutcome {
    Submitted { accepted: u64 },
    /// Empty store: nothing was sent, no external call was made.
    NothingPending,
    /// The external call failed; all staged decisions are retained for retry.
    Failed { message: String },
    AlreadyRunning,
    Stale,
}

/// In-flight processing call, tagged with the generation it belongs to.
#[derive(Debug, Clone)]
pub struct ProcessingRequest {
    pub generation: u64,
    pub file: PathBuf,
    pub text_column: String,
    pub mode: RiskTolerance,
}

/// In-flight export call: a generation tag plus the decision snapshot.
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub generation: u64,
    pub decisions: Vec<Decision>,
}

/// Result of [`ReviewSession::begin_export`].
#[derive(Debug)]
pub enum ExportStart {
    Request(ExportRequest),
    NothingPending,
    AlreadyRunning,
}

const EVENT_CAPACITY: usize = 64;

/// The review-session state machine.
///
/// One value per session, constructed around a backend; no global instance.
/// Every transition is a named method returning an outcome or a typed error,
/// and all mutation happens on the single caller's thread. The two external
/// calls are split into `begin_*`/`complete_*` halves so that a reset while a
/// call is in flight invalidates the completion (generation guard) instead of
/// corrupting fresh state; [`submit`](Self::submit) and
/// [`export_decisions`](Self::export_decisions) are the async compositions.
pub struct ReviewSession {
    backend: Arc<dyn TriageBackend>,
    text_column: String,
    mode: RiskTolerance,

    phase: SessionPhase,
    file: Option<PathBuf>,
    file_name: Option<String>,
    processed: bool,
    stats: Option<SessionStats>,
    cursor: TicketCursor,
    decisions: DecisionStore,
    form: FormFields,
    loading: bool,
    error_message: Option<String>,
    generation: u64,
    events: broadcast::Sender<SessionEvent>,
}

impl ReviewSession {
    pub fn new(
        backend: Arc<dyn TriageBackend>,
        text_column: impl Into<String>,
        mode: RiskTolerance,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            backend,
            text_column: text_column.into(),
            mode,
            phase: SessionPhase::Upload,
            file: None,
            file_name: None,
            processed: false,
            stats: None,
            cursor: TicketCursor::new(),
            decisions: DecisionStore::new(),
            form: FormFields::default(),
            loading: false,
            error_message: None,
            generation: 0,
            events,
        }
    }

    // ── Observation ──────────────────────────────────────────────────────

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            loading: self.loading,
            processed: self.processed,
            error_message: self.error_message.clone(),
            file_name: self.file_name.clone(),
            stats: self.stats,
            position: self.cursor.position(),
            flagged: self.cursor.len(),
            current_ticket: self.cursor.current().cloned(),
            form: self.form.clone(),
            pending_decisions: self.decisions.len(),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn stats(&self) -> Option<SessionStats> {
        self.stats
    }

    pub fn current_ticket(&self) -> Option<&Ticket> {
        self.cursor.current()
    }

    pub fn form(&self) -> &FormFields {
        &self.form
    }

    pub fn pending_decisions(&self) -> usize {
        self.decisions.len()
    }

    fn emit(&self, event: SessionEvent) {
        // No receivers is fine; observation is optional.
        let _ = self.events.send(event);
    }

    fn require_phase(&self, expected: SessionPhase) -> Result<(), SessionError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(SessionError::Phase {
                expected,
                found: self.phase,
            })
        }
    }

    // ── Upload phase ─────────────────────────────────────────────────────

    /// Select the dataset file to submit. Clears any prior error.
    pub fn select_file(&mut self, path: impl Into<PathBuf>) -> Result<(), SessionError> {
        self.require_phase(SessionPhase::Upload)?;
        let path = path.into();
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        self.file = Some(path);
        self.file_name = Some(name.clone());
        self.error_message = None;
        self.emit(SessionEvent::FileSelected { name });
        Ok(())
    }

    /// Start the upload-then-process sequence: marks the session loading and
    /// hands back a generation-tagged request for the caller to execute.
    /// Returns `Ok(None)` when a call is already in flight (benign no-op).
    pub fn begin_processing(&mut self) -> Result<Option<ProcessingRequest>, SessionError> {
        self.require_phase(SessionPhase::Upload)?;
        let Some(file) = &self.file else {
            return Err(SessionError::NoFile);
        };
        if self.loading {
            return Ok(None);
        }
        self.loading = true;
        self.error_message = None;
        self.emit(SessionEvent::ProcessingStarted);
        Ok(Some(ProcessingRequest {
            generation: self.generation,
            file: file.clone(),
            text_column: self.text_column.clone(),
            mode: self.mode,
        }))
    }

    /// Apply the result of a processing call. Completions from a stale
    /// generation (the session was reset while the call was in flight) are
    /// discarded. On success the stats and ticket list are installed
    /// atomically, the decision store starts empty, and the cursor resets.
    pub fn complete_processing(
        &mut self,
        generation: u64,
        result: Result<ProcessOutcome, BackendError>,
    ) -> SubmitOutcome {
        if generation != self.generation {
            warn!(generation, current = self.generation, "discarding stale processing result");
            return SubmitOutcome::Stale;
        }
        self.loading = false;

        match result {
            Ok(outcome) => {
                self.stats = Some(outcome.stats);
                self.processed = true;
                self.decisions.clear();
                self.cursor.set_tickets(outcome.needs_human);

                if self.cursor.is_empty() {
                    info!(auto = outcome.stats.auto, "batch fully automated, nothing to review");
                    self.emit(SessionEvent::FullyAutomated);
                    SubmitOutcome::FullyAutomated
                } else {
                    let flagged = self.cursor.len();
                    self.phase = SessionPhase::Review;
                    self.sync_form();
                    info!(flagged, "entering review");
                    self.emit(SessionEvent::ReviewEntered { flagged });
                    SubmitOutcome::EnteredReview { flagged }
                }
            }
            Err(err) => {
                let message = err.to_string();
                self.error_message = Some(message.clone());
                self.emit(SessionEvent::ErrorSurfaced {
                    message: message.clone(),
                });
                SubmitOutcome::Failed { message }
            }
        }
    }

    /// Upload the selected dataset and process it, strictly in that order.
    /// Process is never attempted after a failed upload.
    pub async fn submit(&mut self) -> Result<SubmitOutcome, SessionError> {
        let Some(request) = self.begin_processing()? else {
            return Ok(SubmitOutcome::AlreadyRunning);
        };
        let backend = Arc::clone(&self.backend);
        let result = match backend
            .upload_dataset(&request.file, &request.text_column)
            .await
        {
            Ok(()) => backend.process(request.mode).await,
            Err(err) => Err(err),
        };
        Ok(self.complete_processing(request.generation, result))
    }

    // ── Review phase ─────────────────────────────────────────────────────

    /// Move to the next ticket (clamped at the end) and re-sync the form.
    pub fn next_ticket(&mut self) -> Result<(), SessionError> {
        self.require_phase(SessionPhase::Review)?;
        self.cursor.advance();
        self.sync_form();
        self.emit(SessionEvent::TicketChanged {
            position: self.cursor.position(),
        });
        Ok(())
    }

    /// Move to the previous ticket (clamped at the start) and re-sync.
    pub fn prev_ticket(&mut self) -> Result<(), SessionError> {
        self.require_phase(SessionPhase::Review)?;
        self.cursor.retreat();
        self.sync_form();
        self.emit(SessionEvent::TicketChanged {
            position: self.cursor.position(),
        });
        Ok(())
    }

    /// Stage the editable fields for the current ticket. Staging alone never
    /// reaches the decision store.
    pub fn stage_form(
        &mut self,
        intent: impl Into<String>,
        issue: impl Into<String>,
        safe: bool,
    ) -> Result<(), SessionError> {
        self.require_phase(SessionPhase::Review)?;
        self.form.intent = intent.into();
        self.form.issue = issue.into();
        self.form.safe = safe;
        Ok(())
    }

    /// Prefill the staged fields from the classifier's suggestions for the
    /// current ticket. Absent suggestions leave fields untouched.
    pub fn apply_suggestion(&mut self) -> Result<(), SessionError> {
        self.require_phase(SessionPhase::Review)?;
        let Some(ticket) = self.cursor.current() else {
            return Err(SessionError::NoTicket);
        };
        let ticket = ticket.clone();
        self.form.apply_suggestion(&ticket);
        Ok(())
    }

    /// Validate and save the staged decision for the current ticket, then
    /// auto-advance. Saving the last ticket completes the review instead.
    /// Validation failure mutates nothing and navigates nowhere.
    pub fn save_current(&mut self) -> Result<SaveOutcome, SessionError> {
        self.require_phase(SessionPhase::Review)?;
        let Some(ticket) = self.cursor.current() else {
            return Err(SessionError::NoTicket);
        };

        let missing_intent = self.form.intent.trim().is_empty();
        let missing_issue = self.form.issue.trim().is_empty();
        if missing_intent || missing_issue {
            return Err(SessionError::MissingLabels {
                intent: missing_intent,
                issue: missing_issue,
            });
        }

        let ticket_id = ticket.id;
        self.decisions.upsert(Decision {
            ticket_id,
            intent: self.form.intent.clone(),
            issue: self.form.issue.clone(),
            safe_for_automation: self.form.safe,
        });
        self.emit(SessionEvent::DecisionSaved { ticket_id });

        if self.cursor.at_end() {
            info!(decisions = self.decisions.len(), "review complete");
            self.emit(SessionEvent::ReviewComplete);
            Ok(SaveOutcome::ReviewComplete)
        } else {
            self.cursor.advance();
            self.sync_form();
            self.emit(SessionEvent::TicketChanged {
                position: self.cursor.position(),
            });
            Ok(SaveOutcome::Advanced)
        }
    }

    fn sync_form(&mut self) {
        if let Some(ticket) = self.cursor.current() {
            let ticket = ticket.clone();
            self.form.sync(&ticket, &self.decisions);
        }
    }

    // ── Export ───────────────────────────────────────────────────────────

    /// Start a bulk export. An empty store is a no-op: no external call is
    /// made and nothing changes.
    pub fn begin_export(&mut self) -> ExportStart {
        if self.decisions.is_empty() {
            return ExportStart::NothingPending;
        }
        if self.loading {
            return ExportStart::AlreadyRunning;
        }
        self.loading = true;
        self.error_message = None;
        let decisions = self.decisions.drain_all();
        self.emit(SessionEvent::ExportStarted {
            pending: decisions.len(),
        });
        ExportStart::Request(ExportRequest {
            generation: self.generation,
            decisions,
        })
    }

    /// Apply the result of a bulk export. Only a confirmed success clears the
    /// store; on failure every staged decision is retained for retry. Stale
    /// completions are discarded.
    pub fn complete_export(
        &mut self,
        generation: u64,
        result: Result<u64, BackendError>,
    ) -> ExportOutcome {
        if generation != self.generation {
            warn!(generation, current = self.generation, "discarding stale export result");
            return ExportOutcome::Stale;
        }
        self.loading = false;

        match result {
            Ok(accepted) => {
                self.decisions.clear();
                info!(accepted, "label batch accepted");
                self.emit(SessionEvent::ExportFinished { accepted });
                ExportOutcome::Submitted { accepted }
            }
            Err(err) => {
                let message = err.to_string();
                self.error_message = Some(message.clone());
                self.emit(SessionEvent::ErrorSurfaced {
                    message: message.clone(),
                });
                ExportOutcome::Failed { message }
            }
        }
    }

    /// Submit all pending decisions to the backend.
    pub async fn export_decisions(&mut self) -> ExportOutcome {
        let request = match self.begin_export() {
            ExportStart::Request(request) => request,
            ExportStart::NothingPending => return ExportOutcome::NothingPending,
            ExportStart::AlreadyRunning => return ExportOutcome::AlreadyRunning,
        };
        let backend = Arc::clone(&self.backend);
        let result = backend.submit_labels(&request.decisions).await;
        self.complete_export(request.generation, result)
    }

    // ── Reset ────────────────────────────────────────────────────────────

    /// Return to a fresh upload phase from anywhere. Bumps the generation so
    /// that any call still in flight completes into the void.
    pub fn reset_session(&mut self) {
        self.generation += 1;
        self.phase = SessionPhase::Upload;
        self.file = None;
        self.file_name = None;
        self.processed = false;
        self.stats = None;
        self.cursor.set_tickets(Vec::new());
        self.decisions.clear();
        self.form = FormFields::default();
        self.loading = false;
        self.error_message = None;
        info!(generation = self.generation, "session reset");
        self.emit(SessionEvent::SessionReset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::types::{ArtifactKind, TicketId};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct MockBackend {
        fail_upload: bool,
        fail_process: bool,
        fail_submit: bool,
        tickets: Vec<Ticket>,
        stats: SessionStats,
        submitted: Mutex<Vec<Vec<Decision>>>,
        upload_calls: Mutex<u64>,
        process_calls: Mutex<u64>,
    }

    impl MockBackend {
        fn flagging(tickets: Vec<Ticket>) -> Self {
            Self {
                fail_upload: false,
                fail_process: false,
                fail_submit: false,
                stats: SessionStats {
                    auto: 8,
                    human: tickets.len() as u64,
                    auto_coverage: 0.8,
                },
                tickets,
                submitted: Mutex::new(Vec::new()),
                upload_calls: Mutex::new(0),
                process_calls: Mutex::new(0),
            }
        }
    }

    #[async_trait]
    impl TriageBackend for MockBackend {
        async fn upload_dataset(
            &self,
            _file: &std::path::Path,
            _text_column: &str,
        ) -> Result<(), BackendError> {
            *self.upload_calls.lock().unwrap() += 1;
            if self.fail_upload {
                return Err(BackendError::Service {
                    message: "bad csv".into(),
                });
            }
            Ok(())
        }

        async fn process(&self, _mode: RiskTolerance) -> Result<ProcessOutcome, BackendError> {
            *self.process_calls.lock().unwrap() += 1;
            if self.fail_process {
                return Err(BackendError::Service {
                    message: "models offline".into(),
                });
            }
            Ok(ProcessOutcome {
                stats: self.stats,
                needs_human: self.tickets.clone(),
            })
        }

        async fn submit_labels(&self, decisions: &[Decision]) -> Result<u64, BackendError> {
            if self.fail_submit {
                return Err(BackendError::Status { code: 502 });
            }
            self.submitted.lock().unwrap().push(decisions.to_vec());
            Ok(decisions.len() as u64)
        }

        fn artifact_url(&self, kind: ArtifactKind) -> String {
            format!("mock://download/{kind}")
        }
    }

    fn ticket(id: u64) -> Ticket {
        Ticket {
            id: TicketId(id),
            text: format!("ticket {id}"),
            intent: Some("WANTS_ACTION".into()),
            issue: Some("PAYMENT_PROBLEM".into()),
            risk_score: Some(0.9),
        }
    }

    fn session_with(backend: MockBackend) -> ReviewSession {
        ReviewSession::new(Arc::new(backend), "feedback", RiskTolerance::Balanced)
    }

    async fn session_in_review(ids: &[u64]) -> ReviewSession {
        let backend = MockBackend::flagging(ids.iter().map(|id| ticket(*id)).collect());
        let mut session = session_with(backend);
        session.select_file("/tmp/batch.csv").unwrap();
        let outcome = session.submit().await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::EnteredReview { .. }));
        session
    }

    #[tokio::test]
    async fn submit_without_file_is_rejected() {
        let mut session = session_with(MockBackend::flagging(vec![ticket(1)]));
        let err = session.submit().await.unwrap_err();
        assert!(matches!(err, SessionError::NoFile));
    }

    #[tokio::test]
    async fn submit_enters_review_and_syncs_blank_form() {
        let session = session_in_review(&[1, 2]).await;
        assert_eq!(session.phase(), SessionPhase::Review);
        assert_eq!(session.current_ticket().unwrap().id, TicketId(1));
        assert_eq!(session.form().intent, "");
        assert!(!session.loading());
        assert_eq!(session.stats().unwrap().auto, 8);
    }

    #[tokio::test]
    async fn empty_flagged_list_stays_out_of_review_but_records_stats() {
        let backend = MockBackend::flagging(Vec::new());
        let mut session = session_with(backend);
        session.select_file("/tmp/batch.csv").unwrap();

        let outcome = session.submit().await.unwrap();

        assert_eq!(outcome, SubmitOutcome::FullyAutomated);
        assert_eq!(session.phase(), SessionPhase::Upload);
        assert!(session.stats().is_some());
        assert!(session.error_message().is_none());
    }

    #[tokio::test]
    async fn failed_upload_skips_process_and_surfaces_error() {
        let mut backend = MockBackend::flagging(vec![ticket(1)]);
        backend.fail_upload = true;
        let backend = Arc::new(backend);
        let mut session = ReviewSession::new(
            Arc::clone(&backend) as Arc<dyn TriageBackend>,
            "feedback",
            RiskTolerance::Balanced,
        );
        session.select_file("/tmp/batch.csv").unwrap();

        let outcome = session.submit().await.unwrap();

        assert!(matches!(outcome, SubmitOutcome::Failed { .. }));
        assert_eq!(session.phase(), SessionPhase::Upload);
        assert_eq!(session.error_message(), Some("bad csv"));
        assert!(session.stats().is_none());
        assert!(!session.loading());
        // Strict ordering: process is never attempted after a failed upload.
        assert_eq!(*backend.upload_calls.lock().unwrap(), 1);
        assert_eq!(*backend.process_calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn failed_process_installs_nothing() {
        let mut backend = MockBackend::flagging(vec![ticket(1)]);
        backend.fail_process = true;
        let mut session = session_with(backend);
        session.select_file("/tmp/batch.csv").unwrap();

        let outcome = session.submit().await.unwrap();

        assert!(matches!(outcome, SubmitOutcome::Failed { .. }));
        assert!(session.stats().is_none());
        assert!(session.current_ticket().is_none());
    }

    #[tokio::test]
    async fn save_validates_both_labels() {
        let mut session = session_in_review(&[1, 2]).await;
        session.stage_form("", "PAYMENT_PROBLEM", false).unwrap();

        let err = session.save_current().unwrap_err();

        assert!(matches!(
            err,
            SessionError::MissingLabels {
                intent: true,
                issue: false
            }
        ));
        // No store mutation, no navigation.
        assert_eq!(session.pending_decisions(), 0);
        assert_eq!(session.current_ticket().unwrap().id, TicketId(1));
    }

    #[tokio::test]
    async fn save_upserts_and_auto_advances() {
        let mut session = session_in_review(&[1, 2]).await;
        session
            .stage_form("WANTS_ACTION", "PAYMENT_PROBLEM", true)
            .unwrap();

        let outcome = session.save_current().unwrap();

        assert_eq!(outcome, SaveOutcome::Advanced);
        assert_eq!(session.pending_decisions(), 1);
        assert_eq!(session.current_ticket().unwrap().id, TicketId(2));
        // Next ticket has no saved decision: blank form.
        assert_eq!(session.form().intent, "");
    }

    #[tokio::test]
    async fn save_on_last_ticket_completes_review_without_advancing() {
        let mut session = session_in_review(&[1]).await;
        session
            .stage_form("WANTS_INFO", "DATA_LOSS", false)
            .unwrap();

        let outcome = session.save_current().unwrap();

        assert_eq!(outcome, SaveOutcome::ReviewComplete);
        assert_eq!(session.current_ticket().unwrap().id, TicketId(1));
    }

    #[tokio::test]
    async fn saved_decision_round_trips_through_navigation() {
        let mut session = session_in_review(&[1, 2]).await;
        session
            .stage_form("WANTS_ACTION", "PAYMENT_PROBLEM", true)
            .unwrap();
        session.save_current().unwrap();

        session.prev_ticket().unwrap();
        assert_eq!(session.form().intent, "WANTS_ACTION");
        assert_eq!(session.form().issue, "PAYMENT_PROBLEM");
        assert!(session.form().safe);

        session.next_ticket().unwrap();
        assert_eq!(session.form().intent, "");
    }

    #[tokio::test]
    async fn apply_suggestion_stages_without_saving() {
        let mut session = session_in_review(&[1]).await;
        session.apply_suggestion().unwrap();

        assert_eq!(session.form().intent, "WANTS_ACTION");
        assert_eq!(session.form().issue, "PAYMENT_PROBLEM");
        assert!(!session.form().safe);
        assert_eq!(session.pending_decisions(), 0);
    }

    #[tokio::test]
    async fn export_on_empty_store_makes_no_call() {
        let mut session = session_in_review(&[1]).await;
        let outcome = session.export_decisions().await;
        assert_eq!(outcome, ExportOutcome::NothingPending);
    }

    #[tokio::test]
    async fn export_failure_retains_decisions_for_retry() {
        let mut backend = MockBackend::flagging(vec![ticket(1)]);
        backend.fail_submit = true;
        let mut session = session_with(backend);
        session.select_file("/tmp/batch.csv").unwrap();
        session.submit().await.unwrap();
        session
            .stage_form("WANTS_INFO", "DATA_LOSS", false)
            .unwrap();
        session.save_current().unwrap();

        let outcome = session.export_decisions().await;

        assert!(matches!(outcome, ExportOutcome::Failed { .. }));
        assert_eq!(session.pending_decisions(), 1);
        assert!(session.error_message().is_some());
    }

    #[tokio::test]
    async fn export_success_clears_the_store() {
        let mut session = session_in_review(&[1, 2]).await;
        session
            .stage_form("WANTS_INFO", "DATA_LOSS", false)
            .unwrap();
        session.save_current().unwrap();
        session
            .stage_form("WANTS_ACTION", "PAYMENT_PROBLEM", true)
            .unwrap();
        session.save_current().unwrap();

        let outcome = session.export_decisions().await;

        assert_eq!(outcome, ExportOutcome::Submitted { accepted: 2 });
        assert_eq!(session.pending_decisions(), 0);
    }

    #[tokio::test]
    async fn stale_processing_completion_is_discarded_after_reset() {
        let mut session = session_with(MockBackend::flagging(vec![ticket(1)]));
        session.select_file("/tmp/batch.csv").unwrap();
        let request = session.begin_processing().unwrap().unwrap();

        session.reset_session();

        let outcome = session.complete_processing(
            request.generation,
            Ok(ProcessOutcome {
                stats: SessionStats {
                    auto: 1,
                    human: 1,
                    auto_coverage: 0.5,
                },
                needs_human: vec![ticket(1)],
            }),
        );

        assert_eq!(outcome, SubmitOutcome::Stale);
        assert_eq!(session.phase(), SessionPhase::Upload);
        assert!(session.stats().is_none());
        assert!(!session.loading());
    }

    #[tokio::test]
    async fn stale_export_completion_is_discarded_after_reset() {
        let mut session = session_in_review(&[1]).await;
        session
            .stage_form("WANTS_INFO", "DATA_LOSS", false)
            .unwrap();
        session.save_current().unwrap();

        let ExportStart::Request(request) = session.begin_export() else {
            panic!("expected an export request");
        };
        session.reset_session();

        let outcome = session.complete_export(request.generation, Ok(1));

        assert_eq!(outcome, ExportOutcome::Stale);
        assert_eq!(session.pending_decisions(), 0);
        assert!(!session.loading());
    }

    #[tokio::test]
    async fn double_begin_processing_is_a_benign_noop() {
        let mut session = session_with(MockBackend::flagging(vec![ticket(1)]));
        session.select_file("/tmp/batch.csv").unwrap();

        let first = session.begin_processing().unwrap();
        let second = session.begin_processing().unwrap();

        assert!(first.is_some());
        assert!(second.is_none());
    }

    #[tokio::test]
    async fn reset_restores_a_fresh_session() {
        let mut session = session_in_review(&[1, 2]).await;
        session
            .stage_form("WANTS_INFO", "DATA_LOSS", false)
            .unwrap();
        session.save_current().unwrap();

        session.reset_session();

        let snapshot = session.snapshot();
        assert_eq!(snapshot.phase, SessionPhase::Upload);
        assert_eq!(snapshot.pending_decisions, 0);
        assert_eq!(snapshot.flagged, 0);
        assert!(snapshot.file_name.is_none());
        assert!(snapshot.stats.is_none());
        assert!(snapshot.error_message.is_none());

        // A subsequent submit behaves like a fresh session.
        session.select_file("/tmp/other.csv").unwrap();
        let outcome = session.submit().await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::EnteredReview { flagged: 2 }));
    }

    #[tokio::test]
    async fn review_transitions_require_review_phase() {
        let mut session = session_with(MockBackend::flagging(vec![ticket(1)]));
        assert!(matches!(
            session.next_ticket().unwrap_err(),
            SessionError::Phase { .. }
        ));
        assert!(matches!(
            session.save_current().unwrap_err(),
            SessionError::Phase { .. }
        ));
    }

    #[tokio::test]
    async fn events_are_broadcast_to_subscribers() {
        let mut session = session_with(MockBackend::flagging(vec![ticket(1)]));
        let mut events = session.subscribe();

        session.select_file("/tmp/batch.csv").unwrap();
        session.submit().await.unwrap();

        assert_eq!(
            events.try_recv().unwrap(),
            SessionEvent::FileSelected {
                name: "batch.csv".into()
            }
        );
        assert_eq!(events.try_recv().unwrap(), SessionEvent::ProcessingStarted);
        assert_eq!(
            events.try_recv().unwrap(),
            SessionEvent::ReviewEntered { flagged: 1 }
        );
    }
}
