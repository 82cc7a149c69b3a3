use super::types::{ArtifactKind, ProcessOutcome, RiskTolerance};
use crate::error::BackendError;
use crate::review::Decision;
use async_trait::async_trait;
use std::path::Path;

/// The classification backend, treated as an opaque service.
///
/// Transport is the implementor's concern. The two-step dataset flow is
/// strictly ordered: callers must not invoke [`process`](Self::process) until
/// [`upload_dataset`](Self::upload_dataset) has returned `Ok`.
#[async_trait]
pub trait TriageBackend: Send + Sync {
    /// Submit the raw dataset file together with the configured text column.
    async fn upload_dataset(&self, file: &Path, text_column: &str) -> Result<(), BackendError>;

    /// Run classification over the uploaded dataset and return batch stats
    /// plus the subset flagged for human review.
    async fn process(&self, mode: RiskTolerance) -> Result<ProcessOutcome, BackendError>;

    /// Submit a batch of human decisions. Returns the accepted count.
    async fn submit_labels(&self, decisions: &[Decision]) -> Result<u64, BackendError>;

    /// Location of a downloadable artifact. A pure side channel; fetching it
    /// has no effect on session state.
    fn artifact_url(&self, kind: ArtifactKind) -> String;
}
