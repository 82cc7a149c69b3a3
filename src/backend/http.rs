use super::traits::TriageBackend;
use super::types::{ArtifactKind, ProcessOutcome, RiskTolerance};
use crate::error::BackendError;
use crate::review::Decision;
use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// HTTP implementation of [`TriageBackend`].
///
/// Endpoint paths, form field names, and JSON shapes are an external
/// contract shared with the triage service; they must not drift.
pub struct HttpTriageBackend {
    cached_upload_url: String,
    cached_process_url: String,
    cached_label_url: String,
    cached_download_base: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ProcessRequest {
    risk_tolerance: RiskTolerance,
}

#[derive(Debug, Serialize)]
struct LabelBulkRequest<'a> {
    human_labels: &'a [Decision],
}

impl HttpTriageBackend {
    pub fn new(base_url: &str) -> Self {
        Self::with_timeout(base_url, 120)
    }

    pub fn with_timeout(base_url: &str, timeout_secs: u64) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            cached_upload_url: format!("{base}/upload_csv"),
            cached_process_url: format!("{base}/process"),
            cached_label_url: format!("{base}/label_bulk"),
            cached_download_base: format!("{base}/download"),
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .connect_timeout(Duration::from_secs(10))
                .pool_max_idle_per_host(10)
                .pool_idle_timeout(Duration::from_secs(90))
                .tcp_keepalive(Duration::from_secs(60))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    /// Read a response body, honoring the service's error convention: a JSON
    /// payload carrying `{"error": "..."}` wins over the HTTP status, so the
    /// user sees the service's own message rather than a bare status code.
    async fn read_body(response: reqwest::Response) -> Result<serde_json::Value, BackendError> {
        let status = response.status();
        let text = response.text().await?;

        if let Ok(value) = serde_json::from_str::<serde_json::Value>(&text) {
            if let Some(message) = value.get("error").and_then(serde_json::Value::as_str) {
                return Err(BackendError::Service {
                    message: message.to_string(),
                });
            }
            if status.is_success() {
                return Ok(value);
            }
        }

        if status.is_success() {
            Err(BackendError::Decode(format!(
                "expected a JSON body, got: {}",
                truncate(&text)
            )))
        } else {
            Err(BackendError::Status {
                code: status.as_u16(),
            })
        }
    }
}

fn truncate(text: &str) -> String {
    const LIMIT: usize = 200;
    if text.len() <= LIMIT {
        text.to_string()
    } else {
        let cut = text
            .char_indices()
            .take_while(|(idx, _)| *idx <= LIMIT)
            .last()
            .map_or(0, |(idx, _)| idx);
        format!("{}…", &text[..cut])
    }
}

#[async_trait]
impl TriageBackend for HttpTriageBackend {
    async fn upload_dataset(&self, file: &Path, text_column: &str) -> Result<(), BackendError> {
        let bytes = tokio::fs::read(file).await?;
        let file_name = file
            .file_name()
            .map_or_else(|| "dataset.csv".to_string(), |n| n.to_string_lossy().into_owned());

        debug!(file = %file_name, text_column, "uploading dataset");

        let form = Form::new()
            .part("file", Part::bytes(bytes).file_name(file_name))
            .text("text_column", text_column.to_string());

        let response = self
            .client
            .post(&self.cached_upload_url)
            .multipart(form)
            .send()
            .await?;

        Self::read_body(response).await?;
        Ok(())
    }

    async fn process(&self, mode: RiskTolerance) -> Result<ProcessOutcome, BackendError> {
        debug!(%mode, "requesting batch classification");

        let response = self
            .client
            .post(&self.cached_process_url)
            .json(&ProcessRequest {
                risk_tolerance: mode,
            })
            .send()
            .await?;

        let body = Self::read_body(response).await?;
        serde_json::from_value(body).map_err(|err| BackendError::Decode(err.to_string()))
    }

    async fn submit_labels(&self, decisions: &[Decision]) -> Result<u64, BackendError> {
        debug!(count = decisions.len(), "submitting label batch");

        let response = self
            .client
            .post(&self.cached_label_url)
            .json(&LabelBulkRequest {
                human_labels: decisions,
            })
            .send()
            .await?;

        let body = Self::read_body(response).await?;
        body.get("count")
            .and_then(serde_json::Value::as_u64)
            .ok_or_else(|| BackendError::Decode("missing accepted count".to_string()))
    }

    fn artifact_url(&self, kind: ArtifactKind) -> String {
        format!("{}/{}", self.cached_download_base, kind.path_segment())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_cached_without_trailing_slash() {
        let backend = HttpTriageBackend::new("http://localhost:5000/");
        assert_eq!(backend.cached_upload_url, "http://localhost:5000/upload_csv");
        assert_eq!(backend.cached_process_url, "http://localhost:5000/process");
        assert_eq!(backend.cached_label_url, "http://localhost:5000/label_bulk");
    }

    #[test]
    fn artifact_url_uses_download_path() {
        let backend = HttpTriageBackend::new("http://localhost:5000");
        assert_eq!(
            backend.artifact_url(ArtifactKind::CorrectionQueue),
            "http://localhost:5000/download/human_training_data"
        );
    }

    #[test]
    fn truncate_keeps_short_bodies_intact() {
        assert_eq!(truncate("ok"), "ok");
        assert!(truncate(&"x".repeat(500)).ends_with('…'));
    }
}
