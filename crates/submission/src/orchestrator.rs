//! Submission orchestration.
//!
//! A submission runs at most two steps, voiceover first, then text overlay.
//! Each step posts its payload, and on success hands the response body to the
//! download sink under `processed_<video name>`. The first failure ends the
//! submission.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use mochi_common::config::AppConfig;
use mochi_common::error::MochiResult;
use mochi_editor_model::{EditorSession, ProcessingError, SubmissionSnapshot};

use crate::backend::{BackendResponse, Endpoint, HttpBackend, ProcessingBackend};
use crate::download::{download_name, DeliveredFile, DirectoryDownloads, DownloadSink};
use crate::payload::{text_overlay_payload, voiceover_payload, FormPayload};

/// One request the orchestrator will make.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedStep {
    pub endpoint: Endpoint,
    pub payload: FormPayload,
}

/// Requests derived from a snapshot, in execution order.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionPlan {
    /// Name processed videos are downloaded under.
    pub download_name: String,
    pub steps: Vec<PlannedStep>,
}

impl SubmissionPlan {
    /// Work out which steps a snapshot needs. Fails only when no video is
    /// selected.
    pub fn build(snapshot: &SubmissionSnapshot) -> Result<Self, ProcessingError> {
        let video = snapshot
            .video
            .as_ref()
            .ok_or_else(ProcessingError::video_required)?;

        let mut steps = Vec::with_capacity(2);
        if let Some(payload) = voiceover_payload(video, &snapshot.audio) {
            steps.push(PlannedStep {
                endpoint: Endpoint::Voiceover,
                payload,
            });
        }
        if let Some(payload) = text_overlay_payload(video, &snapshot.overlays)? {
            steps.push(PlannedStep {
                endpoint: Endpoint::TextOverlay,
                payload,
            });
        }

        Ok(Self {
            download_name: download_name(video.name()),
            steps,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// A step that finished and produced a download.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedStep {
    pub endpoint: Endpoint,
    pub status: u16,
    pub download: DeliveredFile,
}

/// What a successful submission did. Empty when there was nothing to send.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmissionOutcome {
    pub steps: Vec<CompletedStep>,
}

impl SubmissionOutcome {
    pub fn is_noop(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Result of submitting from a session.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionResult {
    Completed(SubmissionOutcome),
    Failed(ProcessingError),
    /// Another submission was still in flight; nothing was sent.
    Refused,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Value,
}

/// User-facing message for a non-success response: the body's `message`
/// when it is JSON and set, otherwise a status line.
///
/// `null`, `false`, `0` and `""` count as unset. Other non-string values are
/// rendered as JSON text.
pub fn failure_message(response: &BackendResponse) -> String {
    serde_json::from_slice::<ErrorBody>(&response.body)
        .ok()
        .and_then(|body| message_text(body.message))
        .unwrap_or_else(|| format!("HTTP error! status: {}", response.status))
}

fn message_text(message: Value) -> Option<String> {
    match message {
        Value::Null | Value::Bool(false) => None,
        Value::String(text) => (!text.is_empty()).then_some(text),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

/// Runs submissions against a backend and delivers results to a sink.
#[derive(Clone)]
pub struct Orchestrator {
    backend: Arc<dyn ProcessingBackend>,
    downloads: Arc<dyn DownloadSink>,
}

impl Orchestrator {
    pub fn new(backend: Arc<dyn ProcessingBackend>, downloads: Arc<dyn DownloadSink>) -> Self {
        Self { backend, downloads }
    }

    /// HTTP backend and directory downloads as configured.
    pub fn from_config(config: &AppConfig) -> MochiResult<Self> {
        let backend = HttpBackend::new(config.server.clone())?;
        let downloads = DirectoryDownloads::new(config.downloads.dir.clone());
        Ok(Self::new(Arc::new(backend), Arc::new(downloads)))
    }

    /// Run every step a snapshot needs, stopping at the first failure.
    pub async fn run(
        &self,
        snapshot: &SubmissionSnapshot,
    ) -> Result<SubmissionOutcome, ProcessingError> {
        let plan = SubmissionPlan::build(snapshot)?;
        if plan.is_empty() {
            tracing::info!("Nothing to submit: no voiceover files and no overlay text");
            return Ok(SubmissionOutcome::default());
        }

        let mut outcome = SubmissionOutcome::default();
        for step in plan.steps {
            let completed = self.run_step(step, &plan.download_name).await?;
            outcome.steps.push(completed);
        }
        Ok(outcome)
    }

    async fn run_step(
        &self,
        step: PlannedStep,
        file_name: &str,
    ) -> Result<CompletedStep, ProcessingError> {
        let endpoint = step.endpoint;
        tracing::info!(%endpoint, "Submitting step");

        let response = self.backend.submit(endpoint, step.payload).await?;
        if !response.is_success() {
            let message = failure_message(&response);
            tracing::warn!(%endpoint, status = response.status, %message, "Step rejected");
            return Err(ProcessingError::new(message));
        }

        let status = response.status;
        let download = self.downloads.deliver(file_name, response.body).await?;
        tracing::info!(%endpoint, location = %download.location.display(), "Step complete");
        Ok(CompletedStep {
            endpoint,
            status,
            download,
        })
    }

    /// Submit from a session: mark it busy, run, record any error, clear
    /// busy. Refused while the session already has a submission in flight.
    ///
    /// The session stays mutably borrowed until the submission ends. Views
    /// that share the session and need to observe it meanwhile should call
    /// [`EditorSession::begin_submission`], release their lock, drive
    /// [`Orchestrator::run`] with the ticket's snapshot, then hand the ticket
    /// back through [`EditorSession::finish_submission`].
    pub async fn process(&self, session: &mut EditorSession) -> SubmissionResult {
        let ticket = match session.begin_submission() {
            Ok(ticket) => ticket,
            Err(_) => return SubmissionResult::Refused,
        };

        let result = self.run(ticket.snapshot()).await;
        match result {
            Ok(outcome) => {
                session.finish_submission(ticket, Ok(()));
                SubmissionResult::Completed(outcome)
            }
            Err(error) => {
                session.finish_submission(ticket, Err(error.clone()));
                SubmissionResult::Failed(error)
            }
        }
    }
}
