use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::api::{AnalysisClient, ApiError, SyncResponse};
use crate::error::OrchestrationError;
use crate::job::{JobId, JobStatus, Phase, StatusSnapshot};
use crate::normalize::ComparisonResult;
use crate::poller::{CancelToken, PollConfig, StatusPoller};

/// What an orchestration run hands back to the caller: the job's identity,
/// the reported call duration when the backend measured one, and the
/// normalized side-by-side comparison.
#[derive(Debug, Clone, Serialize)]
pub struct CallReport {
    pub job_id: JobId,
    pub generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    pub comparison: ComparisonResult,
}

/// Drives a submitted call through the full analysis lifecycle.
///
/// Two mutually exclusive flows: the poll-driven flow
/// (submit → poll transcription → trigger → poll analysis → normalize)
/// and the synchronous flow (one call, normalize immediately). Each
/// orchestration run is independent; the only shared resource is the
/// remote job record, which this client reads and writes to exactly once
/// (the trigger call).
pub struct Orchestrator {
    client: AnalysisClient,
    transcription: PollConfig,
    analysis: PollConfig,
    cancel: CancelToken,
}

impl Orchestrator {
    /// Create an orchestrator with the default phase budgets.
    pub fn new(client: AnalysisClient) -> Self {
        Self::with_budgets(client, PollConfig::transcription(), PollConfig::analysis())
    }

    /// Create an orchestrator with explicit phase budgets.
    pub fn with_budgets(
        client: AnalysisClient,
        transcription: PollConfig,
        analysis: PollConfig,
    ) -> Self {
        Self {
            client,
            transcription,
            analysis,
            cancel: CancelToken::new(),
        }
    }

    /// A handle that cancels this orchestrator's polling when triggered.
    /// The backend job is not notified and continues independently.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Poll flow for a transcript submission.
    pub async fn analyze_text(
        &self,
        text: &str,
        on_snapshot: impl FnMut(&StatusSnapshot),
    ) -> Result<CallReport, OrchestrationError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(OrchestrationError::Validation(
                "text must not be empty".into(),
            ));
        }

        let submitted = self.client.submit_text(text).await?;
        tracing::info!(job_id = %submitted.call_id, "submitted transcript");
        self.run_job(submitted.call_id, on_snapshot).await
    }

    /// Poll flow for an audio submission.
    pub async fn analyze_audio(
        &self,
        bytes: Vec<u8>,
        filename: &str,
        on_snapshot: impl FnMut(&StatusSnapshot),
    ) -> Result<CallReport, OrchestrationError> {
        validate_audio(&bytes, filename)?;

        let submitted = self.client.submit_audio(bytes, filename).await?;
        tracing::info!(job_id = %submitted.call_id, filename, "submitted audio");
        self.run_job(submitted.call_id, on_snapshot).await
    }

    /// Drive an already-submitted job to completion: poll the transcription
    /// phase, trigger analysis, poll the analysis phase, fetch the final
    /// snapshot and normalize both engines.
    ///
    /// `on_snapshot` receives every intermediate snapshot; during the
    /// analysis phase the two engines land independently, so callers can
    /// surface one slot before the other arrives.
    pub async fn run_job(
        &self,
        job_id: JobId,
        mut on_snapshot: impl FnMut(&StatusSnapshot),
    ) -> Result<CallReport, OrchestrationError> {
        // Correlates this run's log lines; jobs can be re-run.
        let run_id = Uuid::new_v4();
        let poller = StatusPoller::new(&self.client, self.cancel.clone());

        let snapshot = poller
            .poll_until(
                &job_id,
                Phase::Transcription,
                self.transcription,
                |status| status != JobStatus::Pending,
                &mut on_snapshot,
            )
            .await?;
        tracing::info!(%run_id, job_id = %job_id, status = %snapshot.status, "transcription phase done");

        // Trigger exactly once, and only from TRANSCRIBED. A job that is
        // already ANALYZING was triggered elsewhere; already COMPLETED
        // means there is nothing left to wait for.
        if snapshot.status == JobStatus::Transcribed {
            self.trigger(&job_id).await?;
        }

        if snapshot.status != JobStatus::Completed {
            poller
                .poll_until(
                    &job_id,
                    Phase::Analysis,
                    self.analysis,
                    |status| status == JobStatus::Completed,
                    &mut on_snapshot,
                )
                .await?;
            tracing::info!(%run_id, job_id = %job_id, "analysis phase done");
        }

        let terminal = self.client.get_status(&job_id).await.map_err(not_found)?;
        Ok(report_from_snapshot(job_id, &terminal))
    }

    async fn trigger(&self, job_id: &JobId) -> Result<(), OrchestrationError> {
        let ack = match self.client.trigger(job_id).await {
            Ok(ack) => ack,
            Err(ApiError::NotFound(detail)) => {
                return Err(OrchestrationError::JobNotFound(detail));
            }
            Err(ApiError::Status { message, .. }) => {
                return Err(OrchestrationError::Trigger(message));
            }
            Err(err) => return Err(err.into()),
        };

        // A 200 with a message means the backend declined to start.
        if let Some(message) = ack.message {
            return Err(OrchestrationError::Trigger(message));
        }
        tracing::info!(job_id = %job_id, "analysis triggered");
        Ok(())
    }

    /// Synchronous flow for a transcript: one call, one terminal snapshot.
    pub async fn analyze_text_sync(&self, text: &str) -> Result<CallReport, OrchestrationError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(OrchestrationError::Validation(
                "text must not be empty".into(),
            ));
        }

        let response = self.client.analyze_text_sync(text).await?;
        report_from_sync(response)
    }

    /// Synchronous flow for an audio recording.
    pub async fn analyze_audio_sync(
        &self,
        bytes: Vec<u8>,
        filename: &str,
    ) -> Result<CallReport, OrchestrationError> {
        validate_audio(&bytes, filename)?;

        let response = self.client.analyze_audio_sync(bytes, filename).await?;
        report_from_sync(response)
    }

    /// One-shot status fetch, for callers that only want the current
    /// snapshot of an existing job.
    pub async fn status(&self, job_id: &JobId) -> Result<StatusSnapshot, OrchestrationError> {
        self.client.get_status(job_id).await.map_err(not_found)
    }
}

fn validate_audio(bytes: &[u8], filename: &str) -> Result<(), OrchestrationError> {
    if bytes.is_empty() {
        return Err(OrchestrationError::Validation("no audio file supplied".into()));
    }
    if filename.trim().is_empty() {
        return Err(OrchestrationError::Validation("audio filename is missing".into()));
    }
    Ok(())
}

fn not_found(err: ApiError) -> OrchestrationError {
    match err {
        ApiError::NotFound(detail) => OrchestrationError::JobNotFound(detail),
        other => other.into(),
    }
}

fn report_from_snapshot(job_id: JobId, snapshot: &StatusSnapshot) -> CallReport {
    CallReport {
        job_id,
        generated_at: Utc::now(),
        duration: snapshot.duration,
        comparison: ComparisonResult::from_raw(
            snapshot.prebuilt_result.as_ref(),
            snapshot.langchain_result.as_ref(),
        ),
    }
}

fn report_from_sync(response: SyncResponse) -> Result<CallReport, OrchestrationError> {
    if response.status != JobStatus::Completed {
        return Err(OrchestrationError::UnexpectedStatus { status: response.status });
    }
    Ok(CallReport {
        job_id: response.call_id,
        generated_at: Utc::now(),
        duration: response.duration,
        comparison: ComparisonResult::from_raw(
            response.prebuilt_result.as_ref(),
            response.langchain_result.as_ref(),
        ),
    })
}
