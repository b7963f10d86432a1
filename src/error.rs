use thiserror::Error;

use crate::api::ApiError;
use crate::job::{JobStatus, Phase};

/// Everything that can abort an orchestration run.
///
/// Engine-local normalization faults are deliberately absent: they live in
/// one engine's slot of the comparison (`EngineError`) and never abort the
/// run — a half-populated comparison is a first-class success.
#[derive(Debug, Error)]
pub enum OrchestrationError {
    /// Bad caller input, caught before anything touches the network.
    #[error("invalid input: {0}")]
    Validation(String),

    /// The backend does not know the job id.
    #[error("job not found: {0}")]
    JobNotFound(String),

    /// The backend reported FAILED while we were polling this phase.
    #[error("{phase} failed on the backend")]
    PhaseFailed { phase: Phase },

    /// The attempt budget ran out while the job was still non-terminal.
    #[error("{phase} still not finished after {elapsed_ms}ms")]
    PollTimeout { phase: Phase, elapsed_ms: u64 },

    /// The backend declined to start analysis. Fatal; not retried.
    #[error("analysis trigger rejected: {0}")]
    Trigger(String),

    /// The synchronous flow returned something other than COMPLETED.
    #[error("expected a completed job, backend returned {status}")]
    UnexpectedStatus { status: JobStatus },

    /// The caller cancelled; the backend job continues on its own.
    #[error("orchestration cancelled")]
    Cancelled,

    /// Transport or HTTP failure outside the poll loop's retry window.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl OrchestrationError {
    /// The one message shown to the user. Prefers a server-supplied detail
    /// field when the backend provided one, otherwise the local rendering.
    pub fn user_message(&self) -> String {
        match self {
            OrchestrationError::Api(api) => api
                .server_detail()
                .map(str::to_string)
                .unwrap_or_else(|| api.to_string()),
            OrchestrationError::JobNotFound(detail) if !detail.is_empty() => detail.clone(),
            other => other.to_string(),
        }
    }
}
