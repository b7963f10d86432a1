use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tokio::time::sleep;

use crate::api::{AnalysisClient, ApiError};
use crate::error::OrchestrationError;
use crate::job::{JobId, JobStatus, Phase, StatusSnapshot, StatusTracker};

/// Attempt budget for one polling phase. The defaults match observed
/// backend timing: transcription finishes within ~12 minutes, the
/// dual-engine analysis within ~30.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl PollConfig {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self { interval, max_attempts }
    }

    /// Default transcription budget: 240 attempts x 3s = 720s.
    pub fn transcription() -> Self {
        Self::new(Duration::from_millis(3000), 240)
    }

    /// Default analysis budget: 600 attempts x 3s = 1800s.
    pub fn analysis() -> Self {
        Self::new(Duration::from_millis(3000), 600)
    }
}

/// Cooperative cancellation flag, checked at the top of every poll
/// iteration. Cancelling stops the client's polling only; the backend job
/// keeps running untouched.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Repeatedly fetches a job's snapshot until a phase predicate holds, the
/// backend fails the job, or the attempt budget runs out.
pub struct StatusPoller<'a> {
    client: &'a AnalysisClient,
    cancel: CancelToken,
}

impl<'a> StatusPoller<'a> {
    pub fn new(client: &'a AnalysisClient, cancel: CancelToken) -> Self {
        Self { client, cancel }
    }

    /// Poll until `is_done(status)` holds, passing every fetched snapshot
    /// to `observe` (partial engine results become available mid-phase).
    ///
    /// A FAILED snapshot aborts with [`OrchestrationError::PhaseFailed`];
    /// a 404 with [`OrchestrationError::JobNotFound`]. Any other fetch
    /// error is logged and retried on the next interval — it consumes an
    /// attempt but is not a phase failure.
    pub async fn poll_until(
        &self,
        job_id: &JobId,
        phase: Phase,
        config: PollConfig,
        is_done: impl Fn(JobStatus) -> bool,
        mut observe: impl FnMut(&StatusSnapshot),
    ) -> Result<StatusSnapshot, OrchestrationError> {
        let started = Instant::now();
        let mut tracker = StatusTracker::new();

        for attempt in 0..config.max_attempts {
            if self.cancel.is_cancelled() {
                return Err(OrchestrationError::Cancelled);
            }
            if attempt > 0 {
                sleep(config.interval).await;
            }

            let snapshot = match self.client.get_status(job_id).await {
                Ok(snapshot) => snapshot,
                Err(ApiError::NotFound(detail)) => {
                    return Err(OrchestrationError::JobNotFound(detail));
                }
                Err(err) => {
                    tracing::warn!(
                        job_id = %job_id,
                        %phase,
                        attempt,
                        error = %err,
                        "status fetch failed, retrying on next interval"
                    );
                    continue;
                }
            };

            if !tracker.observe(snapshot.status) {
                tracing::warn!(
                    job_id = %job_id,
                    observed = %snapshot.status,
                    last = ?tracker.last(),
                    "job status regressed, ignoring stale snapshot ordering"
                );
            }
            tracing::debug!(job_id = %job_id, %phase, attempt, status = %snapshot.status, "polled");
            observe(&snapshot);

            if snapshot.status == JobStatus::Failed {
                return Err(OrchestrationError::PhaseFailed { phase });
            }
            if is_done(snapshot.status) {
                return Ok(snapshot);
            }
        }

        Err(OrchestrationError::PollTimeout {
            phase,
            elapsed_ms: started.elapsed().as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_budgets_match_backend_timing() {
        let transcription = PollConfig::transcription();
        assert_eq!(transcription.interval, Duration::from_millis(3000));
        assert_eq!(transcription.max_attempts, 240);
        // 240 x 3s = 720s ceiling for the transcription phase.
        assert_eq!(
            transcription.interval * transcription.max_attempts,
            Duration::from_secs(720)
        );

        let analysis = PollConfig::analysis();
        assert_eq!(analysis.max_attempts, 600);
        assert_eq!(analysis.interval * analysis.max_attempts, Duration::from_secs(1800));
    }

    #[test]
    fn cancel_token_flips_once() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());

        let shared = token.clone();
        shared.cancel();
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn cancelled_before_first_fetch() {
        let client = AnalysisClient::with_base_url("http://127.0.0.1:1".into());
        let cancel = CancelToken::new();
        cancel.cancel();

        let poller = StatusPoller::new(&client, cancel);
        let result = poller
            .poll_until(
                &JobId::from("1"),
                Phase::Transcription,
                PollConfig::new(Duration::from_millis(1), 3),
                |status| status != JobStatus::Pending,
                |_| {},
            )
            .await;
        assert!(matches!(result, Err(OrchestrationError::Cancelled)));
    }

    #[tokio::test]
    async fn unreachable_backend_exhausts_budget_as_timeout() {
        // Connection refused is a transient error: swallowed and counted
        // against the attempt budget, surfacing as a timeout.
        let client = AnalysisClient::with_base_url("http://127.0.0.1:1".into());
        let poller = StatusPoller::new(&client, CancelToken::new());
        let result = poller
            .poll_until(
                &JobId::from("1"),
                Phase::Transcription,
                PollConfig::new(Duration::from_millis(1), 2),
                |status| status != JobStatus::Pending,
                |_| {},
            )
            .await;
        assert!(matches!(
            result,
            Err(OrchestrationError::PollTimeout { phase: Phase::Transcription, .. })
        ));
    }
}
