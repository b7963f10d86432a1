use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::Value;

/// Opaque identifier for a submitted call.
///
/// The backend issues integer row ids today; the client treats the id as an
/// opaque string so a switch to UUIDs stays invisible here. Deserializes
/// from either a JSON string or a JSON number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for JobId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for JobId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(s) => Ok(JobId(s)),
            Value::Number(n) => Ok(JobId(n.to_string())),
            other => Err(de::Error::custom(format!(
                "expected string or number for call id, got {other}"
            ))),
        }
    }
}

/// Lifecycle status of a job as reported by the backend.
///
/// Monotonic along PENDING < TRANSCRIBED < ANALYZING < COMPLETED.
/// FAILED is reachable from any non-terminal state. COMPLETED and FAILED
/// are terminal and never revert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JobStatus {
    Pending,
    Transcribed,
    Analyzing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    // Position along the happy path. Failed has no rank; it is handled
    // separately in can_follow.
    fn rank(self) -> u8 {
        match self {
            JobStatus::Pending => 0,
            JobStatus::Transcribed => 1,
            JobStatus::Analyzing => 2,
            JobStatus::Completed => 3,
            JobStatus::Failed => u8::MAX,
        }
    }

    /// Whether this status is a legal successor to `prev` in an observed
    /// sequence of snapshots. Repeats of the same non-terminal status are
    /// legal (polling sees them constantly); a terminal status is never
    /// followed by anything.
    pub fn can_follow(self, prev: JobStatus) -> bool {
        if prev.is_terminal() {
            return false;
        }
        match self {
            JobStatus::Completed => prev == JobStatus::Analyzing,
            JobStatus::Failed => true,
            _ => self.rank() >= prev.rank(),
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Pending => write!(f, "PENDING"),
            JobStatus::Transcribed => write!(f, "TRANSCRIBED"),
            JobStatus::Analyzing => write!(f, "ANALYZING"),
            JobStatus::Completed => write!(f, "COMPLETED"),
            JobStatus::Failed => write!(f, "FAILED"),
        }
    }
}

/// The phase of the orchestration a poll loop is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Transcription,
    Analysis,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Transcription => write!(f, "transcription"),
            Phase::Analysis => write!(f, "analysis"),
        }
    }
}

/// The backend's current view of a job, replaced wholesale on each poll.
///
/// Raw engine payloads stay as `serde_json::Value` here; the normalize
/// module turns them into the canonical schema only once the job is done.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusSnapshot {
    pub status: JobStatus,
    #[serde(default)]
    pub prebuilt_result: Option<Value>,
    #[serde(default)]
    pub langchain_result: Option<Value>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub transcript: Option<String>,
}

/// Checks an observed sequence of statuses against the legal successor
/// relation. A violation is reported to the caller, never enforced: the
/// poller logs it and carries on.
#[derive(Debug, Default)]
pub struct StatusTracker {
    last: Option<JobStatus>,
}

impl StatusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an observation. Returns false when the status regressed or
    /// resumed after a terminal state; the tracker keeps the furthest
    /// status seen so a single glitch does not reset the baseline.
    pub fn observe(&mut self, status: JobStatus) -> bool {
        let consistent = match self.last {
            None => true,
            Some(prev) => status == prev || status.can_follow(prev),
        };
        if consistent {
            self.last = Some(status);
        }
        consistent
    }

    pub fn last(&self) -> Option<JobStatus> {
        self.last
    }
}
