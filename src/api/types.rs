//! Wire-level request and response bodies for the analysis backend.
//!
//! All structs derive `Serialize`/`Deserialize` matching the JSON the
//! backend speaks. Raw engine payloads are kept as `serde_json::Value`:
//! their shapes vary per engine and are only pinned down by the normalize
//! module.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::job::{JobId, JobStatus};

/// Body of `POST /text` — submit a transcript for analysis.
#[derive(Debug, Clone, Serialize)]
pub struct TextRequest<'a> {
    pub text: &'a str,
}

/// Response to a text or audio submission: the new job's identity and the
/// status it entered at (text submissions skip straight to TRANSCRIBED).
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitResponse {
    pub call_id: JobId,
    #[serde(default)]
    pub status: Option<JobStatus>,
}

/// Acknowledgement of `POST /process/{id}`.
///
/// A populated `message` means the backend declined to start analysis
/// (the job is not in a ready state); the orchestrator treats that as a
/// fatal trigger rejection.
#[derive(Debug, Clone, Deserialize)]
pub struct TriggerResponse {
    #[serde(default)]
    pub status: Option<JobStatus>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Response of the synchronous endpoints `POST /analyze/text` and
/// `POST /analyze/audio`: a terminal snapshot in one round trip.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncResponse {
    pub call_id: JobId,
    pub status: JobStatus,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub prebuilt_result: Option<Value>,
    #[serde(default)]
    pub langchain_result: Option<Value>,
}

/// FastAPI-style error body. The `detail` field carries the server's
/// explanation and is preferred in user-facing messages.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_request_serializes_expected_shape() {
        let req = TextRequest { text: "I want to cancel my card" };
        let json = serde_json::to_string(&req).unwrap();
        assert_eq!(json, r#"{"text":"I want to cancel my card"}"#);
    }

    #[test]
    fn submit_response_accepts_integer_call_id() {
        let resp: SubmitResponse =
            serde_json::from_str(r#"{"call_id": 17, "status": "PENDING"}"#).unwrap();
        assert_eq!(resp.call_id.as_str(), "17");
        assert_eq!(resp.status, Some(JobStatus::Pending));
    }

    #[test]
    fn trigger_response_with_rejection_message() {
        let resp: TriggerResponse =
            serde_json::from_str(r#"{"status": "PENDING", "message": "Call is not ready for analysis yet"}"#)
                .unwrap();
        assert_eq!(resp.status, Some(JobStatus::Pending));
        assert!(resp.message.is_some());
    }

    #[test]
    fn trigger_ack_without_message() {
        let resp: TriggerResponse =
            serde_json::from_str(r#"{"call_id": 3, "status": "ANALYZING"}"#).unwrap();
        assert_eq!(resp.status, Some(JobStatus::Analyzing));
        assert!(resp.message.is_none());
    }

    #[test]
    fn sync_response_deserializes_engine_payloads() {
        let json = r#"{
            "call_id": "9",
            "status": "COMPLETED",
            "duration": 42.5,
            "prebuilt_result": {"primary_intent": "complaint"},
            "langchain_result": {"analysis": {"primary_intent": "complaint"}}
        }"#;
        let resp: SyncResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.status, JobStatus::Completed);
        assert_eq!(resp.duration, Some(42.5));
        assert!(resp.prebuilt_result.is_some());
        assert!(resp.langchain_result.is_some());
    }

    #[test]
    fn error_body_tolerates_missing_detail() {
        let body: ErrorBody = serde_json::from_str("{}").unwrap();
        assert!(body.detail.is_none());
    }
}
