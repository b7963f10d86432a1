use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A follow-up requirement detected during a call (e.g. document upload,
/// callback request, escalation).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    /// Requirement category. Wire payloads use either `type` or the
    /// database column name `requirement_type`.
    #[serde(rename = "type", alias = "requirement_type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
}

/// One follow-up task. The langchain engine emits either plain strings or
/// structured objects in the same list; both are preserved as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FollowUpTask {
    Text(String),
    Structured(Map<String, Value>),
}

/// Risk and routing flags. Only the langchain engine produces these.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineFlags {
    pub fraud_risk: bool,
    pub need_callback: bool,
    pub escalation_required: bool,
}

/// Per-dimension agent scores on a 0–1 scale. Only the prebuilt engine
/// breaks its rating down this way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentMetrics {
    pub clarity: f64,
    pub empathy: f64,
    pub politeness: f64,
    pub helpfulness: f64,
}

/// The canonical analysis result both engines are normalized into.
///
/// Every field has a defined default so a sparse payload still produces a
/// complete value; the defaults are part of the contract downstream
/// consumers rely on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineResult {
    pub intent: String,
    pub intent_confidence: f64,
    pub sentiment: String,
    pub sentiment_score: f64,
    pub emotion: String,
    pub emotion_score: f64,
    pub agent_score: f64,
    pub summary: String,
    pub tone: String,
    pub requirements: Vec<Requirement>,
    pub follow_up_tasks: Vec<FollowUpTask>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<EngineFlags>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_metrics: Option<AgentMetrics>,
}

impl EngineResult {
    /// The follow-up list under its compatibility name. Same list, not a
    /// copy — one source of truth presented under two names.
    pub fn action_items(&self) -> &[FollowUpTask] {
        &self.follow_up_tasks
    }
}

impl Default for EngineResult {
    fn default() -> Self {
        Self {
            intent: "Unknown".to_string(),
            intent_confidence: 0.0,
            sentiment: "Neutral".to_string(),
            sentiment_score: 0.0,
            emotion: "Neutral".to_string(),
            emotion_score: 0.0,
            agent_score: 0.0,
            summary: "No summary available".to_string(),
            tone: "Neutral".to_string(),
            requirements: Vec::new(),
            follow_up_tasks: Vec::new(),
            flags: None,
            agent_metrics: None,
        }
    }
}

/// A normalization fault scoped to one engine. Never aborts the run; it
/// occupies that engine's slot in the comparison instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineError {
    pub message: String,
}

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// One engine's slot in the comparison: either a normalized result or an
/// engine-scoped error marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EngineSlot {
    Result(Box<EngineResult>),
    Error(EngineError),
}

impl EngineSlot {
    pub fn result(&self) -> Option<&EngineResult> {
        match self {
            EngineSlot::Result(r) => Some(r),
            EngineSlot::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&EngineError> {
        match self {
            EngineSlot::Result(_) => None,
            EngineSlot::Error(e) => Some(e),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, EngineSlot::Error(_))
    }
}

impl From<EngineResult> for EngineSlot {
    fn from(result: EngineResult) -> Self {
        EngineSlot::Result(Box::new(result))
    }
}

impl From<EngineError> for EngineSlot {
    fn from(error: EngineError) -> Self {
        EngineSlot::Error(error)
    }
}

/// The unified view of both engines for one completed job — the sole
/// object exposed to downstream consumers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonResult {
    pub prebuilt: EngineSlot,
    pub langchain: EngineSlot,
}

impl ComparisonResult {
    /// Normalize both raw engine payloads of a terminal snapshot. Each slot
    /// fails independently; one engine's fault never empties the other's
    /// slot.
    pub fn from_raw(prebuilt: Option<&Value>, langchain: Option<&Value>) -> Self {
        Self {
            prebuilt: super::prebuilt::normalize_prebuilt(prebuilt),
            langchain: super::langchain::normalize_langchain(langchain),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_result_defaults_match_contract() {
        let result = EngineResult::default();
        assert_eq!(result.intent, "Unknown");
        assert_eq!(result.intent_confidence, 0.0);
        assert_eq!(result.sentiment, "Neutral");
        assert_eq!(result.sentiment_score, 0.0);
        assert_eq!(result.emotion, "Neutral");
        assert_eq!(result.emotion_score, 0.0);
        assert_eq!(result.agent_score, 0.0);
        assert_eq!(result.summary, "No summary available");
        assert_eq!(result.tone, "Neutral");
        assert!(result.requirements.is_empty());
        assert!(result.follow_up_tasks.is_empty());
        assert!(result.flags.is_none());
        assert!(result.agent_metrics.is_none());
    }

    #[test]
    fn action_items_is_the_same_list() {
        let mut result = EngineResult::default();
        result.follow_up_tasks.push(FollowUpTask::Text("call back tomorrow".into()));
        assert_eq!(result.action_items().len(), 1);
        assert!(std::ptr::eq(result.action_items(), result.follow_up_tasks.as_slice()));
    }

    #[test]
    fn requirement_accepts_both_type_keys() {
        let from_type: Requirement =
            serde_json::from_str(r#"{"type": "callback_request", "priority": "MEDIUM"}"#).unwrap();
        assert_eq!(from_type.kind, "callback_request");

        let from_column: Requirement =
            serde_json::from_str(r#"{"requirement_type": "escalation"}"#).unwrap();
        assert_eq!(from_column.kind, "escalation");
        assert!(from_column.description.is_none());
    }

    #[test]
    fn follow_up_task_untagged_roundtrip() {
        let tasks: Vec<FollowUpTask> =
            serde_json::from_str(r#"["send form", {"task": "verify id", "due": "tomorrow"}]"#)
                .unwrap();
        assert_eq!(tasks[0], FollowUpTask::Text("send form".into()));
        assert!(matches!(tasks[1], FollowUpTask::Structured(_)));
    }

    #[test]
    fn engine_slot_serializes_untagged() {
        let slot: EngineSlot = EngineError::new("engine unavailable").into();
        let json = serde_json::to_value(&slot).unwrap();
        assert_eq!(json, serde_json::json!({"message": "engine unavailable"}));

        let slot: EngineSlot = EngineResult::default().into();
        let json = serde_json::to_value(&slot).unwrap();
        assert_eq!(json["intent"], "Unknown");
        assert!(json.get("flags").is_none());
    }
}
