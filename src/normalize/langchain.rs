//! Normalization of the LLM-agent ("langchain") engine payload.
//!
//! The agent returns either an envelope `{status, session_id, analysis}`
//! or the bare analysis object; both are accepted. Field names follow the
//! agent's output schema (`primary_intent`, `conversation_rating`, risk
//! flags, `follow_up_tasks`).

use serde_json::{Map, Value};

use super::result::{EngineError, EngineFlags, EngineResult, EngineSlot};
use super::{bool_or, f64_or, str_or, tasks_or_empty};

/// Strip the envelope when present: `raw.analysis` if it is an object,
/// otherwise the payload itself. Keeps the mapping total when `analysis`
/// holds something unexpected.
fn unwrap_envelope(raw: &Map<String, Value>) -> &Map<String, Value> {
    match raw.get("analysis") {
        Some(Value::Object(inner)) => inner,
        _ => raw,
    }
}

/// Map a raw langchain payload to the canonical schema. Total: unusable
/// payloads become an [`EngineError`] slot, everything else normalizes
/// with defaults.
pub fn normalize_langchain(raw: Option<&Value>) -> EngineSlot {
    let Some(raw) = raw.filter(|v| !v.is_null()) else {
        return EngineError::new("langchain engine returned no result").into();
    };
    let Some(outer) = raw.as_object() else {
        return EngineError::new("langchain payload is not a JSON object").into();
    };
    if let Some(message) = outer.get("error").and_then(Value::as_str) {
        return EngineError::new(message).into();
    }

    let analysis = unwrap_envelope(outer);

    let result = EngineResult {
        intent: str_or(analysis, "primary_intent", "Unknown"),
        agent_score: f64_or(analysis, "conversation_rating", 0.0),
        summary: str_or(analysis, "summary", "No summary available"),
        sentiment: str_or(analysis, "sentiment", "Neutral"),
        tone: str_or(analysis, "tone", "Neutral"),
        follow_up_tasks: tasks_or_empty(analysis, "follow_up_tasks"),
        flags: Some(EngineFlags {
            fraud_risk: bool_or(analysis, "fraud_risk"),
            need_callback: bool_or(analysis, "need_callback"),
            escalation_required: bool_or(analysis, "escalation_required"),
        }),
        ..EngineResult::default()
    };

    result.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn normalized(value: Value) -> EngineResult {
        match normalize_langchain(Some(&value)) {
            EngineSlot::Result(r) => *r,
            EngineSlot::Error(e) => panic!("expected a result, got error: {e}"),
        }
    }

    #[test]
    fn enveloped_and_flat_payloads_normalize_identically() {
        let enveloped = normalized(json!({
            "status": "success",
            "session_id": "abc",
            "analysis": {"primary_intent": "X"}
        }));
        let flat = normalized(json!({"primary_intent": "X"}));
        assert_eq!(enveloped, flat);
        assert_eq!(enveloped.intent, "X");
    }

    #[test]
    fn full_analysis_payload_maps_every_field() {
        let result = normalized(json!({
            "analysis": {
                "primary_intent": "loan_repayment_query",
                "sentiment": "Negative",
                "tone": "Frustrated",
                "conversation_rating": 6,
                "need_callback": true,
                "escalation_required": false,
                "fraud_risk": true,
                "follow_up_tasks": ["arrange callback", {"task": "collect documents"}],
                "summary": "Customer cannot pay this month."
            }
        }));
        assert_eq!(result.intent, "loan_repayment_query");
        assert_eq!(result.sentiment, "Negative");
        assert_eq!(result.tone, "Frustrated");
        assert_eq!(result.agent_score, 6.0);
        assert_eq!(result.summary, "Customer cannot pay this month.");
        let flags = result.flags.unwrap();
        assert!(flags.fraud_risk);
        assert!(flags.need_callback);
        assert!(!flags.escalation_required);
        assert_eq!(result.follow_up_tasks.len(), 2);
    }

    #[test]
    fn empty_payload_yields_defaults_with_flags() {
        let result = normalized(json!({}));
        assert_eq!(result.intent, "Unknown");
        assert_eq!(result.agent_score, 0.0);
        assert_eq!(result.summary, "No summary available");
        assert_eq!(result.sentiment, "Neutral");
        assert_eq!(result.tone, "Neutral");
        assert_eq!(result.flags, Some(EngineFlags::default()));
        assert!(result.follow_up_tasks.is_empty());
        // Fields the langchain engine never produces keep their defaults.
        assert_eq!(result.emotion, "Neutral");
        assert!(result.requirements.is_empty());
        assert!(result.agent_metrics.is_none());
    }

    #[test]
    fn action_items_alias_exposes_follow_up_tasks() {
        let result = normalized(json!({"follow_up_tasks": ["send form"]}));
        assert_eq!(result.action_items(), result.follow_up_tasks.as_slice());
        assert_eq!(result.action_items().len(), 1);
    }

    #[test]
    fn non_object_analysis_falls_back_to_outer_payload() {
        let result = normalized(json!({"analysis": "garbled", "primary_intent": "complaint"}));
        assert_eq!(result.intent, "complaint");
    }

    #[test]
    fn missing_payload_is_an_engine_error() {
        assert!(normalize_langchain(None).is_error());
        assert!(normalize_langchain(Some(&Value::Null)).is_error());
        assert!(normalize_langchain(Some(&json!([1, 2]))).is_error());
    }

    #[test]
    fn error_field_becomes_engine_error() {
        let slot = normalize_langchain(Some(&json!({"error": "agent timed out"})));
        assert_eq!(slot.error().unwrap().message, "agent timed out");
    }
}
