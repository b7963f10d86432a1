//! Normalization of the classical-pipeline ("prebuilt") engine payload.
//!
//! The prebuilt engine has shipped two intent shapes and two sentiment
//! shapes over time. Shape detection runs exactly once, at decode time,
//! and yields a tagged variant; the field mapping then branches on the tag
//! instead of re-sniffing the raw JSON.

use serde_json::{Map, Value};

use super::result::{AgentMetrics, EngineError, EngineResult, EngineSlot, Requirement};
use super::{f64_or, str_or, tasks_or_empty};

/// How the payload encodes the primary intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentShape {
    /// `primary_intent` is a plain value (or absent).
    Simple,
    /// `primary_intent` is an object carrying `intent` and `confidence`.
    Complex,
}

/// How the payload encodes sentiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentShape {
    /// `sentiment` is a plain value (or absent).
    Flat,
    /// `sentiment` is an object carrying `sentiment`, `sentiment_score`,
    /// `emotion` and `emotion_score`.
    Structured,
}

pub fn detect_intent_shape(raw: &Map<String, Value>) -> IntentShape {
    match raw.get("primary_intent") {
        Some(Value::Object(inner)) if inner.contains_key("intent") => IntentShape::Complex,
        _ => IntentShape::Simple,
    }
}

pub fn detect_sentiment_shape(raw: &Map<String, Value>) -> SentimentShape {
    match raw.get("sentiment") {
        Some(Value::Object(inner)) if inner.contains_key("sentiment") => SentimentShape::Structured,
        _ => SentimentShape::Flat,
    }
}

/// Map a raw prebuilt payload to the canonical schema. Total: never panics,
/// never returns `Err` — unusable payloads become an [`EngineError`] slot.
pub fn normalize_prebuilt(raw: Option<&Value>) -> EngineSlot {
    let Some(raw) = raw.filter(|v| !v.is_null()) else {
        return EngineError::new("prebuilt engine returned no result").into();
    };
    let Some(map) = raw.as_object() else {
        return EngineError::new("prebuilt payload is not a JSON object").into();
    };
    if let Some(message) = map.get("error").and_then(Value::as_str) {
        return EngineError::new(message).into();
    }

    let mut result = EngineResult::default();

    match detect_intent_shape(map) {
        IntentShape::Complex => {
            // Detection guarantees an object here; fall back to the outer
            // map rather than panic if that ever stops holding.
            let inner = map
                .get("primary_intent")
                .and_then(Value::as_object)
                .unwrap_or(map);
            result.intent = str_or(inner, "intent", "Unknown");
            result.intent_confidence = f64_or(inner, "confidence", 0.0);
        }
        IntentShape::Simple => {
            result.intent = str_or(map, "primary_intent", &str_or(map, "intent", "Unknown"));
            result.intent_confidence = f64_or(map, "intent_confidence", 0.0);
        }
    }

    match detect_sentiment_shape(map) {
        SentimentShape::Structured => {
            let inner = map.get("sentiment").and_then(Value::as_object).unwrap_or(map);
            result.sentiment = str_or(inner, "sentiment", "Neutral");
            result.sentiment_score = f64_or(inner, "sentiment_score", 0.0);
            result.emotion = str_or(inner, "emotion", "Neutral");
            result.emotion_score = f64_or(inner, "emotion_score", 0.0);
        }
        SentimentShape::Flat => {
            result.sentiment = str_or(map, "sentiment", "Neutral");
            result.sentiment_score = f64_or(map, "sentiment_score", 0.0);
            result.emotion = str_or(map, "emotion", "Neutral");
            result.emotion_score = f64_or(map, "emotion_score", 0.0);
        }
    }

    // Precedence, not presence-of-truthy-value: a defined raw_agent_score
    // wins even when it is exactly zero.
    result.agent_score = if map.contains_key("raw_agent_score") {
        f64_or(map, "raw_agent_score", 0.0)
    } else if map.contains_key("conversation_rating") {
        f64_or(map, "conversation_rating", 0.0)
    } else {
        f64_or(map, "agent_score", 0.0)
    };

    result.summary = str_or(map, "summary", "No summary available");
    result.tone = str_or(map, "tone", "Neutral");
    result.requirements = requirements_or_empty(map);
    result.follow_up_tasks = tasks_or_empty(map, "follow_up_tasks");
    result.agent_metrics = Some(AgentMetrics {
        clarity: metric(map, "clarity"),
        empathy: metric(map, "empathy"),
        politeness: metric(map, "politeness"),
        helpfulness: metric(map, "helpfulness"),
    });

    result.into()
}

// Sub-metrics arrive either as bare names or with the database `_score`
// suffix.
fn metric(map: &Map<String, Value>, name: &str) -> f64 {
    if map.contains_key(name) {
        f64_or(map, name, 0.0)
    } else {
        f64_or(map, &format!("{name}_score"), 0.0)
    }
}

fn requirements_or_empty(map: &Map<String, Value>) -> Vec<Requirement> {
    let Some(items) = map.get("requirements").and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(Requirement {
                kind: s.clone(),
                description: None,
                priority: None,
            }),
            Value::Object(_) => serde_json::from_value(item.clone()).ok(),
            _ => None,
        })
        .collect()
}
