//! Result normalization: total, pure mappings from the engines' raw wire
//! payloads to the canonical comparison schema.
//!
//! Nothing in this module returns `Err` or panics. A payload that cannot be
//! interpreted becomes an [`EngineError`] in that engine's slot; every
//! recognisable field is extracted with a defined default.

pub mod langchain;
pub mod prebuilt;
pub mod result;

pub use langchain::normalize_langchain;
pub use prebuilt::normalize_prebuilt;
pub use result::{
    AgentMetrics, ComparisonResult, EngineError, EngineFlags, EngineResult, EngineSlot,
    FollowUpTask, Requirement,
};

use serde_json::{Map, Value};

/// String field with a default. Non-string values fall back to the default
/// rather than being stringified — the contract wants the default, not
/// `"42"`.
pub(crate) fn str_or(map: &Map<String, Value>, key: &str, default: &str) -> String {
    map.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| default.to_string())
}

/// Numeric field with a default. Integers and floats both count.
pub(crate) fn f64_or(map: &Map<String, Value>, key: &str, default: f64) -> f64 {
    map.get(key).and_then(Value::as_f64).unwrap_or(default)
}

/// Boolean field defaulting to false.
pub(crate) fn bool_or(map: &Map<String, Value>, key: &str) -> bool {
    map.get(key).and_then(Value::as_bool).unwrap_or(false)
}

/// Follow-up task list: strings and objects are kept, anything else in the
/// array is dropped. A missing or non-array field is an empty list.
pub(crate) fn tasks_or_empty(map: &Map<String, Value>, key: &str) -> Vec<FollowUpTask> {
    let Some(items) = map.get(key).and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(FollowUpTask::Text(s.clone())),
            Value::Object(obj) => Some(FollowUpTask::Structured(obj.clone())),
            _ => None,
        })
        .collect()
}
