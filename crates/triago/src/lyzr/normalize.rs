//! Upstream response normalization.
//!
//! Different agents (and different versions of the same agent) return
//! incompatible JSON shapes: bare strings, `{status, result}` envelopes,
//! envelopes missing one of the two, single-key `{message}` objects, and
//! responses wrapped in an outer `{response: ...}` layer. Normalization maps
//! every one of them onto [`NormalizedAgentResponse`] and never rejects a
//! payload outright.

use serde_json::{Map, Value, json};

use super::types::{NormalizedAgentResponse, ResponseStatus};

/// How many levels of `{"response": ...}` wrapping are unwrapped before the
/// wrapper itself is treated as the payload. Bounded so a self-referential
/// payload cannot recurse without limit.
const MAX_UNWRAP_DEPTH: u8 = 2;

/// Recognized payload shapes, in dispatch order. First match wins.
enum Shape<'a> {
    /// Nothing usable: absent, JSON null, or an empty string.
    Empty,
    /// A bare string.
    Text(&'a str),
    /// A non-object, non-string scalar (number, bool, array).
    Scalar(&'a Value),
    /// Object carrying both `status` and `result`.
    Enveloped(&'a Map<String, Value>),
    /// Object carrying `status` but no `result`.
    StatusOnly(&'a Map<String, Value>),
    /// Object carrying `result` but no `status`.
    ResultOnly(&'a Map<String, Value>),
    /// Object whose only recognized key is a string `message`.
    MessageOnly(&'a str),
    /// Object wrapping the real payload under a `response` key.
    Wrapped {
        inner: &'a Value,
        whole: &'a Map<String, Value>,
    },
    /// Unrecognized object; becomes the result payload wholesale.
    Opaque(&'a Map<String, Value>),
}

fn classify(parsed: Option<&Value>) -> Shape<'_> {
    let Some(value) = parsed else {
        return Shape::Empty;
    };
    match value {
        Value::Null => Shape::Empty,
        Value::String(text) if text.is_empty() => Shape::Empty,
        Value::String(text) => Shape::Text(text),
        Value::Object(map) => classify_object(map),
        other => Shape::Scalar(other),
    }
}

fn classify_object(map: &Map<String, Value>) -> Shape<'_> {
    let has_status = map.contains_key("status");
    let has_result = map.contains_key("result");

    if has_status && has_result {
        Shape::Enveloped(map)
    } else if has_status {
        Shape::StatusOnly(map)
    } else if has_result {
        Shape::ResultOnly(map)
    } else if let Some(message) = map.get("message").and_then(Value::as_str) {
        Shape::MessageOnly(message)
    } else if let Some(inner) = map.get("response") {
        Shape::Wrapped { inner, whole: map }
    } else {
        Shape::Opaque(map)
    }
}

/// Normalize a parsed upstream payload into the canonical envelope.
///
/// Total over all JSON shapes; unrecognized objects fall through to a
/// last-resort success wrapping.
pub fn normalize(parsed: Option<&Value>) -> NormalizedAgentResponse {
    normalize_at(parsed, 0)
}

fn normalize_at(parsed: Option<&Value>, depth: u8) -> NormalizedAgentResponse {
    match classify(parsed) {
        Shape::Empty => NormalizedAgentResponse::error("Empty response from agent"),
        Shape::Text(text) => NormalizedAgentResponse {
            status: ResponseStatus::Success,
            result: json!({ "text": text }),
            message: Some(text.to_string()),
            metadata: None,
        },
        Shape::Scalar(value) => NormalizedAgentResponse {
            status: ResponseStatus::Success,
            result: json!({ "value": value }),
            message: Some(value.to_string()),
            metadata: None,
        },
        Shape::Enveloped(map) => NormalizedAgentResponse {
            status: status_from(map.get("status")),
            result: result_or_empty(map.get("result")),
            message: string_field(map, "message"),
            metadata: value_field(map, "metadata"),
        },
        Shape::StatusOnly(map) => {
            let mut rest = map.clone();
            rest.remove("status");
            rest.remove("message");
            rest.remove("metadata");
            NormalizedAgentResponse {
                status: status_from(map.get("status")),
                result: Value::Object(rest),
                message: string_field(map, "message"),
                metadata: value_field(map, "metadata"),
            }
        }
        Shape::ResultOnly(map) => NormalizedAgentResponse {
            status: ResponseStatus::Success,
            result: map.get("result").cloned().unwrap_or_else(|| json!({})),
            message: string_field(map, "message"),
            metadata: value_field(map, "metadata"),
        },
        Shape::MessageOnly(message) => NormalizedAgentResponse {
            status: ResponseStatus::Success,
            result: json!({ "text": message }),
            message: Some(message.to_string()),
            metadata: None,
        },
        Shape::Wrapped { inner, whole } => {
            if depth < MAX_UNWRAP_DEPTH {
                normalize_at(Some(inner), depth + 1)
            } else {
                NormalizedAgentResponse {
                    status: ResponseStatus::Success,
                    result: Value::Object(whole.clone()),
                    message: None,
                    metadata: None,
                }
            }
        }
        Shape::Opaque(map) => NormalizedAgentResponse {
            status: ResponseStatus::Success,
            result: Value::Object(map.clone()),
            message: None,
            metadata: None,
        },
    }
}

/// Anything other than the literal `"error"` coerces to success.
fn status_from(value: Option<&Value>) -> ResponseStatus {
    match value.and_then(Value::as_str) {
        Some("error") => ResponseStatus::Error,
        _ => ResponseStatus::Success,
    }
}

/// Empty-ish results collapse to an empty object.
fn result_or_empty(value: Option<&Value>) -> Value {
    match value {
        Some(value) if !is_empty_like(value) => value.clone(),
        _ => json!({}),
    }
}

fn is_empty_like(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty(),
        _ => false,
    }
}

fn string_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key).and_then(Value::as_str).map(str::to_string)
}

fn value_field(map: &Map<String, Value>, key: &str) -> Option<Value> {
    map.get(key).cloned().filter(|value| !value.is_null())
}
