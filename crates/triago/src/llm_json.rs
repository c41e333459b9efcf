//! Best-effort JSON extraction from model output.
//!
//! Inference agents frequently wrap their JSON payload in explanatory prose,
//! markdown fencing, or trailing garbage. `extract` recovers the payload when
//! it can and returns `None` when it cannot; it never fails.

use serde_json::Value;

/// Extract a JSON value from raw model output.
///
/// Tried in order: the whole text as JSON, the contents of a markdown code
/// fence, and finally the first balanced `{...}` or `[...]` span found in the
/// text.
pub fn extract(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(value) = serde_json::from_str(trimmed) {
        return Some(value);
    }

    if let Some(fenced) = strip_code_fence(trimmed)
        && let Ok(value) = serde_json::from_str(fenced)
    {
        return Some(value);
    }

    balanced_span(trimmed, '{', '}')
        .or_else(|| balanced_span(trimmed, '[', ']'))
        .and_then(|span| serde_json::from_str(span).ok())
}

/// Return the body of the first markdown code fence, if any.
fn strip_code_fence(text: &str) -> Option<&str> {
    let start = text.find("```")?;
    let after_ticks = &text[start + 3..];
    // Skip an optional language tag on the fence line.
    let body_start = after_ticks.find('\n')? + 1;
    let body = &after_ticks[body_start..];
    let end = body.find("```")?;
    Some(body[..end].trim())
}

/// Find the first balanced span delimited by `open`/`close`, honoring JSON
/// string literals and escapes.
fn balanced_span(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            c if c == open && !in_string => depth += 1,
            c if c == close && !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_plain_json() {
        let value = extract(r#"{"status": "success", "result": {"a": 1}}"#).unwrap();
        assert_eq!(value["result"]["a"], 1);
    }

    #[test]
    fn test_extract_bare_string_literal() {
        let value = extract(r#""hello""#).unwrap();
        assert_eq!(value, json!("hello"));
    }

    #[test]
    fn test_extract_fenced_json() {
        let text = "Here is the assessment:\n```json\n{\"risk\": \"high\"}\n```\nLet me know.";
        let value = extract(text).unwrap();
        assert_eq!(value["risk"], "high");
    }

    #[test]
    fn test_extract_json_embedded_in_prose() {
        let text = "The agent says {\"urgency\": \"low\", \"note\": \"see {braces}\"} and that is all.";
        let value = extract(text).unwrap();
        assert_eq!(value["urgency"], "low");
        assert_eq!(value["note"], "see {braces}");
    }

    #[test]
    fn test_extract_array_payload() {
        let value = extract("symptoms follow: [1, 2, 3] done").unwrap();
        assert_eq!(value, json!([1, 2, 3]));
    }

    #[test]
    fn test_extract_trailing_garbage() {
        let value = extract("{\"ok\": true}}}}").unwrap();
        assert_eq!(value, json!({"ok": true}));
    }

    #[test]
    fn test_extract_rejects_noise() {
        assert!(extract("no json here").is_none());
        assert!(extract("").is_none());
        assert!(extract("{broken").is_none());
    }
}
