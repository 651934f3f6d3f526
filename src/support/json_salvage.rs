//! Parse possibly-fenced or chatty JSON out of an LLM response.
//!
//! Mirrors `original_source/api/utils/json.py`: try a strict parse first;
//! on failure, locate the first maximal `{...}` span (dot matches newline)
//! and retry. Never raises — returns `None` when both attempts fail.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static BRACE_SPAN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)\{.*\}").unwrap());

pub fn parse(text: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str(text) {
        return Some(value);
    }
    let span = BRACE_SPAN.find(text)?;
    serde_json::from_str(span.as_str()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_strict_json() {
        assert_eq!(parse(r#"{"a": 1}"#), Some(json!({"a": 1})));
    }

    #[test]
    fn salvages_fenced_json() {
        let text = "```json\n{\"a\": 1}\n```";
        assert_eq!(parse(text), Some(json!({"a": 1})));
    }

    #[test]
    fn salvages_json_with_leading_chatter() {
        let text = "Sure, here you go: {\"a\": 1, \"b\": [1, 2]} Hope that helps!";
        assert_eq!(parse(text), Some(json!({"a": 1, "b": [1, 2]})));
    }

    #[test]
    fn returns_none_for_garbage() {
        assert_eq!(parse("not json at all"), None);
    }

    #[test]
    fn returns_none_for_empty() {
        assert_eq!(parse(""), None);
    }
}
