//! Model response parsing
//!
//! Models frequently wrap JSON in a Markdown code fence even when told not to.
//! The fence is stripped before decoding; anything that still is not a JSON
//! object becomes a [`ParseFailure`] carrying the untouched reply.

use serde::Serialize;
use serde_json::{Map, Value};

/// Error kind reported for undecodable replies
pub const PARSE_FAILURE: &str = "parse failure";

const FENCE: &str = "```";

/// Result of decoding a model reply
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    /// Decoded mapping, returned as-is
    Parsed(Map<String, Value>),
    /// Reply could not be decoded into an object
    Failed(ParseFailure),
}

impl ParseOutcome {
    pub fn is_parsed(&self) -> bool {
        matches!(self, ParseOutcome::Parsed(_))
    }

    pub fn into_result(self) -> Result<Map<String, Value>, ParseFailure> {
        match self {
            ParseOutcome::Parsed(map) => Ok(map),
            ParseOutcome::Failed(failure) => Err(failure),
        }
    }
}

/// A reply that did not decode into a field mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseFailure {
    pub kind: &'static str,
    /// The reply exactly as received
    pub raw_response: String,
    /// Human-readable decode error
    pub details: String,
}

impl ParseFailure {
    fn new(raw_response: &str, details: impl Into<String>) -> Self {
        Self {
            kind: PARSE_FAILURE,
            raw_response: raw_response.to_string(),
            details: details.into(),
        }
    }
}

/// Decodes a raw model reply into a field mapping
///
/// Never panics. Duplicate keys resolve to the last occurrence.
pub fn parse_response(raw: &str) -> ParseOutcome {
    let body = strip_code_fence(raw.trim());

    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => ParseOutcome::Parsed(map),
        Ok(other) => ParseOutcome::Failed(ParseFailure::new(
            raw,
            format!("expected a JSON object, found {}", json_kind(&other)),
        )),
        Err(e) => ParseOutcome::Failed(ParseFailure::new(raw, e.to_string())),
    }
}

/// Removes a surrounding Markdown code fence and its language tag
///
/// Text that does not start with a fence is returned unchanged.
pub fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix(FENCE) else {
        return text;
    };

    // A tag is a word directly after the fence, followed by whitespace or the body
    let tag_len = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+')))
        .unwrap_or(rest.len());
    let after_tag = &rest[tag_len..];
    let body = match after_tag.chars().next() {
        None => after_tag,
        Some(c) if c.is_whitespace() || c == '{' || c == '[' => after_tag,
        Some(_) => rest,
    };

    let body = body.trim();
    body.strip_suffix(FENCE).unwrap_or(body).trim()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_object() {
        let outcome = parse_response(r#"{"loss_type": "Fire"}"#);
        let map = outcome.into_result().unwrap();
        assert_eq!(map["loss_type"], json!("Fire"));
    }

    #[test]
    fn test_fenced_with_tag() {
        let fenced = parse_response("```json\n{\"a\":1}\n```");
        let plain = parse_response("{\"a\":1}");
        assert_eq!(fenced, plain);
    }

    #[test]
    fn test_fenced_without_tag() {
        let outcome = parse_response("  ```\n{\"a\": true}\n```  ");
        assert!(outcome.is_parsed());
    }

    #[test]
    fn test_fence_tag_inline() {
        assert_eq!(strip_code_fence("```json{\"a\":1}```"), "{\"a\":1}");
    }

    #[test]
    fn test_garbage_preserves_raw() {
        let failure = parse_response("not json").into_result().unwrap_err();
        assert_eq!(failure.raw_response, "not json");
        assert_eq!(failure.kind, PARSE_FAILURE);
        assert!(!failure.details.is_empty());
    }

    #[test]
    fn test_empty_input() {
        let failure = parse_response("").into_result().unwrap_err();
        assert_eq!(failure.raw_response, "");
    }

    #[test]
    fn test_non_object_rejected() {
        let failure = parse_response("[1, 2, 3]").into_result().unwrap_err();
        assert!(failure.details.contains("array"));

        assert!(!parse_response("42").is_parsed());
        assert!(!parse_response("\"text\"").is_parsed());
    }

    #[test]
    fn test_duplicate_keys_last_wins() {
        let map = parse_response(r#"{"severity": "Low", "severity": "High"}"#)
            .into_result()
            .unwrap();
        assert_eq!(map["severity"], json!("High"));
    }

    #[test]
    fn test_unterminated_fence() {
        assert!(parse_response("```json\n{\"a\":1}").is_parsed());
        assert!(!parse_response("```").is_parsed());
    }
}
