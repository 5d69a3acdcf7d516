//! Frame parsing logic
//!
//! Turns one complete frame (the text between two `\n\n` separators) into a
//! [`FrameOutcome`].

use serde_json::Value;

use crate::sse::events::{FrameOutcome, FrameParseError, SseLine};

/// Parse a single SSE line into its component type
pub fn parse_sse_line(line: &str) -> SseLine {
    if line.trim().is_empty() {
        return SseLine::Empty;
    }

    if let Some(stripped) = line.strip_prefix(':') {
        return SseLine::Comment(stripped.trim().to_string());
    }

    if let Some(rest) = line.strip_prefix("event:") {
        return SseLine::Event(rest.trim().to_string());
    }

    if let Some(rest) = line.strip_prefix("data:") {
        return SseLine::Data(rest.trim().to_string());
    }

    // id:, retry: and anything else are not used by this framer
    SseLine::Comment(line.to_string())
}

/// Decode one trimmed frame.
///
/// Returns `None` for frames that carry no event at all (keep-alive
/// comments, `id:`/`retry:` only frames). Every frame whose first line is
/// `event:` or `data:` yields exactly one outcome:
///
/// - `event: <name>` followed by `data: <json>` -> [`FrameOutcome::Named`],
///   or [`FrameOutcome::Invalid`] if the JSON does not parse or the data
///   line is missing
/// - `data: <payload>` -> [`FrameOutcome::Data`], falling back to the raw
///   payload string when it is not JSON
pub fn parse_frame(frame: &str) -> Option<FrameOutcome> {
    let lines: Vec<&str> = frame
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect();
    let first = *lines.first()?;

    match parse_sse_line(first) {
        SseLine::Event(event_type) => {
            let data = match lines.get(1).map(|line| parse_sse_line(line)) {
                Some(SseLine::Data(data)) => data,
                _ => {
                    return Some(FrameOutcome::Invalid(FrameParseError::MissingData {
                        event_type,
                    }))
                }
            };

            let outcome = match serde_json::from_str::<Value>(&data) {
                Ok(data) => FrameOutcome::Named { event_type, data },
                Err(e) => FrameOutcome::Invalid(FrameParseError::InvalidJson {
                    event_type,
                    source: e.to_string(),
                }),
            };
            Some(outcome)
        }
        SseLine::Data(data) => {
            let value = serde_json::from_str::<Value>(&data).unwrap_or_else(|_| Value::String(data));
            Some(FrameOutcome::Data(value))
        }
        SseLine::Empty | SseLine::Comment(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // Tests for parse_sse_line

    #[test]
    fn test_parse_empty_line() {
        assert_eq!(parse_sse_line(""), SseLine::Empty);
        assert_eq!(parse_sse_line("   "), SseLine::Empty);
    }

    #[test]
    fn test_parse_comment_line() {
        assert_eq!(
            parse_sse_line(": keep-alive"),
            SseLine::Comment("keep-alive".to_string())
        );
        assert_eq!(parse_sse_line(":"), SseLine::Comment(String::new()));
    }

    #[test]
    fn test_parse_event_line() {
        assert_eq!(
            parse_sse_line("event: search_response"),
            SseLine::Event("search_response".to_string())
        );
        assert_eq!(
            parse_sse_line("event:search_response"),
            SseLine::Event("search_response".to_string())
        );
        assert_eq!(
            parse_sse_line("event:   progress  "),
            SseLine::Event("progress".to_string())
        );
    }

    #[test]
    fn test_parse_data_line() {
        assert_eq!(
            parse_sse_line("data: {\"hits\": 1}"),
            SseLine::Data("{\"hits\": 1}".to_string())
        );
        assert_eq!(
            parse_sse_line("data:{\"x\":1}"),
            SseLine::Data("{\"x\":1}".to_string())
        );
    }

    #[test]
    fn test_parse_unknown_line() {
        assert_eq!(
            parse_sse_line("id: 42"),
            SseLine::Comment("id: 42".to_string())
        );
    }

    // Tests for parse_frame

    #[test]
    fn test_named_frame() {
        let outcome = parse_frame("event: search_response\ndata: {\"hits\":1}");
        assert_eq!(
            outcome,
            Some(FrameOutcome::Named {
                event_type: "search_response".to_string(),
                data: json!({"hits": 1}),
            })
        );
    }

    #[test]
    fn test_named_frame_without_spaces() {
        let outcome = parse_frame("event:progress\ndata:{\"percent\":50}");
        assert_eq!(
            outcome,
            Some(FrameOutcome::Named {
                event_type: "progress".to_string(),
                data: json!({"percent": 50}),
            })
        );
    }

    #[test]
    fn test_named_frame_invalid_json_is_error_not_named() {
        let outcome = parse_frame("event: search_response\ndata: {not json");
        match outcome {
            Some(FrameOutcome::Invalid(FrameParseError::InvalidJson { event_type, .. })) => {
                assert_eq!(event_type, "search_response");
            }
            other => panic!("Expected InvalidJson, got {:?}", other),
        }
    }

    #[test]
    fn test_named_frame_missing_data() {
        assert_eq!(
            parse_frame("event: search_response"),
            Some(FrameOutcome::Invalid(FrameParseError::MissingData {
                event_type: "search_response".to_string()
            }))
        );
        assert_eq!(
            parse_frame("event: search_response\nid: 7"),
            Some(FrameOutcome::Invalid(FrameParseError::MissingData {
                event_type: "search_response".to_string()
            }))
        );
    }

    #[test]
    fn test_bare_data_frame_json() {
        assert_eq!(
            parse_frame("data: {\"a\":1}"),
            Some(FrameOutcome::Data(json!({"a": 1})))
        );
        assert_eq!(parse_frame("data: [1,2,3]"), Some(FrameOutcome::Data(json!([1, 2, 3]))));
        assert_eq!(parse_frame("data: 42"), Some(FrameOutcome::Data(json!(42))));
    }

    #[test]
    fn test_bare_data_frame_raw_fallback() {
        assert_eq!(
            parse_frame("data: [DONE]"),
            Some(FrameOutcome::Data(json!("[DONE]")))
        );
        assert_eq!(
            parse_frame("data: hello world"),
            Some(FrameOutcome::Data(json!("hello world")))
        );
    }

    #[test]
    fn test_crlf_lines() {
        assert_eq!(
            parse_frame("event: hits\r\ndata: {\"n\":2}\r"),
            Some(FrameOutcome::Named {
                event_type: "hits".to_string(),
                data: json!({"n": 2}),
            })
        );
    }

    #[test]
    fn test_comment_only_frame_yields_nothing() {
        assert_eq!(parse_frame(": keep-alive"), None);
        assert_eq!(parse_frame("id: 3\nretry: 1000"), None);
        assert_eq!(parse_frame(""), None);
    }

    #[test]
    fn test_only_first_data_line_is_used() {
        assert_eq!(
            parse_frame("data: {\"a\":1}\ndata: {\"b\":2}"),
            Some(FrameOutcome::Data(json!({"a": 1})))
        );
    }
}
