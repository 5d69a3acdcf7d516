//! Event types emitted by the framer.
//!
//! Every event carries the trace id of the session that produced it. The
//! wire form (see [`StreamEvent::to_wire`]) is the JSON object posted to
//! consumers on the other side of a process or worker boundary:
//!
//! ```text
//! {"type": "data",   "traceId": "...", "data": <json>}
//! {"type": "<name>", "traceId": "...", "data": <json>}
//! {"type": "error",  "traceId": "...", "data": {"message": "...", "error": "..."}}
//! {"type": "end",    "traceId": "..."}
//! ```

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{json, Value};

use crate::sse::FrameParseError;

/// Wire type name of bare `data:` frames
pub const DATA_EVENT: &str = "data";
/// Wire type name of error events
pub const ERROR_EVENT: &str = "error";
/// Wire type name of the end-of-stream event
pub const END_EVENT: &str = "end";

/// Payload of an error event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    /// What went wrong, in a sentence
    pub message: String,
    /// The underlying cause
    pub error: String,
}

impl ErrorPayload {
    pub fn new(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: error.into(),
        }
    }
}

impl From<&FrameParseError> for ErrorPayload {
    fn from(err: &FrameParseError) -> Self {
        Self::new(err.message(), err.detail())
    }
}

/// One event produced by a stream session.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// Bare `data:` frame. `data` is the parsed JSON, or a JSON string
    /// holding the raw payload when it was not valid JSON.
    Data { trace_id: String, data: Value },
    /// `event:`/`data:` frame
    Named {
        trace_id: String,
        event_type: String,
        data: Value,
    },
    /// A frame could not be decoded (`fatal == false`, the session goes on)
    /// or the underlying read failed (`fatal == true`, the session is over
    /// and no `End` follows).
    Error {
        trace_id: String,
        error: ErrorPayload,
        fatal: bool,
    },
    /// The stream completed normally. Always the last event of its session.
    End { trace_id: String },
}

impl StreamEvent {
    /// Trace id of the session that produced this event.
    pub fn trace_id(&self) -> &str {
        match self {
            StreamEvent::Data { trace_id, .. }
            | StreamEvent::Named { trace_id, .. }
            | StreamEvent::Error { trace_id, .. }
            | StreamEvent::End { trace_id } => trace_id,
        }
    }

    /// The `type` field of the wire form.
    pub fn event_type(&self) -> &str {
        match self {
            StreamEvent::Data { .. } => DATA_EVENT,
            StreamEvent::Named { event_type, .. } => event_type,
            StreamEvent::Error { .. } => ERROR_EVENT,
            StreamEvent::End { .. } => END_EVENT,
        }
    }

    /// Whether no further events will follow for this trace id.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            StreamEvent::End { .. } | StreamEvent::Error { fatal: true, .. }
        )
    }

    /// JSON object in the outbound wire format.
    pub fn to_wire(&self) -> Value {
        match self {
            StreamEvent::Data { trace_id, data } => json!({
                "type": DATA_EVENT,
                "traceId": trace_id,
                "data": data,
            }),
            StreamEvent::Named {
                trace_id,
                event_type,
                data,
            } => json!({
                "type": event_type,
                "traceId": trace_id,
                "data": data,
            }),
            StreamEvent::Error {
                trace_id, error, ..
            } => json!({
                "type": ERROR_EVENT,
                "traceId": trace_id,
                "data": {
                    "message": error.message,
                    "error": error.error,
                },
            }),
            StreamEvent::End { trace_id } => json!({
                "type": END_EVENT,
                "traceId": trace_id,
            }),
        }
    }
}

impl Serialize for StreamEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_wire().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_event_wire_form() {
        let event = StreamEvent::Data {
            trace_id: "t1".to_string(),
            data: json!({"a": 1}),
        };
        assert_eq!(
            event.to_wire(),
            json!({"type": "data", "traceId": "t1", "data": {"a": 1}})
        );
        assert_eq!(event.event_type(), "data");
        assert!(!event.is_terminal());
    }

    #[test]
    fn test_named_event_wire_form() {
        let event = StreamEvent::Named {
            trace_id: "t1".to_string(),
            event_type: "search_response".to_string(),
            data: json!({"hits": 1}),
        };
        assert_eq!(
            event.to_wire(),
            json!({"type": "search_response", "traceId": "t1", "data": {"hits": 1}})
        );
        assert_eq!(event.event_type(), "search_response");
    }

    #[test]
    fn test_error_event_wire_form_hides_fatal_flag() {
        let event = StreamEvent::Error {
            trace_id: "t1".to_string(),
            error: ErrorPayload::new("Stream read failed", "connection reset"),
            fatal: true,
        };
        assert_eq!(
            event.to_wire(),
            json!({
                "type": "error",
                "traceId": "t1",
                "data": {"message": "Stream read failed", "error": "connection reset"}
            })
        );
        assert!(event.is_terminal());
    }

    #[test]
    fn test_end_event_wire_form_has_no_data() {
        let event = StreamEvent::End {
            trace_id: "t9".to_string(),
        };
        let wire = event.to_wire();
        assert_eq!(wire, json!({"type": "end", "traceId": "t9"}));
        assert!(wire.get("data").is_none());
        assert!(event.is_terminal());
        assert_eq!(event.trace_id(), "t9");
    }

    #[test]
    fn test_serialize_matches_wire() {
        let event = StreamEvent::Data {
            trace_id: "t1".to_string(),
            data: json!("raw text"),
        };
        let text = serde_json::to_string(&event).unwrap();
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, event.to_wire());
    }

    #[test]
    fn test_error_payload_from_frame_error() {
        let err = FrameParseError::InvalidJson {
            event_type: "hits".to_string(),
            source: "expected value at line 1 column 1".to_string(),
        };
        let payload = ErrorPayload::from(&err);
        assert_eq!(payload.message, "Failed to parse data for event 'hits'");
        assert_eq!(payload.error, "expected value at line 1 column 1");
    }
}
