//! Wire-level types produced by the frame parser.
//!
//! These are trace-agnostic: the framer attaches the trace id when it turns
//! a [`FrameOutcome`] into a [`crate::events::StreamEvent`].

use serde_json::Value;

/// Represents a parsed SSE line
#[derive(Debug, Clone, PartialEq)]
pub enum SseLine {
    /// Event type declaration (e.g., "event: search_response")
    Event(String),
    /// Data payload (e.g., "data: {\"hits\": 1}")
    Data(String),
    /// Empty line
    Empty,
    /// Comment line (starts with ':') or a field this framer does not use
    Comment(String),
}

/// Result of decoding one complete frame.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// Bare `data:` frame. Holds the parsed JSON, or the raw text as a
    /// JSON string when the payload is not valid JSON.
    Data(Value),
    /// `event:`/`data:` pair with a JSON payload
    Named { event_type: String, data: Value },
    /// The frame could not be turned into an event
    Invalid(FrameParseError),
}

/// Errors that can occur while decoding a single frame.
///
/// None of these are fatal to a session; each one becomes one `error` event.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameParseError {
    /// Invalid JSON in the data line of a tagged frame
    InvalidJson { event_type: String, source: String },
    /// Tagged frame without a `data:` line
    MissingData { event_type: String },
}

impl FrameParseError {
    /// Short human-readable summary used as the `message` of an error event.
    pub fn message(&self) -> String {
        match self {
            FrameParseError::InvalidJson { event_type, .. } => {
                format!("Failed to parse data for event '{}'", event_type)
            }
            FrameParseError::MissingData { event_type } => {
                format!("Missing data for event '{}'", event_type)
            }
        }
    }

    /// Underlying cause, used as the `error` field of an error event.
    pub fn detail(&self) -> String {
        match self {
            FrameParseError::InvalidJson { source, .. } => source.clone(),
            FrameParseError::MissingData { .. } => "no data line in frame".to_string(),
        }
    }
}

impl std::fmt::Display for FrameParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrameParseError::InvalidJson { event_type, source } => {
                write!(f, "Invalid JSON for event '{}': {}", event_type, source)
            }
            FrameParseError::MissingData { event_type } => {
                write!(f, "Missing data for event type: {}", event_type)
            }
        }
    }
}

impl std::error::Error for FrameParseError {}
