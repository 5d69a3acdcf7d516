//! SSE-style wire framing
//!
//! Turns raw stream bytes into frames and frames into [`FrameOutcome`]s.
//! The wire format consists of:
//! - `event: <type>` - optional event type line
//! - `data: <json>` - data payload line
//! - `\n\n` - separates frames
//! - Lines starting with `:` - comments (ignored)
//!
//! # Module structure
//! - `decoder` - Stateful UTF-8 decoding across chunk boundaries
//! - `buffer` - Cuts decoded text into `\n\n`-delimited frames
//! - `events` - Line and frame outcome types
//! - `parser` - Parsing logic (parse_sse_line, parse_frame)

mod buffer;
mod decoder;
mod events;
mod parser;

pub use buffer::{FrameBuffer, FRAME_SEPARATOR};
pub use decoder::Utf8Decoder;
pub use events::{FrameOutcome, FrameParseError, SseLine};
pub use parser::{parse_frame, parse_sse_line};
