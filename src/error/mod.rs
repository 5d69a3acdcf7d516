//! Error types for streamframer.
//!
//! Only a few operations can fail synchronously: registering a session
//! ([`FramerError::AlreadyActive`], [`FramerError::NoRuntime`]) and opening
//! an HTTP stream ([`FramerError::Http`]). Everything that goes wrong while a
//! stream is being read is delivered as a
//! [`StreamEvent::Error`](crate::events::StreamEvent::Error) instead.
//!
//! # Example
//!
//! ```ignore
//! use streamframer::error::{FramerError, FramerResult};
//!
//! fn register(framer: &StreamFramer, stream: ByteStream) -> FramerResult<()> {
//!     match framer.start("trace-1", stream) {
//!         Err(FramerError::AlreadyActive { trace_id }) => {
//!             tracing::warn!("{} is still streaming", trace_id);
//!             Ok(())
//!         }
//!         other => other,
//!     }
//! }
//! ```

mod framer_error;
mod result;

pub use framer_error::FramerError;
pub use result::FramerResult;
