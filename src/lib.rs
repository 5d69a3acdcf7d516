//! StreamFramer - turns chunked SSE-style byte streams into typed events
//!
//! Each stream is registered under a caller-chosen trace id; its chunks are
//! decoded, cut into `\n\n`-separated frames and delivered as data, named,
//! error and end events on one channel.

pub mod adapters;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod events;
pub mod framer;
pub mod sse;
pub mod traits;

pub use client::SearchStreamClient;
pub use config::FramerConfig;
pub use error::{FramerError, FramerResult};
pub use events::{ErrorPayload, StreamEvent};
pub use framer::{EventReceiver, EventSender, SessionState, StreamFramer};
