//! Common test utilities for integration tests.
//!
//! Builders for in-memory chunk streams and helpers for reading the framer's
//! event channel without hanging a failing test.
//!
//! # Example
//!
//! ```ignore
//! use common::{chunks, next_event};
//!
//! framer.start("t1", chunks(&["data: 1\n\n"]))?;
//! let event = next_event(&mut rx).await;
//! ```

#![allow(dead_code)]

pub mod mocks;

pub use mocks::*;

use std::convert::Infallible;
use std::time::Duration;

use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};
use streamframer::{EventReceiver, StreamEvent};

/// How long any single wait on the event channel may take.
pub const EVENT_TIMEOUT: Duration = Duration::from_secs(5);

/// A finished stream yielding `parts` as byte chunks.
pub fn chunks(parts: &[&str]) -> impl Stream<Item = Result<Bytes, Infallible>> + Send + 'static {
    let parts: Vec<Result<Bytes, Infallible>> = parts
        .iter()
        .map(|part| Ok(Bytes::copy_from_slice(part.as_bytes())))
        .collect();
    stream::iter(parts)
}

/// A finished stream yielding raw byte chunks.
pub fn byte_chunks(parts: Vec<Vec<u8>>) -> impl Stream<Item = Result<Bytes, Infallible>> + Send + 'static {
    stream::iter(parts.into_iter().map(|part| Ok(Bytes::from(part))))
}

/// Like [`chunks`], but the stream stays open after the last chunk.
pub fn open_chunks(parts: &[&str]) -> impl Stream<Item = Result<Bytes, Infallible>> + Send + 'static {
    chunks(parts).chain(stream::pending())
}

/// Split `bytes` into chunks of `size` bytes (the last may be shorter).
pub fn split_every(bytes: &[u8], size: usize) -> Vec<Vec<u8>> {
    bytes.chunks(size.max(1)).map(<[u8]>::to_vec).collect()
}

/// Wait for the next event, failing the test after [`EVENT_TIMEOUT`].
pub async fn next_event(rx: &mut EventReceiver) -> StreamEvent {
    tokio::time::timeout(EVENT_TIMEOUT, rx.recv())
        .await
        .expect("Timed out waiting for an event")
        .expect("Event channel closed")
}

/// Collect events up to and including the terminal event of `trace_id`.
pub async fn events_until_terminal(rx: &mut EventReceiver, trace_id: &str) -> Vec<StreamEvent> {
    let mut events = Vec::new();
    loop {
        let event = next_event(rx).await;
        let done = event.trace_id() == trace_id && event.is_terminal();
        events.push(event);
        if done {
            return events;
        }
    }
}

/// Assert nothing arrives on the channel for a short while.
pub async fn assert_quiet(rx: &mut EventReceiver) {
    let result = tokio::time::timeout(Duration::from_millis(100), rx.recv()).await;
    if let Ok(Some(event)) = result {
        panic!("Expected no event, got {:?}", event);
    }
}
