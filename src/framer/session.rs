//! The per-session pull loop.
//!
//! One [`Session`] owns one byte stream. It reads a chunk, decodes it, cuts
//! complete frames out of the buffer and emits their events before it reads
//! the next chunk, so events of one trace id always leave in arrival order.

use std::collections::HashMap;
use std::fmt::Display;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;

use crate::events::{ErrorPayload, StreamEvent};
use crate::sse::{parse_frame, FrameBuffer, FrameOutcome, Utf8Decoder};

use super::EventSender;

/// Lifecycle of a stream session.
///
/// `Active` is the only non-terminal state; a session never leaves a
/// terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Registered and reading
    Active,
    /// The stream completed and `end` was emitted
    Ended,
    /// Stopped by `cancel`/`close_all`, or nobody is listening any more
    Cancelled,
    /// The underlying read failed (or the buffer limit was hit) and a fatal
    /// `error` was emitted
    Errored,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SessionState::Active)
    }
}

/// Registry entry for a live session.
#[derive(Debug)]
pub(super) struct SessionHandle {
    /// Distinguishes successive sessions that reuse one trace id
    pub(super) id: u64,
    pub(super) cancel: CancellationToken,
}

pub(super) type Registry = Arc<Mutex<HashMap<String, SessionHandle>>>;

pub(super) fn lock(registry: &Registry) -> MutexGuard<'_, HashMap<String, SessionHandle>> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

/// How the read loop stopped.
enum Exit {
    Ended,
    Cancelled,
    Failed(ErrorPayload),
}

pub(super) struct Session {
    pub(super) trace_id: String,
    pub(super) id: u64,
    pub(super) cancel: CancellationToken,
    pub(super) events: EventSender,
    pub(super) registry: Registry,
    pub(super) max_buffer_bytes: Option<usize>,
}

impl Session {
    /// Drive the stream to completion and return the final state.
    pub(super) async fn run<S, B, E>(self, mut stream: Pin<Box<S>>) -> SessionState
    where
        S: Stream<Item = Result<B, E>> + ?Sized,
        B: AsRef<[u8]>,
        E: Display,
    {
        tracing::debug!("Stream session started: {}", self.trace_id);

        let exit = self.pump(&mut stream).await;

        // Release the reader and free the trace id before the terminal event
        // goes out, so a consumer reacting to `end` can reuse the id.
        drop(stream);
        self.deregister();

        let state = match exit {
            Exit::Ended => {
                let event = StreamEvent::End {
                    trace_id: self.trace_id.clone(),
                };
                if self.emit(event) {
                    SessionState::Ended
                } else {
                    SessionState::Cancelled
                }
            }
            Exit::Failed(error) => {
                let event = StreamEvent::Error {
                    trace_id: self.trace_id.clone(),
                    error,
                    fatal: true,
                };
                if self.emit(event) {
                    SessionState::Errored
                } else {
                    SessionState::Cancelled
                }
            }
            Exit::Cancelled => SessionState::Cancelled,
        };

        tracing::debug!("Stream session {} finished: {:?}", self.trace_id, state);
        state
    }

    async fn pump<S, B, E>(&self, stream: &mut Pin<Box<S>>) -> Exit
    where
        S: Stream<Item = Result<B, E>> + ?Sized,
        B: AsRef<[u8]>,
        E: Display,
    {
        let mut decoder = Utf8Decoder::new();
        let mut buffer = FrameBuffer::new();

        loop {
            let next = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Exit::Cancelled,
                next = stream.next() => next,
            };

            match next {
                Some(Ok(chunk)) => {
                    let text = decoder.decode(chunk.as_ref());
                    for frame in buffer.push(&text) {
                        let Some(event) = self.frame_event(&frame) else {
                            continue;
                        };
                        if !self.emit(event) {
                            return Exit::Cancelled;
                        }
                    }

                    if let Some(max) = self.max_buffer_bytes {
                        if buffer.len() > max {
                            tracing::warn!(
                                "Stream {} buffered {} bytes without a frame separator (limit {})",
                                self.trace_id,
                                buffer.len(),
                                max
                            );
                            return Exit::Failed(ErrorPayload::new(
                                "Frame buffer limit exceeded",
                                format!(
                                    "{} bytes buffered without a frame separator (limit {})",
                                    buffer.len(),
                                    max
                                ),
                            ));
                        }
                    }
                }
                Some(Err(e)) => {
                    tracing::warn!("Stream {} read failed: {}", self.trace_id, e);
                    return Exit::Failed(ErrorPayload::new("Stream read failed", e.to_string()));
                }
                None => {
                    let leftover = buffer.len() + decoder.pending_len();
                    if leftover > 0 {
                        tracing::debug!(
                            "Stream {} ended with {} bytes of unterminated frame, discarding",
                            self.trace_id,
                            leftover
                        );
                    }
                    return Exit::Ended;
                }
            }
        }
    }

    fn frame_event(&self, frame: &str) -> Option<StreamEvent> {
        let trace_id = self.trace_id.clone();
        let event = match parse_frame(frame)? {
            FrameOutcome::Data(data) => StreamEvent::Data { trace_id, data },
            FrameOutcome::Named { event_type, data } => StreamEvent::Named {
                trace_id,
                event_type,
                data,
            },
            FrameOutcome::Invalid(err) => {
                tracing::debug!("Stream {}: {}", self.trace_id, err);
                StreamEvent::Error {
                    trace_id,
                    error: ErrorPayload::from(&err),
                    fatal: false,
                }
            }
        };
        Some(event)
    }

    /// Send an event unless the session was cancelled. Returns false when
    /// the session should stop (cancelled, or the receiver is gone).
    fn emit(&self, event: StreamEvent) -> bool {
        if self.cancel.is_cancelled() {
            return false;
        }
        if self.events.send(event).is_err() {
            tracing::debug!("Event receiver dropped, stopping stream {}", self.trace_id);
            return false;
        }
        true
    }

    /// Remove this session from the registry, unless the trace id was
    /// already cancelled and handed to a newer session.
    fn deregister(&self) {
        let mut sessions = lock(&self.registry);
        if sessions.get(&self.trace_id).map(|handle| handle.id) == Some(self.id) {
            sessions.remove(&self.trace_id);
        }
    }
}
