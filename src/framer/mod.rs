//! Stream framer: concurrent SSE-style stream sessions keyed by trace id.
//!
//! A [`StreamFramer`] owns a registry of live sessions. Each session runs its
//! own Tokio task that pulls chunks from a byte stream and sends
//! [`StreamEvent`]s to the framer's event channel. Events of one trace id
//! are delivered in the order their frames arrived; events of different
//! trace ids interleave freely.
//!
//! # Cancellation
//!
//! [`StreamFramer::cancel`] removes the session from the registry and
//! cancels it cooperatively. The session checks for cancellation before
//! every emission, so at most one event that was already being sent when
//! `cancel` ran can still reach the receiver.
//!
//! # Example
//!
//! ```ignore
//! use streamframer::{FramerConfig, StreamEvent, StreamFramer};
//!
//! let (framer, mut events) = StreamFramer::new(FramerConfig::default());
//! framer.start("trace-1", response_body)?;
//!
//! while let Some(event) = events.recv().await {
//!     match event {
//!         StreamEvent::Data { data, .. } => println!("{}", data),
//!         StreamEvent::Named { event_type, data, .. } => println!("{}: {}", event_type, data),
//!         StreamEvent::Error { error, fatal, .. } => eprintln!("{} ({})", error.message, fatal),
//!         StreamEvent::End { .. } => break,
//!     }
//! }
//! ```

mod session;

pub use session::SessionState;

use std::collections::HashMap;
use std::fmt::Display;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use futures::Stream;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::config::FramerConfig;
use crate::error::{FramerError, FramerResult};
use crate::events::StreamEvent;
use session::{lock, Registry, Session, SessionHandle};

/// Sending half of the framer's event channel.
pub type EventSender = mpsc::UnboundedSender<StreamEvent>;
/// Receiving half of the framer's event channel.
pub type EventReceiver = mpsc::UnboundedReceiver<StreamEvent>;

/// Owns the live stream sessions and their event channel.
///
/// Dropping the framer cancels every live session.
pub struct StreamFramer {
    config: FramerConfig,
    sessions: Registry,
    events: EventSender,
    next_session_id: AtomicU64,
}

impl StreamFramer {
    /// Create a framer together with the receiver for its events.
    pub fn new(config: FramerConfig) -> (Self, EventReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::with_sender(config, tx), rx)
    }

    /// Create a framer that sends its events into an existing channel.
    pub fn with_sender(config: FramerConfig, events: EventSender) -> Self {
        Self {
            config,
            sessions: Arc::new(Mutex::new(HashMap::new())),
            events,
            next_session_id: AtomicU64::new(1),
        }
    }

    /// Start framing `stream` under `trace_id`.
    ///
    /// The stream is read on a new Tokio task; completion is reported
    /// through an `End` or fatal `Error` event. Must be called from within a
    /// Tokio runtime.
    ///
    /// # Errors
    /// - [`FramerError::AlreadyActive`] if `trace_id` has a live session.
    ///   The existing session keeps running and `stream` is dropped unread.
    /// - [`FramerError::NoRuntime`] outside a Tokio runtime.
    pub fn start<S, B, E>(&self, trace_id: impl Into<String>, stream: S) -> FramerResult<()>
    where
        S: Stream<Item = Result<B, E>> + Send + 'static,
        B: AsRef<[u8]> + Send + 'static,
        E: Display + Send + 'static,
    {
        let trace_id = trace_id.into();
        let runtime =
            tokio::runtime::Handle::try_current().map_err(|_| FramerError::NoRuntime)?;

        let id = self.next_session_id.fetch_add(1, Ordering::Relaxed);
        let cancel = CancellationToken::new();
        {
            let mut sessions = lock(&self.sessions);
            if sessions.contains_key(&trace_id) {
                tracing::warn!("Rejecting start for {}: already streaming", trace_id);
                return Err(FramerError::AlreadyActive { trace_id });
            }
            sessions.insert(
                trace_id.clone(),
                SessionHandle {
                    id,
                    cancel: cancel.clone(),
                },
            );
        }

        let session = Session {
            trace_id,
            id,
            cancel,
            events: self.events.clone(),
            registry: Arc::clone(&self.sessions),
            max_buffer_bytes: self.config.max_buffer_bytes,
        };
        runtime.spawn(session.run(Box::pin(stream)));

        Ok(())
    }

    /// Cancel the session for `trace_id`.
    ///
    /// Returns whether a live session was found. Unknown trace ids are a
    /// no-op: cancelling races with natural completion all the time.
    pub fn cancel(&self, trace_id: &str) -> bool {
        let handle = lock(&self.sessions).remove(trace_id);
        match handle {
            Some(handle) => {
                handle.cancel.cancel();
                tracing::info!("Stream cancelled: {}", trace_id);
                true
            }
            None => {
                tracing::debug!("Cancel for unknown trace id {} ignored", trace_id);
                false
            }
        }
    }

    /// Cancel every live session and clear the registry.
    ///
    /// Returns the number of sessions cancelled.
    pub fn close_all(&self) -> usize {
        let drained: Vec<(String, SessionHandle)> = lock(&self.sessions).drain().collect();
        for (_, handle) in &drained {
            handle.cancel.cancel();
        }
        if !drained.is_empty() {
            tracing::info!("Closed {} active stream(s)", drained.len());
        }
        drained.len()
    }

    /// Whether `trace_id` currently has a live session.
    pub fn is_active(&self, trace_id: &str) -> bool {
        lock(&self.sessions).contains_key(trace_id)
    }

    /// Number of live sessions.
    pub fn active_count(&self) -> usize {
        lock(&self.sessions).len()
    }

    /// Trace ids of all live sessions, sorted.
    pub fn active_trace_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = lock(&self.sessions).keys().cloned().collect();
        ids.sort();
        ids
    }

    /// The configuration this framer was built with.
    pub fn config(&self) -> &FramerConfig {
        &self.config
    }
}

impl Drop for StreamFramer {
    fn drop(&mut self) {
        self.close_all();
    }
}

impl std::fmt::Debug for StreamFramer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamFramer")
            .field("config", &self.config)
            .field("active", &self.active_trace_ids())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    #[test]
    fn test_start_outside_runtime() {
        let (framer, _rx) = StreamFramer::new(FramerConfig::default());
        let stream = futures::stream::iter(vec![Ok::<_, Infallible>("data: 1\n\n")]);

        let result = framer.start("t1", stream);

        assert!(matches!(result, Err(FramerError::NoRuntime)));
        assert!(!framer.is_active("t1"));
    }

    #[tokio::test]
    async fn test_duplicate_start_rejected() {
        let (framer, _rx) = StreamFramer::new(FramerConfig::default());
        framer
            .start("t1", futures::stream::pending::<Result<&str, Infallible>>())
            .unwrap();

        let second = framer.start("t1", futures::stream::pending::<Result<&str, Infallible>>());

        assert!(matches!(
            second,
            Err(FramerError::AlreadyActive { ref trace_id }) if trace_id == "t1"
        ));
        assert_eq!(framer.active_count(), 1);
    }

    #[tokio::test]
    async fn test_cancel_unknown_is_noop() {
        let (framer, _rx) = StreamFramer::new(FramerConfig::default());
        assert!(!framer.cancel("missing"));
        assert_eq!(framer.close_all(), 0);
    }

    #[tokio::test]
    async fn test_introspection() {
        let (framer, _rx) = StreamFramer::new(FramerConfig::default());
        for id in ["b", "a", "c"] {
            framer
                .start(id, futures::stream::pending::<Result<&str, Infallible>>())
                .unwrap();
        }

        assert_eq!(framer.active_trace_ids(), vec!["a", "b", "c"]);
        assert!(framer.cancel("b"));
        assert_eq!(framer.active_trace_ids(), vec!["a", "c"]);
        assert_eq!(framer.close_all(), 2);
        assert_eq!(framer.active_count(), 0);
    }

    #[tokio::test]
    async fn test_debug_lists_active_sessions() {
        let (framer, _rx) = StreamFramer::new(FramerConfig::default());
        framer
            .start("t1", futures::stream::pending::<Result<&str, Infallible>>())
            .unwrap();
        assert!(format!("{:?}", framer).contains("t1"));
    }
}
