//! HTTP search-stream client.
//!
//! Opens a streaming HTTP response and hands its body to a [`StreamFramer`]
//! under the caller's trace id. Opening the connection is the only part that
//! can fail synchronously; everything after that arrives as events.

use crate::adapters::ReqwestHttpClient;
use crate::config::FramerConfig;
use crate::error::{FramerError, FramerResult};
use crate::framer::StreamFramer;
use crate::traits::{Headers, HttpClient};

/// Client that opens search streams and registers them with a framer.
#[derive(Debug, Clone)]
pub struct SearchStreamClient<C: HttpClient> {
    /// Base URL request paths are resolved against
    pub base_url: String,
    http: C,
    headers: Headers,
}

impl SearchStreamClient<ReqwestHttpClient> {
    /// Build a reqwest-backed client from the configuration.
    pub fn from_config(config: &FramerConfig) -> FramerResult<Self> {
        let http = match config.connect_timeout {
            Some(timeout) => ReqwestHttpClient::with_connect_timeout(timeout)
                .map_err(|e| FramerError::Config(e.to_string()))?,
            None => ReqwestHttpClient::new(),
        };
        Ok(Self::new(config.base_url.clone(), http))
    }
}

impl<C: HttpClient> SearchStreamClient<C> {
    /// Create a client over any [`HttpClient`].
    pub fn new(base_url: impl Into<String>, http: C) -> Self {
        let mut headers = Headers::new();
        headers.insert("Accept".to_string(), "text/event-stream".to_string());
        Self {
            base_url: base_url.into(),
            http,
            headers,
        }
    }

    /// Add a header sent with every request (e.g. `Authorization`).
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// POST `body` as JSON to `path` and frame the response under `trace_id`.
    ///
    /// # Errors
    /// - [`FramerError::AlreadyActive`] before any request is made if the
    ///   trace id is still streaming
    /// - [`FramerError::Http`] if the request fails or the status is not 2xx;
    ///   no session is created in that case
    pub async fn start_search(
        &self,
        framer: &StreamFramer,
        trace_id: &str,
        path: &str,
        body: &serde_json::Value,
    ) -> FramerResult<()> {
        ensure_idle(framer, trace_id)?;

        let url = self.url(path);
        let mut headers = self.headers.clone();
        headers.insert("Content-Type".to_string(), "application/json".to_string());

        tracing::debug!("Opening search stream {} -> POST {}", trace_id, url);
        let stream = self
            .http
            .post_stream(&url, &body.to_string(), &headers)
            .await?;
        framer.start(trace_id, stream)
    }

    /// GET `path` and frame the response under `trace_id`.
    pub async fn start_get(
        &self,
        framer: &StreamFramer,
        trace_id: &str,
        path: &str,
    ) -> FramerResult<()> {
        ensure_idle(framer, trace_id)?;

        let url = self.url(path);
        tracing::debug!("Opening stream {} -> GET {}", trace_id, url);
        let stream = self.http.get_stream(&url, &self.headers).await?;
        framer.start(trace_id, stream)
    }

    /// Resolve `path` against the base URL. Absolute URLs pass through.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

fn ensure_idle(framer: &StreamFramer, trace_id: &str) -> FramerResult<()> {
    if framer.is_active(trace_id) {
        return Err(FramerError::AlreadyActive {
            trace_id: trace_id.to_string(),
        });
    }
    Ok(())
}
