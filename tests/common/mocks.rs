//! Mock implementations for test fixtures.
//!
//! This module re-exports the mock implementations from
//! `streamframer::adapters::mock` and provides ready-made search responses.

pub use streamframer::adapters::mock::{MockHttpClient, MockResponse, RecordedRequest};
pub use streamframer::traits::{Headers, HttpClient, HttpError};

use bytes::Bytes;

/// Configuration for setting up mock streaming responses.
pub struct MockStreamConfig {
    client: MockHttpClient,
}

impl MockStreamConfig {
    /// Creates a new mock configuration.
    pub fn new() -> Self {
        Self {
            client: MockHttpClient::new(),
        }
    }

    /// Configures a stream that yields `chunks` then finishes.
    pub fn with_stream(self, url: &str, chunks: &[&str]) -> Self {
        self.client.set_response(url, MockResponse::Stream(to_bytes(chunks)));
        self
    }

    /// Configures a stream that yields `chunks` then stays open.
    pub fn with_open_stream(self, url: &str, chunks: &[&str]) -> Self {
        self.client.set_response(url, MockResponse::Open(to_bytes(chunks)));
        self
    }

    /// Configures a stream that yields `chunks` then fails.
    pub fn with_failing_stream(self, url: &str, chunks: &[&str], error: HttpError) -> Self {
        self.client.set_response(
            url,
            MockResponse::StreamError {
                chunks: to_bytes(chunks),
                error,
            },
        );
        self
    }

    /// Configures a request that fails before any body arrives.
    pub fn with_error(self, url: &str, error: HttpError) -> Self {
        self.client.set_response(url, MockResponse::Error(error));
        self
    }

    /// Builds the mock client.
    pub fn build(self) -> MockHttpClient {
        self.client
    }
}

impl Default for MockStreamConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn to_bytes(chunks: &[&str]) -> Vec<Bytes> {
    chunks
        .iter()
        .map(|chunk| Bytes::copy_from_slice(chunk.as_bytes()))
        .collect()
}

/// A search response body split mid-frame across three chunks.
pub fn search_response_chunks() -> Vec<&'static str> {
    vec![
        "event: search_response\ndata: {\"hits\":[{\"_timestamp\":1}],",
        "\"total\":1}\n\nevent: progress\ndata: {\"percent\":100}\n",
        "\n",
    ]
}
