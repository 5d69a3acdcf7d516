//! Mock implementations for testing.
//!
//! Enables driving the framer and the search client without network access.
//!
//! # Available Mocks
//!
//! - [`MockHttpClient`] - HTTP client with configurable byte streams

pub mod http;

pub use http::{MockHttpClient, MockResponse, RecordedRequest};
