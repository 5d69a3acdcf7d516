//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - Opening streaming HTTP responses (GET, POST)

pub mod http;

pub use http::{ByteStream, Headers, HttpClient, HttpError};
