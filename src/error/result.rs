//! Result type alias for framer operations.

use super::framer_error::FramerError;

/// Type alias for Results using FramerError.
pub type FramerResult<T> = Result<T, FramerError>;
