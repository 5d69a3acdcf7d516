//! Framer and client configuration.

use std::time::Duration;

/// Default base URL of the search service.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5080";

/// Environment variable overriding [`FramerConfig::base_url`].
pub const ENV_BASE_URL: &str = "STREAMFRAMER_BASE_URL";
/// Environment variable setting [`FramerConfig::max_buffer_bytes`].
pub const ENV_MAX_BUFFER_BYTES: &str = "STREAMFRAMER_MAX_BUFFER_BYTES";
/// Environment variable setting [`FramerConfig::connect_timeout`], in seconds.
pub const ENV_TIMEOUT_SECS: &str = "STREAMFRAMER_TIMEOUT_SECS";

/// Configuration for the framer and the HTTP search client.
///
/// Use the builder pattern to customize behavior.
///
/// # Example
///
/// ```ignore
/// use streamframer::config::FramerConfig;
///
/// let config = FramerConfig::default()
///     .with_base_url("http://o2.internal:5080")
///     .with_max_buffer_bytes(4 * 1024 * 1024);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FramerConfig {
    /// Upper bound on the text a session may hold without completing a
    /// frame. Exceeding it ends the session with a fatal error event.
    /// `None` (default) means unbounded.
    pub max_buffer_bytes: Option<usize>,
    /// Base URL the search client resolves request paths against
    pub base_url: String,
    /// Connect timeout for opening HTTP streams (default: none)
    pub connect_timeout: Option<Duration>,
}

impl Default for FramerConfig {
    fn default() -> Self {
        Self {
            max_buffer_bytes: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: None,
        }
    }
}

impl FramerConfig {
    /// Create a new FramerConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound the unresolved text buffer of each session.
    pub fn with_max_buffer_bytes(mut self, max: usize) -> Self {
        self.max_buffer_bytes = Some(max);
        self
    }

    /// Set the base URL for the search client.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the connect timeout for opening HTTP streams.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Create config from environment variables.
    ///
    /// Unset variables keep their defaults. Values that do not parse are
    /// ignored with a warning.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var(ENV_BASE_URL) {
            if !url.trim().is_empty() {
                config = config.with_base_url(url.trim().trim_end_matches('/'));
            }
        }

        if let Some(max) = parse_env::<usize>(ENV_MAX_BUFFER_BYTES) {
            config = config.with_max_buffer_bytes(max);
        }

        if let Some(secs) = parse_env::<u64>(ENV_TIMEOUT_SECS) {
            config = config.with_connect_timeout(Duration::from_secs(secs));
        }

        config
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring {}={:?}: not a valid number", key, raw);
            None
        }
    }
}
