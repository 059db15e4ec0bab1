//! Connection options for the video analysis service.

use std::collections::HashMap;
use std::time::Duration;

use crate::client::ClientError;

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Environment variable overriding the base URL.
pub const ENV_BASE_URL: &str = "VIDEO_AGENT_BASE_URL";
/// Environment variable holding an HTTP proxy URL.
pub const ENV_PROXY: &str = "VIDEO_AGENT_PROXY";
/// Environment variable holding a request timeout in whole seconds.
pub const ENV_TIMEOUT_SECS: &str = "VIDEO_AGENT_TIMEOUT_SECS";

/// HTTP transport options.
///
/// No timeout is applied unless one is set: a hung stream blocks until the
/// caller cancels it.
///
/// # Example
/// ```rust
/// use video_agent_client::options::ClientOptions;
/// use std::time::Duration;
///
/// let options = ClientOptions::new()
///     .with_base_url("http://videos.internal:8080/api".to_string())
///     .with_timeout(Duration::from_secs(120));
/// assert_eq!(options.base_url(), "http://videos.internal:8080/api");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    /// Base URL the endpoint paths are appended to
    pub base_url: Option<String>,

    /// Request timeout
    pub timeout: Option<Duration>,

    /// HTTP proxy URL
    pub proxy: Option<String>,

    /// Additional HTTP headers to include in requests
    pub extra_headers: Option<HashMap<String, String>>,
}

impl ClientOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read options from `VIDEO_AGENT_*` environment variables.
    ///
    /// Unset variables keep their defaults; a timeout that is not a number
    /// is a configuration error.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ClientError> {
        let mut options = Self::new();

        if let Some(base_url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            options.base_url = Some(base_url);
        }
        if let Some(proxy) = lookup(ENV_PROXY).filter(|v| !v.trim().is_empty()) {
            options.proxy = Some(proxy);
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                ClientError::Config(format!("{} must be a whole number of seconds", ENV_TIMEOUT_SECS))
            })?;
            options.timeout = Some(Duration::from_secs(secs));
        }

        Ok(options)
    }

    /// Effective base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
    }

    /// Full URL of an endpoint path such as `/stream/ask`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Set the timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the proxy URL.
    pub fn with_proxy(mut self, proxy: String) -> Self {
        self.proxy = Some(proxy);
        self
    }

    /// Add a single extra header.
    pub fn with_header(mut self, key: String, value: String) -> Self {
        self.extra_headers
            .get_or_insert_with(HashMap::new)
            .insert(key, value);
        self
    }
}
