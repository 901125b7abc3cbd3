//! HTTP feed configuration.

use std::time::Duration;
use url::Url;

/// Configuration for an HTTP(S) calendar feed.
#[derive(Debug, Clone)]
pub struct HttpFeedConfig {
    /// Feed URL. Often embeds an access token, so never log it whole.
    pub url: Url,

    /// Request timeout.
    pub timeout: Duration,

    /// User agent string.
    pub user_agent: String,
}

impl HttpFeedConfig {
    /// Default timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Creates a configuration for the given URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn new(url: impl AsRef<str>) -> Result<Self, url::ParseError> {
        let parsed = Url::parse(url.as_ref().trim())?;
        Ok(Self {
            url: parsed,
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            user_agent: format!("weekcast/{}", env!("CARGO_PKG_VERSION")),
        })
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns true for `http` and `https` URLs.
    pub fn is_http(&self) -> bool {
        matches!(self.url.scheme(), "http" | "https")
    }

    /// Returns the URL with path, query and credentials removed.
    pub fn redacted_url(&self) -> String {
        let host = self.url.host_str().unwrap_or("?");
        match self.url.port() {
            Some(port) => format!("{}://{}:{}/…", self.url.scheme(), host, port),
            None => format!("{}://{}/…", self.url.scheme(), host),
        }
    }
}
