//! HTTP(S) calendar feed.
//!
//! Fetches a published iCalendar URL such as an HR tool's shared company
//! calendar. The URL usually carries its own access token, so no extra
//! authentication is performed and logs only ever show the host.

mod client;
mod config;

pub use client::FeedClient;
pub use config::HttpFeedConfig;

use tracing::info;

use crate::error::ProviderResult;
use crate::source::{BoxFuture, FeedSource};

/// A feed downloaded over HTTP(S).
pub struct HttpFeed {
    client: FeedClient,
}

impl HttpFeed {
    /// Creates an HTTP feed source.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for non-HTTP URLs, or a network error if
    /// the HTTP client cannot be built.
    pub fn new(config: HttpFeedConfig) -> ProviderResult<Self> {
        let client = FeedClient::new(config).map_err(|e| e.with_provider("http"))?;
        Ok(Self { client })
    }
}

impl FeedSource for HttpFeed {
    fn name(&self) -> &str {
        "http"
    }

    fn location(&self) -> String {
        self.client.config().redacted_url()
    }

    fn fetch_raw(&self) -> BoxFuture<'_, ProviderResult<String>> {
        Box::pin(async move {
            info!(feed = %self.location(), "Fetching calendar feed");
            self.client
                .get()
                .await
                .map_err(|e| e.with_provider(self.name()))
        })
    }
}
