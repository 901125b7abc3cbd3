//! HTTP client for calendar feeds.

use reqwest::header::ACCEPT;
use reqwest::{Client, Response, StatusCode};
use tracing::{trace, warn};

use crate::error::{ProviderError, ProviderResult};

use super::config::HttpFeedConfig;

const ACCEPT_CALENDAR: &str = "text/calendar, text/plain;q=0.9, */*;q=0.5";

/// Thin wrapper over `reqwest` that maps HTTP statuses to provider errors.
pub struct FeedClient {
    client: Client,
    config: HttpFeedConfig,
}

impl FeedClient {
    /// Creates a client with the given configuration.
    pub fn new(config: HttpFeedConfig) -> ProviderResult<Self> {
        if !config.is_http() {
            return Err(ProviderError::configuration(format!(
                "unsupported feed URL scheme '{}'",
                config.url.scheme()
            )));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| ProviderError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Downloads the feed body.
    pub async fn get(&self) -> ProviderResult<String> {
        trace!(url = %self.config.redacted_url(), "Requesting feed");

        let response = self
            .client
            .get(self.config.url.clone())
            .header(ACCEPT, ACCEPT_CALENDAR)
            .send()
            .await
            .map_err(|e| {
                // reqwest errors embed the full URL
                let e = e.without_url();
                ProviderError::network(format!("Request failed: {}", e)).with_source(e)
            })?;

        self.handle_response(response).await
    }

    /// Handles the HTTP response and extracts the body.
    async fn handle_response(&self, response: Response) -> ProviderResult<String> {
        let status = response.status();
        trace!(status = %status, "Received response");

        match status {
            s if s.is_success() => response.text().await.map_err(|e| {
                ProviderError::network(format!("Failed to read response: {}", e.without_url()))
            }),
            StatusCode::UNAUTHORIZED => Err(ProviderError::authentication(
                "Feed URL rejected: the calendar token may have been revoked",
            )),
            StatusCode::FORBIDDEN => Err(ProviderError::authorization("Access denied to feed")),
            StatusCode::NOT_FOUND => Err(ProviderError::not_found("Feed not found")),
            StatusCode::TOO_MANY_REQUESTS => {
                Err(ProviderError::rate_limited("Too many requests to feed server"))
            }
            s if s.is_server_error() => {
                let body = response.text().await.unwrap_or_default();
                Err(ProviderError::server(format!("Server error ({}): {}", s, body)))
            }
            s => {
                let body = response.text().await.unwrap_or_default();
                warn!(status = %s, body = %body, "Unexpected response status");
                Err(ProviderError::invalid_response(format!(
                    "Unexpected status {}: {}",
                    s, body
                )))
            }
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &HttpFeedConfig {
        &self.config
    }
}
