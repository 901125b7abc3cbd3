//! Error types for Slack delivery.

use thiserror::Error;

/// Errors raised while talking to the Slack Web API.
#[derive(Error, Debug)]
pub enum SlackError {
    /// Slack answered with `ok: false` or a non-success status.
    #[error("Slack API error: {0}")]
    ApiError(String),

    /// The request could not be sent or the body could not be read.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The response was not the JSON we expected.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// No bot token was configured.
    #[error("Slack token not configured")]
    TokenNotConfigured,

    /// No destination channel was configured.
    #[error("Slack channel not configured")]
    ChannelNotConfigured,

    /// Slack returned 429.
    #[error("Rate limited by Slack")]
    RateLimited {
        /// Seconds from the `Retry-After` header, if present.
        retry_after: Option<u64>,
    },
}

impl SlackError {
    /// Returns the Slack error code for API errors (`channel_not_found`, ...).
    pub fn api_code(&self) -> Option<&str> {
        match self {
            Self::ApiError(message) => message.split(':').next().map(str::trim),
            _ => None,
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, SlackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_code_is_the_prefix() {
        let err = SlackError::ApiError("invalid_blocks: must be less than 3001 characters".into());
        assert_eq!(err.api_code(), Some("invalid_blocks"));
        assert_eq!(SlackError::ApiError("not_in_channel".into()).api_code(), Some("not_in_channel"));
        assert_eq!(SlackError::TokenNotConfigured.api_code(), None);
    }
}
