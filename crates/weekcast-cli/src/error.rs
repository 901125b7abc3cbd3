//! Client error types.

use std::fmt;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in the client.
#[derive(Debug)]
pub enum ClientError {
    /// Configuration error.
    Config(String),
    /// Feed fetch or parse error.
    Provider(String),
    /// Slack delivery error.
    Delivery(String),
    /// Output rendering error.
    Output(String),
    /// IO error.
    Io(std::io::Error),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {}", msg),
            Self::Provider(msg) => write!(f, "feed error: {}", msg),
            Self::Delivery(msg) => write!(f, "delivery failed: {}", msg),
            Self::Output(msg) => write!(f, "output error: {}", msg),
            Self::Io(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<weekcast_providers::ProviderError> for ClientError {
    fn from(err: weekcast_providers::ProviderError) -> Self {
        Self::Provider(err.to_string())
    }
}

impl From<weekcast_slack::SlackError> for ClientError {
    fn from(err: weekcast_slack::SlackError) -> Self {
        Self::Delivery(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Output(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weekcast_providers::ProviderError;
    use weekcast_slack::SlackError;

    #[test]
    fn provider_errors_keep_their_message() {
        let err: ClientError = ProviderError::not_found("feed returned 404").into();
        let text = err.to_string();
        assert!(text.starts_with("feed error: "));
        assert!(text.contains("feed returned 404"));
    }

    #[test]
    fn slack_errors_map_to_delivery() {
        let err: ClientError = SlackError::ChannelNotConfigured.into();
        assert!(matches!(err, ClientError::Delivery(_)));
    }
}
