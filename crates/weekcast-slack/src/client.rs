//! Slack Web API client
//!
//! Only the two calls a digest needs: `auth.test` to verify the token before
//! posting, and `chat.postMessage`.

use reqwest::header::RETRY_AFTER;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, error, info};
use weekcast_core::MessageDocument;

use crate::blocks::to_block_kit;
use crate::error::{Result, SlackError};
use crate::types::{AuthTestResponse, PostMessage, PostMessageResponse, SlackResponse};

/// Default Slack Web API base URL.
pub const DEFAULT_API_URL: &str = "https://slack.com/api";

/// Slack Web API client
#[derive(Clone)]
pub struct SlackClient {
    client: Client,
    bot_token: String,
    base_url: String,
}

impl SlackClient {
    /// Default request timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Create a client for the public Slack API
    pub fn new(bot_token: &str) -> Result<Self> {
        Self::with_base_url(bot_token, DEFAULT_API_URL)
    }

    /// Create a client against a custom API base URL
    pub fn with_base_url(bot_token: &str, base_url: &str) -> Result<Self> {
        if bot_token.trim().is_empty() {
            return Err(SlackError::TokenNotConfigured);
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS))
            .user_agent(format!("weekcast/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            bot_token: bot_token.trim().to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, method: &str) -> String {
        format!("{}/{}", self.base_url, method)
    }

    /// Verify the bot token
    pub async fn auth_test(&self) -> Result<AuthTestResponse> {
        debug!("Testing Slack authentication");

        let response = self
            .client
            .post(self.url("auth.test"))
            .bearer_auth(&self.bot_token)
            .send()
            .await?;

        let auth: AuthTestResponse = parse(response).await?;
        info!(team = %auth.team, user = %auth.user, "Slack auth test successful");
        Ok(auth)
    }

    /// Post a message to a channel
    pub async fn post_message(&self, message: &PostMessage) -> Result<PostMessageResponse> {
        if message.channel.trim().is_empty() {
            return Err(SlackError::ChannelNotConfigured);
        }
        debug!(channel = %message.channel, "Posting message");

        let response = self
            .client
            .post(self.url("chat.postMessage"))
            .bearer_auth(&self.bot_token)
            .json(message)
            .send()
            .await?;

        parse(response).await
    }

    /// Post a digest document as Block Kit
    pub async fn post_document(
        &self,
        channel: &str,
        doc: &MessageDocument,
    ) -> Result<PostMessageResponse> {
        let message = build_message(channel, doc);
        let posted = self.post_message(&message).await?;
        info!(channel = %posted.channel, ts = %posted.ts, "Digest posted");
        Ok(posted)
    }
}

/// Builds the `chat.postMessage` payload for a document.
pub fn build_message(channel: &str, doc: &MessageDocument) -> PostMessage {
    PostMessage {
        channel: channel.to_string(),
        text: doc.text.clone(),
        blocks: Some(to_block_kit(doc)),
        unfurl_links: Some(false),
    }
}

async fn parse<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());
        return Err(SlackError::RateLimited { retry_after });
    }
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        error!(status = %status, body = %error_text, "Slack request failed");
        return Err(SlackError::ApiError(format!("{}: {}", status, error_text)));
    }

    let result: SlackResponse<T> = response
        .json()
        .await
        .map_err(|e| SlackError::ParseError(e.to_string()))?;

    if !result.ok {
        let code = result.error.unwrap_or_else(|| "unknown_error".to_string());
        let details = result
            .response_metadata
            .map(|m| m.messages)
            .unwrap_or_default();
        return Err(if details.is_empty() {
            SlackError::ApiError(code)
        } else {
            SlackError::ApiError(format!("{}: {}", code, details.join("; ")))
        });
    }

    result
        .data
        .ok_or_else(|| SlackError::ParseError("response has no payload".to_string()))
}
