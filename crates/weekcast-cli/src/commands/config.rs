//! Configuration commands.

use std::path::Path;

use crate::config::WeekcastConfig;
use crate::error::{ClientError, ClientResult};
use crate::secret;

/// Dump the current configuration to stdout.
///
/// Inline secrets are masked; references are shown as written.
pub fn dump(config: &WeekcastConfig, path: &Path) -> ClientResult<()> {
    println!("# config.toml ({})", path.display());
    println!("{}", render(config)?);
    Ok(())
}

fn render(config: &WeekcastConfig) -> ClientResult<String> {
    let mut masked = config.clone();
    masked.feed.url = secret::describe(&config.feed.url);
    masked.slack.bot_token = secret::describe(&config.slack.bot_token);

    toml::to_string_pretty(&masked)
        .map_err(|e| ClientError::Config(format!("failed to serialize config: {}", e)))
}

/// Validate the configuration.
///
/// Checks every matcher and resolves the feed URL and Slack credentials.
pub fn validate(config: &WeekcastConfig) -> ClientResult<()> {
    let problems = config.matcher_problems();
    if !problems.is_empty() {
        return Err(ClientError::Config(problems.join("; ")));
    }
    if config.matchers.is_empty() {
        println!("No matchers configured; every event will be listed as a holiday.");
    } else {
        println!("{} matcher(s) are valid.", config.matchers.len());
    }

    let url = config.feed.resolve_url().map_err(ClientError::Config)?;
    if !(url.starts_with("https://") || url.starts_with("http://")) {
        return Err(ClientError::Config(
            "feed.url must be an http(s) URL".to_string(),
        ));
    }
    println!("Feed URL resolved.");

    config
        .slack
        .resolve_credentials()
        .map_err(ClientError::Config)?;
    println!("Slack credentials resolved.");

    println!("Configuration is valid.");
    Ok(())
}

/// Show the configuration file path.
pub fn path(path: &Path) -> ClientResult<()> {
    println!("config: {}", path.display());
    Ok(())
}
