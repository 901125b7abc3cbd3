//! Configuration file loading.
//!
//! The file lives at `~/.config/weekcast/config.toml` unless overridden with
//! `--config` or `WEEKCAST_CONFIG`. Every section is optional; missing values
//! fall back to defaults. Secret-bearing values (`feed.url`,
//! `slack.bot_token`, `slack.channel`) accept the references understood by
//! [`crate::secret::resolve`].

use std::path::{Path, PathBuf};

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use weekcast_core::{Bucket, Classifier, Locale, MatcherRule, ReportZone, SectionLabels};

use crate::secret;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WeekcastConfig {
    /// Calendar feed settings.
    pub feed: FeedSettings,
    /// Slack delivery settings.
    pub slack: SlackSettings,
    /// Report settings.
    pub report: ReportSettings,
    /// Slack section titles.
    pub labels: SectionLabels,
    /// Ordered matcher rules; the first match wins.
    pub matchers: Vec<MatcherSettings>,
}

/// Calendar feed settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedSettings {
    /// ICS feed URL, or a secret reference to it.
    pub url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            url: "env::FACTORIAL_CALENDAR_URL".to_string(),
            timeout_secs: 30,
        }
    }
}

impl FeedSettings {
    /// Resolves the feed URL.
    pub fn resolve_url(&self) -> Result<String, String> {
        secret::resolve(&self.url).map_err(|e| format!("feed.url: {}", e))
    }
}

/// Slack delivery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SlackSettings {
    /// Bot token (`xoxb-…`), or a secret reference to it.
    pub bot_token: String,
    /// Channel ID, or a secret reference to it.
    pub channel: String,
    /// Web API base URL.
    pub api_url: String,
}

impl Default for SlackSettings {
    fn default() -> Self {
        Self {
            bot_token: "env::SLACK_BOT_TOKEN".to_string(),
            channel: "env::SLACK_CHANNEL_ID".to_string(),
            api_url: weekcast_slack::DEFAULT_API_URL.to_string(),
        }
    }
}

impl SlackSettings {
    /// Resolves the bot token and channel.
    pub fn resolve_credentials(&self) -> Result<(String, String), String> {
        let token = secret::resolve(&self.bot_token).map_err(|e| format!("slack.bot_token: {}", e))?;
        let channel = secret::resolve(&self.channel).map_err(|e| format!("slack.channel: {}", e))?;
        Ok((token, channel))
    }
}

/// Report settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// Company name used in the digest greeting.
    pub company: String,
    /// Zone that decides "today" and event dates: `"local"` or an IANA name.
    pub timezone: ReportZone,
    /// First day of the week (`"Sun"`, `"Mon"`, …).
    pub week_start: Weekday,
    /// Language for greeting and unit words.
    pub locale: Locale,
    /// Buckets posted for the following week.
    pub next_week: Vec<Bucket>,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            company: "Orbitant".to_string(),
            timezone: ReportZone::Local,
            week_start: Weekday::Sun,
            locale: Locale::Es,
            next_week: vec![Bucket::Holiday],
        }
    }
}

/// One `[[matchers]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatcherSettings {
    /// Rule key, e.g. `birthdayAnnouncement`.
    pub key: String,
    /// Template with `%s` / `%d` placeholders.
    pub pattern: String,
}

impl WeekcastConfig {
    /// Load configuration from the default path.
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self, String> {
        let path = Self::default_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
        toml::from_str(&content).map_err(|e| format!("failed to parse {}: {}", path.display(), e))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("weekcast")
            .join("config.toml")
    }

    /// Builds the classifier from `[[matchers]]`, in file order.
    ///
    /// Entries with unknown keys are skipped with a warning.
    pub fn classifier(&self) -> Classifier {
        Classifier::from_config(self.matchers.iter().map(|m| (m.key.as_str(), m.pattern.as_str())))
    }

    /// Lists matcher entries that would never classify anything.
    pub fn matcher_problems(&self) -> Vec<String> {
        self.matchers
            .iter()
            .enumerate()
            .filter_map(|(i, m)| match MatcherRule::from_config(&m.key, &m.pattern) {
                None => Some(format!("matchers[{}]: unknown key `{}`", i, m.key)),
                Some(rule) if !rule.is_active() => Some(format!(
                    "matchers[{}]: pattern `{}` does not fit `{}`",
                    i, m.pattern, m.key
                )),
                Some(_) => None,
            })
            .collect()
    }
}
