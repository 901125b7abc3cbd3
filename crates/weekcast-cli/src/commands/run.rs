//! The `run` command: fetch, report, deliver.

use chrono::Utc;
use tracing::{debug, info};
use weekcast_core::{CalendarFeed, MessageDocument};
use weekcast_providers::{FeedSource, FileFeed};
use weekcast_slack::{SlackClient, build_message};

use crate::cli::RunArgs;
use crate::config::{FeedSettings, WeekcastConfig};
use crate::error::{ClientError, ClientResult};
use crate::report::WeeklyReport;
use crate::secret;

/// Runs one digest cycle.
///
/// The console report always goes to stdout. With `--dry-run` the Slack
/// payload is printed as JSON instead of being posted.
pub async fn run(config: &WeekcastConfig, args: &RunArgs) -> ClientResult<()> {
    let zone = config.report.timezone;
    let source = feed_source(&config.feed, args)?;
    info!(source = source.name(), location = %source.location(), "Fetching calendar");

    let feed = source.fetch_feed(zone).await?;
    log_entries(&feed);

    let now = args.now.unwrap_or_else(Utc::now);
    let today = zone.date_of(now);
    let classifier = config.classifier();
    let report = WeeklyReport::compute(&feed, today, config, &classifier);

    print!("{}", report.console(config));
    let document = report.document(config);

    if args.dry_run {
        let channel = secret::resolve(&config.slack.channel)
            .unwrap_or_else(|_| config.slack.channel.clone());
        let message = build_message(&channel, &document);
        println!();
        println!("{}", serde_json::to_string_pretty(&message)?);
        return Ok(());
    }

    deliver(config, &document).await
}

fn feed_source(settings: &FeedSettings, args: &RunArgs) -> ClientResult<Box<dyn FeedSource>> {
    match &args.feed_file {
        Some(path) => Ok(Box::new(FileFeed::new(path.clone()))),
        None => http_feed(settings),
    }
}

#[cfg(feature = "http")]
fn http_feed(settings: &FeedSettings) -> ClientResult<Box<dyn FeedSource>> {
    use std::time::Duration;
    use weekcast_providers::{HttpFeed, HttpFeedConfig};

    let url = settings.resolve_url().map_err(ClientError::Config)?;
    let feed_config = HttpFeedConfig::new(&url)
        .map_err(|e| ClientError::Config(format!("feed.url is not a valid URL: {}", e)))?
        .with_timeout(Duration::from_secs(settings.timeout_secs));

    Ok(Box::new(HttpFeed::new(feed_config)?))
}

#[cfg(not(feature = "http"))]
fn http_feed(_settings: &FeedSettings) -> ClientResult<Box<dyn FeedSource>> {
    Err(ClientError::Config(
        "built without the `http` feature; use --feed-file".to_string(),
    ))
}

fn log_entries(feed: &CalendarFeed) {
    info!(entries = feed.len(), "Fetched calendar");
    for event in feed.events() {
        debug!(
            summary = %event.summary,
            start = ?event.start,
            end = ?event.end,
            "Feed entry"
        );
    }
}

async fn deliver(config: &WeekcastConfig, document: &MessageDocument) -> ClientResult<()> {
    let (token, channel) = config
        .slack
        .resolve_credentials()
        .map_err(ClientError::Config)?;

    let client = SlackClient::with_base_url(&token, &config.slack.api_url)?;
    client.auth_test().await?;
    client.post_document(&channel, document).await?;
    Ok(())
}
