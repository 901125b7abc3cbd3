//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use weekcast_core::TracingOutputFormat;

/// Weekly calendar digest for Slack.
#[derive(Debug, Parser)]
#[command(name = "weekcast")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file.
    #[arg(long, short, env = "WEEKCAST_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(long, short = 'v', global = true)]
    pub debug: bool,

    /// Log output format: pretty, compact or json.
    #[arg(long, env = "WEEKCAST_LOG_FORMAT", global = true)]
    pub log_format: Option<TracingOutputFormat>,

    /// Options of the `run` command, accepted before or after it.
    #[command(flatten)]
    pub run: RunArgs,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch the feed, print the report and post the digest (default).
    Run,

    /// Configuration management.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Options of the `run` command.
///
/// Declared once on the root command and marked global, so
/// `weekcast --dry-run run` and `weekcast run --dry-run` agree.
#[derive(Debug, Clone, Default, Args)]
pub struct RunArgs {
    /// Print the Slack payload instead of posting it.
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Reference instant (RFC 3339) instead of the current time.
    #[arg(long, global = true, value_parser = parse_instant)]
    pub now: Option<DateTime<Utc>>,

    /// Read the calendar from a local .ics file instead of the feed URL.
    #[arg(long, global = true, value_name = "PATH")]
    pub feed_file: Option<PathBuf>,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump the current configuration as TOML.
    Dump,
    /// Validate the configuration and resolve its secrets.
    Validate,
    /// Show the configuration file path.
    Path,
}

fn parse_instant(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("expected an RFC 3339 timestamp: {}", e))
}
