//! CLI, configuration, secrets and the weekly run
//!
//! This crate provides the `weekcast` command-line interface.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod report;
pub mod secret;

pub use cli::Cli;
pub use config::WeekcastConfig;
pub use error::{ClientError, ClientResult};
pub use report::WeeklyReport;
