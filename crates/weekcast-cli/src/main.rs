//! weekcast CLI entry point.

use std::process::ExitCode;

use clap::Parser;

use weekcast_cli::cli::{Cli, Command, ConfigAction};
use weekcast_cli::commands;
use weekcast_cli::config::WeekcastConfig;
use weekcast_cli::error::{ClientError, ClientResult};
use weekcast_core::{TracingConfig, TracingOutputFormat, init_tracing};

#[tokio::main]
async fn main() -> ExitCode {
    // .env is optional; real environment variables win
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let tracing_config = match (cli.debug, cli.log_format) {
        (true, Some(format)) => TracingConfig::cli_debug().with_format(format),
        (true, None) => TracingConfig::cli_debug(),
        (false, Some(TracingOutputFormat::Json)) => TracingConfig::scheduled(),
        (false, Some(format)) => TracingConfig::default().with_format(format),
        (false, None) => TracingConfig::default(),
    };
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("warning: {}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ClientResult<()> {
    let config_path = cli.config.clone().unwrap_or_else(WeekcastConfig::default_path);
    if let Some(Command::Config {
        action: ConfigAction::Path,
    }) = cli.command
    {
        return commands::config::path(&config_path);
    }

    let config = match cli.config {
        Some(ref path) => WeekcastConfig::load_from(path),
        None => WeekcastConfig::load(),
    }
    .map_err(ClientError::Config)?;

    match cli.command {
        Some(Command::Config { action }) => match action {
            ConfigAction::Dump => commands::config::dump(&config, &config_path),
            ConfigAction::Validate => commands::config::validate(&config),
            ConfigAction::Path => commands::config::path(&config_path),
        },
        Some(Command::Run) | None => commands::run::run(&config, &cli.run).await,
    }
}
