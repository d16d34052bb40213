use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use tracing::{debug, warn};

use donorconnect::{
    app::{load_config, load_config_from, AppState, Config},
    cli::{handle_command, init, Cli, Commands},
    utils::{effective_level, init_logger, DonorError},
};

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();
    let verbose = cli.verbose;

    if let Err(e) = run(cli).await {
        if verbose {
            eprintln!("{} {:#}", "Erreur:".red().bold(), e);
        } else {
            eprintln!("{} {}", "Erreur:".red().bold(), e);
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Init must work before any configuration exists
    if let Commands::Init = cli.command {
        return init(cli.config.clone());
    }

    let config = load_settings(&cli)?;
    init_logger(&effective_level(cli.verbose, &config.logging.level));

    let state = AppState::new(config)?;
    let (status, refresh) = state.session.bootstrap().await;
    debug!("Session {}", status);
    if let Some(handle) = refresh {
        // The refresh logs its own failures; only a panicked task lands here
        if let Err(e) = handle.await {
            warn!("Profile refresh task failed: {}", e);
        }
    }

    handle_command(&cli, &state).await
}

/// Configuration from file and environment, then command-line overrides
fn load_settings(cli: &Cli) -> Result<Config, DonorError> {
    let mut config = match &cli.config {
        Some(path) => load_config_from(path),
        None => load_config(),
    }
    .map_err(|e| DonorError::ConfigError(format!("{:#}", e)))?;

    if let Some(base_url) = &cli.base_url {
        config.api.base_url = base_url.clone();
    }
    let base_url = &config.api.base_url;
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(DonorError::ConfigError(format!(
            "invalid API base URL '{}'",
            base_url
        )));
    }

    Ok(config)
}
