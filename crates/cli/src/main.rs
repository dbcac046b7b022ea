//! Banquet CLI - admin client for the catering dashboard API

use anyhow::{Context, Result};
use banquet_core::Settings;
use banquet_core::tracing::{InstrumentationConfig, init_tracing};
use clap::Parser;
use commands::Command;
use std::path::PathBuf;
use tracing::debug;

mod app;
mod commands;
mod config;

#[derive(Parser, Debug)]
#[command(name = "banquet")]
#[command(about = "Admin client for the catering dashboard API")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,

    /// Set logging level, overriding the configuration file
    #[arg(short = 'l', long, global = true)]
    log_level: Option<String>,

    /// Directory holding the session token
    #[arg(long, global = true)]
    token_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let mut settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;
    if let Some(level) = cli.log_level {
        settings.logging.level = level;
    }
    init_tracing(&InstrumentationConfig::from_settings(
        "banquet",
        &settings.logging,
    ))?;

    if let Command::Config { action } = cli.command {
        return commands::run_config(action, &settings);
    }

    let app = app::App::new(&settings, cli.token_dir)?;
    let phase = app.session.boot().await;
    debug!(?phase, "Session booted");

    commands::run(&app, cli.command).await
}
