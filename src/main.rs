//! Dailynotes - dated daily notes for a markdown vault
//!
//! Creates a note named after the current date in a chosen folder and opens
//! it, with a configurable moment-style date format and a file explorer
//! context menu entry.

mod app;
mod cli;
mod core;
mod plugin;

use anyhow::{Context, Result};
use app::DailyNotesApp;
use clap::Parser;
use cli::{Cli, Command};
use crate::core::config::AppConfig;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = match cli.verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(level)
        .init();

    tracing::info!("Starting dailynotes...");

    // Load config or use defaults
    let config_path = AppConfig::config_path();
    let config = match &config_path {
        Some(path) => AppConfig::load_from(path).unwrap_or_else(|e| {
            tracing::warn!("Using default config: {:#}", e);
            AppConfig::default()
        }),
        None => AppConfig::default(),
    };

    let vault_root = match cli.vault.clone().or_else(|| config.last_vault.clone()) {
        Some(path) => path,
        None => std::env::current_dir().context("Could not determine current directory")?,
    };

    let mut app = DailyNotesApp::new(config, config_path, vault_root, cli.active, cli.launch);
    app.date = cli.date;
    tracing::info!("Using vault: {}", app.vault_root().display());

    let result = app.run(cli.command.unwrap_or(Command::New { folder: None }));
    app.shutdown();
    result
}
