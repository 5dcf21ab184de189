mod cli;
mod config;
mod dataset;
mod errors;
mod fields;
mod history;
mod models;
mod scoring;
mod state;
mod status;
mod text;
mod training;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::{handle_command, Cli};
use crate::config::Config;
use crate::state::AppState;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(dir) = cli.data_dir.clone() {
        config = config.with_data_dir(dir);
    }
    if let Some(dir) = cli.models_dir.clone() {
        config = config.with_models_dir(dir);
    }

    // Logs go to stderr; stdout carries the JSON result.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting screener v{}", env!("CARGO_PKG_VERSION"));

    let state = AppState::load(config)?;
    info!(
        "Model: {}",
        state.model.as_ref().map_or("none (keyword heuristic)", |m| m.model_name())
    );

    handle_command(cli.command, &state)
}
