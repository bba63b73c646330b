mod cli;
mod commands;
mod render;
mod shell;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use eventdesk_client::{HttpApiConfig, HttpEventApi};
use eventdesk_settings::{load_settings, load_settings_from_path};
use eventdesk_store::EventStore;
use eventdesk_telemetry::{init_telemetry, TelemetryConfig};

use crate::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut settings = match &cli.settings {
        Some(path) => load_settings_from_path(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => load_settings().context("loading settings")?,
    };
    cli.apply_to(&mut settings);

    // Initialize logging
    let telemetry = TelemetryConfig {
        json: settings.logging.json,
        ..TelemetryConfig::default().with_level_name(&settings.logging.level)
    };
    if let Err(e) = init_telemetry(&telemetry) {
        eprintln!("eventdesk: {e}");
    }

    let api = HttpEventApi::new(HttpApiConfig {
        base_url: settings.api.base_url.clone(),
        connect_timeout: settings.api.connect_timeout(),
        request_timeout: settings.api.request_timeout(),
    })
    .context("building HTTP client")?;
    tracing::info!(endpoint = %settings.api.base_url, "events endpoint configured");

    let store = EventStore::with_policy(Arc::new(api), settings.ui.error_policy);
    commands::run(cli.command, &store).await
}
