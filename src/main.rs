//! HullRot: Almond Hull Rot Risk Predictor
//!
//! Main entry point for the terminal application.

use anyhow::{Context, Result};
use std::io::IsTerminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use hullrot::tui::App;
use hullrot::AppConfig;

fn main() -> Result<()> {
    let config = AppConfig::from_env().context("Invalid HULLROT_* configuration")?;

    // Writing logs to the terminal would corrupt the TUI (alternate screen):
    // - interactive TTY: log to a file
    // - non-interactive: log to stdout
    let interactive = std::io::stdout().is_terminal();
    let (writer, _guard) = if config.log_mode.use_file(interactive) {
        if let Some(parent) = config.log_file.parent() {
            // Best-effort: don't fail startup just because the directory is missing.
            let _ = std::fs::create_dir_all(parent);
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.log_file)
            .with_context(|| format!("Failed to open log file {:?}", config.log_file))?;
        tracing_appender::non_blocking(file)
    } else {
        tracing_appender::non_blocking(std::io::stdout())
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(writer))
        .init();

    tracing::info!(
        "Starting HullRot ({}, models in {:?})...",
        config.schema,
        config.model_dir
    );

    // Artifacts load before the terminal is touched; failure exits non-zero.
    let mut app = App::new(&config).inspect_err(|e| tracing::error!("{e:#}"))?;
    app.run()?;

    tracing::info!("HullRot shutdown complete.");
    Ok(())
}
