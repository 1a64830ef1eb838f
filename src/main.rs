//! Heartscore: cardiovascular risk scoring server
//!
//! Main entry point for the HTTP service.

use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use heartscore::adapters::sanitize::SanitizingMakeWriter;
use heartscore::config::{LogMode, ServerConfig};
use heartscore::http::{serve, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::from_env()?;

    // Request bodies carry clinical values; every log line goes through the sanitizer.
    let (writer, _guard) = match &config.log_mode {
        LogMode::File(path) => {
            if let Some(parent) = path.parent() {
                // Best-effort: open() below reports the real failure.
                let _ = std::fs::create_dir_all(parent);
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            tracing_appender::non_blocking(file)
        }
        LogMode::Stdout => tracing_appender::non_blocking(std::io::stdout()),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(SanitizingMakeWriter::new(writer)))
        .init();

    tracing::info!(
        "Starting Heartscore (simulated latency {} ms)...",
        config.simulated_latency.as_millis()
    );

    let state = Arc::new(AppState::from_config(&config));
    serve(&config, state).await?;

    tracing::info!("Heartscore shutdown complete.");
    Ok(())
}
