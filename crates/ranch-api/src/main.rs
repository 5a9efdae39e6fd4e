//! # ranch-api: Binary Entry Point
//!
//! Starts the Axum HTTP server. Configuration comes from the environment:
//! `PORT` (default 8000), `RANCH_RULES` (optional locale rules file), and
//! `RUST_LOG` for the log filter.

use anyhow::Context;
use metrics_exporter_prometheus::PrometheusBuilder;
use ranch_api::state::{AppConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();
    let port = config.port;

    let mut state = AppState::load(config.clone()).with_context(|| match &config.rules_path {
        Some(path) => format!("failed to load locale rules from {}", path.display()),
        None => "failed to load built-in locale rules".to_string(),
    })?;

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => state = state.with_metrics(handle),
        Err(e) => tracing::warn!("Prometheus recorder not installed: {e}. /metrics will return 503."),
    }

    tracing::info!(locales = state.rules.len(), "locale rules ready");

    let app = ranch_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Ranch API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
