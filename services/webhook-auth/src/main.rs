use std::sync::Arc;

use anyhow::{Context, Result};
use axum::serve;
use stream_gate_webhook_auth::{config::WebhookConfig, create_router, AdmissionEngine};
use tokio::{net::TcpListener, signal};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let config = WebhookConfig::from_env().context("failed to load configuration")?;
    init_tracing(&config);

    info!("stream-gate-webhook-auth starting");

    let engine = AdmissionEngine::new(config.token_mapping())
        .with_redacted_credentials(config.redact_credentials);
    let router = create_router(Arc::new(engine));

    let addr = config.bind_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .context("failed to bind TCP listener")?;
    let local_addr = listener
        .local_addr()
        .context("failed to read bound address")?;
    info!(%local_addr, "stream-gate-webhook-auth listening");

    serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server encountered an unrecoverable error")?;

    info!("stream-gate-webhook-auth shutdown complete");
    Ok(())
}

fn init_tracing(config: &WebhookConfig) {
    // RUST_LOG wins; config.log_level already folds in LOG_LEVEL.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
