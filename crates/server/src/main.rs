//! Receipt validation server
//!
//! Accepts a photo of a printed receipt, runs it through OCR and reports
//! whether the purchase meets the minimum spend.

use anyhow::Context;
use std::net::SocketAddr;
use tokio::signal;

use cupom_server::{build_state, default_recognizer, router, telemetry, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init(env!("CARGO_PKG_NAME"));

    let config = Config::from_env().context("reading configuration from environment")?;

    tracing::info!("Starting cupom-server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("OCR languages: {}, timeout: {:?}", config.ocr.lang, config.ocr.timeout);
    if let Some(path) = &config.extraction_path {
        tracing::info!("Extraction config: {}", path.display());
    }

    let state = build_state(&config, default_recognizer(&config))?;
    tracing::info!("Minimum spend: {}", state.minimum());

    let app = router(state, config.server.max_upload_bytes);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", config.server.host, config.server.port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
