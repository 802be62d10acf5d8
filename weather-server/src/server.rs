//! Server bootstrap: bind, serve, shut down gracefully.

use anyhow::Context;
use tokio::{net::TcpListener, signal};
use tracing::{error, info, warn};
use weather_core::Config;

use crate::{routes, state::AppState};

pub async fn serve(config: Config) -> anyhow::Result<()> {
    let service = config.weather_service()?;
    if service.is_none() {
        warn!("OPENWEATHER_API_KEY not configured; weather lookups will fail until it is set");
    }
    if config.cache.enabled {
        info!(ttl_secs = config.cache.ttl_secs, "Response cache enabled");
    }

    let app = routes::create_router(AppState::new(service));

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("Weather server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
