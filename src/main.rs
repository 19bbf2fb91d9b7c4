mod adapters;
mod application;
mod domain;
mod services;

use std::future::IntoFuture;

use adapters::{router::create_router, state::AppState};
use domain::config::server::ServerConfig;
use tracing_subscriber::EnvFilter;

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
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
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("file_host=info,tower_http=info")),
        )
        .init();

    let config = ServerConfig::from_env().expect("ERROR: Invalid server configuration");

    let storage_service = services::create_storage_service(&config)
        .await
        .expect("ERROR: Failed to prepare upload directory");

    let router = create_router(AppState::new(storage_service, &config), &config);

    let listener = tokio::net::TcpListener::bind(config.bind_address())
        .await
        .expect("Failed to bind to port");

    tracing::info!("Server running at http://localhost:{}", config.port);
    tracing::info!("Listening on {}", config.bind_address());
    tracing::info!("Upload directory: {}", config.upload_dir.display());
    tracing::info!("Static directory: {}", config.static_dir.display());
    tracing::info!(
        "Upload limits: {} per file, {} files per multi upload",
        config.max_file_size_label(),
        config.max_files
    );

    // In-flight requests are not drained on shutdown.
    tokio::select! {
        result = axum::serve(listener, router).into_future() => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            tracing::info!("Shutdown signal received, exiting");
        }
    }
}
