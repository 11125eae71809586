//! # School Analytics API Server
//!
//! Binary entry point for the analytics HTTP service.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use school_analytics::{AnalyticsEngine, EngineConfig};
use school_api::{build_router, load_dataset, ApiContext, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    tracing::info!(
        version = school_api::VERSION,
        "Starting School Performance Analytics API"
    );

    // Load record snapshot
    let dataset = load_dataset(&config.dataset_path).await?;

    let engine = AnalyticsEngine::new(EngineConfig {
        recent_limit: config.recent_assessment_limit,
    });
    let ctx = ApiContext::in_memory(dataset, engine);

    tracing::info!(
        recent_limit = config.recent_assessment_limit,
        cors_origins = ?config.cors_origins,
        "Analytics engine ready"
    );

    // Build router
    let app = build_router(ctx, &config.cors_origins);

    // Start server
    let addr = config.server_addr;
    tracing::info!(%addr, "Starting HTTP server");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, shutting down");
        }
    }
}
