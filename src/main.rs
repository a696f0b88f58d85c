//! HomeHunt Server: collaborative apartment hunting with real-time
//! notifications.
//!
//! Main entry point that wires all crates together and starts the server.

use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

use homehunt_core::config::AppConfig;
use homehunt_core::error::AppError;
use homehunt_database::{DatabasePool, Stores};

#[tokio::main]
async fn main() {
    let env = std::env::var("HOMEHUNT_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting HomeHunt v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    let (stores, db_pool) = if config.database.is_configured() {
        tracing::info!("Connecting to database...");
        let pool = DatabasePool::connect_and_migrate(&config.database).await?;
        tracing::info!("Database ready");
        (Stores::postgres(pool.pool().clone()), Some(pool))
    } else {
        tracing::warn!("No database url configured, using in-memory stores");
        (Stores::in_memory(), None)
    };

    // ── Step 2: Services, push delivery, realtime engine ─────────
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = homehunt_api::app::build_state(config, stores, db_pool.clone())?;
    let realtime = state.realtime.clone();

    // ── Step 3: Build and start HTTP server ──────────────────────
    let app = homehunt_api::build_app(state);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("HomeHunt server listening on {}", addr);

    // ── Step 4: Graceful shutdown ────────────────────────────────
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, starting graceful shutdown...");
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    // ── Step 5: Drain notification fan-outs ──────────────────────
    if tokio::time::timeout(grace, realtime.shutdown()).await.is_err() {
        tracing::warn!(
            in_flight = realtime.orchestrator.in_flight(),
            "Shutdown grace period elapsed with fan-outs still running"
        );
        realtime.registry.close_all();
    }

    if let Some(pool) = db_pool {
        pool.close().await;
    }

    tracing::info!("HomeHunt server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
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
