//! Server entry point: configuration, pool, schema bootstrap, serve, graceful shutdown.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use users_api::config::DEFAULT_LOG_FILTER;
use users_api::{app, ensure_database_exists, ensure_users_table, AppConfig, AppState, PgUserStore, UserStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = AppConfig::from_env()?;
    config.validate()?;

    if config.create_database {
        ensure_database_exists(&config.database_url).await?;
    }
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(&config.database_url)
        .await?;
    if config.bootstrap_schema {
        ensure_users_table(&pool).await?;
    }

    let store = Arc::new(PgUserStore::new(pool));
    let state = AppState::new(store.clone());
    let router = app(state, config.body_limit_bytes);

    let listener = TcpListener::bind(config.bind_addr()).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close().await;
    tracing::info!("shutdown complete");
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received, draining connections");
}
