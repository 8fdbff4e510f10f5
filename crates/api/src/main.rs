use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gigbridge_api::config::{ServerConfig, StorageBackend};
use gigbridge_api::peer::{ContractPeer, HttpContractPeer, StoreContractPeer};
use gigbridge_api::router::build_app_router;
use gigbridge_api::state::AppState;
use gigbridge_db::{AgreementStore, MemoryAgreementStore, PgAgreementStore};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gigbridge_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        storage = ?config.storage,
        "Loaded server configuration"
    );

    // --- Storage ---
    let store: Arc<dyn AgreementStore> = match config.storage {
        StorageBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .expect("DATABASE_URL must be set for the postgres backend");

            let pool = gigbridge_db::create_pool(database_url, config.db_max_connections)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            gigbridge_db::health_check(&pool)
                .await
                .expect("Database health check failed");
            tracing::info!("Database health check passed");

            gigbridge_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");

            Arc::new(PgAgreementStore::new(pool))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; all data is lost on shutdown");
            Arc::new(MemoryAgreementStore::new())
        }
    };

    // --- Contract service ---
    let peer: Arc<dyn ContractPeer> = match &config.contract_service {
        Some(remote) => {
            let peer = HttpContractPeer::new(
                &remote.url,
                Duration::from_secs(remote.timeout_secs),
                remote.retries,
            )
            .expect("Failed to build contract service client");
            tracing::info!(url = %remote.url, "Using remote contract service");
            Arc::new(peer)
        }
        None => Arc::new(StoreContractPeer::new(Arc::clone(&store))),
    };

    // --- Router ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    let app = build_app_router(AppState::new(config, store, peer));

    // --- Start server ---
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT or (on Unix) SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
