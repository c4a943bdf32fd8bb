//! Todo-Cast frame server binary.

use std::net::SocketAddr;
use std::time::Duration;

use frame_server::{
    config::{Config, DatabaseBackend},
    create_app, create_state, init_tracing, Services,
};
use todo_store::{PostgresTodoStore, SqliteTodoStore, TodoStore};
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};

/// How often expired sign-in nonces are swept.
const NONCE_CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env if present
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    init_tracing(&config.log_level);

    info!(
        public_url = %config.public_url,
        points_enabled = config.points_url.is_some(),
        notifications_enabled = config.notify_url.is_some(),
        "Starting Todo-Cast frame server"
    );

    match config.database_backend()? {
        DatabaseBackend::Sqlite => {
            let store = SqliteTodoStore::connect(&config.database_url).await?;
            info!("Using SQLite store");
            serve(config, store).await
        }
        DatabaseBackend::Postgres => {
            let store = PostgresTodoStore::connect(&config.database_url).await?;
            info!("Using PostgreSQL store");
            serve(config, store).await
        }
    }
}

async fn serve<S: TodoStore + 'static>(config: Config, store: S) -> anyhow::Result<()> {
    let services = Services::from_config(&config)?;
    let state = create_state(config.clone(), store, services)?;

    // Start nonce cleanup task
    let nonces = state.nonces.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(NONCE_CLEANUP_INTERVAL);
        loop {
            interval.tick().await;
            match nonces.cleanup_expired().await {
                Ok(0) => {}
                Ok(count) => info!(count, "Cleaned up expired nonces"),
                Err(e) => warn!(error = %e, "Nonce cleanup failed"),
            }
        }
    });

    let app = create_app(state);

    let addr: SocketAddr = config.server_addr().parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install terminate handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        }
    }
}
