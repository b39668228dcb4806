use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vicinity_api::background;
use vicinity_api::config::ServerConfig;
use vicinity_api::router::build_app_router;
use vicinity_api::state::AppState;
use vicinity_api::transcribe::{HttpTranscriber, Transcriber};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Configuration loaded");

    let pool = init_database().await;

    // --- Transcription provider ---
    let transcriber: Option<Arc<dyn Transcriber>> = match HttpTranscriber::from_env() {
        Some(provider) => {
            tracing::info!("Voice transcription provider configured");
            Some(Arc::new(provider))
        }
        None => {
            tracing::info!("No transcription provider configured, voice notes disabled");
            None
        }
    };

    // --- Background tasks ---
    // Hourly sweep of expired and revoked sessions.
    let cleanup_cancel = tokio_util::sync::CancellationToken::new();
    let cleanup_handle = tokio::spawn({
        let pool = pool.clone();
        let cancel = cleanup_cancel.clone();
        async move { background::session_cleanup::run(pool, cancel).await }
    });

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        transcriber,
    };
    let app = build_app_router(state);

    // --- Serve ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // The listener has drained; wind down the cleanup job.
    cleanup_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), cleanup_handle).await;
    tracing::info!("Graceful shutdown complete");
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vicinity_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Connect, probe, and migrate. Any failure here kills startup; a server
/// that cannot reach its database has nothing to serve.
async fn init_database() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = vicinity_db::create_pool(&url)
        .await
        .expect("Failed to connect to database");

    vicinity_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    vicinity_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database ready, migrations applied");
    pool
}

/// Resolves on SIGINT or SIGTERM so `axum::serve` drains in-flight
/// requests before the process exits. Both signals matter: Ctrl-C in a
/// terminal, SIGTERM from a process manager.
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
        () = ctrl_c => tracing::info!("SIGINT received, draining"),
        () = terminate => tracing::info!("SIGTERM received, draining"),
    }
}
