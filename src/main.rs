use std::time::Duration;

use anyhow::Context;
use blockscan::config::AppConfig;
use blockscan::parsers::catalog;
use blockscan::{db, server, AppState};
use mimalloc::MiMalloc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "blockscan=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let config = AppConfig::from_env()
        .inspect_err(|e| {
            tracing::error!(error = %e, "Missing required configuration (DATABASE_URL, DATABASE_ANON_KEY)")
        })
        .context("Failed to load configuration")?;

    let pool = db::create_pool(
        &config.database_url,
        &config.database_anon_key,
        config.database_max_connections,
    )
    .await
    .context("Failed to connect to database")?;
    db::migrate(&pool).await.context("Failed to run migrations")?;

    for (kept, shadowed) in catalog::shadowed_ids() {
        tracing::debug!(kept, shadowed, "Catalog id shadowed by an earlier entry");
    }

    let state = AppState::new(pool, config);
    state
        .uploads
        .ensure_dir()
        .await
        .with_context(|| format!("Failed to create {}", state.uploads.dir().display()))?;

    let addr = (state.config.host.as_str(), state.config.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        upload_dir = %state.uploads.dir().display(),
        cors_origins = ?state.config.cors_allowed_origins,
        "Starting Blockscan API server"
    );

    let grace = Duration::from_secs(state.config.shutdown_grace_secs);
    server::serve_until(listener, state, shutdown_signal(), grace).await?;
    tracing::info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
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
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Ctrl-C received, shutting down"),
        () = terminate => tracing::info!("SIGTERM received, shutting down"),
    }
}
