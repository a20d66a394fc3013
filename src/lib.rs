pub mod config;
pub mod db;
pub mod errors;
pub mod middleware;
pub mod models;
pub mod parsers;
pub mod routes;
pub mod server;
pub mod services;

use sqlx::PgPool;

use services::slither::SlitherRunner;
use services::uploads::UploadStore;

/// Shared application state passed to all Axum handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: config::AppConfig,
    pub uploads: UploadStore,
    pub slither: SlitherRunner,
}

impl AppState {
    /// Derive the upload store and analyzer runner from the loaded configuration.
    pub fn new(db: PgPool, config: config::AppConfig) -> Self {
        Self {
            uploads: UploadStore::from_config(&config),
            slither: SlitherRunner::from_config(&config),
            db,
            config,
        }
    }
}
