use std::sync::Arc;

use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing_subscriber::EnvFilter;

use crate::{
    api::error,
    constants::Env,
    modules::media::{model::UploadConfig, service::MediaService, storage_http::StorageHttp},
};

pub async fn connect_database(env: &Env) -> Result<PgPool, error::SystemError> {
    let pool = PgPoolOptions::new()
        .max_connections(env.database_max_connections)
        .min_connections(1)
        .acquire_slow_threshold(std::time::Duration::from_secs(3))
        .connect(&env.database_url)
        .await?;
    Ok(pool)
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), error::SystemError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Database migrations applied");
    Ok(())
}

/// Installs the global fmt subscriber. `RUST_LOG` overrides the `info` default.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A subscriber may already be installed by the embedding application.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Media client backed by the HTTP object store named in `env`.
pub fn media_service(env: &Env) -> MediaService {
    let storage = StorageHttp::new(&env.storage_url, &env.storage_key, &env.storage_bucket);
    let config = UploadConfig { max_file_size: env.max_upload_bytes, ..UploadConfig::default() };
    MediaService::new(Arc::new(storage), config)
}
