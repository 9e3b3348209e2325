use crate::error::AppError;
use deadpool_postgres::{Config as PgConfig, Pool, PoolConfig, Runtime};
use tokio_postgres::NoTls;

pub async fn init_pool(database_url: &str, max_connections: usize) -> Result<Pool, AppError> {
    let cfg = PgConfig {
        url: Some(database_url.to_string()),
        pool: Some(PoolConfig::new(max_connections)),
        ..PgConfig::default()
    };

    let pool = cfg
        .create_pool(Some(Runtime::Tokio1), NoTls)
        .map_err(|e| AppError::StartServer(format!("create db pool: {e}")))?;

    // Fail fast on a bad URL instead of at the first request.
    let client = pool
        .get()
        .await
        .map_err(|e| AppError::StartServer(format!("connect db: {e}")))?;
    drop(client);

    tracing::info!(max_connections, "database pool ready");
    Ok(pool)
}
