use crate::config::Config;
use crate::error::{Result, WaitlistError};
use deadpool_postgres::{Config as PoolConfig, Pool, Runtime};
use tokio_postgres::NoTls;
use tracing::info;

/// Build the connection pool. Connections are opened lazily, so an unreachable
/// database does not fail here; it surfaces on the first checkout instead.
pub fn create_pool(config: &Config) -> Result<Pool> {
    let mut cfg = PoolConfig::new();
    cfg.url = Some(config.database_url.clone());

    cfg.pool = Some(deadpool_postgres::PoolConfig {
        max_size: config.max_connections as usize,
        timeouts: deadpool_postgres::Timeouts {
            wait: Some(config.pool_timeout),
            create: Some(config.pool_timeout),
            recycle: Some(config.pool_timeout),
        },
        ..Default::default()
    });

    let pool = cfg
        .create_pool(Some(Runtime::Tokio1), NoTls)
        .map_err(|e| WaitlistError::StorageUnavailable {
            cause: format!("Failed to create pool: {}", e),
        })?;

    info!(
        "Created connection pool (max_size={}, timeout={:?})",
        config.max_connections, config.pool_timeout
    );

    Ok(pool)
}
