//! Bounded PostgreSQL connection pool

use crate::config::DatabaseConfig;
use crate::error::{Error, Result};
use deadpool_postgres::{ManagerConfig, Pool, RecyclingMethod, Runtime};
use tokio_postgres::NoTls;

/// Build the shared connection pool from configuration.
///
/// The pool is created once at startup and handed to the application
/// state; connections are established lazily on first checkout. The
/// capacity bounds concurrent connections, checkouts beyond it wait.
pub fn connect_pool(config: &DatabaseConfig) -> Result<Pool> {
    let mut pg_config = deadpool_postgres::Config::new();
    pg_config.host = Some(config.host.clone());
    pg_config.port = Some(config.port);
    pg_config.user = Some(config.user.clone());
    pg_config.password = Some(config.password.clone());
    pg_config.dbname = Some(config.dbname.clone());
    pg_config.manager = Some(ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    });
    pg_config.pool = Some(deadpool_postgres::PoolConfig::new(config.pool_size));

    pg_config
        .create_pool(Some(Runtime::Tokio1), NoTls)
        .map_err(|e| Error::Config(format!("Failed to create database pool: {}", e)))
}
