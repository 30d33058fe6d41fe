//! SQLite pool wrapper.

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tide_core::{Error, Result};
use tracing::info;

use crate::config::StoreConfig;

/// Handle to the tide store. Cheap to clone; clones share the pool.
#[derive(Debug, Clone)]
pub struct TideStore {
    pool: SqlitePool,
    config: StoreConfig,
}

impl TideStore {
    /// Connects to the configured database, creating the file if needed.
    pub async fn new(config: StoreConfig) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|e| Error::config(format!("invalid store url {:?}: {}", config.url, e)))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect_with(options)
            .await
            .map_err(storage_error("connect"))?;

        info!(
            url = %config.url,
            max_connections = config.max_connections,
            "Connected to tide store"
        );

        Ok(Self { pool, config })
    }

    /// A fresh in-memory store with its schema applied.
    ///
    /// The pool holds exactly one connection that is never recycled, since
    /// an in-memory database lives only as long as its connection.
    pub async fn in_memory() -> Result<Self> {
        let config = StoreConfig::in_memory();
        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|e| Error::config(format!("invalid store url: {}", e)))?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(storage_error("connect"))?;

        let store = Self { pool, config };
        crate::health::init_schema(&store).await?;
        Ok(store)
    }

    /// Returns the underlying pool.
    pub fn inner(&self) -> &SqlitePool {
        &self.pool
    }

    /// Returns the configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }
}

/// Maps a sqlx failure into a storage error tagged with what was attempted.
pub(crate) fn storage_error(action: &'static str) -> impl Fn(sqlx::Error) -> Error {
    move |e| Error::storage(format!("{action}: {e}"))
}
