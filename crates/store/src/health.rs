//! Store health checks and schema setup.

use tide_core::Result;
use tracing::{debug, error};

use crate::client::{storage_error, TideStore};

/// Check store connectivity.
pub async fn check_connection(store: &TideStore) -> bool {
    match sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(store.inner())
        .await
    {
        Ok(_) => {
            debug!("Tide store connection healthy");
            true
        }
        Err(e) => {
            error!(error = %e, "Tide store health check failed");
            false
        }
    }
}

/// Create tables and indexes. Safe to run repeatedly.
pub async fn init_schema(store: &TideStore) -> Result<()> {
    use crate::schema::all_tables;

    for ddl in all_tables() {
        sqlx::query(ddl)
            .execute(store.inner())
            .await
            .map_err(storage_error("execute DDL"))?;
    }

    debug!("Tide store schema initialized");
    Ok(())
}
