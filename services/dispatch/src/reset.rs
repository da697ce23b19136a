//! Bulk reset: empty the system of record transactionally, then purge the
//! dispatch cache/lock namespaces by prefix. The purge never runs when the
//! delete failed, and never touches keys outside the three namespaces.

use sqlx::PgPool;

use shared::{AppError, AppResult};

use crate::cache::KeyValue;
use crate::keys;

/// Required confirmation for the destructive reset.
pub const CONFIRMATION_TOKEN: &str = "CLEAR_ALL_DATA";

/// Rejected before any state is touched.
pub fn validate_confirmation(token: &str) -> AppResult<()> {
    if token != CONFIRMATION_TOKEN {
        return Err(AppError::Validation(format!(
            "confirmation must be '{CONFIRMATION_TOKEN}' to proceed"
        )));
    }
    Ok(())
}

/// Delete logs, vehicles and zones as one transaction. Logs go first: they
/// reference both other tables.
pub async fn clear_system_of_record(pool: &PgPool) -> AppResult<()> {
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM trip_logs").execute(&mut *tx).await?;
    sqlx::query("DELETE FROM vehicles").execute(&mut *tx).await?;
    sqlx::query("DELETE FROM evacuation_zones")
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(())
}

/// Enumerate and delete every key under the plan, status and lock prefixes.
/// Unrelated cached data survives.
pub async fn purge_namespaces(kv: &dyn KeyValue) -> AppResult<()> {
    for prefix in [keys::PLAN_PREFIX, keys::STATUS_PREFIX, keys::LOCK_PREFIX] {
        let keys = kv.keys_with_prefix(prefix).await?;
        kv.delete(&keys).await?;
        tracing::info!(prefix, count = keys.len(), "purged cache keys");
    }
    Ok(())
}
