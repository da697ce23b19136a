//! Per-vehicle mutual exclusion backed by the shared key-value store.
//!
//! A ticket is a single atomic create-if-absent with a TTL. The TTL is the
//! only cancellation mechanism: a crashed holder's exclusion self-expires.
//! It is a liveness safeguard, not a substitute for correct commit logic.

use std::sync::Arc;
use std::time::Duration;

use shared::{AppError, AppResult};

use crate::cache::KeyValue;
use crate::keys;

/// Must exceed the expected duration of the critical section by a safety
/// margin.
pub const LOCK_TTL: Duration = Duration::from_secs(5);

/// A held exclusive claim on one vehicle id. Consumed by `release`.
#[derive(Debug)]
pub struct LockTicket {
    key: String,
}

pub struct LockManager {
    kv: Arc<dyn KeyValue>,
    ttl: Duration,
}

impl LockManager {
    pub fn new(kv: Arc<dyn KeyValue>) -> Self {
        Self { kv, ttl: LOCK_TTL }
    }

    #[cfg(test)]
    pub fn with_ttl(kv: Arc<dyn KeyValue>, ttl: Duration) -> Self {
        Self { kv, ttl }
    }

    /// Fail-fast acquisition: a held lock yields `Conflict` immediately,
    /// never a wait.
    pub async fn acquire(&self, vehicle_id: &str) -> AppResult<LockTicket> {
        let key = keys::vehicle_lock(vehicle_id);
        let acquired = self.kv.set_nx_ttl(&key, "1", self.ttl).await?;
        if !acquired {
            tracing::warn!(vehicle_id, "vehicle is locked by another operation");
            return Err(AppError::Conflict(format!(
                "vehicle '{vehicle_id}' is currently busy, please try again later"
            )));
        }
        Ok(LockTicket { key })
    }

    /// Unconditional, idempotent delete of the ticket's key.
    pub async fn release(&self, ticket: LockTicket) -> AppResult<()> {
        self.kv.delete(&[ticket.key]).await
    }
}
