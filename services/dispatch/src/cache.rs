//! Key-value access behind a trait so the lock manager and status cache can
//! run against Redis in production and an in-process backend in tests.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};

use shared::types::Zone;
use shared::AppResult;

use crate::keys;

/// The slice of the key-value store the dispatch engine relies on:
/// atomic create-if-absent with TTL, hash storage, prefix enumeration and
/// batch delete.
#[async_trait]
pub trait KeyValue: Send + Sync {
    async fn get(&self, key: &str) -> AppResult<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> AppResult<()>;
    /// Atomic create-if-absent with expiry. Returns false when an unexpired
    /// value already exists.
    async fn set_nx_ttl(&self, key: &str, value: &str, ttl: Duration) -> AppResult<bool>;
    async fn delete(&self, keys: &[String]) -> AppResult<()>;
    async fn hash_set(&self, key: &str, fields: &[(&str, String)]) -> AppResult<()>;
    /// Empty map when the key is absent.
    async fn hash_get_all(&self, key: &str) -> AppResult<HashMap<String, String>>;
    async fn keys_with_prefix(&self, prefix: &str) -> AppResult<Vec<String>>;
}

/// Production backend over a pooled Redis connection.
pub struct RedisKv {
    pool: deadpool_redis::Pool,
}

impl RedisKv {
    pub fn new(pool: deadpool_redis::Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl KeyValue for RedisKv {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let mut conn = self.pool.get().await?;
        Ok(conn.get(key).await?)
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let mut conn = self.pool.get().await?;
        let _: () = conn.set(key, value).await?;
        Ok(())
    }

    async fn set_nx_ttl(&self, key: &str, value: &str, ttl: Duration) -> AppResult<bool> {
        let mut conn = self.pool.get().await?;
        let reply: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("NX")
            .arg("PX")
            .arg(ttl.as_millis() as u64)
            .query_async(&mut conn)
            .await?;
        Ok(reply.is_some())
    }

    async fn delete(&self, keys: &[String]) -> AppResult<()> {
        if keys.is_empty() {
            return Ok(());
        }
        let mut conn = self.pool.get().await?;
        let _: () = conn.del(keys.to_vec()).await?;
        Ok(())
    }

    async fn hash_set(&self, key: &str, fields: &[(&str, String)]) -> AppResult<()> {
        let mut conn = self.pool.get().await?;
        let _: () = conn.hset_multiple(key, fields).await?;
        Ok(())
    }

    async fn hash_get_all(&self, key: &str) -> AppResult<HashMap<String, String>> {
        let mut conn = self.pool.get().await?;
        Ok(conn.hgetall(key).await?)
    }

    async fn keys_with_prefix(&self, prefix: &str) -> AppResult<Vec<String>> {
        let mut conn = self.pool.get().await?;
        let keys: Vec<String> = redis::cmd("KEYS")
            .arg(format!("{prefix}*"))
            .query_async(&mut conn)
            .await?;
        Ok(keys)
    }
}

struct StringEntry {
    value: String,
    expires_at: Option<Instant>,
}

impl StringEntry {
    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Instant::now() >= at)
    }
}

/// In-process backend for tests and local development. Honors the same
/// expiry and create-if-absent semantics as Redis.
#[derive(Default)]
pub struct MemoryKv {
    strings: DashMap<String, StringEntry>,
    hashes: DashMap<String, HashMap<String, String>>,
}

#[async_trait]
impl KeyValue for MemoryKv {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        match self.strings.get(key) {
            Some(entry) if !entry.is_expired() => Ok(Some(entry.value.clone())),
            _ => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.strings.insert(
            key.to_string(),
            StringEntry {
                value: value.to_string(),
                expires_at: None,
            },
        );
        Ok(())
    }

    async fn set_nx_ttl(&self, key: &str, value: &str, ttl: Duration) -> AppResult<bool> {
        let fresh = StringEntry {
            value: value.to_string(),
            expires_at: Some(Instant::now() + ttl),
        };
        match self.strings.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().is_expired() {
                    occupied.insert(fresh);
                    Ok(true)
                } else {
                    Ok(false)
                }
            }
            Entry::Vacant(vacant) => {
                vacant.insert(fresh);
                Ok(true)
            }
        }
    }

    async fn delete(&self, keys: &[String]) -> AppResult<()> {
        for key in keys {
            self.strings.remove(key);
            self.hashes.remove(key);
        }
        Ok(())
    }

    async fn hash_set(&self, key: &str, fields: &[(&str, String)]) -> AppResult<()> {
        let mut hash = self.hashes.entry(key.to_string()).or_default();
        for (field, value) in fields {
            hash.insert((*field).to_string(), value.clone());
        }
        Ok(())
    }

    async fn hash_get_all(&self, key: &str) -> AppResult<HashMap<String, String>> {
        Ok(self
            .hashes
            .get(key)
            .map(|hash| hash.value().clone())
            .unwrap_or_default())
    }

    async fn keys_with_prefix(&self, prefix: &str) -> AppResult<Vec<String>> {
        let mut keys: Vec<String> = self
            .strings
            .iter()
            .filter(|entry| entry.key().starts_with(prefix) && !entry.value().is_expired())
            .map(|entry| entry.key().clone())
            .collect();
        keys.extend(
            self.hashes
                .iter()
                .filter(|entry| entry.key().starts_with(prefix))
                .map(|entry| entry.key().clone()),
        );
        Ok(keys)
    }
}

pub const FIELD_TOTAL_EVACUATED: &str = "total_evacuated";
pub const FIELD_REMAINING: &str = "remaining";
pub const FIELD_LAST_VEHICLE: &str = "last_vehicle";

/// The cached per-zone rescue view. Always re-derivable from the zone row;
/// the cache is an optimization, never the source of truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub zone_id: String,
    pub total_evacuated: i32,
    pub remaining: i32,
    pub last_vehicle_used: Option<String>,
}

impl StatusSnapshot {
    pub fn from_zone(zone: &Zone) -> Self {
        Self {
            zone_id: zone.zone_id.clone(),
            total_evacuated: zone.evacuated,
            remaining: zone.remaining(),
            last_vehicle_used: zone.last_vehicle_used.clone(),
        }
    }
}

/// Read-through / write-through cache of per-zone status hashes.
pub struct StatusCache {
    kv: std::sync::Arc<dyn KeyValue>,
}

impl StatusCache {
    pub fn new(kv: std::sync::Arc<dyn KeyValue>) -> Self {
        Self { kv }
    }

    /// Read path. A hit is returned verbatim; a miss is repaired from the
    /// zone row and populated so the next read hits.
    pub async fn read_or_repair(&self, zone: &Zone) -> AppResult<StatusSnapshot> {
        let key = keys::zone_status(&zone.zone_id);
        let fields = self.kv.hash_get_all(&key).await?;
        if !fields.is_empty() {
            return Ok(Self::from_fields(&zone.zone_id, &fields));
        }

        let snapshot = StatusSnapshot::from_zone(zone);
        self.write(&snapshot).await?;
        Ok(snapshot)
    }

    /// Write-through after a committed trip. Callers must only invoke this
    /// once the transaction has committed.
    pub async fn write(&self, snapshot: &StatusSnapshot) -> AppResult<()> {
        let key = keys::zone_status(&snapshot.zone_id);
        self.kv
            .hash_set(
                &key,
                &[
                    (FIELD_TOTAL_EVACUATED, snapshot.total_evacuated.to_string()),
                    (FIELD_REMAINING, snapshot.remaining.to_string()),
                    (
                        FIELD_LAST_VEHICLE,
                        snapshot.last_vehicle_used.clone().unwrap_or_default(),
                    ),
                ],
            )
            .await
    }

    fn from_fields(zone_id: &str, fields: &HashMap<String, String>) -> StatusSnapshot {
        let int_field = |name: &str| {
            fields
                .get(name)
                .and_then(|raw| raw.parse::<i32>().ok())
                .unwrap_or(0)
        };
        StatusSnapshot {
            zone_id: zone_id.to_string(),
            total_evacuated: int_field(FIELD_TOTAL_EVACUATED),
            remaining: int_field(FIELD_REMAINING),
            last_vehicle_used: fields
                .get(FIELD_LAST_VEHICLE)
                .filter(|value| !value.is_empty())
                .cloned(),
        }
    }
}
