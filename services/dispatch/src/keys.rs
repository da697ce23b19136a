//! Cache key namespaces. The bulk reset purges exactly these three
//! prefixes, so every key the dispatch engine writes must live under one
//! of them.

pub const PLAN_PREFIX: &str = "plan:";
pub const STATUS_PREFIX: &str = "status:zone:";
pub const LOCK_PREFIX: &str = "lock:vehicle:";

/// The single well-known entry holding the latest plan record.
pub const CURRENT_PLAN: &str = "plan:current";

pub fn zone_status(zone_id: &str) -> String {
    format!("{STATUS_PREFIX}{zone_id}")
}

pub fn vehicle_lock(vehicle_id: &str) -> String {
    format!("{LOCK_PREFIX}{vehicle_id}")
}
