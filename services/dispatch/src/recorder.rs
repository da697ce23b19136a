//! Trip recording: request validation and the transactional commit.
//!
//! Validation splits in two. Input-shape checks run before any lock is
//! taken; stateful preconditions run under the vehicle lock against fresh
//! rows. The commit is one transaction: zone counters, last-vehicle marker
//! and the trip log entry all land or none do.

use serde::Deserialize;
use sqlx::{PgPool, Row};

use shared::types::{Vehicle, Zone};
use shared::{AppError, AppResult};

use crate::cache::StatusSnapshot;

#[derive(Debug, Clone, Deserialize)]
pub struct TripRequest {
    pub zone_id: String,
    pub vehicle_id: String,
    pub people_evacuated: i32,
}

/// Checks that need no state. First failure wins.
pub fn validate_request_shape(request: &TripRequest) -> AppResult<()> {
    if request.zone_id.trim().is_empty() {
        return Err(AppError::Validation("zone_id is required".to_string()));
    }
    if request.vehicle_id.trim().is_empty() {
        return Err(AppError::Validation("vehicle_id is required".to_string()));
    }
    if request.people_evacuated <= 0 {
        return Err(AppError::Validation(
            "people_evacuated must be greater than 0".to_string(),
        ));
    }
    Ok(())
}

/// Stateful preconditions, evaluated under the vehicle lock.
pub fn validate_against_state(zone: &Zone, vehicle: &Vehicle, people: i32) -> AppResult<()> {
    if people > vehicle.capacity {
        return Err(AppError::Validation(format!(
            "vehicle '{}' can only carry {} people",
            vehicle.vehicle_id, vehicle.capacity
        )));
    }
    if people > zone.remaining() {
        return Err(AppError::Validation(format!(
            "zone '{}' only has {} people remaining",
            zone.zone_id,
            zone.remaining()
        )));
    }
    Ok(())
}

/// The zone counters exactly as the committed update left them. Trips for
/// other vehicles may land on the same zone between the pre-lock read and
/// the commit, so only these values are safe to publish to the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommittedTrip {
    pub evacuated: i32,
    pub number_of_people: i32,
    pub last_vehicle_used: Option<String>,
}

impl CommittedTrip {
    pub fn snapshot(&self, zone_id: &str) -> StatusSnapshot {
        StatusSnapshot {
            zone_id: zone_id.to_string(),
            total_evacuated: self.evacuated,
            remaining: self.number_of_people - self.evacuated,
            last_vehicle_used: self.last_vehicle_used.clone(),
        }
    }
}

/// Atomically increment the zone's evacuated count, stamp the last vehicle
/// and append the trip log entry.
///
/// The update is guarded so `evacuated` can never exceed the zone's total,
/// even when trips for different vehicles race on the same zone; a guard
/// miss rolls back and reports the stale remainder. Returns the counters
/// the update committed, not the ones read before the lock.
pub async fn commit_trip(
    pool: &PgPool,
    zone: &Zone,
    vehicle: &Vehicle,
    people: i32,
) -> AppResult<CommittedTrip> {
    let mut tx = pool.begin().await?;

    let updated = sqlx::query(
        "UPDATE evacuation_zones \
         SET evacuated = evacuated + $1, last_vehicle_used = $2 \
         WHERE zone_id = $3 AND evacuated + $1 <= number_of_people \
         RETURNING evacuated, number_of_people, last_vehicle_used",
    )
    .bind(people)
    .bind(&vehicle.vehicle_id)
    .bind(&zone.zone_id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(row) = updated else {
        tx.rollback().await?;
        return Err(AppError::Validation(format!(
            "zone '{}' no longer has {} people remaining",
            zone.zone_id, people
        )));
    };
    let committed = CommittedTrip {
        evacuated: row.try_get("evacuated")?,
        number_of_people: row.try_get("number_of_people")?,
        last_vehicle_used: row.try_get("last_vehicle_used")?,
    };

    sqlx::query("INSERT INTO trip_logs (zone_id, vehicle_id, people_count) VALUES ($1, $2, $3)")
        .bind(&zone.zone_id)
        .bind(&vehicle.vehicle_id)
        .bind(people)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(committed)
}
