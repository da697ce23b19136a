//! Orchestration of the dispatch operations against the system of record,
//! the cache and the lock service.

use std::sync::Arc;

use sqlx::PgPool;
use tracing::{info, warn};

use shared::{AppError, AppResult};

use crate::cache::{KeyValue, StatusCache, StatusSnapshot};
use crate::keys;
use crate::lock::LockManager;
use crate::planner::{self, PlanRecord};
use crate::recorder::{self, TripRequest};
use crate::repository::DispatchRepository;
use crate::reset;

pub struct DispatchService {
    repo: DispatchRepository,
    kv: Arc<dyn KeyValue>,
    locks: LockManager,
    status_cache: StatusCache,
}

impl DispatchService {
    pub fn new(pool: PgPool, kv: Arc<dyn KeyValue>) -> Self {
        Self {
            repo: DispatchRepository::new(pool),
            locks: LockManager::new(kv.clone()),
            status_cache: StatusCache::new(kv.clone()),
            kv,
        }
    }

    /// Compute a fresh plan from the current snapshot, persist consumed
    /// vehicles as unavailable and overwrite the cached current-plan record.
    pub async fn generate_plan(&self) -> AppResult<PlanRecord> {
        info!("generating new evacuation plan");

        let zones = self.repo.zones_needing_rescue().await?;
        if zones.is_empty() {
            return Ok(PlanRecord::new(Vec::new()));
        }

        let vehicles = self.repo.available_vehicles().await?;
        let plan = planner::build_plan(&zones, &vehicles, planner::MAX_REASONABLE_DISTANCE_KM)?;

        for shortfall in &plan.shortfalls {
            warn!(
                zone_id = %shortfall.zone_id,
                people = shortfall.people_unassigned,
                "people could not be assigned, insufficient vehicles or capacity"
            );
        }

        self.repo
            .mark_vehicles_unavailable(&plan.consumed_vehicles)
            .await?;
        info!(
            count = plan.consumed_vehicles.len(),
            "marked vehicles unavailable after plan generation"
        );

        let record = PlanRecord::new(plan.assignments);
        self.kv
            .set(keys::CURRENT_PLAN, &serde_json::to_string(&record)?)
            .await?;
        info!(plan_id = %record.plan_id, "saved new plan to cache");

        Ok(record)
    }

    /// The most recently generated plan, if any.
    pub async fn current_plan(&self) -> AppResult<PlanRecord> {
        let raw = self
            .kv
            .get(keys::CURRENT_PLAN)
            .await?
            .ok_or_else(|| AppError::NotFound("no evacuation plan has been generated".to_string()))?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Per-zone status, served from the cache with read-repair on miss.
    pub async fn status(&self) -> AppResult<Vec<StatusSnapshot>> {
        let zones = self.repo.all_zones().await?;
        let mut snapshots = Vec::with_capacity(zones.len());
        for zone in &zones {
            snapshots.push(self.status_cache.read_or_repair(zone).await?);
        }
        Ok(snapshots)
    }

    /// Record one rescue trip under the per-vehicle lock.
    pub async fn record_trip(&self, request: TripRequest) -> AppResult<StatusSnapshot> {
        recorder::validate_request_shape(&request)?;

        let ticket = self.locks.acquire(&request.vehicle_id).await?;
        let outcome = self.record_trip_locked(&request).await;

        // The release must run whatever the commit did; a failed delete is
        // logged and the ticket expires via TTL instead.
        if let Err(err) = self.locks.release(ticket).await {
            warn!(
                vehicle_id = %request.vehicle_id,
                error = %err,
                "failed to release vehicle lock, ticket will expire via TTL"
            );
        }

        outcome
    }

    async fn record_trip_locked(&self, request: &TripRequest) -> AppResult<StatusSnapshot> {
        let zone = self
            .repo
            .zone_by_id(&request.zone_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("zone '{}' not found", request.zone_id)))?;
        let vehicle = self
            .repo
            .vehicle_by_id(&request.vehicle_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("vehicle '{}' not found", request.vehicle_id))
            })?;

        recorder::validate_against_state(&zone, &vehicle, request.people_evacuated)?;
        let committed =
            recorder::commit_trip(self.repo.pool(), &zone, &vehicle, request.people_evacuated)
                .await?;

        // Committed; write the status through to the cache from the row the
        // commit returned, so a concurrent trip on the same zone is kept.
        let snapshot = committed.snapshot(&zone.zone_id);
        self.status_cache.write(&snapshot).await?;

        info!(
            vehicle_id = %vehicle.vehicle_id,
            zone_id = %zone.zone_id,
            people = request.people_evacuated,
            total_evacuated = snapshot.total_evacuated,
            of = committed.number_of_people,
            "recorded rescue trip"
        );

        Ok(snapshot)
    }

    /// Empty the system of record and purge the dispatch namespaces.
    pub async fn reset_all(&self, confirmation: &str) -> AppResult<()> {
        reset::validate_confirmation(confirmation)?;

        warn!("clearing all evacuation data, this action cannot be undone");
        reset::clear_system_of_record(self.repo.pool()).await?;
        // Only reached when the transactional delete committed.
        reset::purge_namespaces(self.kv.as_ref()).await?;
        info!("all data cleared from the system of record and the cache");

        Ok(())
    }
}
