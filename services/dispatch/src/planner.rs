//! Greedy vehicle-to-zone assignment. Pure: works over snapshots of zones
//! and vehicles, leaves persistence and caching to the service layer.
//!
//! The engine is intentionally local, not a cost-minimizing solver. Zones
//! are served in urgency order and each zone greedily consumes the best
//! scoring vehicle until it is covered or candidates run out.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared::geo;
use shared::types::{Vehicle, Zone};
use shared::{AppError, AppResult};

/// Vehicles farther than this from a zone are not considered for it.
pub const MAX_REASONABLE_DISTANCE_KM: f64 = 50.0;

const CAPACITY_WEIGHT: f64 = 0.6;
const DISTANCE_WEIGHT: f64 = 0.4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub zone_id: String,
    pub vehicle_id: String,
    pub eta_minutes: f64,
    pub number_of_people: i32,
    pub distance_km: f64,
}

/// The versioned "current plan" record written to the cache, so readers can
/// tell plans apart under concurrent regeneration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRecord {
    pub plan_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub assignments: Vec<Assignment>,
}

impl PlanRecord {
    pub fn new(assignments: Vec<Assignment>) -> Self {
        Self {
            plan_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            assignments,
        }
    }
}

/// People a zone was left with after the pool ran dry or out of range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortfall {
    pub zone_id: String,
    pub people_unassigned: i32,
}

#[derive(Debug, Default)]
pub struct Plan {
    pub assignments: Vec<Assignment>,
    /// Vehicles committed by this run, to be persisted unavailable.
    pub consumed_vehicles: Vec<String>,
    pub shortfalls: Vec<Shortfall>,
}

struct Candidate {
    index: usize,
    distance_km: f64,
    eta_minutes: f64,
    score: f64,
}

/// Build a plan from the current zone/vehicle snapshot.
///
/// An empty zone list succeeds with an empty plan ("nothing needed rescue").
/// Zones present but nothing assignable fails with `CapacityUnavailable`
/// ("rescue needed but impossible").
pub fn build_plan(
    zones: &[Zone],
    vehicles: &[Vehicle],
    max_distance_km: f64,
) -> AppResult<Plan> {
    let mut pending: Vec<&Zone> = zones.iter().filter(|zone| zone.remaining() > 0).collect();
    // Stable sort: equal urgency keeps insertion order.
    pending.sort_by(|a, b| b.urgency_level.cmp(&a.urgency_level));

    if pending.is_empty() {
        tracing::info!("no zones require evacuation");
        return Ok(Plan::default());
    }

    let mut pool: Vec<&Vehicle> = vehicles.iter().filter(|v| v.is_available).collect();
    if pool.is_empty() {
        tracing::warn!("cannot generate plan: no available vehicles");
        return Err(AppError::CapacityUnavailable(
            "no available vehicles to assign".to_string(),
        ));
    }

    let mut plan = Plan::default();

    for zone in pending {
        let mut remaining = zone.remaining();

        while remaining > 0 && !pool.is_empty() {
            let Some(best) = best_candidate(zone, &pool, remaining, max_distance_km) else {
                tracing::warn!(
                    zone_id = %zone.zone_id,
                    "no available vehicles within a reasonable distance"
                );
                break;
            };

            let vehicle = pool.remove(best.index);
            let people = vehicle.capacity.min(remaining);

            tracing::info!(
                vehicle_id = %vehicle.vehicle_id,
                vehicle_type = %vehicle.vehicle_type,
                zone_id = %zone.zone_id,
                eta_minutes = round1(best.eta_minutes),
                people,
                distance_km = round2(best.distance_km),
                "assigned vehicle to zone"
            );

            plan.assignments.push(Assignment {
                zone_id: zone.zone_id.clone(),
                vehicle_id: vehicle.vehicle_id.clone(),
                eta_minutes: round1(best.eta_minutes),
                number_of_people: people,
                distance_km: round2(best.distance_km),
            });
            plan.consumed_vehicles.push(vehicle.vehicle_id.clone());
            remaining -= people;
        }

        if remaining > 0 {
            plan.shortfalls.push(Shortfall {
                zone_id: zone.zone_id.clone(),
                people_unassigned: remaining,
            });
        }
    }

    if plan.assignments.is_empty() {
        return Err(AppError::CapacityUnavailable(
            "no available vehicles within a reasonable distance".to_string(),
        ));
    }

    Ok(plan)
}

/// Highest composite score within range. Score ties break on the lower
/// vehicle id, keeping runs deterministic.
fn best_candidate(
    zone: &Zone,
    pool: &[&Vehicle],
    remaining: i32,
    max_distance_km: f64,
) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;

    for (index, vehicle) in pool.iter().enumerate() {
        let distance_km = geo::haversine_km(
            zone.latitude,
            zone.longitude,
            vehicle.latitude,
            vehicle.longitude,
        );
        if distance_km > max_distance_km {
            continue;
        }

        let capacity_score = if vehicle.capacity >= remaining {
            100.0
        } else {
            f64::from(vehicle.capacity) / f64::from(remaining) * 100.0
        };
        let distance_score = (100.0 - distance_km / max_distance_km * 100.0).max(0.0);
        let score = capacity_score * CAPACITY_WEIGHT + distance_score * DISTANCE_WEIGHT;

        let candidate = Candidate {
            index,
            distance_km,
            eta_minutes: geo::eta_minutes(distance_km, vehicle.speed),
            score,
        };

        let better = match &best {
            None => true,
            Some(current) => {
                candidate.score > current.score
                    || (candidate.score == current.score
                        && pool[candidate.index].vehicle_id < pool[current.index].vehicle_id)
            }
        };
        if better {
            best = Some(candidate);
        }
    }

    best
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
