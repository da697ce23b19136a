//! Domain types shared between the registry and dispatch services.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::Row;

use crate::error::{AppError, AppResult};

pub type ZoneId = String;
pub type VehicleId = String;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleType {
    Bus,
    Van,
    Boat,
}

impl VehicleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleType::Bus => "bus",
            VehicleType::Van => "van",
            VehicleType::Boat => "boat",
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bus" => Ok(VehicleType::Bus),
            "van" => Ok(VehicleType::Van),
            "boat" => Ok(VehicleType::Boat),
            other => Err(AppError::Validation(format!(
                "vehicle type must be 'bus', 'van' or 'boat', got '{other}'"
            ))),
        }
    }
}

/// A location with a population awaiting rescue. Owned by the system of
/// record; `evacuated` and `last_vehicle_used` are mutated only by the trip
/// recorder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zone {
    pub zone_id: ZoneId,
    pub latitude: f64,
    pub longitude: f64,
    pub number_of_people: i32,
    pub urgency_level: i32,
    pub evacuated: i32,
    pub last_vehicle_used: Option<VehicleId>,
    pub created_at: DateTime<Utc>,
}

impl Zone {
    /// People still awaiting rescue. The schema guarantees
    /// `evacuated <= number_of_people`, so this never goes negative.
    pub fn remaining(&self) -> i32 {
        self.number_of_people - self.evacuated
    }

    pub fn from_row(row: &PgRow) -> AppResult<Self> {
        Ok(Self {
            zone_id: row.try_get("zone_id")?,
            latitude: row.try_get("latitude")?,
            longitude: row.try_get("longitude")?,
            number_of_people: row.try_get("number_of_people")?,
            urgency_level: row.try_get("urgency_level")?,
            evacuated: row.try_get("evacuated")?,
            last_vehicle_used: row.try_get("last_vehicle_used")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// A rescue asset. Availability is cleared by the assignment engine when a
/// plan consumes the vehicle and restored through direct vehicle edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub vehicle_id: VehicleId,
    pub capacity: i32,
    pub vehicle_type: VehicleType,
    pub latitude: f64,
    pub longitude: f64,
    pub speed: f64,
    pub is_available: bool,
}

impl Vehicle {
    pub fn from_row(row: &PgRow) -> AppResult<Self> {
        let raw_type: String = row.try_get("vehicle_type")?;
        Ok(Self {
            vehicle_id: row.try_get("vehicle_id")?,
            capacity: row.try_get("capacity")?,
            vehicle_type: raw_type.parse()?,
            latitude: row.try_get("latitude")?,
            longitude: row.try_get("longitude")?,
            speed: row.try_get("speed")?,
            is_available: row.try_get("is_available")?,
        })
    }
}

/// Append-only audit record of one completed rescue trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripLog {
    pub id: i64,
    pub zone_id: ZoneId,
    pub vehicle_id: VehicleId,
    pub people_count: i32,
    pub executed_at: DateTime<Utc>,
}

impl TripLog {
    pub fn from_row(row: &PgRow) -> AppResult<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            zone_id: row.try_get("zone_id")?,
            vehicle_id: row.try_get("vehicle_id")?,
            people_count: row.try_get("people_count")?,
            executed_at: row.try_get("executed_at")?,
        })
    }
}
