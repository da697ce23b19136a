//! Persistence for zone and vehicle records.

use sqlx::PgPool;

use shared::types::{Vehicle, Zone};
use shared::AppResult;

use crate::validation::CreateVehicleRequest;

#[derive(Clone)]
pub struct ZoneRepository {
    pool: PgPool,
}

impl ZoneRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, zone_id: &str) -> AppResult<Option<Zone>> {
        let row = sqlx::query("SELECT * FROM evacuation_zones WHERE zone_id = $1")
            .bind(zone_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Zone::from_row).transpose()
    }

    pub async fn list(&self) -> AppResult<Vec<Zone>> {
        let rows = sqlx::query("SELECT * FROM evacuation_zones ORDER BY zone_id")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(Zone::from_row).collect()
    }

    pub async fn insert(
        &self,
        zone_id: &str,
        latitude: f64,
        longitude: f64,
        number_of_people: i32,
        urgency_level: i32,
    ) -> AppResult<Zone> {
        let row = sqlx::query(
            "INSERT INTO evacuation_zones \
                 (zone_id, latitude, longitude, number_of_people, urgency_level) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING *",
        )
        .bind(zone_id)
        .bind(latitude)
        .bind(longitude)
        .bind(number_of_people)
        .bind(urgency_level)
        .fetch_one(&self.pool)
        .await?;
        Zone::from_row(&row)
    }

    pub async fn update(&self, zone: &Zone) -> AppResult<Zone> {
        let row = sqlx::query(
            "UPDATE evacuation_zones \
             SET latitude = $1, longitude = $2, number_of_people = $3, urgency_level = $4 \
             WHERE zone_id = $5 \
             RETURNING *",
        )
        .bind(zone.latitude)
        .bind(zone.longitude)
        .bind(zone.number_of_people)
        .bind(zone.urgency_level)
        .bind(&zone.zone_id)
        .fetch_one(&self.pool)
        .await?;
        Zone::from_row(&row)
    }

    pub async fn delete(&self, zone_id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM evacuation_zones WHERE zone_id = $1")
            .bind(zone_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[derive(Clone)]
pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, vehicle_id: &str) -> AppResult<Option<Vehicle>> {
        let row = sqlx::query("SELECT * FROM vehicles WHERE vehicle_id = $1")
            .bind(vehicle_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Vehicle::from_row).transpose()
    }

    pub async fn list(&self) -> AppResult<Vec<Vehicle>> {
        let rows = sqlx::query("SELECT * FROM vehicles ORDER BY vehicle_id")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(Vehicle::from_row).collect()
    }

    pub async fn insert(&self, request: &CreateVehicleRequest) -> AppResult<Vehicle> {
        let row = sqlx::query(
            "INSERT INTO vehicles \
                 (vehicle_id, capacity, vehicle_type, latitude, longitude, speed, is_available) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING *",
        )
        .bind(&request.vehicle_id)
        .bind(request.capacity)
        .bind(request.vehicle_type.as_str())
        .bind(request.location_coordinates.latitude)
        .bind(request.location_coordinates.longitude)
        .bind(request.speed)
        .bind(request.is_available)
        .fetch_one(&self.pool)
        .await?;
        Vehicle::from_row(&row)
    }

    pub async fn update(&self, vehicle: &Vehicle) -> AppResult<Vehicle> {
        let row = sqlx::query(
            "UPDATE vehicles \
             SET capacity = $1, vehicle_type = $2, latitude = $3, longitude = $4, \
                 speed = $5, is_available = $6 \
             WHERE vehicle_id = $7 \
             RETURNING *",
        )
        .bind(vehicle.capacity)
        .bind(vehicle.vehicle_type.as_str())
        .bind(vehicle.latitude)
        .bind(vehicle.longitude)
        .bind(vehicle.speed)
        .bind(vehicle.is_available)
        .bind(&vehicle.vehicle_id)
        .fetch_one(&self.pool)
        .await?;
        Vehicle::from_row(&row)
    }

    pub async fn delete(&self, vehicle_id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM vehicles WHERE vehicle_id = $1")
            .bind(vehicle_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
