//! Zone and vehicle record services.

use sqlx::PgPool;
use tracing::info;

use shared::types::{Vehicle, Zone};
use shared::{AppError, AppResult};

use crate::repository::{VehicleRepository, ZoneRepository};
use crate::validation::{
    self, CreateVehicleRequest, CreateZoneRequest, UpdateVehicleRequest, UpdateZoneRequest,
};

#[derive(Clone)]
pub struct ZoneService {
    repo: ZoneRepository,
}

impl ZoneService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repo: ZoneRepository::new(pool),
        }
    }

    pub async fn create(&self, request: CreateZoneRequest) -> AppResult<Zone> {
        validation::validate_create_zone(&request)?;

        if self.repo.get(&request.zone_id).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "zone with id '{}' already exists",
                request.zone_id
            )));
        }

        let zone = self
            .repo
            .insert(
                &request.zone_id,
                request.location_coordinates.latitude,
                request.location_coordinates.longitude,
                request.number_of_people,
                request.urgency_level,
            )
            .await?;
        info!(zone_id = %zone.zone_id, "created evacuation zone");
        Ok(zone)
    }

    pub async fn get(&self, zone_id: &str) -> AppResult<Zone> {
        self.repo
            .get(zone_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("zone '{zone_id}' not found")))
    }

    pub async fn list(&self) -> AppResult<Vec<Zone>> {
        self.repo.list().await
    }

    pub async fn update(&self, zone_id: &str, request: UpdateZoneRequest) -> AppResult<Zone> {
        validation::validate_update_zone(&request)?;

        let mut zone = self.get(zone_id).await?;
        if let Some(coordinates) = request.location_coordinates {
            zone.latitude = coordinates.latitude;
            zone.longitude = coordinates.longitude;
        }
        if let Some(people) = request.number_of_people {
            // Shrinking below what was already evacuated would break the
            // evacuated <= total invariant.
            if people < zone.evacuated {
                return Err(AppError::Validation(format!(
                    "number_of_people cannot drop below the {} already evacuated",
                    zone.evacuated
                )));
            }
            zone.number_of_people = people;
        }
        if let Some(urgency) = request.urgency_level {
            zone.urgency_level = urgency;
        }

        self.repo.update(&zone).await
    }

    pub async fn delete(&self, zone_id: &str) -> AppResult<()> {
        if !self.repo.delete(zone_id).await? {
            return Err(AppError::NotFound(format!("zone '{zone_id}' not found")));
        }
        info!(zone_id, "deleted evacuation zone");
        Ok(())
    }
}

#[derive(Clone)]
pub struct VehicleService {
    repo: VehicleRepository,
}

impl VehicleService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repo: VehicleRepository::new(pool),
        }
    }

    pub async fn create(&self, request: CreateVehicleRequest) -> AppResult<Vehicle> {
        validation::validate_create_vehicle(&request)?;

        if self.repo.get(&request.vehicle_id).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "vehicle with id '{}' already exists",
                request.vehicle_id
            )));
        }

        let vehicle = self.repo.insert(&request).await?;
        info!(vehicle_id = %vehicle.vehicle_id, "registered vehicle");
        Ok(vehicle)
    }

    pub async fn get(&self, vehicle_id: &str) -> AppResult<Vehicle> {
        self.repo
            .get(vehicle_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("vehicle '{vehicle_id}' not found")))
    }

    pub async fn list(&self) -> AppResult<Vec<Vehicle>> {
        self.repo.list().await
    }

    pub async fn update(
        &self,
        vehicle_id: &str,
        request: UpdateVehicleRequest,
    ) -> AppResult<Vehicle> {
        validation::validate_update_vehicle(&request)?;

        let mut vehicle = self.get(vehicle_id).await?;
        if let Some(capacity) = request.capacity {
            vehicle.capacity = capacity;
        }
        if let Some(vehicle_type) = request.vehicle_type {
            vehicle.vehicle_type = vehicle_type;
        }
        if let Some(coordinates) = request.location_coordinates {
            vehicle.latitude = coordinates.latitude;
            vehicle.longitude = coordinates.longitude;
        }
        if let Some(speed) = request.speed {
            vehicle.speed = speed;
        }
        if let Some(is_available) = request.is_available {
            vehicle.is_available = is_available;
        }

        self.repo.update(&vehicle).await
    }

    pub async fn delete(&self, vehicle_id: &str) -> AppResult<()> {
        if !self.repo.delete(vehicle_id).await? {
            return Err(AppError::NotFound(format!(
                "vehicle '{vehicle_id}' not found"
            )));
        }
        info!(vehicle_id, "deleted vehicle");
        Ok(())
    }
}
