//! Request validation for zone and vehicle records.

use serde::Deserialize;

use shared::types::{Coordinates, VehicleType};
use shared::{AppError, AppResult};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateZoneRequest {
    pub zone_id: String,
    pub location_coordinates: Coordinates,
    pub number_of_people: i32,
    pub urgency_level: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateZoneRequest {
    pub location_coordinates: Option<Coordinates>,
    pub number_of_people: Option<i32>,
    pub urgency_level: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateVehicleRequest {
    pub vehicle_id: String,
    pub capacity: i32,
    pub vehicle_type: VehicleType,
    pub location_coordinates: Coordinates,
    pub speed: f64,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateVehicleRequest {
    pub capacity: Option<i32>,
    pub vehicle_type: Option<VehicleType>,
    pub location_coordinates: Option<Coordinates>,
    pub speed: Option<f64>,
    pub is_available: Option<bool>,
}

fn default_available() -> bool {
    true
}

pub fn validate_coordinates(coordinates: &Coordinates) -> AppResult<()> {
    if !(-90.0..=90.0).contains(&coordinates.latitude) {
        return Err(AppError::Validation(
            "latitude must be between -90 and 90".to_string(),
        ));
    }
    if !(-180.0..=180.0).contains(&coordinates.longitude) {
        return Err(AppError::Validation(
            "longitude must be between -180 and 180".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_create_zone(request: &CreateZoneRequest) -> AppResult<()> {
    if request.zone_id.trim().is_empty() {
        return Err(AppError::Validation("zone_id is required".to_string()));
    }
    validate_coordinates(&request.location_coordinates)?;
    validate_people_count(request.number_of_people)?;
    validate_urgency(request.urgency_level)
}

pub fn validate_update_zone(request: &UpdateZoneRequest) -> AppResult<()> {
    if let Some(coordinates) = &request.location_coordinates {
        validate_coordinates(coordinates)?;
    }
    if let Some(people) = request.number_of_people {
        validate_people_count(people)?;
    }
    if let Some(urgency) = request.urgency_level {
        validate_urgency(urgency)?;
    }
    Ok(())
}

pub fn validate_create_vehicle(request: &CreateVehicleRequest) -> AppResult<()> {
    if request.vehicle_id.trim().is_empty() {
        return Err(AppError::Validation("vehicle_id is required".to_string()));
    }
    validate_capacity(request.capacity)?;
    validate_coordinates(&request.location_coordinates)?;
    validate_speed(request.speed)
}

pub fn validate_update_vehicle(request: &UpdateVehicleRequest) -> AppResult<()> {
    if let Some(capacity) = request.capacity {
        validate_capacity(capacity)?;
    }
    if let Some(coordinates) = &request.location_coordinates {
        validate_coordinates(coordinates)?;
    }
    if let Some(speed) = request.speed {
        validate_speed(speed)?;
    }
    Ok(())
}

fn validate_people_count(people: i32) -> AppResult<()> {
    if people <= 0 {
        return Err(AppError::Validation(
            "number_of_people must be greater than 0".to_string(),
        ));
    }
    Ok(())
}

fn validate_urgency(urgency: i32) -> AppResult<()> {
    if !(1..=5).contains(&urgency) {
        return Err(AppError::Validation(
            "urgency_level must be between 1 and 5".to_string(),
        ));
    }
    Ok(())
}

fn validate_capacity(capacity: i32) -> AppResult<()> {
    if capacity <= 0 {
        return Err(AppError::Validation(
            "capacity must be greater than 0".to_string(),
        ));
    }
    Ok(())
}

fn validate_speed(speed: f64) -> AppResult<()> {
    if speed <= 0.0 {
        return Err(AppError::Validation(
            "speed must be greater than 0".to_string(),
        ));
    }
    Ok(())
}
