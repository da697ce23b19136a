use shared::types::{Coordinates, VehicleType};
use shared::AppError;

use crate::validation::{
    self, CreateVehicleRequest, CreateZoneRequest, UpdateVehicleRequest, UpdateZoneRequest,
};

fn coords(latitude: f64, longitude: f64) -> Coordinates {
    Coordinates {
        latitude,
        longitude,
    }
}

fn zone_request() -> CreateZoneRequest {
    CreateZoneRequest {
        zone_id: "Z1".to_string(),
        location_coordinates: coords(13.75, 100.5),
        number_of_people: 120,
        urgency_level: 4,
    }
}

fn vehicle_request() -> CreateVehicleRequest {
    CreateVehicleRequest {
        vehicle_id: "V1".to_string(),
        capacity: 40,
        vehicle_type: VehicleType::Bus,
        location_coordinates: coords(13.7, 100.4),
        speed: 60.0,
        is_available: true,
    }
}

#[test]
fn valid_zone_request_passes() {
    assert!(validation::validate_create_zone(&zone_request()).is_ok());
}

#[test]
fn zone_id_must_not_be_blank() {
    let mut request = zone_request();
    request.zone_id = "  ".to_string();
    let err = validation::validate_create_zone(&request).unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[test]
fn coordinates_out_of_range_are_rejected() {
    for (lat, lon) in [(91.0, 0.0), (-90.5, 0.0), (0.0, 180.5), (0.0, -181.0)] {
        let mut request = zone_request();
        request.location_coordinates = coords(lat, lon);
        assert!(validation::validate_create_zone(&request).is_err());
    }
    // Boundary values are fine.
    for (lat, lon) in [(90.0, 180.0), (-90.0, -180.0)] {
        let mut request = zone_request();
        request.location_coordinates = coords(lat, lon);
        assert!(validation::validate_create_zone(&request).is_ok());
    }
}

#[test]
fn zone_population_must_be_positive() {
    let mut request = zone_request();
    request.number_of_people = 0;
    assert!(validation::validate_create_zone(&request).is_err());
}

#[test]
fn urgency_must_stay_in_range() {
    for urgency in [0, 6, -1] {
        let mut request = zone_request();
        request.urgency_level = urgency;
        assert!(validation::validate_create_zone(&request).is_err());
    }
    for urgency in 1..=5 {
        let mut request = zone_request();
        request.urgency_level = urgency;
        assert!(validation::validate_create_zone(&request).is_ok());
    }
}

#[test]
fn zone_update_only_checks_provided_fields() {
    assert!(validation::validate_update_zone(&UpdateZoneRequest::default()).is_ok());

    let request = UpdateZoneRequest {
        urgency_level: Some(9),
        ..Default::default()
    };
    assert!(validation::validate_update_zone(&request).is_err());
}

#[test]
fn valid_vehicle_request_passes() {
    assert!(validation::validate_create_vehicle(&vehicle_request()).is_ok());
}

#[test]
fn vehicle_capacity_and_speed_must_be_positive() {
    let mut request = vehicle_request();
    request.capacity = 0;
    assert!(validation::validate_create_vehicle(&request).is_err());

    let mut request = vehicle_request();
    request.speed = -5.0;
    assert!(validation::validate_create_vehicle(&request).is_err());
}

#[test]
fn vehicle_update_only_checks_provided_fields() {
    assert!(validation::validate_update_vehicle(&UpdateVehicleRequest::default()).is_ok());

    let request = UpdateVehicleRequest {
        speed: Some(0.0),
        ..Default::default()
    };
    assert!(validation::validate_update_vehicle(&request).is_err());
}

#[test]
fn vehicle_type_rejects_unknown_values_in_json() {
    let err = serde_json::from_str::<CreateVehicleRequest>(
        r#"{
            "vehicle_id": "V1",
            "capacity": 40,
            "vehicle_type": "helicopter",
            "location_coordinates": { "latitude": 0.0, "longitude": 0.0 },
            "speed": 60.0
        }"#,
    );
    assert!(err.is_err());
}

#[test]
fn vehicle_availability_defaults_to_true() {
    let request: CreateVehicleRequest = serde_json::from_str(
        r#"{
            "vehicle_id": "V1",
            "capacity": 40,
            "vehicle_type": "van",
            "location_coordinates": { "latitude": 0.0, "longitude": 0.0 },
            "speed": 60.0
        }"#,
    )
    .unwrap();
    assert!(request.is_available);
}
