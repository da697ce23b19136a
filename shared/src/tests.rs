use axum::http::StatusCode;
use chrono::Utc;

use crate::error::AppError;
use crate::geo;
use crate::http::ApiError;
use crate::types::{VehicleType, Zone};

fn sample_zone(number_of_people: i32, evacuated: i32) -> Zone {
    Zone {
        zone_id: "Z1".to_string(),
        latitude: 0.0,
        longitude: 0.0,
        number_of_people,
        urgency_level: 3,
        evacuated,
        last_vehicle_used: None,
        created_at: Utc::now(),
    }
}

#[test]
fn haversine_zero_for_same_point() {
    assert!(geo::haversine_km(13.75, 100.5, 13.75, 100.5).abs() < 1e-9);
}

#[test]
fn haversine_one_degree_longitude_at_equator() {
    // One degree of longitude on the equator is ~111.19 km.
    let d = geo::haversine_km(0.0, 0.0, 0.0, 1.0);
    assert!((d - 111.19).abs() < 0.1, "got {d}");
}

#[test]
fn haversine_is_symmetric() {
    let a = geo::haversine_km(51.5, -0.12, 48.85, 2.35);
    let b = geo::haversine_km(48.85, 2.35, 51.5, -0.12);
    assert!((a - b).abs() < 1e-9);
}

#[test]
fn eta_scales_with_speed() {
    // 30 km at 60 km/h is half an hour.
    assert!((geo::eta_minutes(30.0, 60.0) - 30.0).abs() < 1e-9);
    assert!((geo::eta_minutes(30.0, 120.0) - 15.0).abs() < 1e-9);
}

#[test]
fn zone_remaining_subtracts_evacuated() {
    assert_eq!(sample_zone(120, 45).remaining(), 75);
    assert_eq!(sample_zone(10, 10).remaining(), 0);
}

#[test]
fn vehicle_type_parses_known_values() {
    assert_eq!("bus".parse::<VehicleType>().unwrap(), VehicleType::Bus);
    assert_eq!("van".parse::<VehicleType>().unwrap(), VehicleType::Van);
    assert_eq!("boat".parse::<VehicleType>().unwrap(), VehicleType::Boat);
    assert!("helicopter".parse::<VehicleType>().is_err());
}

#[test]
fn vehicle_type_round_trips_through_serde() {
    let json = serde_json::to_string(&VehicleType::Boat).unwrap();
    assert_eq!(json, "\"boat\"");
    let parsed: VehicleType = serde_json::from_str("\"van\"").unwrap();
    assert_eq!(parsed, VehicleType::Van);
}

#[test]
fn api_error_status_mapping() {
    let cases = [
        (AppError::Validation("bad".into()), StatusCode::BAD_REQUEST),
        (AppError::NotFound("gone".into()), StatusCode::NOT_FOUND),
        (AppError::Conflict("busy".into()), StatusCode::CONFLICT),
        (
            AppError::CapacityUnavailable("none".into()),
            StatusCode::BAD_REQUEST,
        ),
    ];
    for (err, expected) in cases {
        assert_eq!(ApiError(err).status(), expected);
    }
}

#[test]
fn internal_errors_hide_detail_from_clients() {
    let err = ApiError(AppError::Database(sqlx::Error::PoolClosed));
    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
