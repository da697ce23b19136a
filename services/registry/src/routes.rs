//! CRUD HTTP surface for zones and vehicles.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use sqlx::PgPool;

use shared::http::ApiResult;
use shared::types::{Vehicle, Zone};

use crate::service::{VehicleService, ZoneService};
use crate::validation::{
    CreateVehicleRequest, CreateZoneRequest, UpdateVehicleRequest, UpdateZoneRequest,
};

#[derive(Clone)]
pub struct RegistryState {
    pub zones: ZoneService,
    pub vehicles: VehicleService,
}

pub fn router(pool: PgPool) -> Router {
    let state = RegistryState {
        zones: ZoneService::new(pool.clone()),
        vehicles: VehicleService::new(pool),
    };

    Router::new()
        .route(
            "/api/evacuation-zones",
            get(list_zones).post(create_zone),
        )
        .route(
            "/api/evacuation-zones/:id",
            get(get_zone).patch(update_zone).delete(delete_zone),
        )
        .route("/api/vehicles", get(list_vehicles).post(create_vehicle))
        .route(
            "/api/vehicles/:id",
            get(get_vehicle).patch(update_vehicle).delete(delete_vehicle),
        )
        .with_state(state)
}

async fn create_zone(
    State(state): State<RegistryState>,
    Json(request): Json<CreateZoneRequest>,
) -> ApiResult<(StatusCode, Json<Zone>)> {
    let zone = state.zones.create(request).await?;
    Ok((StatusCode::CREATED, Json(zone)))
}

async fn list_zones(State(state): State<RegistryState>) -> ApiResult<Json<Vec<Zone>>> {
    Ok(Json(state.zones.list().await?))
}

async fn get_zone(
    State(state): State<RegistryState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Zone>> {
    Ok(Json(state.zones.get(&id).await?))
}

async fn update_zone(
    State(state): State<RegistryState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateZoneRequest>,
) -> ApiResult<Json<Zone>> {
    Ok(Json(state.zones.update(&id, request).await?))
}

async fn delete_zone(
    State(state): State<RegistryState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.zones.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn create_vehicle(
    State(state): State<RegistryState>,
    Json(request): Json<CreateVehicleRequest>,
) -> ApiResult<(StatusCode, Json<Vehicle>)> {
    let vehicle = state.vehicles.create(request).await?;
    Ok((StatusCode::CREATED, Json(vehicle)))
}

async fn list_vehicles(State(state): State<RegistryState>) -> ApiResult<Json<Vec<Vehicle>>> {
    Ok(Json(state.vehicles.list().await?))
}

async fn get_vehicle(
    State(state): State<RegistryState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vehicle>> {
    Ok(Json(state.vehicles.get(&id).await?))
}

async fn update_vehicle(
    State(state): State<RegistryState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateVehicleRequest>,
) -> ApiResult<Json<Vehicle>> {
    Ok(Json(state.vehicles.update(&id, request).await?))
}

async fn delete_vehicle(
    State(state): State<RegistryState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.vehicles.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
