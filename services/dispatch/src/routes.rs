//! HTTP surface for the dispatch operations.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{delete, get, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use shared::http::ApiResult;

use crate::cache::StatusSnapshot;
use crate::planner::PlanRecord;
use crate::recorder::TripRequest;
use crate::service::DispatchService;

#[derive(Clone)]
pub struct DispatchState {
    pub service: Arc<DispatchService>,
}

#[derive(Debug, Deserialize)]
pub struct ClearRequest {
    pub confirmation: String,
}

pub fn router(service: Arc<DispatchService>) -> Router {
    Router::new()
        .route(
            "/api/evacuations/plan",
            get(current_plan).post(generate_plan),
        )
        .route("/api/evacuations/status", get(get_status))
        .route("/api/evacuations/update", put(update_evacuation))
        .route("/api/evacuations/clear", delete(clear_all))
        .with_state(DispatchState { service })
}

async fn generate_plan(State(state): State<DispatchState>) -> ApiResult<Json<PlanRecord>> {
    let record = state.service.generate_plan().await?;
    Ok(Json(record))
}

async fn current_plan(State(state): State<DispatchState>) -> ApiResult<Json<PlanRecord>> {
    let record = state.service.current_plan().await?;
    Ok(Json(record))
}

async fn get_status(State(state): State<DispatchState>) -> ApiResult<Json<Vec<StatusSnapshot>>> {
    let snapshots = state.service.status().await?;
    Ok(Json(snapshots))
}

async fn update_evacuation(
    State(state): State<DispatchState>,
    Json(request): Json<TripRequest>,
) -> ApiResult<Json<StatusSnapshot>> {
    let snapshot = state.service.record_trip(request).await?;
    Ok(Json(snapshot))
}

async fn clear_all(
    State(state): State<DispatchState>,
    Json(request): Json<ClearRequest>,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    state.service.reset_all(&request.confirmation).await?;
    Ok((
        StatusCode::OK,
        Json(json!({ "message": "all evacuation data cleared successfully" })),
    ))
}
