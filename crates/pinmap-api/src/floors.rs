use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use pinmap_types::api::{
    Claims, CreateFloorRequest, DeletedResponse, SetImageRequest, UpdateFloorRequest,
};
use pinmap_types::models::Floor;

use crate::error::ApiError;
use crate::{AppState, run_blocking};

pub async fn list_floors(
    State(state): State<AppState>,
    Path(map_id): Path<Uuid>,
) -> Result<Json<Vec<Floor>>, ApiError> {
    let floors = state.services.floors.clone();
    Ok(Json(run_blocking(move || floors.list_by_map(map_id)).await?))
}

pub async fn create_floor(
    State(state): State<AppState>,
    Path(map_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
    req: Result<Json<CreateFloorRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = req?;
    let floors = state.services.floors.clone();
    let floor = run_blocking(move || floors.create(claims.sub, map_id, req)).await?;
    Ok((StatusCode::CREATED, Json(floor)))
}

pub async fn get_floor(
    State(state): State<AppState>,
    Path(floor_id): Path<Uuid>,
) -> Result<Json<Floor>, ApiError> {
    let floors = state.services.floors.clone();
    Ok(Json(run_blocking(move || floors.get(floor_id)).await?))
}

pub async fn update_floor(
    State(state): State<AppState>,
    Path(floor_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
    req: Result<Json<UpdateFloorRequest>, JsonRejection>,
) -> Result<Json<Floor>, ApiError> {
    let Json(req) = req?;
    let floors = state.services.floors.clone();
    Ok(Json(
        run_blocking(move || floors.update(claims.sub, floor_id, req)).await?,
    ))
}

pub async fn set_floor_image(
    State(state): State<AppState>,
    Path(floor_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
    req: Result<Json<SetImageRequest>, JsonRejection>,
) -> Result<Json<Floor>, ApiError> {
    let Json(req) = req?;
    let floors = state.services.floors.clone();
    Ok(Json(
        run_blocking(move || floors.set_image(claims.sub, floor_id, req.image_url)).await?,
    ))
}

pub async fn delete_floor(
    State(state): State<AppState>,
    Path(floor_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let floors = state.services.floors.clone();
    run_blocking(move || floors.delete(claims.sub, floor_id)).await?;
    Ok(Json(DeletedResponse {
        message: "floor deleted".into(),
        id: floor_id,
    }))
}
