use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use pinmap_types::api::{Claims, CreateMapRequest, DeletedResponse, UpdateMapRequest};
use pinmap_types::models::{Map, PublicEditor};

use crate::error::ApiError;
use crate::{AppState, run_blocking};

pub async fn list_maps(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<Map>>, ApiError> {
    let maps = state.services.maps.clone();
    Ok(Json(run_blocking(move || maps.list_for_owner(claims.sub)).await?))
}

pub async fn create_map(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    req: Result<Json<CreateMapRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = req?;
    let maps = state.services.maps.clone();
    let map = run_blocking(move || maps.create(claims.sub, req)).await?;
    Ok((StatusCode::CREATED, Json(map)))
}

pub async fn get_map(
    State(state): State<AppState>,
    Path(map_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Map>, ApiError> {
    let maps = state.services.maps.clone();
    Ok(Json(
        run_blocking(move || maps.get(claims.sub, claims.role, map_id)).await?,
    ))
}

pub async fn update_map(
    State(state): State<AppState>,
    Path(map_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
    req: Result<Json<UpdateMapRequest>, JsonRejection>,
) -> Result<Json<Map>, ApiError> {
    let Json(req) = req?;
    let maps = state.services.maps.clone();
    Ok(Json(
        run_blocking(move || maps.update(claims.sub, map_id, req)).await?,
    ))
}

pub async fn delete_map(
    State(state): State<AppState>,
    Path(map_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let maps = state.services.maps.clone();
    run_blocking(move || maps.delete(claims.sub, claims.role, map_id)).await?;
    Ok(Json(DeletedResponse {
        message: "map deleted".into(),
        id: map_id,
    }))
}

pub async fn list_editors(
    State(state): State<AppState>,
    Path(map_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<PublicEditor>>, ApiError> {
    let editors = state.services.editors.clone();
    Ok(Json(
        run_blocking(move || editors.list_for_map(claims.sub, map_id)).await?,
    ))
}
