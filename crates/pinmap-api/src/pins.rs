use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use pinmap_types::api::{
    Claims, CreatePinRequest, DeletedResponse, SetImageRequest, UpdatePinRequest,
};
use pinmap_types::models::Pin;

use crate::error::ApiError;
use crate::permissions::Requester;
use crate::{AppState, run_blocking};

pub async fn list_pins(
    State(state): State<AppState>,
    Path(floor_id): Path<Uuid>,
) -> Result<Json<Vec<Pin>>, ApiError> {
    let pins = state.services.pins.clone();
    Ok(Json(run_blocking(move || pins.list_by_floor(floor_id)).await?))
}

pub async fn create_pin(
    State(state): State<AppState>,
    Path(floor_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
    req: Result<Json<CreatePinRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = req?;
    let pins = state.services.pins.clone();
    let requester = Requester::from(&claims);
    let pin = run_blocking(move || pins.create(&requester, floor_id, req)).await?;
    Ok((StatusCode::CREATED, Json(pin)))
}

pub async fn get_pin(
    State(state): State<AppState>,
    Path(pin_id): Path<Uuid>,
) -> Result<Json<Pin>, ApiError> {
    let pins = state.services.pins.clone();
    Ok(Json(run_blocking(move || pins.get(pin_id)).await?))
}

pub async fn update_pin(
    State(state): State<AppState>,
    Path(pin_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
    req: Result<Json<UpdatePinRequest>, JsonRejection>,
) -> Result<Json<Pin>, ApiError> {
    let Json(req) = req?;
    let pins = state.services.pins.clone();
    let requester = Requester::from(&claims);
    Ok(Json(
        run_blocking(move || pins.update(&requester, pin_id, req)).await?,
    ))
}

pub async fn set_pin_image(
    State(state): State<AppState>,
    Path(pin_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
    req: Result<Json<SetImageRequest>, JsonRejection>,
) -> Result<Json<Pin>, ApiError> {
    let Json(req) = req?;
    let pins = state.services.pins.clone();
    let requester = Requester::from(&claims);
    Ok(Json(
        run_blocking(move || pins.set_image(&requester, pin_id, req.image_url)).await?,
    ))
}

pub async fn delete_pin(
    State(state): State<AppState>,
    Path(pin_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let pins = state.services.pins.clone();
    let requester = Requester::from(&claims);
    run_blocking(move || pins.delete(&requester, pin_id)).await?;
    Ok(Json(DeletedResponse {
        message: "pin deleted".into(),
        id: pin_id,
    }))
}
