use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
};
use serde_json::{Value, json};

use pinmap_types::api::{ChangePasswordRequest, Claims, UpdateProfileRequest, UserEnvelope};

use crate::error::ApiError;
use crate::{AppState, run_blocking};

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    req: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Result<Json<UserEnvelope>, ApiError> {
    let Json(req) = req?;
    let users = state.services.users.clone();
    let user = run_blocking(move || users.update_profile(claims.sub, req.name)).await?;
    Ok(Json(UserEnvelope { user }))
}

pub async fn change_password(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    req: Result<Json<ChangePasswordRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(req) = req?;
    let users = state.services.users.clone();
    run_blocking(move || {
        users.change_password(claims.sub, &req.current_password, &req.new_password)
    })
    .await?;
    Ok(Json(json!({ "message": "password updated" })))
}
