//! User administration. Mounted behind `require_auth` and `require_admin`.

use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
};
use uuid::Uuid;

use pinmap_types::api::{Claims, DeletedResponse, UpdateRoleRequest, UserEnvelope};
use pinmap_types::models::User;

use crate::error::ApiError;
use crate::{AppState, run_blocking};

pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    let users = state.services.users.clone();
    Ok(Json(run_blocking(move || users.list_users()).await?))
}

pub async fn update_role(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
    req: Result<Json<UpdateRoleRequest>, JsonRejection>,
) -> Result<Json<UserEnvelope>, ApiError> {
    let Json(req) = req?;
    let users = state.services.users.clone();
    let user = run_blocking(move || users.update_role(claims.sub, user_id, req.role)).await?;
    Ok(Json(UserEnvelope { user }))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let users = state.services.users.clone();
    run_blocking(move || users.delete_user(claims.sub, user_id)).await?;
    Ok(Json(DeletedResponse {
        message: "user deleted".into(),
        id: user_id,
    }))
}
