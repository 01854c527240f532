use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};

use pinmap_types::api::{Claims, LoginRequest, LoginResponse, RegisterRequest, UserEnvelope};

use crate::error::ApiError;
use crate::{AppState, run_blocking};

pub async fn register(
    State(state): State<AppState>,
    req: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = req?;
    let users = state.services.users.clone();
    let user = run_blocking(move || users.register(req)).await?;
    Ok((StatusCode::CREATED, Json(UserEnvelope { user })))
}

pub async fn login(
    State(state): State<AppState>,
    req: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(req) = req?;
    let users = state.services.users.clone();
    let response = run_blocking(move || users.login(req)).await?;
    Ok(Json(response))
}

pub async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<UserEnvelope>, ApiError> {
    let users = state.services.users.clone();
    let user = run_blocking(move || users.me(claims.sub)).await?;
    Ok(Json(UserEnvelope { user }))
}
