use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use uuid::Uuid;

use pinmap_types::api::Claims;
use pinmap_types::models::Role;

use crate::credentials;
use crate::error::ApiError;
use crate::{AppState, run_blocking};

pub const EDITOR_ID_HEADER: &str = "x-editor-id";
pub const EDITOR_TOKEN_HEADER: &str = "x-editor-token";

/// Extract and validate the session token from the Authorization header.
/// On success the `Claims` are available to handlers as an extension.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let bearer = req
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or(ApiError::Unauthorized("missing bearer token"))?;

    let claims = credentials::validate_session(bearer.token(), &state.jwt_secret)?;

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Must run after `require_auth`.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, ApiError> {
    let is_admin = req
        .extensions()
        .get::<Claims>()
        .is_some_and(|claims| claims.role == Role::Admin);
    if !is_admin {
        return Err(ApiError::Forbidden("administrator privileges required"));
    }
    Ok(next.run(req).await)
}

/// Verify the public editor headers and refresh the editor's `last_active`.
/// The verified `PublicEditor` is inserted as an extension.
pub async fn require_editor(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let (editor_id, token) = editor_credentials(req.headers())?;

    let editors = state.services.editors.clone();
    let editor = run_blocking(move || editors.verify(editor_id, &token)).await?;

    req.extensions_mut().insert(editor);
    Ok(next.run(req).await)
}

fn editor_credentials(headers: &HeaderMap) -> Result<(Uuid, String), ApiError> {
    let editor_id = header_value(headers, EDITOR_ID_HEADER)
        .ok_or(ApiError::Unauthorized("missing editor credentials"))?
        .parse::<Uuid>()
        .map_err(|_| ApiError::EditorNotFound)?;
    let token = header_value(headers, EDITOR_TOKEN_HEADER)
        .ok_or(ApiError::Unauthorized("missing editor credentials"))?;

    Ok((editor_id, token.to_string()))
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}
