//! Anonymous editing of publicly editable maps. Pin routes here sit behind
//! `require_editor`, which puts the verified `PublicEditor` in the request.

use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use pinmap_types::api::{
    CreatePublicPinRequest, DeletedResponse, EditorSessionResponse, RegisterEditorRequest,
    UpdatePinRequest, VerifyEditorRequest,
};
use pinmap_types::models::{Pin, PublicEditor};

use crate::error::ApiError;
use crate::permissions::Requester;
use crate::{AppState, run_blocking};

pub async fn register(
    State(state): State<AppState>,
    req: Result<Json<RegisterEditorRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = req?;
    let editors = state.services.editors.clone();
    let (editor, token) =
        run_blocking(move || editors.register(&req.map_id, &req.nickname)).await?;

    Ok((
        StatusCode::CREATED,
        Json(EditorSessionResponse {
            editor_id: editor.id,
            nickname: editor.nickname,
            map_id: editor.map_id,
            token: Some(token),
            verified: true,
        }),
    ))
}

pub async fn verify(
    State(state): State<AppState>,
    req: Result<Json<VerifyEditorRequest>, JsonRejection>,
) -> Result<Json<EditorSessionResponse>, ApiError> {
    let Json(req) = req?;
    let editors = state.services.editors.clone();
    let editor = run_blocking(move || editors.verify(req.editor_id, &req.token)).await?;

    Ok(Json(EditorSessionResponse {
        editor_id: editor.id,
        nickname: editor.nickname,
        map_id: editor.map_id,
        token: None,
        verified: true,
    }))
}

pub async fn create_pin(
    State(state): State<AppState>,
    Extension(editor): Extension<PublicEditor>,
    req: Result<Json<CreatePublicPinRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = req?;
    let pins = state.services.pins.clone();
    let requester = Requester::from(&editor);
    let (floor_id, req) = req.into_parts();
    let pin = run_blocking(move || pins.create(&requester, floor_id, req)).await?;
    Ok((StatusCode::CREATED, Json(pin)))
}

pub async fn update_pin(
    State(state): State<AppState>,
    Path(pin_id): Path<Uuid>,
    Extension(editor): Extension<PublicEditor>,
    req: Result<Json<UpdatePinRequest>, JsonRejection>,
) -> Result<Json<Pin>, ApiError> {
    let Json(req) = req?;
    let pins = state.services.pins.clone();
    let requester = Requester::from(&editor);
    Ok(Json(
        run_blocking(move || pins.update(&requester, pin_id, req)).await?,
    ))
}

pub async fn delete_pin(
    State(state): State<AppState>,
    Path(pin_id): Path<Uuid>,
    Extension(editor): Extension<PublicEditor>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let pins = state.services.pins.clone();
    let requester = Requester::from(&editor);
    run_blocking(move || pins.delete(&requester, pin_id)).await?;
    Ok(Json(DeletedResponse {
        message: "pin deleted".into(),
        id: pin_id,
    }))
}
