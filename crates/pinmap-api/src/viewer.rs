use axum::{
    Json,
    extract::{Path, State},
};

use pinmap_types::models::ViewerData;

use crate::error::ApiError;
use crate::{AppState, run_blocking};

/// Everything the public viewer needs for one map, looked up by its public id.
pub async fn map_data(
    State(state): State<AppState>,
    Path(map_id): Path<String>,
) -> Result<Json<ViewerData>, ApiError> {
    let viewer = state.services.viewer.clone();
    Ok(Json(run_blocking(move || viewer.map_data(&map_id)).await?))
}
