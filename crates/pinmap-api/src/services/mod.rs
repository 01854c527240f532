//! Use-case operations. Each one fetches the target and its owning chain,
//! asks `permissions`, then mutates through the store.
//!
//! Everything here is synchronous; handlers run it on the blocking pool.

mod editors;
mod floors;
mod maps;
mod pins;
mod users;
mod viewer;

pub use editors::EditorService;
pub use floors::FloorService;
pub use maps::MapService;
pub use pins::PinService;
pub use users::UserService;
pub use viewer::ViewerService;

use std::sync::Arc;

use uuid::Uuid;

use pinmap_db::{Store, UniqueViolation};
use pinmap_types::models::{Floor, Map, Pin};

use crate::error::ApiError;

#[derive(Clone)]
pub struct Services {
    pub users: UserService,
    pub maps: MapService,
    pub floors: FloorService,
    pub pins: PinService,
    pub editors: EditorService,
    pub viewer: ViewerService,
}

impl Services {
    pub fn new(store: Arc<dyn Store>, jwt_secret: String) -> Self {
        Self {
            users: UserService::new(store.clone(), jwt_secret),
            maps: MapService::new(store.clone()),
            floors: FloorService::new(store.clone()),
            pins: PinService::new(store.clone()),
            editors: EditorService::new(store.clone()),
            viewer: ViewerService::new(store),
        }
    }
}

/// Sparse patch: an absent or empty value keeps what is stored.
pub(crate) fn patch_text(field: &mut String, value: Option<String>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        *field = value;
    }
}

/// A unique-column collision at insert time becomes a conflict; anything else
/// is a storage fault.
pub(crate) fn conflict_on_duplicate(err: anyhow::Error, message: impl Into<String>) -> ApiError {
    if err.is::<UniqueViolation>() {
        ApiError::Conflict(message.into())
    } else {
        ApiError::Internal(err)
    }
}

/// Emails compare case-insensitively.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub(crate) fn require_text(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::validation(format!("{field} is required")));
    }
    Ok(())
}

pub(crate) fn require_finite(x: f64, y: f64) -> Result<(), ApiError> {
    if !x.is_finite() || !y.is_finite() {
        return Err(ApiError::validation("pin coordinates must be finite numbers"));
    }
    Ok(())
}

pub(crate) fn load_map(store: &dyn Store, id: Uuid) -> Result<Map, ApiError> {
    store.map_by_id(id)?.ok_or(ApiError::NotFound("map"))
}

pub(crate) fn load_floor(store: &dyn Store, id: Uuid) -> Result<Floor, ApiError> {
    store.floor_by_id(id)?.ok_or(ApiError::NotFound("floor"))
}

pub(crate) fn load_pin(store: &dyn Store, id: Uuid) -> Result<Pin, ApiError> {
    store.pin_by_id(id)?.ok_or(ApiError::NotFound("pin"))
}
