use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use pinmap_db::Store;
use pinmap_types::api::{CreateMapRequest, UpdateMapRequest};
use pinmap_types::models::{Map, Role};

use crate::error::ApiError;
use crate::permissions;
use crate::services::{conflict_on_duplicate, load_map, patch_text, require_text};

const MAX_PUBLIC_ID_LEN: usize = 64;

#[derive(Clone)]
pub struct MapService {
    store: Arc<dyn Store>,
}

impl MapService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub fn list_for_owner(&self, user_id: Uuid) -> Result<Vec<Map>, ApiError> {
        Ok(self.store.maps_by_owner(user_id)?)
    }

    pub fn get(&self, user_id: Uuid, role: Role, id: Uuid) -> Result<Map, ApiError> {
        let map = load_map(self.store.as_ref(), id)?;
        if !permissions::can_view_map(&map, user_id, role) {
            return Err(ApiError::Forbidden("you do not have access to this map"));
        }
        Ok(map)
    }

    pub fn create(&self, owner: Uuid, req: CreateMapRequest) -> Result<Map, ApiError> {
        check_public_id(&req.map_id)?;
        require_text("title", &req.title)?;

        let taken = format!("map id '{}' is already taken", req.map_id);
        if self.store.map_by_public_id(&req.map_id)?.is_some() {
            return Err(ApiError::Conflict(taken));
        }

        let now = Utc::now();
        let map = Map {
            id: Uuid::new_v4(),
            map_id: req.map_id,
            title: req.title,
            description: req.description,
            user_id: owner,
            is_publicly_editable: req.is_publicly_editable,
            created_at: now,
            updated_at: now,
        };
        self.store
            .insert_map(&map)
            .map_err(|e| conflict_on_duplicate(e, taken))?;

        info!("Map {} ({}) created by {}", map.map_id, map.id, owner);
        Ok(map)
    }

    pub fn update(&self, user_id: Uuid, id: Uuid, req: UpdateMapRequest) -> Result<Map, ApiError> {
        let mut map = load_map(self.store.as_ref(), id)?;
        if !permissions::can_edit_map(&map, user_id) {
            return Err(ApiError::Forbidden("only the map owner can edit this map"));
        }

        patch_text(&mut map.title, req.title);
        patch_text(&mut map.description, req.description);
        if let Some(flag) = req.is_publicly_editable {
            map.is_publicly_editable = flag;
        }
        map.updated_at = Utc::now();

        self.store.update_map(&map)?;
        Ok(map)
    }

    /// Removes the map with its floors, pins and public editors.
    pub fn delete(&self, user_id: Uuid, role: Role, id: Uuid) -> Result<(), ApiError> {
        let map = load_map(self.store.as_ref(), id)?;
        if !permissions::can_delete_map(&map, user_id, role) {
            return Err(ApiError::Forbidden("you cannot delete this map"));
        }
        self.store.delete_map(id)?;
        info!("Map {} deleted by {}", id, user_id);
        Ok(())
    }
}

fn check_public_id(map_id: &str) -> Result<(), ApiError> {
    let valid = !map_id.is_empty()
        && map_id.len() <= MAX_PUBLIC_ID_LEN
        && map_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        return Err(ApiError::validation(
            "map_id must be 1-64 characters of letters, digits, '-' or '_'",
        ));
    }
    Ok(())
}
