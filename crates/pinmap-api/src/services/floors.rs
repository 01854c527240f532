use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use pinmap_db::Store;
use pinmap_types::api::{CreateFloorRequest, UpdateFloorRequest};
use pinmap_types::models::Floor;

use crate::error::ApiError;
use crate::permissions;
use crate::services::{load_floor, load_map, patch_text, require_text};

#[derive(Clone)]
pub struct FloorService {
    store: Arc<dyn Store>,
}

impl FloorService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub fn create(
        &self,
        user_id: Uuid,
        map_id: Uuid,
        req: CreateFloorRequest,
    ) -> Result<Floor, ApiError> {
        require_text("name", &req.name)?;
        let map = load_map(self.store.as_ref(), map_id)?;
        if !permissions::can_edit_floor(&map, user_id) {
            return Err(ApiError::Forbidden("only the map owner can add floors"));
        }

        let now = Utc::now();
        let floor = Floor {
            id: Uuid::new_v4(),
            map_id: map.id,
            floor_number: req.floor_number,
            name: req.name,
            image_url: req.image_url,
            created_at: now,
            updated_at: now,
        };
        self.store.insert_floor(&floor)?;

        info!("Floor {} added to map {}", floor.id, map.id);
        Ok(floor)
    }

    pub fn list_by_map(&self, map_id: Uuid) -> Result<Vec<Floor>, ApiError> {
        load_map(self.store.as_ref(), map_id)?;
        Ok(self.store.floors_by_map(map_id)?)
    }

    pub fn get(&self, id: Uuid) -> Result<Floor, ApiError> {
        load_floor(self.store.as_ref(), id)
    }

    pub fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        req: UpdateFloorRequest,
    ) -> Result<Floor, ApiError> {
        let mut floor = self.owned(user_id, id)?;

        patch_text(&mut floor.name, req.name);
        patch_text(&mut floor.image_url, req.image_url);
        if let Some(number) = req.floor_number {
            floor.floor_number = number;
        }
        floor.updated_at = Utc::now();

        self.store.update_floor(&floor)?;
        Ok(floor)
    }

    pub fn set_image(&self, user_id: Uuid, id: Uuid, image_url: String) -> Result<Floor, ApiError> {
        require_text("image_url", &image_url)?;
        let mut floor = self.owned(user_id, id)?;

        floor.image_url = image_url;
        floor.updated_at = Utc::now();

        self.store.update_floor(&floor)?;
        Ok(floor)
    }

    /// Removes the floor and its pins.
    pub fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), ApiError> {
        self.owned(user_id, id)?;
        self.store.delete_floor(id)?;
        info!("Floor {} deleted by {}", id, user_id);
        Ok(())
    }

    fn owned(&self, user_id: Uuid, id: Uuid) -> Result<Floor, ApiError> {
        let floor = load_floor(self.store.as_ref(), id)?;
        let map = load_map(self.store.as_ref(), floor.map_id)?;
        if !permissions::can_edit_floor(&map, user_id) {
            return Err(ApiError::Forbidden("only the map owner can edit this floor"));
        }
        Ok(floor)
    }
}
