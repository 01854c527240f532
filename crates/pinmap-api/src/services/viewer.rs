use std::sync::Arc;

use uuid::Uuid;

use pinmap_db::Store;
use pinmap_types::models::ViewerData;

use crate::error::ApiError;

/// Read-only bundle for the public map viewer.
#[derive(Clone)]
pub struct ViewerService {
    store: Arc<dyn Store>,
}

impl ViewerService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub fn map_data(&self, public_map_id: &str) -> Result<ViewerData, ApiError> {
        let map = self
            .store
            .map_by_public_id(public_map_id)?
            .ok_or(ApiError::NotFound("map"))?;
        let floors = self.store.floors_by_map(map.id)?;
        let floor_ids: Vec<Uuid> = floors.iter().map(|f| f.id).collect();
        let pins = self.store.pins_by_floors(&floor_ids)?;
        Ok(ViewerData { map, floors, pins })
    }
}
