use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use pinmap_db::Store;
use pinmap_types::api::{CreatePinRequest, UpdatePinRequest};
use pinmap_types::models::{Map, Pin};

use crate::error::ApiError;
use crate::permissions::{self, Requester};
use crate::services::{load_floor, load_map, load_pin, patch_text, require_finite, require_text};

#[derive(Clone)]
pub struct PinService {
    store: Arc<dyn Store>,
}

impl PinService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// The pin is stamped with the requester's identity: the user's display
    /// name or the editor's nickname.
    pub fn create(
        &self,
        requester: &Requester,
        floor_id: Uuid,
        req: CreatePinRequest,
    ) -> Result<Pin, ApiError> {
        require_text("title", &req.title)?;
        require_finite(req.x_position, req.y_position)?;

        let floor = load_floor(self.store.as_ref(), floor_id)?;
        let map = load_map(self.store.as_ref(), floor.map_id)?;
        if !permissions::can_create_pin(&map, requester) {
            return Err(ApiError::Forbidden("you cannot add pins to this map"));
        }

        let (editor_id, editor_nickname) = match requester {
            Requester::User { id, .. } => {
                let user = self
                    .store
                    .user_by_id(*id)?
                    .ok_or(ApiError::NotFound("user"))?;
                (*id, user.user.name)
            }
            Requester::Editor { id, nickname, .. } => (*id, nickname.clone()),
        };

        let now = Utc::now();
        let pin = Pin {
            id: Uuid::new_v4(),
            floor_id: floor.id,
            title: req.title,
            description: req.description,
            x_position: req.x_position,
            y_position: req.y_position,
            image_url: req.image_url,
            editor_id,
            editor_nickname,
            created_at: now,
            updated_at: now,
        };
        self.store.insert_pin(&pin)?;

        info!("Pin {} added to floor {} by {}", pin.id, floor.id, editor_id);
        Ok(pin)
    }

    pub fn list_by_floor(&self, floor_id: Uuid) -> Result<Vec<Pin>, ApiError> {
        load_floor(self.store.as_ref(), floor_id)?;
        Ok(self.store.pins_by_floor(floor_id)?)
    }

    pub fn get(&self, id: Uuid) -> Result<Pin, ApiError> {
        load_pin(self.store.as_ref(), id)
    }

    pub fn update(
        &self,
        requester: &Requester,
        id: Uuid,
        req: UpdatePinRequest,
    ) -> Result<Pin, ApiError> {
        let (mut pin, map) = self.chain(id)?;
        if !permissions::can_write_pin(&map, &pin, requester) {
            return Err(ApiError::Forbidden("you cannot edit this pin"));
        }

        patch_text(&mut pin.title, req.title);
        patch_text(&mut pin.description, req.description);
        patch_text(&mut pin.image_url, req.image_url);
        let x = req.x_position.unwrap_or(pin.x_position);
        let y = req.y_position.unwrap_or(pin.y_position);
        require_finite(x, y)?;
        pin.x_position = x;
        pin.y_position = y;
        pin.updated_at = Utc::now();

        self.store.update_pin(&pin)?;
        Ok(pin)
    }

    pub fn set_image(
        &self,
        requester: &Requester,
        id: Uuid,
        image_url: String,
    ) -> Result<Pin, ApiError> {
        require_text("image_url", &image_url)?;
        let (mut pin, map) = self.chain(id)?;
        if !permissions::can_write_pin(&map, &pin, requester) {
            return Err(ApiError::Forbidden("you cannot edit this pin"));
        }

        pin.image_url = image_url;
        pin.updated_at = Utc::now();

        self.store.update_pin(&pin)?;
        Ok(pin)
    }

    pub fn delete(&self, requester: &Requester, id: Uuid) -> Result<(), ApiError> {
        let (pin, map) = self.chain(id)?;
        if !permissions::can_delete_pin(&map, &pin, requester) {
            return Err(ApiError::Forbidden("you cannot delete this pin"));
        }
        self.store.delete_pin(id)?;
        info!("Pin {} deleted by {}", id, requester.id());
        Ok(())
    }

    /// Pin plus the map that owns it, via its floor.
    fn chain(&self, id: Uuid) -> Result<(Pin, Map), ApiError> {
        let pin = load_pin(self.store.as_ref(), id)?;
        let floor = load_floor(self.store.as_ref(), pin.floor_id)?;
        let map = load_map(self.store.as_ref(), floor.map_id)?;
        Ok((pin, map))
    }
}
