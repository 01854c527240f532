//! Repository traits. `Database` (SQLite) and `MemoryStore` both implement
//! every trait, and services only ever see `dyn Store`.

use anyhow::Result;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use pinmap_types::models::{Floor, Map, Pin};

use crate::models::{StoredEditor, StoredUser};

/// An insert collided with a unique column (user email, public map id).
/// Callers find it with `anyhow::Error::is`.
#[derive(Debug, thiserror::Error)]
#[error("unique constraint violated: {0}")]
pub struct UniqueViolation(pub String);

pub trait UserStore {
    /// Fails with `UniqueViolation` if the email is taken.
    fn insert_user(&self, user: &StoredUser) -> Result<()>;
    fn user_by_id(&self, id: Uuid) -> Result<Option<StoredUser>>;
    fn user_by_email(&self, email: &str) -> Result<Option<StoredUser>>;
    /// Newest first.
    fn list_users(&self) -> Result<Vec<StoredUser>>;
    /// Overwrites email, name, role and password hash.
    fn update_user(&self, user: &StoredUser) -> Result<()>;
    /// Deletes the user and every map they own, with its contents, atomically.
    fn delete_user(&self, id: Uuid) -> Result<()>;
}

pub trait MapStore {
    /// Fails with `UniqueViolation` if the public `map_id` is taken.
    fn insert_map(&self, map: &Map) -> Result<()>;
    fn map_by_id(&self, id: Uuid) -> Result<Option<Map>>;
    fn map_by_public_id(&self, map_id: &str) -> Result<Option<Map>>;
    /// Newest first.
    fn maps_by_owner(&self, user_id: Uuid) -> Result<Vec<Map>>;
    /// Overwrites title, description, the public-edit flag and `updated_at`.
    fn update_map(&self, map: &Map) -> Result<()>;
    /// Deletes the map with its floors, pins and public editors atomically.
    fn delete_map(&self, id: Uuid) -> Result<()>;
}

pub trait FloorStore {
    fn insert_floor(&self, floor: &Floor) -> Result<()>;
    fn floor_by_id(&self, id: Uuid) -> Result<Option<Floor>>;
    /// Ascending `floor_number`.
    fn floors_by_map(&self, map_id: Uuid) -> Result<Vec<Floor>>;
    fn update_floor(&self, floor: &Floor) -> Result<()>;
    /// Deletes the floor and its pins atomically.
    fn delete_floor(&self, id: Uuid) -> Result<()>;
}

pub trait PinStore {
    fn insert_pin(&self, pin: &Pin) -> Result<()>;
    fn pin_by_id(&self, id: Uuid) -> Result<Option<Pin>>;
    /// Oldest first.
    fn pins_by_floor(&self, floor_id: Uuid) -> Result<Vec<Pin>>;
    /// Oldest first across all the given floors.
    fn pins_by_floors(&self, floor_ids: &[Uuid]) -> Result<Vec<Pin>>;
    fn update_pin(&self, pin: &Pin) -> Result<()>;
    fn delete_pin(&self, id: Uuid) -> Result<()>;
}

pub trait EditorStore {
    fn insert_editor(&self, editor: &StoredEditor) -> Result<()>;
    fn editor_by_id(&self, id: Uuid) -> Result<Option<StoredEditor>>;
    fn editors_by_map(&self, map_id: Uuid) -> Result<Vec<StoredEditor>>;
    /// Fails if the editor no longer exists.
    fn touch_editor(&self, id: Uuid, at: DateTime<Utc>) -> Result<()>;
}

pub trait Store: UserStore + MapStore + FloorStore + PinStore + EditorStore + Send + Sync {}

impl<T> Store for T where
    T: UserStore + MapStore + FloorStore + PinStore + EditorStore + Send + Sync
{
}
