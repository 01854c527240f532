//! In-process store with the same contract as the SQLite `Database`.
//! Every operation, cascades included, runs under a single lock.

use std::sync::{Mutex, MutexGuard};

use anyhow::{Result, anyhow, bail};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use pinmap_types::models::{Floor, Map, Pin};

use crate::models::{StoredEditor, StoredUser};
use crate::store::{EditorStore, FloorStore, MapStore, PinStore, UniqueViolation, UserStore};

#[derive(Default)]
struct Tables {
    users: Vec<StoredUser>,
    maps: Vec<Map>,
    floors: Vec<Floor>,
    pins: Vec<Pin>,
    editors: Vec<StoredEditor>,
}

impl Tables {
    fn remove_map_tree(&mut self, map_id: Uuid) {
        let floor_ids: Vec<Uuid> = self
            .floors
            .iter()
            .filter(|f| f.map_id == map_id)
            .map(|f| f.id)
            .collect();
        self.pins.retain(|p| !floor_ids.contains(&p.floor_id));
        self.floors.retain(|f| f.map_id != map_id);
        self.editors.retain(|e| e.editor.map_id != map_id);
        self.maps.retain(|m| m.id != map_id);
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|e| anyhow!("Memory store lock poisoned: {}", e))
    }
}

/// Like an SQL UPDATE, a missing row is silently left alone.
fn replace<T>(rows: &mut [T], matches: impl Fn(&T) -> bool, value: T) {
    if let Some(slot) = rows.iter_mut().find(|row| matches(row)) {
        *slot = value;
    }
}

impl UserStore for MemoryStore {
    fn insert_user(&self, user: &StoredUser) -> Result<()> {
        let mut t = self.lock()?;
        if t.users.iter().any(|u| u.user.email == user.user.email) {
            return Err(UniqueViolation("users.email".into()).into());
        }
        t.users.push(user.clone());
        Ok(())
    }

    fn user_by_id(&self, id: Uuid) -> Result<Option<StoredUser>> {
        let t = self.lock()?;
        Ok(t.users.iter().find(|u| u.user.id == id).cloned())
    }

    fn user_by_email(&self, email: &str) -> Result<Option<StoredUser>> {
        let t = self.lock()?;
        Ok(t.users.iter().find(|u| u.user.email == email).cloned())
    }

    fn list_users(&self) -> Result<Vec<StoredUser>> {
        let mut users = self.lock()?.users.clone();
        users.reverse();
        users.sort_by(|a, b| b.user.created_at.cmp(&a.user.created_at));
        Ok(users)
    }

    fn update_user(&self, user: &StoredUser) -> Result<()> {
        let mut t = self.lock()?;
        let id = user.user.id;
        replace(&mut t.users, |u| u.user.id == id, user.clone());
        Ok(())
    }

    fn delete_user(&self, id: Uuid) -> Result<()> {
        let mut t = self.lock()?;
        let owned: Vec<Uuid> = t
            .maps
            .iter()
            .filter(|m| m.user_id == id)
            .map(|m| m.id)
            .collect();
        for map_id in owned {
            t.remove_map_tree(map_id);
        }
        t.users.retain(|u| u.user.id != id);
        Ok(())
    }
}

impl MapStore for MemoryStore {
    fn insert_map(&self, map: &Map) -> Result<()> {
        let mut t = self.lock()?;
        if t.maps.iter().any(|m| m.map_id == map.map_id) {
            return Err(UniqueViolation("maps.map_id".into()).into());
        }
        t.maps.push(map.clone());
        Ok(())
    }

    fn map_by_id(&self, id: Uuid) -> Result<Option<Map>> {
        Ok(self.lock()?.maps.iter().find(|m| m.id == id).cloned())
    }

    fn map_by_public_id(&self, map_id: &str) -> Result<Option<Map>> {
        let t = self.lock()?;
        Ok(t.maps.iter().find(|m| m.map_id == map_id).cloned())
    }

    fn maps_by_owner(&self, user_id: Uuid) -> Result<Vec<Map>> {
        let mut maps: Vec<Map> = self
            .lock()?
            .maps
            .iter()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect();
        maps.reverse();
        maps.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(maps)
    }

    fn update_map(&self, map: &Map) -> Result<()> {
        let mut t = self.lock()?;
        let id = map.id;
        replace(&mut t.maps, |m| m.id == id, map.clone());
        Ok(())
    }

    fn delete_map(&self, id: Uuid) -> Result<()> {
        self.lock()?.remove_map_tree(id);
        Ok(())
    }
}

impl FloorStore for MemoryStore {
    fn insert_floor(&self, floor: &Floor) -> Result<()> {
        self.lock()?.floors.push(floor.clone());
        Ok(())
    }

    fn floor_by_id(&self, id: Uuid) -> Result<Option<Floor>> {
        Ok(self.lock()?.floors.iter().find(|f| f.id == id).cloned())
    }

    fn floors_by_map(&self, map_id: Uuid) -> Result<Vec<Floor>> {
        let mut floors: Vec<Floor> = self
            .lock()?
            .floors
            .iter()
            .filter(|f| f.map_id == map_id)
            .cloned()
            .collect();
        floors.sort_by_key(|f| f.floor_number);
        Ok(floors)
    }

    fn update_floor(&self, floor: &Floor) -> Result<()> {
        let mut t = self.lock()?;
        let id = floor.id;
        replace(&mut t.floors, |f| f.id == id, floor.clone());
        Ok(())
    }

    fn delete_floor(&self, id: Uuid) -> Result<()> {
        let mut t = self.lock()?;
        t.pins.retain(|p| p.floor_id != id);
        t.floors.retain(|f| f.id != id);
        Ok(())
    }
}

impl PinStore for MemoryStore {
    fn insert_pin(&self, pin: &Pin) -> Result<()> {
        self.lock()?.pins.push(pin.clone());
        Ok(())
    }

    fn pin_by_id(&self, id: Uuid) -> Result<Option<Pin>> {
        Ok(self.lock()?.pins.iter().find(|p| p.id == id).cloned())
    }

    fn pins_by_floor(&self, floor_id: Uuid) -> Result<Vec<Pin>> {
        self.pins_by_floors(&[floor_id])
    }

    fn pins_by_floors(&self, floor_ids: &[Uuid]) -> Result<Vec<Pin>> {
        let mut pins: Vec<Pin> = self
            .lock()?
            .pins
            .iter()
            .filter(|p| floor_ids.contains(&p.floor_id))
            .cloned()
            .collect();
        // Stable sort keeps insertion order for equal timestamps.
        pins.sort_by_key(|p| p.created_at);
        Ok(pins)
    }

    fn update_pin(&self, pin: &Pin) -> Result<()> {
        let mut t = self.lock()?;
        let id = pin.id;
        replace(&mut t.pins, |p| p.id == id, pin.clone());
        Ok(())
    }

    fn delete_pin(&self, id: Uuid) -> Result<()> {
        self.lock()?.pins.retain(|p| p.id != id);
        Ok(())
    }
}

impl EditorStore for MemoryStore {
    fn insert_editor(&self, editor: &StoredEditor) -> Result<()> {
        self.lock()?.editors.push(editor.clone());
        Ok(())
    }

    fn editor_by_id(&self, id: Uuid) -> Result<Option<StoredEditor>> {
        let t = self.lock()?;
        Ok(t.editors.iter().find(|e| e.editor.id == id).cloned())
    }

    fn editors_by_map(&self, map_id: Uuid) -> Result<Vec<StoredEditor>> {
        Ok(self
            .lock()?
            .editors
            .iter()
            .filter(|e| e.editor.map_id == map_id)
            .cloned()
            .collect())
    }

    fn touch_editor(&self, id: Uuid, at: DateTime<Utc>) -> Result<()> {
        let mut t = self.lock()?;
        match t.editors.iter_mut().find(|e| e.editor.id == id) {
            Some(stored) => {
                stored.editor.last_active = at;
                Ok(())
            }
            None => bail!("Public editor not found: {}", id),
        }
    }
}
