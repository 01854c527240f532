//! Allow/deny decisions over entities the caller has already fetched.
//! Nothing in here touches storage.

use uuid::Uuid;

use pinmap_types::api::Claims;
use pinmap_types::models::{Map, Pin, PublicEditor, Role};

/// Who is asking: a signed-in user or a verified public editor.
#[derive(Debug, Clone, PartialEq)]
pub enum Requester {
    User { id: Uuid, role: Role },
    Editor {
        id: Uuid,
        map_id: Uuid,
        nickname: String,
    },
}

impl Requester {
    pub fn id(&self) -> Uuid {
        match self {
            Self::User { id, .. } | Self::Editor { id, .. } => *id,
        }
    }
}

impl From<&Claims> for Requester {
    fn from(claims: &Claims) -> Self {
        Self::User {
            id: claims.sub,
            role: claims.role,
        }
    }
}

impl From<&PublicEditor> for Requester {
    fn from(editor: &PublicEditor) -> Self {
        Self::Editor {
            id: editor.id,
            map_id: editor.map_id,
            nickname: editor.nickname.clone(),
        }
    }
}

pub fn can_edit_map(map: &Map, user_id: Uuid) -> bool {
    map.user_id == user_id
}

pub fn can_edit_floor(map: &Map, user_id: Uuid) -> bool {
    can_edit_map(map, user_id)
}

pub fn can_view_map(map: &Map, user_id: Uuid, role: Role) -> bool {
    map.user_id == user_id || role == Role::Admin
}

pub fn can_delete_map(map: &Map, user_id: Uuid, role: Role) -> bool {
    can_view_map(map, user_id, role)
}

pub fn can_create_pin(map: &Map, requester: &Requester) -> bool {
    match requester {
        Requester::User { id, .. } => can_edit_map(map, *id),
        Requester::Editor { .. } => public_edit_allowed(map, requester),
    }
}

/// Update and image change. A public editor is held to the map's current
/// public flag even for pins they created.
pub fn can_write_pin(map: &Map, pin: &Pin, requester: &Requester) -> bool {
    match requester {
        Requester::User { id, .. } => can_edit_map(map, *id) || pin.editor_id == *id,
        Requester::Editor { .. } => public_edit_allowed(map, requester),
    }
}

/// The public flag alone never lets anyone delete another writer's pin.
pub fn can_delete_pin(map: &Map, pin: &Pin, requester: &Requester) -> bool {
    match requester {
        Requester::User { id, .. } => can_edit_map(map, *id) || pin.editor_id == *id,
        Requester::Editor { id, .. } => pin.editor_id == *id && public_edit_allowed(map, requester),
    }
}

fn public_edit_allowed(map: &Map, requester: &Requester) -> bool {
    match requester {
        Requester::Editor { map_id, .. } => *map_id == map.id && map.is_publicly_editable,
        Requester::User { .. } => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn map(owner: Uuid, public: bool) -> Map {
        let now = Utc::now();
        Map {
            id: Uuid::new_v4(),
            map_id: "hq".into(),
            title: "HQ".into(),
            description: String::new(),
            user_id: owner,
            is_publicly_editable: public,
            created_at: now,
            updated_at: now,
        }
    }

    fn pin_by(editor_id: Uuid) -> Pin {
        let now = Utc::now();
        Pin {
            id: Uuid::new_v4(),
            floor_id: Uuid::new_v4(),
            title: "Lobby".into(),
            description: String::new(),
            x_position: 1.0,
            y_position: 2.0,
            image_url: String::new(),
            editor_id,
            editor_nickname: "someone".into(),
            created_at: now,
            updated_at: now,
        }
    }

    fn user(id: Uuid) -> Requester {
        Requester::User {
            id,
            role: Role::User,
        }
    }

    fn editor(id: Uuid, map: &Map) -> Requester {
        Requester::Editor {
            id,
            map_id: map.id,
            nickname: "Alice".into(),
        }
    }

    #[test]
    fn map_rules() {
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();
        let m = map(owner, true);

        assert!(can_edit_map(&m, owner));
        assert!(!can_edit_map(&m, other));
        assert!(!can_edit_floor(&m, other));
        assert!(can_view_map(&m, other, Role::Admin));
        assert!(!can_view_map(&m, other, Role::User));
        assert!(can_delete_map(&m, other, Role::Admin));
        assert!(!can_delete_map(&m, other, Role::User));
    }

    #[test]
    fn pin_creation() {
        let owner = Uuid::new_v4();
        let public = map(owner, true);
        let private = map(owner, false);

        assert!(can_create_pin(&private, &user(owner)));
        assert!(!can_create_pin(&public, &user(Uuid::new_v4())));
        assert!(can_create_pin(&public, &editor(Uuid::new_v4(), &public)));
        assert!(!can_create_pin(&private, &editor(Uuid::new_v4(), &private)));
        // Scoped to the map the editor registered on.
        assert!(!can_create_pin(&public, &editor(Uuid::new_v4(), &private)));
    }

    #[test]
    fn pin_writes() {
        let owner = Uuid::new_v4();
        let e1 = Uuid::new_v4();
        let mut m = map(owner, true);
        let own_pin = pin_by(e1);
        let owners_pin = pin_by(owner);

        assert!(can_write_pin(&m, &own_pin, &user(owner)));
        assert!(can_write_pin(&m, &own_pin, &editor(e1, &m)));
        assert!(can_write_pin(&m, &owners_pin, &editor(e1, &m)));
        assert!(!can_write_pin(&m, &own_pin, &user(Uuid::new_v4())));

        m.is_publicly_editable = false;
        assert!(!can_write_pin(&m, &own_pin, &editor(e1, &m)));
        assert!(can_write_pin(&m, &own_pin, &user(owner)));
    }

    #[test]
    fn pin_deletes() {
        let owner = Uuid::new_v4();
        let e1 = Uuid::new_v4();
        let mut m = map(owner, true);
        let own_pin = pin_by(e1);
        let owners_pin = pin_by(owner);

        assert!(can_delete_pin(&m, &own_pin, &editor(e1, &m)));
        assert!(!can_delete_pin(&m, &owners_pin, &editor(e1, &m)));
        assert!(can_delete_pin(&m, &own_pin, &user(owner)));

        m.is_publicly_editable = false;
        assert!(!can_delete_pin(&m, &own_pin, &editor(e1, &m)));
    }
}
