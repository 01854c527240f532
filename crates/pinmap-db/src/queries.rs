use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, Row, params};
use uuid::Uuid;

use pinmap_types::models::{Floor, Map, Pin};

use crate::Database;
use crate::models::{
    EditorRow, FloorRow, MapRow, PinRow, StoredEditor, StoredUser, UserRow, format_timestamp,
};
use crate::store::{EditorStore, FloorStore, MapStore, PinStore, UniqueViolation, UserStore};

const USER_COLUMNS: &str = "id, email, password, name, role, created_at";
const MAP_COLUMNS: &str =
    "id, map_id, title, description, user_id, is_publicly_editable, created_at, updated_at";
const FLOOR_COLUMNS: &str = "id, map_id, floor_number, name, image_url, created_at, updated_at";
const PIN_COLUMNS: &str = "id, floor_id, title, description, x_position, y_position, image_url, \
     editor_id, editor_nickname, created_at, updated_at";
const EDITOR_COLUMNS: &str = "id, map_id, nickname, token_sha256, created_at, last_active";

// -- Users --

impl UserStore for Database {
    fn insert_user(&self, stored: &StoredUser) -> Result<()> {
        let user = &stored.user;
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (id, email, password, name, role, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    user.id.to_string(),
                    user.email,
                    stored.password_hash,
                    user.name,
                    user.role.as_str(),
                    format_timestamp(&user.created_at),
                ],
            )
            .map_err(unique_violation)?;
            Ok(())
        })
    }

    fn user_by_id(&self, id: Uuid) -> Result<Option<StoredUser>> {
        self.with_conn(|conn| {
            query_one(
                conn,
                &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
                &id.to_string(),
                user_row,
            )
        })?
        .map(StoredUser::try_from)
        .transpose()
    }

    fn user_by_email(&self, email: &str) -> Result<Option<StoredUser>> {
        self.with_conn(|conn| {
            query_one(
                conn,
                &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
                email,
                user_row,
            )
        })?
        .map(StoredUser::try_from)
        .transpose()
    }

    fn list_users(&self) -> Result<Vec<StoredUser>> {
        let rows = self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC, rowid DESC"
            ))?;
            let rows = stmt
                .query_map([], user_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })?;
        rows.into_iter().map(StoredUser::try_from).collect()
    }

    fn update_user(&self, stored: &StoredUser) -> Result<()> {
        let user = &stored.user;
        self.with_conn(|conn| {
            conn.execute(
                "UPDATE users SET email = ?1, password = ?2, name = ?3, role = ?4 WHERE id = ?5",
                params![
                    user.email,
                    stored.password_hash,
                    user.name,
                    user.role.as_str(),
                    user.id.to_string(),
                ],
            )?;
            Ok(())
        })
    }

    fn delete_user(&self, id: Uuid) -> Result<()> {
        let id = id.to_string();
        self.with_tx(|tx| {
            tx.execute(
                "DELETE FROM pins WHERE floor_id IN (
                     SELECT f.id FROM floors f JOIN maps m ON f.map_id = m.id WHERE m.user_id = ?1
                 )",
                [&id],
            )?;
            tx.execute(
                "DELETE FROM floors WHERE map_id IN (SELECT id FROM maps WHERE user_id = ?1)",
                [&id],
            )?;
            tx.execute(
                "DELETE FROM public_editors
                 WHERE map_id IN (SELECT id FROM maps WHERE user_id = ?1)",
                [&id],
            )?;
            tx.execute("DELETE FROM maps WHERE user_id = ?1", [&id])?;
            tx.execute("DELETE FROM users WHERE id = ?1", [&id])?;
            Ok(())
        })
    }
}

// -- Maps --

impl MapStore for Database {
    fn insert_map(&self, map: &Map) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO maps (id, map_id, title, description, user_id, is_publicly_editable,
                                   created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    map.id.to_string(),
                    map.map_id,
                    map.title,
                    map.description,
                    map.user_id.to_string(),
                    map.is_publicly_editable,
                    format_timestamp(&map.created_at),
                    format_timestamp(&map.updated_at),
                ],
            )
            .map_err(unique_violation)?;
            Ok(())
        })
    }

    fn map_by_id(&self, id: Uuid) -> Result<Option<Map>> {
        self.with_conn(|conn| {
            query_one(
                conn,
                &format!("SELECT {MAP_COLUMNS} FROM maps WHERE id = ?1"),
                &id.to_string(),
                map_row,
            )
        })?
        .map(Map::try_from)
        .transpose()
    }

    fn map_by_public_id(&self, map_id: &str) -> Result<Option<Map>> {
        self.with_conn(|conn| {
            query_one(
                conn,
                &format!("SELECT {MAP_COLUMNS} FROM maps WHERE map_id = ?1"),
                map_id,
                map_row,
            )
        })?
        .map(Map::try_from)
        .transpose()
    }

    fn maps_by_owner(&self, user_id: Uuid) -> Result<Vec<Map>> {
        let rows = self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {MAP_COLUMNS} FROM maps WHERE user_id = ?1 \
                 ORDER BY created_at DESC, rowid DESC"
            ))?;
            let rows = stmt
                .query_map([user_id.to_string()], map_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })?;
        rows.into_iter().map(Map::try_from).collect()
    }

    fn update_map(&self, map: &Map) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "UPDATE maps SET title = ?1, description = ?2, is_publicly_editable = ?3,
                                 updated_at = ?4
                 WHERE id = ?5",
                params![
                    map.title,
                    map.description,
                    map.is_publicly_editable,
                    format_timestamp(&map.updated_at),
                    map.id.to_string(),
                ],
            )?;
            Ok(())
        })
    }

    fn delete_map(&self, id: Uuid) -> Result<()> {
        let id = id.to_string();
        self.with_tx(|tx| {
            tx.execute(
                "DELETE FROM pins WHERE floor_id IN (SELECT id FROM floors WHERE map_id = ?1)",
                [&id],
            )?;
            tx.execute("DELETE FROM floors WHERE map_id = ?1", [&id])?;
            tx.execute("DELETE FROM public_editors WHERE map_id = ?1", [&id])?;
            tx.execute("DELETE FROM maps WHERE id = ?1", [&id])?;
            Ok(())
        })
    }
}

// -- Floors --

impl FloorStore for Database {
    fn insert_floor(&self, floor: &Floor) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO floors (id, map_id, floor_number, name, image_url, created_at,
                                     updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    floor.id.to_string(),
                    floor.map_id.to_string(),
                    floor.floor_number,
                    floor.name,
                    floor.image_url,
                    format_timestamp(&floor.created_at),
                    format_timestamp(&floor.updated_at),
                ],
            )?;
            Ok(())
        })
    }

    fn floor_by_id(&self, id: Uuid) -> Result<Option<Floor>> {
        self.with_conn(|conn| {
            query_one(
                conn,
                &format!("SELECT {FLOOR_COLUMNS} FROM floors WHERE id = ?1"),
                &id.to_string(),
                floor_row,
            )
        })?
        .map(Floor::try_from)
        .transpose()
    }

    fn floors_by_map(&self, map_id: Uuid) -> Result<Vec<Floor>> {
        let rows = self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {FLOOR_COLUMNS} FROM floors WHERE map_id = ?1 \
                 ORDER BY floor_number ASC, rowid ASC"
            ))?;
            let rows = stmt
                .query_map([map_id.to_string()], floor_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })?;
        rows.into_iter().map(Floor::try_from).collect()
    }

    fn update_floor(&self, floor: &Floor) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "UPDATE floors SET floor_number = ?1, name = ?2, image_url = ?3, updated_at = ?4
                 WHERE id = ?5",
                params![
                    floor.floor_number,
                    floor.name,
                    floor.image_url,
                    format_timestamp(&floor.updated_at),
                    floor.id.to_string(),
                ],
            )?;
            Ok(())
        })
    }

    fn delete_floor(&self, id: Uuid) -> Result<()> {
        let id = id.to_string();
        self.with_tx(|tx| {
            tx.execute("DELETE FROM pins WHERE floor_id = ?1", [&id])?;
            tx.execute("DELETE FROM floors WHERE id = ?1", [&id])?;
            Ok(())
        })
    }
}

// -- Pins --

impl PinStore for Database {
    fn insert_pin(&self, pin: &Pin) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO pins (id, floor_id, title, description, x_position, y_position,
                                   image_url, editor_id, editor_nickname, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    pin.id.to_string(),
                    pin.floor_id.to_string(),
                    pin.title,
                    pin.description,
                    pin.x_position,
                    pin.y_position,
                    pin.image_url,
                    pin.editor_id.to_string(),
                    pin.editor_nickname,
                    format_timestamp(&pin.created_at),
                    format_timestamp(&pin.updated_at),
                ],
            )?;
            Ok(())
        })
    }

    fn pin_by_id(&self, id: Uuid) -> Result<Option<Pin>> {
        self.with_conn(|conn| {
            query_one(
                conn,
                &format!("SELECT {PIN_COLUMNS} FROM pins WHERE id = ?1"),
                &id.to_string(),
                pin_row,
            )
        })?
        .map(Pin::try_from)
        .transpose()
    }

    fn pins_by_floor(&self, floor_id: Uuid) -> Result<Vec<Pin>> {
        self.pins_by_floors(&[floor_id])
    }

    /// Batch-fetch pins for a set of floor IDs.
    fn pins_by_floors(&self, floor_ids: &[Uuid]) -> Result<Vec<Pin>> {
        if floor_ids.is_empty() {
            return Ok(vec![]);
        }

        let rows = self.with_conn(|conn| {
            let placeholders: Vec<String> =
                (1..=floor_ids.len()).map(|i| format!("?{}", i)).collect();
            let sql = format!(
                "SELECT {PIN_COLUMNS} FROM pins WHERE floor_id IN ({}) \
                 ORDER BY created_at ASC, rowid ASC",
                placeholders.join(", ")
            );

            let ids: Vec<String> = floor_ids.iter().map(Uuid::to_string).collect();
            let params: Vec<&dyn rusqlite::types::ToSql> = ids
                .iter()
                .map(|id| id as &dyn rusqlite::types::ToSql)
                .collect();

            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params.as_slice(), pin_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })?;
        rows.into_iter().map(Pin::try_from).collect()
    }

    fn update_pin(&self, pin: &Pin) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "UPDATE pins SET title = ?1, description = ?2, x_position = ?3, y_position = ?4,
                                 image_url = ?5, updated_at = ?6
                 WHERE id = ?7",
                params![
                    pin.title,
                    pin.description,
                    pin.x_position,
                    pin.y_position,
                    pin.image_url,
                    format_timestamp(&pin.updated_at),
                    pin.id.to_string(),
                ],
            )?;
            Ok(())
        })
    }

    fn delete_pin(&self, id: Uuid) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM pins WHERE id = ?1", [id.to_string()])?;
            Ok(())
        })
    }
}

// -- Public editors --

impl EditorStore for Database {
    fn insert_editor(&self, stored: &StoredEditor) -> Result<()> {
        let editor = &stored.editor;
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO public_editors (id, map_id, nickname, token_sha256, created_at,
                                             last_active)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    editor.id.to_string(),
                    editor.map_id.to_string(),
                    editor.nickname,
                    stored.token_sha256,
                    format_timestamp(&editor.created_at),
                    format_timestamp(&editor.last_active),
                ],
            )?;
            Ok(())
        })
    }

    fn editor_by_id(&self, id: Uuid) -> Result<Option<StoredEditor>> {
        self.with_conn(|conn| {
            query_one(
                conn,
                &format!("SELECT {EDITOR_COLUMNS} FROM public_editors WHERE id = ?1"),
                &id.to_string(),
                editor_row,
            )
        })?
        .map(StoredEditor::try_from)
        .transpose()
    }

    fn editors_by_map(&self, map_id: Uuid) -> Result<Vec<StoredEditor>> {
        let rows = self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {EDITOR_COLUMNS} FROM public_editors WHERE map_id = ?1 \
                 ORDER BY created_at ASC, rowid ASC"
            ))?;
            let rows = stmt
                .query_map([map_id.to_string()], editor_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })?;
        rows.into_iter().map(StoredEditor::try_from).collect()
    }

    fn touch_editor(&self, id: Uuid, at: DateTime<Utc>) -> Result<()> {
        let updated = self.with_conn(|conn| {
            Ok(conn.execute(
                "UPDATE public_editors SET last_active = ?1 WHERE id = ?2",
                params![format_timestamp(&at), id.to_string()],
            )?)
        })?;
        if updated == 0 {
            bail!("Public editor not found: {}", id);
        }
        Ok(())
    }
}

// -- Row mapping --

fn query_one<T>(
    conn: &Connection,
    sql: &str,
    key: &str,
    map: fn(&Row<'_>) -> rusqlite::Result<T>,
) -> Result<Option<T>> {
    let mut stmt = conn.prepare(sql)?;
    stmt.query_row([key], map).optional()
}

fn user_row(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        email: row.get(1)?,
        password: row.get(2)?,
        name: row.get(3)?,
        role: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<MapRow> {
    Ok(MapRow {
        id: row.get(0)?,
        map_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        user_id: row.get(4)?,
        is_publicly_editable: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

fn floor_row(row: &Row<'_>) -> rusqlite::Result<FloorRow> {
    Ok(FloorRow {
        id: row.get(0)?,
        map_id: row.get(1)?,
        floor_number: row.get(2)?,
        name: row.get(3)?,
        image_url: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

fn pin_row(row: &Row<'_>) -> rusqlite::Result<PinRow> {
    Ok(PinRow {
        id: row.get(0)?,
        floor_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        x_position: row.get(4)?,
        y_position: row.get(5)?,
        image_url: row.get(6)?,
        editor_id: row.get(7)?,
        editor_nickname: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

fn editor_row(row: &Row<'_>) -> rusqlite::Result<EditorRow> {
    Ok(EditorRow {
        id: row.get(0)?,
        map_id: row.get(1)?,
        nickname: row.get(2)?,
        token_sha256: row.get(3)?,
        created_at: row.get(4)?,
        last_active: row.get(5)?,
    })
}

/// Turns a UNIQUE failure into `UniqueViolation`. Other errors pass through.
fn unique_violation(err: rusqlite::Error) -> anyhow::Error {
    match err {
        rusqlite::Error::SqliteFailure(code, msg)
            if code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            let detail = msg.unwrap_or_else(|| code.to_string());
            UniqueViolation(detail).into()
        }
        other => other.into(),
    }
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinmap_types::models::{PublicEditor, Role, User};

    fn seed_user(db: &Database, email: &str) -> Uuid {
        let id = Uuid::new_v4();
        db.insert_user(&StoredUser {
            user: User {
                id,
                email: email.into(),
                name: "Owner".into(),
                role: Role::User,
                created_at: Utc::now(),
            },
            password_hash: "$argon2id$stub".into(),
        })
        .unwrap();
        id
    }

    fn seed_map(db: &Database, owner: Uuid, public_id: &str) -> Map {
        let now = Utc::now();
        let map = Map {
            id: Uuid::new_v4(),
            map_id: public_id.into(),
            title: "HQ".into(),
            description: String::new(),
            user_id: owner,
            is_publicly_editable: true,
            created_at: now,
            updated_at: now,
        };
        db.insert_map(&map).unwrap();
        map
    }

    fn seed_floor(db: &Database, map: Uuid, number: i64) -> Floor {
        let now = Utc::now();
        let floor = Floor {
            id: Uuid::new_v4(),
            map_id: map,
            floor_number: number,
            name: format!("F{}", number),
            image_url: String::new(),
            created_at: now,
            updated_at: now,
        };
        db.insert_floor(&floor).unwrap();
        floor
    }

    fn seed_pin(db: &Database, floor: Uuid, title: &str, editor: Uuid) -> Pin {
        let now = Utc::now();
        let pin = Pin {
            id: Uuid::new_v4(),
            floor_id: floor,
            title: title.into(),
            description: String::new(),
            x_position: 0.25,
            y_position: 0.75,
            image_url: String::new(),
            editor_id: editor,
            editor_nickname: "Owner".into(),
            created_at: now,
            updated_at: now,
        };
        db.insert_pin(&pin).unwrap();
        pin
    }

    fn count(db: &Database, table: &str) -> i64 {
        db.with_conn(|conn| {
            Ok(conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))?)
        })
        .unwrap()
    }

    #[test]
    fn user_lookup_by_email_and_id() {
        let db = Database::open_in_memory().unwrap();
        let id = seed_user(&db, "owner@example.com");

        let by_email = db.user_by_email("owner@example.com").unwrap().unwrap();
        assert_eq!(by_email.user.id, id);
        assert_eq!(by_email.password_hash, "$argon2id$stub");
        let nobody = db.user_by_email("nobody@example.com").unwrap();
        assert!(nobody.is_none());
        let by_id = db.user_by_id(id).unwrap().unwrap();
        assert_eq!(by_id.user.email, "owner@example.com");
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let db = Database::open_in_memory().unwrap();
        seed_user(&db, "dup@example.com");
        let again = StoredUser {
            user: User {
                id: Uuid::new_v4(),
                email: "dup@example.com".into(),
                name: "Other".into(),
                role: Role::User,
                created_at: Utc::now(),
            },
            password_hash: "x".into(),
        };
        let err = db.insert_user(&again).unwrap_err();
        assert!(err.is::<UniqueViolation>());
    }

    #[test]
    fn duplicate_public_map_id_is_a_unique_violation() {
        let db = Database::open_in_memory().unwrap();
        let owner = seed_user(&db, "o@example.com");
        let first = seed_map(&db, owner, "hq");
        let again = Map {
            id: Uuid::new_v4(),
            ..first
        };
        let err = db.insert_map(&again).unwrap_err();
        assert!(err.is::<UniqueViolation>());
    }

    #[test]
    fn other_constraint_failures_are_not_unique_violations() {
        let db = Database::open_in_memory().unwrap();
        // Foreign key: the owner does not exist.
        let now = Utc::now();
        let orphan = Map {
            id: Uuid::new_v4(),
            map_id: "orphan".into(),
            title: "Orphan".into(),
            description: String::new(),
            user_id: Uuid::new_v4(),
            is_publicly_editable: false,
            created_at: now,
            updated_at: now,
        };
        let err = db.insert_map(&orphan).unwrap_err();
        assert!(!err.is::<UniqueViolation>());
    }

    #[test]
    fn floors_are_ordered_by_number() {
        let db = Database::open_in_memory().unwrap();
        let owner = seed_user(&db, "o@example.com");
        let map = seed_map(&db, owner, "hq");
        seed_floor(&db, map.id, 3);
        seed_floor(&db, map.id, -1);
        seed_floor(&db, map.id, 1);

        let numbers: Vec<i64> = db
            .floors_by_map(map.id)
            .unwrap()
            .iter()
            .map(|f| f.floor_number)
            .collect();
        assert_eq!(numbers, vec![-1, 1, 3]);
    }

    #[test]
    fn pins_batch_fetch_spans_floors() {
        let db = Database::open_in_memory().unwrap();
        let owner = seed_user(&db, "o@example.com");
        let map = seed_map(&db, owner, "hq");
        let f1 = seed_floor(&db, map.id, 1);
        let f2 = seed_floor(&db, map.id, 2);
        seed_pin(&db, f1.id, "Lobby", owner);
        seed_pin(&db, f2.id, "Kitchen", owner);

        let pins = db.pins_by_floors(&[f1.id, f2.id]).unwrap();
        let titles: Vec<&str> = pins.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Lobby", "Kitchen"]);
        assert!(db.pins_by_floors(&[]).unwrap().is_empty());
    }

    #[test]
    fn deleting_a_map_removes_its_whole_subtree() {
        let db = Database::open_in_memory().unwrap();
        let owner = seed_user(&db, "o@example.com");
        let map = seed_map(&db, owner, "hq");
        let other = seed_map(&db, owner, "annex");
        let floor = seed_floor(&db, map.id, 1);
        let kept_floor = seed_floor(&db, other.id, 1);
        seed_pin(&db, floor.id, "Lobby", owner);
        seed_pin(&db, kept_floor.id, "Annex lobby", owner);
        db.insert_editor(&StoredEditor {
            editor: PublicEditor {
                id: Uuid::new_v4(),
                map_id: map.id,
                nickname: "Alice".into(),
                created_at: Utc::now(),
                last_active: Utc::now(),
            },
            token_sha256: "00".repeat(32),
        })
        .unwrap();

        db.delete_map(map.id).unwrap();

        assert!(db.map_by_id(map.id).unwrap().is_none());
        assert!(db.floor_by_id(floor.id).unwrap().is_none());
        assert!(db.pins_by_floor(floor.id).unwrap().is_empty());
        assert_eq!(count(&db, "public_editors"), 0);
        assert_eq!(count(&db, "floors"), 1);
        assert_eq!(count(&db, "pins"), 1);
    }

    #[test]
    fn deleting_a_user_removes_their_maps() {
        let db = Database::open_in_memory().unwrap();
        let owner = seed_user(&db, "o@example.com");
        let map = seed_map(&db, owner, "hq");
        let floor = seed_floor(&db, map.id, 1);
        seed_pin(&db, floor.id, "Lobby", owner);

        db.delete_user(owner).unwrap();

        assert!(db.user_by_id(owner).unwrap().is_none());
        assert_eq!(count(&db, "maps"), 0);
        assert_eq!(count(&db, "floors"), 0);
        assert_eq!(count(&db, "pins"), 0);
    }

    #[test]
    fn touching_a_missing_editor_fails() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.touch_editor(Uuid::new_v4(), Utc::now()).is_err());
    }
}
