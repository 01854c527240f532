//! Database row types. These map directly to SQLite rows and are converted
//! into `pinmap-types` models at the store boundary, keeping the column
//! encoding (text UUIDs, text timestamps) out of the rest of the workspace.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use uuid::Uuid;

use pinmap_types::models::{Floor, Map, Pin, PublicEditor, Role, User};

/// A user together with their Argon2 PHC hash.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredUser {
    pub user: User,
    pub password_hash: String,
}

/// A public editor together with the SHA-256 hex digest of their token.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredEditor {
    pub editor: PublicEditor,
    pub token_sha256: String,
}

pub(crate) struct UserRow {
    pub id: String,
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: String,
    pub created_at: String,
}

pub(crate) struct MapRow {
    pub id: String,
    pub map_id: String,
    pub title: String,
    pub description: String,
    pub user_id: String,
    pub is_publicly_editable: bool,
    pub created_at: String,
    pub updated_at: String,
}

pub(crate) struct FloorRow {
    pub id: String,
    pub map_id: String,
    pub floor_number: i64,
    pub name: String,
    pub image_url: String,
    pub created_at: String,
    pub updated_at: String,
}

pub(crate) struct PinRow {
    pub id: String,
    pub floor_id: String,
    pub title: String,
    pub description: String,
    pub x_position: f64,
    pub y_position: f64,
    pub image_url: String,
    pub editor_id: String,
    pub editor_nickname: String,
    pub created_at: String,
    pub updated_at: String,
}

pub(crate) struct EditorRow {
    pub id: String,
    pub map_id: String,
    pub nickname: String,
    pub token_sha256: String,
    pub created_at: String,
    pub last_active: String,
}

impl TryFrom<UserRow> for StoredUser {
    type Error = anyhow::Error;

    fn try_from(row: UserRow) -> Result<Self> {
        let role: Role = row
            .role
            .parse()
            .map_err(|e: String| anyhow::anyhow!("user {}: {}", row.id, e))?;
        Ok(Self {
            user: User {
                id: parse_uuid(&row.id)?,
                email: row.email,
                name: row.name,
                role,
                created_at: parse_timestamp(&row.created_at)?,
            },
            password_hash: row.password,
        })
    }
}

impl TryFrom<MapRow> for Map {
    type Error = anyhow::Error;

    fn try_from(row: MapRow) -> Result<Self> {
        Ok(Self {
            id: parse_uuid(&row.id)?,
            map_id: row.map_id,
            title: row.title,
            description: row.description,
            user_id: parse_uuid(&row.user_id)?,
            is_publicly_editable: row.is_publicly_editable,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

impl TryFrom<FloorRow> for Floor {
    type Error = anyhow::Error;

    fn try_from(row: FloorRow) -> Result<Self> {
        Ok(Self {
            id: parse_uuid(&row.id)?,
            map_id: parse_uuid(&row.map_id)?,
            floor_number: row.floor_number,
            name: row.name,
            image_url: row.image_url,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

impl TryFrom<PinRow> for Pin {
    type Error = anyhow::Error;

    fn try_from(row: PinRow) -> Result<Self> {
        Ok(Self {
            id: parse_uuid(&row.id)?,
            floor_id: parse_uuid(&row.floor_id)?,
            title: row.title,
            description: row.description,
            x_position: row.x_position,
            y_position: row.y_position,
            image_url: row.image_url,
            editor_id: parse_uuid(&row.editor_id)?,
            editor_nickname: row.editor_nickname,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

impl TryFrom<EditorRow> for StoredEditor {
    type Error = anyhow::Error;

    fn try_from(row: EditorRow) -> Result<Self> {
        Ok(Self {
            editor: PublicEditor {
                id: parse_uuid(&row.id)?,
                map_id: parse_uuid(&row.map_id)?,
                nickname: row.nickname,
                created_at: parse_timestamp(&row.created_at)?,
                last_active: parse_timestamp(&row.last_active)?,
            },
            token_sha256: row.token_sha256,
        })
    }
}

/// Fixed-width RFC 3339 so that `ORDER BY created_at` sorts chronologically.
pub(crate) fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            // Rows written by SQLite's datetime('now') carry no timezone.
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .with_context(|| format!("Corrupt timestamp '{}'", raw))
}

pub(crate) fn parse_uuid(raw: &str) -> Result<Uuid> {
    raw.parse::<Uuid>()
        .with_context(|| format!("Corrupt id '{}'", raw))
}
