use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// Account as exposed over the API. The password hash lives only in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Map {
    pub id: Uuid,
    /// Human-chosen public identifier used by viewer and public-edit links.
    pub map_id: String,
    pub title: String,
    pub description: String,
    pub user_id: Uuid,
    pub is_publicly_editable: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Floor {
    pub id: Uuid,
    pub map_id: Uuid,
    pub floor_number: i64,
    pub name: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pin {
    pub id: Uuid,
    pub floor_id: Uuid,
    pub title: String,
    pub description: String,
    pub x_position: f64,
    pub y_position: f64,
    pub image_url: String,
    /// Either the owning user's id or a public editor's id.
    pub editor_id: Uuid,
    pub editor_nickname: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Anonymous write session scoped to one publicly editable map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicEditor {
    pub id: Uuid,
    pub map_id: Uuid,
    pub nickname: String,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

/// Everything a read-only viewer needs to render one map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerData {
    pub map: Map,
    pub floors: Vec<Floor>,
    pub pins: Vec<Pin>,
}
