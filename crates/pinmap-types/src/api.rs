use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Role, User};

// -- JWT Claims --

/// Session token claims, shared by the credential store and the auth middleware.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: Role,
    pub iat: usize,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserEnvelope {
    pub user: User,
}

// -- Account --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateProfileRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateRoleRequest {
    pub role: Role,
}

// -- Maps --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateMapRequest {
    pub map_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_publicly_editable: bool,
}

/// Sparse patch: absent or empty fields leave the stored value untouched.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateMapRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_publicly_editable: Option<bool>,
}

// -- Floors --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateFloorRequest {
    pub floor_number: i64,
    pub name: String,
    #[serde(default)]
    pub image_url: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateFloorRequest {
    pub name: Option<String>,
    pub floor_number: Option<i64>,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetImageRequest {
    pub image_url: String,
}

// -- Pins --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreatePinRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub x_position: f64,
    pub y_position: f64,
    #[serde(default)]
    pub image_url: String,
}

/// Body of `POST /api/public-edit/pins`, which carries the floor in the payload.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreatePublicPinRequest {
    pub floor_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub x_position: f64,
    pub y_position: f64,
    #[serde(default)]
    pub image_url: String,
}

impl CreatePublicPinRequest {
    pub fn into_parts(self) -> (Uuid, CreatePinRequest) {
        (
            self.floor_id,
            CreatePinRequest {
                title: self.title,
                description: self.description,
                x_position: self.x_position,
                y_position: self.y_position,
                image_url: self.image_url,
            },
        )
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdatePinRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub x_position: Option<f64>,
    pub y_position: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeletedResponse {
    pub message: String,
    pub id: Uuid,
}

// -- Public editors --

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegisterEditorRequest {
    pub map_id: String,
    pub nickname: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VerifyEditorRequest {
    pub editor_id: Uuid,
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorSessionResponse {
    pub editor_id: Uuid,
    pub nickname: String,
    pub map_id: Uuid,
    /// Only present in the registration response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub verified: bool,
}
