use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::credentials::CredentialError;

/// Single error type for services and handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("{0}")]
    Conflict(String),

    /// An administrator acting on their own account.
    #[error("{0}")]
    SelfProtection(&'static str),

    #[error("this map does not allow public editing")]
    MapNotPubliclyEditable,

    #[error("public editor not found")]
    EditorNotFound,

    #[error("invalid editor token")]
    InvalidToken,

    #[error("{0}")]
    Unauthorized(&'static str),

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error("internal error: {0:#}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::SelfProtection(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden(_) | Self::MapNotPubliclyEditable => StatusCode::FORBIDDEN,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::EditorNotFound | Self::InvalidToken | Self::Unauthorized(_) => {
                StatusCode::UNAUTHORIZED
            }
            Self::Credential(err) => match err {
                CredentialError::CredentialMismatch | CredentialError::InvalidSession => {
                    StatusCode::UNAUTHORIZED
                }
                CredentialError::Hashing(_) | CredentialError::Signing(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// A body that fails to parse, has the wrong shape or the wrong content type
/// is malformed input like any other.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Don't expose internal error details to clients
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self, "Request failed");
            "internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
