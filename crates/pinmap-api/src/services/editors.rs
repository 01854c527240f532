use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use pinmap_db::{Store, StoredEditor};
use pinmap_types::models::PublicEditor;

use crate::credentials;
use crate::error::ApiError;
use crate::permissions;
use crate::services::load_map;

const MAX_NICKNAME_CHARS: usize = 50;

/// Anonymous editor sessions. Tokens never expire and are never rotated;
/// turning a map's public flag off only stops them from writing.
#[derive(Clone)]
pub struct EditorService {
    store: Arc<dyn Store>,
}

impl EditorService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Returns the new editor and its plaintext token. The token is not
    /// recoverable afterwards.
    pub fn register(
        &self,
        public_map_id: &str,
        nickname: &str,
    ) -> Result<(PublicEditor, String), ApiError> {
        let nickname = nickname.trim();
        if nickname.is_empty() {
            return Err(ApiError::validation("nickname is required"));
        }
        if nickname.chars().count() > MAX_NICKNAME_CHARS {
            return Err(ApiError::validation(format!(
                "nickname must be at most {MAX_NICKNAME_CHARS} characters"
            )));
        }

        let map = self
            .store
            .map_by_public_id(public_map_id)?
            .ok_or(ApiError::NotFound("map"))?;
        if !map.is_publicly_editable {
            return Err(ApiError::MapNotPubliclyEditable);
        }

        let token = credentials::generate_editor_token();
        let now = Utc::now();
        let stored = StoredEditor {
            editor: PublicEditor {
                id: Uuid::new_v4(),
                map_id: map.id,
                nickname: nickname.to_string(),
                created_at: now,
                last_active: now,
            },
            token_sha256: credentials::digest_editor_token(&token),
        };
        self.store.insert_editor(&stored)?;

        info!("Public editor {} registered on map {}", stored.editor.id, map.id);
        Ok((stored.editor, token))
    }

    /// Checks the token and refreshes `last_active`. If the refresh fails the
    /// verification fails with it.
    pub fn verify(&self, editor_id: Uuid, token: &str) -> Result<PublicEditor, ApiError> {
        let stored = self
            .store
            .editor_by_id(editor_id)?
            .ok_or(ApiError::EditorNotFound)?;

        if !credentials::editor_token_matches(&stored.token_sha256, token) {
            warn!("Rejected token for public editor {}", editor_id);
            return Err(ApiError::InvalidToken);
        }

        let now = Utc::now();
        self.store.touch_editor(editor_id, now)?;

        let mut editor = stored.editor;
        editor.last_active = now;
        Ok(editor)
    }

    pub fn list_for_map(&self, user_id: Uuid, map_id: Uuid) -> Result<Vec<PublicEditor>, ApiError> {
        let map = load_map(self.store.as_ref(), map_id)?;
        if !permissions::can_edit_map(&map, user_id) {
            return Err(ApiError::Forbidden("only the map owner can list its editors"));
        }
        Ok(self
            .store
            .editors_by_map(map_id)?
            .into_iter()
            .map(|stored| stored.editor)
            .collect())
    }
}
