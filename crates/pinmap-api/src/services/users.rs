use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use pinmap_db::{Store, StoredUser};
use pinmap_types::api::{LoginRequest, LoginResponse, RegisterRequest};
use pinmap_types::models::{Role, User};

use crate::credentials::{self, CredentialError};
use crate::error::ApiError;
use crate::services::{conflict_on_duplicate, normalize_email, require_text};

const MIN_PASSWORD_LEN: usize = 8;
const DUPLICATE_EMAIL: &str = "this email address is already registered";

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn Store>,
    jwt_secret: Arc<str>,
}

impl UserService {
    pub fn new(store: Arc<dyn Store>, jwt_secret: String) -> Self {
        Self {
            store,
            jwt_secret: jwt_secret.into(),
        }
    }

    pub fn register(&self, req: RegisterRequest) -> Result<User, ApiError> {
        let email = normalize_email(&req.email);
        if !email.contains('@') {
            return Err(ApiError::validation("a valid email address is required"));
        }
        check_password(&req.password)?;
        require_text("name", &req.name)?;

        if self.store.user_by_email(&email)?.is_some() {
            return Err(ApiError::Conflict(DUPLICATE_EMAIL.into()));
        }

        let stored = StoredUser {
            user: User {
                id: Uuid::new_v4(),
                email,
                name: req.name,
                role: Role::User,
                created_at: Utc::now(),
            },
            password_hash: credentials::hash_password(&req.password)?,
        };
        // A concurrent registration can still win between the check and here.
        self.store
            .insert_user(&stored)
            .map_err(|e| conflict_on_duplicate(e, DUPLICATE_EMAIL))?;

        info!("User registered: {}", stored.user.id);
        Ok(stored.user)
    }

    /// Unknown email and wrong password fail identically.
    pub fn login(&self, req: LoginRequest) -> Result<LoginResponse, ApiError> {
        let stored = self
            .store
            .user_by_email(&normalize_email(&req.email))?
            .ok_or(CredentialError::CredentialMismatch)?;
        credentials::verify_password(&stored.password_hash, &req.password)?;

        let user = stored.user;
        let token = credentials::issue_session(user.id, &user.email, user.role, &self.jwt_secret)?;
        Ok(LoginResponse { token, user })
    }

    pub fn me(&self, user_id: Uuid) -> Result<User, ApiError> {
        Ok(self.load(user_id)?.user)
    }

    pub fn update_profile(&self, user_id: Uuid, name: String) -> Result<User, ApiError> {
        require_text("name", &name)?;
        let mut stored = self.load(user_id)?;
        stored.user.name = name;
        self.store.update_user(&stored)?;
        Ok(stored.user)
    }

    pub fn change_password(
        &self,
        user_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), ApiError> {
        check_password(new_password)?;
        let mut stored = self.load(user_id)?;
        credentials::verify_password(&stored.password_hash, current_password)?;

        stored.password_hash = credentials::hash_password(new_password)?;
        self.store.update_user(&stored)?;
        info!("Password changed for user {}", user_id);
        Ok(())
    }

    pub fn list_users(&self) -> Result<Vec<User>, ApiError> {
        Ok(self
            .store
            .list_users()?
            .into_iter()
            .map(|stored| stored.user)
            .collect())
    }

    pub fn update_role(&self, acting: Uuid, target: Uuid, role: Role) -> Result<User, ApiError> {
        if acting == target {
            return Err(ApiError::SelfProtection(
                "administrators cannot change their own role",
            ));
        }
        let mut stored = self.load(target)?;
        stored.user.role = role;
        self.store.update_user(&stored)?;
        info!("User {} role set to {} by {}", target, role, acting);
        Ok(stored.user)
    }

    pub fn delete_user(&self, acting: Uuid, target: Uuid) -> Result<(), ApiError> {
        if acting == target {
            return Err(ApiError::SelfProtection(
                "administrators cannot delete their own account",
            ));
        }
        self.load(target)?;
        self.store.delete_user(target)?;
        info!("User {} deleted by {}", target, acting);
        Ok(())
    }

    fn load(&self, user_id: Uuid) -> Result<StoredUser, ApiError> {
        self.store
            .user_by_id(user_id)?
            .ok_or(ApiError::NotFound("user"))
    }
}

fn check_password(password: &str) -> Result<(), ApiError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}
