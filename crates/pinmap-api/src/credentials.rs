//! Password hashing, session tokens and public-editor tokens.

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::RngCore;
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;

use pinmap_types::api::Claims;
use pinmap_types::models::Role;

pub const SESSION_TTL_HOURS: i64 = 24;

const EDITOR_TOKEN_BYTES: usize = 32;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("password hashing failed: {0}")]
    Hashing(String),
    #[error("invalid email or password")]
    CredentialMismatch,
    #[error("session signing failed: {0}")]
    Signing(String),
    #[error("invalid or expired session")]
    InvalidSession,
}

pub fn hash_password(password: &str) -> Result<String, CredentialError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CredentialError::Hashing(e.to_string()))
}

/// An unparsable stored digest is reported the same way as a wrong password.
pub fn verify_password(digest: &str, password: &str) -> Result<(), CredentialError> {
    let parsed = PasswordHash::new(digest).map_err(|_| CredentialError::CredentialMismatch)?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| CredentialError::CredentialMismatch)
}

pub fn issue_session(
    user_id: Uuid,
    email: &str,
    role: Role,
    secret: &str,
) -> Result<String, CredentialError> {
    if secret.is_empty() {
        return Err(CredentialError::Signing("empty signing secret".into()));
    }

    let now = Utc::now();
    let claims = Claims {
        sub: user_id,
        email: email.to_string(),
        role,
        iat: now.timestamp() as usize,
        exp: (now + Duration::hours(SESSION_TTL_HOURS)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| CredentialError::Signing(e.to_string()))
}

pub fn validate_session(token: &str, secret: &str) -> Result<Claims, CredentialError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| CredentialError::InvalidSession)
}

/// 32 random bytes, hex encoded. Handed to the editor once and never stored.
pub fn generate_editor_token() -> String {
    let mut bytes = [0u8; EDITOR_TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

pub fn digest_editor_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Compares a presented token against a stored digest in constant time.
pub fn editor_token_matches(stored_digest: &str, presented: &str) -> bool {
    let presented = digest_editor_token(presented);
    let (a, b) = (stored_digest.as_bytes(), presented.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-with-enough-entropy";

    #[test]
    fn password_round_trip_and_mismatch() {
        let digest = hash_password("hunter2hunter2").unwrap();
        assert!(digest.starts_with("$argon2id$"));
        assert!(verify_password(&digest, "hunter2hunter2").is_ok());
        assert!(matches!(
            verify_password(&digest, "wrong-password"),
            Err(CredentialError::CredentialMismatch)
        ));
    }

    #[test]
    fn garbage_digest_is_a_mismatch() {
        assert!(matches!(
            verify_password("not-a-phc-string", "whatever"),
            Err(CredentialError::CredentialMismatch)
        ));
    }

    #[test]
    fn session_carries_identity_and_day_long_expiry() {
        let id = Uuid::new_v4();
        let token = issue_session(id, "a@example.com", Role::Admin, SECRET).unwrap();
        let claims = validate_session(&token, SECRET).unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.email, "a@example.com");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.exp - claims.iat, (SESSION_TTL_HOURS * 3600) as usize);
    }

    #[test]
    fn session_rejected_with_wrong_secret() {
        let token = issue_session(Uuid::new_v4(), "a@example.com", Role::User, SECRET).unwrap();
        assert!(matches!(
            validate_session(&token, "some-other-secret"),
            Err(CredentialError::InvalidSession)
        ));
        assert!(validate_session("not.a.jwt", SECRET).is_err());
    }

    #[test]
    fn expired_session_rejected() {
        let issued = Utc::now() - Duration::hours(48);
        let claims = Claims {
            sub: Uuid::new_v4(),
            email: "a@example.com".into(),
            role: Role::User,
            iat: issued.timestamp() as usize,
            exp: (issued + Duration::hours(SESSION_TTL_HOURS)).timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        assert!(matches!(
            validate_session(&token, SECRET),
            Err(CredentialError::InvalidSession)
        ));
    }

    #[test]
    fn empty_secret_cannot_sign() {
        assert!(matches!(
            issue_session(Uuid::new_v4(), "a@example.com", Role::User, ""),
            Err(CredentialError::Signing(_))
        ));
    }

    #[test]
    fn editor_tokens() {
        let token = generate_editor_token();
        assert_eq!(token.len(), 64);
        assert_ne!(token, generate_editor_token());

        let digest = digest_editor_token(&token);
        assert!(editor_token_matches(&digest, &token));

        let mut tampered = token.clone().into_bytes();
        tampered[0] = if tampered[0] == b'0' { b'1' } else { b'0' };
        let tampered = String::from_utf8(tampered).unwrap();
        assert!(!editor_token_matches(&digest, &tampered));
    }
}
