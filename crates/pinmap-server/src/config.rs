use std::path::PathBuf;

use anyhow::{Context, Result, bail};

/// JWT secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &[
    "your-secret-key",
    "change-me-to-a-random-string",
    "dev-secret-change-me",
];

#[derive(Debug, Clone, PartialEq)]
pub enum AllowedOrigins {
    Any,
    List(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub jwt_secret: String,
    pub allowed_origins: AllowedOrigins,
    pub allow_credentials: bool,
    pub cors_max_age: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Unset and empty values fall
    /// back to defaults, except the JWT secret which is required.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let jwt_secret = var("PINMAP_JWT_SECRET").unwrap_or_default();
        if jwt_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
            bail!("PINMAP_JWT_SECRET is unset or still a placeholder");
        }

        let port = match var("PINMAP_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("PINMAP_PORT is not a valid port: '{}'", raw))?,
            None => 8080,
        };

        let cors_max_age = match var("PINMAP_CORS_MAX_AGE") {
            Some(raw) => raw
                .parse::<u64>()
                .with_context(|| format!("PINMAP_CORS_MAX_AGE is not a valid number: '{}'", raw))?,
            None => 86_400,
        };

        let allowed_origins = match var("PINMAP_ALLOWED_ORIGINS").as_deref() {
            None | Some("*") => AllowedOrigins::Any,
            Some(list) => AllowedOrigins::List(
                list.split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(String::from)
                    .collect(),
            ),
        };

        let allow_credentials = var("PINMAP_ALLOW_CREDENTIALS")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "true" | "1" | "yes"))
            .unwrap_or(false);

        let db_path = var("PINMAP_DB_PATH").unwrap_or_else(|| "pinmap.db".into());

        Ok(Self {
            host: var("PINMAP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            db_path: db_path.into(),
            jwt_secret,
            allowed_origins,
            allow_credentials,
            cors_max_age,
        })
    }
}
