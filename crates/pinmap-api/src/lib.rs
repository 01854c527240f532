pub mod account;
pub mod admin;
pub mod auth;
pub mod credentials;
pub mod error;
pub mod floors;
pub mod maps;
pub mod middleware;
pub mod permissions;
pub mod pins;
pub mod public_edit;
pub mod routes;
pub mod services;
pub mod viewer;

use std::sync::Arc;

use anyhow::anyhow;
use tracing::error;

use pinmap_db::Store;

use crate::error::ApiError;
use crate::services::Services;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub services: Services,
    pub jwt_secret: String,
}

impl AppStateInner {
    pub fn new(store: Arc<dyn Store>, jwt_secret: String) -> AppState {
        Arc::new(Self {
            services: Services::new(store, jwt_secret.clone()),
            jwt_secret,
        })
    }
}

/// Runs a service call off the async runtime. Store access is synchronous.
pub(crate) async fn run_blocking<F, T>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        ApiError::Internal(anyhow!("blocking task failed: {}", e))
    })?
}
