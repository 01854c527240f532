mod config;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::{
    HeaderName, HeaderValue, Method,
    header::{AUTHORIZATION, CONTENT_TYPE},
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use pinmap_api::AppStateInner;
use pinmap_api::middleware::{EDITOR_ID_HEADER, EDITOR_TOKEN_HEADER};
use pinmap_api::routes;
use pinmap_db::{Database, Store};

use crate::config::{AllowedOrigins, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pinmap=debug,pinmap_api=debug,tower_http=debug".into()),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("FATAL: {:#}", e);
            eprintln!("       Set it in your .env file and restart.");
            std::process::exit(1);
        }
    };

    let db = Database::open(&config.db_path)?;
    let store: Arc<dyn Store> = Arc::new(db);
    let state = AppStateInner::new(store, config.jwt_secret.clone());

    let app = routes::router(state)
        .layer(cors_layer(&config))
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Pinmap server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origin = match &config.allowed_origins {
        // Browsers reject a wildcard origin on credentialed requests.
        AllowedOrigins::Any if config.allow_credentials => AllowOrigin::mirror_request(),
        AllowedOrigins::Any => AllowOrigin::any(),
        AllowedOrigins::List(origins) => {
            let parsed: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|o| match HeaderValue::from_str(o) {
                    Ok(value) => Some(value),
                    Err(_) => {
                        warn!("Ignoring invalid CORS origin '{}'", o);
                        None
                    }
                })
                .collect();
            AllowOrigin::list(parsed)
        }
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            AUTHORIZATION,
            CONTENT_TYPE,
            HeaderName::from_static(EDITOR_ID_HEADER),
            HeaderName::from_static(EDITOR_TOKEN_HEADER),
        ])
        .allow_credentials(config.allow_credentials)
        .max_age(Duration::from_secs(config.cors_max_age))
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
                }
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                ctrl_c.await.ok();
                info!("Received Ctrl+C, shutting down...");
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
