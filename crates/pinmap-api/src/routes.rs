use axum::{
    Json, Router, middleware,
    routing::{get, patch, post},
};
use serde_json::{Value, json};

use crate::middleware::{require_admin, require_auth, require_editor};
use crate::{AppState, account, admin, auth, floors, maps, pins, public_edit, viewer};

/// The full HTTP surface. CORS and tracing layers are added by the binary.
pub fn router(state: AppState) -> Router {
    let public_routes: Router = Router::new()
        .route("/health", get(health))
        .route("/api/health", get(health))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/maps/{id}/floors", get(floors::list_floors))
        .route("/api/floors/{id}", get(floors::get_floor))
        .route("/api/floors/{id}/pins", get(pins::list_pins))
        .route("/api/pins/{id}", get(pins::get_pin))
        .route("/api/public-edit/register", post(public_edit::register))
        .route("/api/public-edit/verify", post(public_edit::verify))
        .route("/api/viewer/{map_id}", get(viewer::map_data))
        .with_state(state.clone());

    let protected_routes: Router = Router::new()
        .route("/api/auth/me", get(auth::me))
        .route("/api/maps", get(maps::list_maps).post(maps::create_map))
        .route(
            "/api/maps/{id}",
            get(maps::get_map)
                .patch(maps::update_map)
                .delete(maps::delete_map),
        )
        .route("/api/maps/{id}/floors", post(floors::create_floor))
        .route("/api/maps/{id}/editors", get(maps::list_editors))
        .route(
            "/api/floors/{id}",
            patch(floors::update_floor).delete(floors::delete_floor),
        )
        .route("/api/floors/{id}/image", post(floors::set_floor_image))
        .route("/api/floors/{id}/pins", post(pins::create_pin))
        .route(
            "/api/pins/{id}",
            patch(pins::update_pin).delete(pins::delete_pin),
        )
        .route("/api/pins/{id}/image", post(pins::set_pin_image))
        .route("/api/account/update-profile", patch(account::update_profile))
        .route("/api/account/change-password", post(account::change_password))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state.clone());

    let admin_routes: Router = Router::new()
        .route("/api/admin/users", get(admin::list_users))
        .route(
            "/api/admin/users/{id}",
            patch(admin::update_role).delete(admin::delete_user),
        )
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state.clone());

    let editor_routes: Router = Router::new()
        .route("/api/public-edit/pins", post(public_edit::create_pin))
        .route(
            "/api/public-edit/pins/{id}",
            patch(public_edit::update_pin).delete(public_edit::delete_pin),
        )
        .layer(middleware::from_fn_with_state(state.clone(), require_editor))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(admin_routes)
        .merge(editor_routes)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
