use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use pinmap_api::AppStateInner;
use pinmap_api::routes::router;
use pinmap_db::{MemoryStore, Store, UserStore};
use pinmap_types::models::Role;

fn app() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let state = AppStateInner::new(store.clone() as Arc<dyn Store>, "http-test-secret".into());
    (router(state), store)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    auth: &[(&str, &str)],
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in auth {
        builder = builder.header(*name, *value);
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let request = builder.body(body).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn sign_up(app: &Router, email: &str) -> String {
    let (status, _) = send(
        app,
        "POST",
        "/api/auth/register",
        &[],
        Some(json!({ "email": email, "password": "password123", "name": "Tester" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        app,
        "POST",
        "/api/auth/login",
        &[],
        Some(json!({ "email": email, "password": "password123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    format!("Bearer {}", body["token"].as_str().unwrap())
}

#[tokio::test]
async fn health_is_public() {
    let (app, _) = app();
    let (status, body) = send(&app, "GET", "/api/health", &[], None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn protected_routes_need_a_valid_session() {
    let (app, _) = app();
    let (status, body) = send(&app, "GET", "/api/maps", &[], None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let (status, _) = send(
        &app,
        "GET",
        "/api/auth/me",
        &[("authorization", "Bearer not-a-token")],
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = sign_up(&app, "me@example.com").await;
    let auth = [("authorization", token.as_str())];
    let (status, body) = send(&app, "GET", "/api/auth/me", &auth, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "me@example.com");
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn map_floor_pin_lifecycle() {
    let (app, _) = app();
    let token = sign_up(&app, "owner@example.com").await;
    let auth = [("authorization", token.as_str())];

    let (status, map) = send(
        &app,
        "POST",
        "/api/maps",
        &auth,
        Some(json!({ "map_id": "hq", "title": "HQ", "is_publicly_editable": true })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let map_id = map["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        "POST",
        "/api/maps",
        &auth,
        Some(json!({ "map_id": "hq", "title": "Again" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, floor) = send(
        &app,
        "POST",
        &format!("/api/maps/{map_id}/floors"),
        &auth,
        Some(json!({ "floor_number": 1, "name": "Ground" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let floor_id = floor["id"].as_str().unwrap().to_string();

    // Listing floors needs no session, creating them does.
    let floors_uri = format!("/api/maps/{map_id}/floors");
    let (status, floors) = send(&app, "GET", &floors_uri, &[], None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(floors.as_array().unwrap().len(), 1);
    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/maps/{map_id}/floors"),
        &[],
        Some(json!({ "floor_number": 2, "name": "First" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, pin) = send(
        &app,
        "POST",
        &format!("/api/floors/{floor_id}/pins"),
        &auth,
        Some(json!({ "title": "Lobby", "x_position": 1.0, "y_position": 2.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(pin["editor_nickname"], "Tester");
    let pin_id = pin["id"].as_str().unwrap().to_string();

    let (status, pin) = send(
        &app,
        "PATCH",
        &format!("/api/pins/{pin_id}"),
        &auth,
        Some(json!({ "title": "", "description": "Front desk" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(pin["title"], "Lobby");
    assert_eq!(pin["description"], "Front desk");

    let (status, viewer) = send(&app, "GET", "/api/viewer/hq", &[], None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(viewer["pins"].as_array().unwrap().len(), 1);

    let (status, body) = send(&app, "DELETE", &format!("/api/maps/{map_id}"), &auth, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], map_id.as_str());

    let (status, _) = send(&app, "GET", &format!("/api/floors/{floor_id}/pins"), &[], None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn public_editor_flow() {
    let (app, _) = app();
    let token = sign_up(&app, "owner@example.com").await;
    let auth = [("authorization", token.as_str())];

    let (_, map) = send(
        &app,
        "POST",
        "/api/maps",
        &auth,
        Some(json!({ "map_id": "open-house", "title": "Open", "is_publicly_editable": true })),
    )
    .await;
    let map_id = map["id"].as_str().unwrap().to_string();
    let (_, floor) = send(
        &app,
        "POST",
        &format!("/api/maps/{map_id}/floors"),
        &auth,
        Some(json!({ "floor_number": 0, "name": "Ground" })),
    )
    .await;

    let (status, session) = send(
        &app,
        "POST",
        "/api/public-edit/register",
        &[],
        Some(json!({ "mapId": "open-house", "nickname": "Alice" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let editor_id = session["editorId"].as_str().unwrap().to_string();
    let editor_token = session["token"].as_str().unwrap().to_string();
    assert_eq!(editor_token.len(), 64);

    let (status, verified) = send(
        &app,
        "POST",
        "/api/public-edit/verify",
        &[],
        Some(json!({ "editorId": editor_id, "token": editor_token })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(verified["nickname"], "Alice");
    assert!(verified.get("token").is_none());

    let editor_auth = [
        ("x-editor-id", editor_id.as_str()),
        ("x-editor-token", editor_token.as_str()),
    ];
    let (status, pin) = send(
        &app,
        "POST",
        "/api/public-edit/pins",
        &editor_auth,
        Some(json!({
            "floor_id": floor["id"],
            "title": "Coffee",
            "x_position": 5.0,
            "y_position": 5.0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(pin["editor_id"], editor_id.as_str());
    let pin_id = pin["id"].as_str().unwrap().to_string();

    let bad_auth = [
        ("x-editor-id", editor_id.as_str()),
        ("x-editor-token", "0000"),
    ];
    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/public-edit/pins/{pin_id}"),
        &bad_auth,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/api/maps/{map_id}"),
        &auth,
        Some(json!({ "is_publicly_editable": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/api/public-edit/pins/{pin_id}"),
        &editor_auth,
        Some(json!({ "title": "Tea" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let editors_uri = format!("/api/maps/{map_id}/editors");
    let (status, editors) = send(&app, "GET", &editors_uri, &auth, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(editors.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn admin_routes_require_admin_role() {
    let (app, store) = app();
    let token = sign_up(&app, "admin@example.com").await;
    let auth = [("authorization", token.as_str())];

    let (status, _) = send(&app, "GET", "/api/admin/users", &auth, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let mut stored = store.user_by_email("admin@example.com").unwrap().unwrap();
    stored.user.role = Role::Admin;
    store.update_user(&stored).unwrap();
    // The role is carried in the session, so sign in again.
    let (_, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        &[],
        Some(json!({ "email": "admin@example.com", "password": "password123" })),
    )
    .await;
    let token = format!("Bearer {}", body["token"].as_str().unwrap());
    let auth = [("authorization", token.as_str())];

    let (status, users) = send(&app, "GET", "/api/admin/users", &auth, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users.as_array().unwrap().len(), 1);

    let own = format!("/api/admin/users/{}", stored.user.id);
    let (status, body) = send(&app, "DELETE", &own, &auth, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("own account"));

    let (status, _) = send(&app, "PATCH", &own, &auth, Some(json!({ "role": "user" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn account_updates() {
    let (app, _) = app();
    let token = sign_up(&app, "acct@example.com").await;
    let auth = [("authorization", token.as_str())];

    let (status, body) = send(
        &app,
        "PATCH",
        "/api/account/update-profile",
        &auth,
        Some(json!({ "name": "Renamed" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["name"], "Renamed");

    let (status, _) = send(
        &app,
        "POST",
        "/api/account/change-password",
        &auth,
        Some(json!({ "currentPassword": "wrong-one", "newPassword": "password456" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        "POST",
        "/api/account/change-password",
        &auth,
        Some(json!({ "currentPassword": "password123", "newPassword": "password456" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn malformed_bodies_are_bad_requests() {
    let (app, _) = app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/register",
        &[],
        Some(json!({ "email": "x@example.com", "password": "password123" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("name"));

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/register",
        &[],
        Some(json!({
            "email": "x@example.com",
            "password": "password123",
            "name": "X",
            "role": "admin"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/login",
        &[],
        Some(json!({ "email": 42, "password": "password123" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Not JSON at all.
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
