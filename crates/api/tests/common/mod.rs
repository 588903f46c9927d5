#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use billing_api::auth::jwt::{generate_access_token, JwtConfig};
use billing_api::config::ServerConfig;
use billing_api::router::build_app_router;
use billing_api::state::AppState;
use billing_core::types::DbId;
use billing_db::models::user::CreateUser;
use billing_db::repositories::UserRepo;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Identities
// ---------------------------------------------------------------------------

/// A user row plus a bearer token for it.
pub struct TestUser {
    pub id: DbId,
    pub token: String,
}

async fn create_user(
    pool: &PgPool,
    username: &str,
    first_name: &str,
    last_name: &str,
    is_staff: bool,
) -> TestUser {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            password_hash: "not-a-real-hash".to_string(),
            is_staff,
        },
    )
    .await
    .unwrap();

    TestUser {
        id: user.id,
        token: token_for(user.id, username, is_staff),
    }
}

/// Mint a token the identity provider would issue.
pub fn token_for(user_id: DbId, username: &str, is_staff: bool) -> String {
    generate_access_token(user_id, username, is_staff, &test_config().jwt).unwrap()
}

pub async fn admin(pool: &PgPool) -> TestUser {
    create_user(pool, "admin", "", "", true).await
}

pub async fn customer(pool: &PgPool, username: &str) -> TestUser {
    create_user(pool, username, "Test", username, false).await
}

/// A non-staff user with a chosen first and last name.
pub async fn named_customer(
    pool: &PgPool,
    username: &str,
    first_name: &str,
    last_name: &str,
) -> TestUser {
    create_user(pool, username, first_name, last_name, false).await
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Send one request through the router.
pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

/// POST a raw, possibly malformed, JSON body.
pub async fn post_raw(app: Router, uri: &str, token: &str, raw: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"))
        .header("Content-Type", "application/json")
        .body(Body::from(raw.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn get_anonymous(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn post_json(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn patch_json(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(token), Some(body)).await
}

pub async fn delete(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// POST a JSON body and return the `data` payload of the response.
pub async fn create(
    pool: &PgPool,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> serde_json::Value {
    let response = post_json(build_test_app(pool.clone()), uri, token, body).await;
    assert_eq!(
        response.status(),
        axum::http::StatusCode::CREATED,
        "POST {uri} failed"
    );
    body_json(response).await["data"].clone()
}
