//! HTTP-level integration tests for the `/clients` resource.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router
//! without an actual TCP listener.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, delete, get, get_anonymous, patch_json, post_json, put_json,
};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Access control
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_clients_requires_auth(pool: PgPool) {
    let response = get_anonymous(build_test_app(pool), "/api/v1/clients").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_customer_cannot_list_clients(pool: PgPool) {
    let user = common::customer(&pool, "client1").await;

    let response = get(build_test_app(pool), "/api/v1/clients", &user.token).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["code"], "FORBIDDEN");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_customer_cannot_create_client(pool: PgPool) {
    let user = common::customer(&pool, "client1").await;

    let response = post_json(
        build_test_app(pool),
        "/api/v1/clients",
        &user.token,
        json!({"full_name": "Sneaky", "company": "Nope"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_client_returns_201(pool: PgPool) {
    let admin = common::admin(&pool).await;

    let response = post_json(
        build_test_app(pool),
        "/api/v1/clients",
        &admin.token,
        json!({"full_name": "Juan Perez Garcia", "company": "Empresa ABC S.A.C."}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["full_name"], "Juan Perez Garcia");
    assert_eq!(json["data"]["payment_status"], "OnTime");
    assert!(json["data"]["user_id"].is_null());
    assert_eq!(json["data"]["payments"], json!([]));
    assert!(json["data"]["id"].is_number());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_and_patch_client(pool: PgPool) {
    let admin = common::admin(&pool).await;
    let created = common::create(
        &pool,
        "/api/v1/clients",
        &admin.token,
        json!({"full_name": "Original", "company": "Acme"}),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let response = patch_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/clients/{id}"),
        &admin.token,
        json!({"payment_status": "HighRisk"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["payment_status"], "HighRisk");
    assert_eq!(json["data"]["full_name"], "Original");

    let response = put_json(
        build_test_app(pool),
        &format!("/api/v1/clients/{id}"),
        &admin.token,
        json!({"full_name": "Replaced", "company": "Acme Two"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["full_name"], "Replaced");
    assert_eq!(json["data"]["company"], "Acme Two");
    // A full replace without a status resets it to the default.
    assert_eq!(json["data"]["payment_status"], "OnTime");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_client_cascades(pool: PgPool) {
    let admin = common::admin(&pool).await;
    let client = common::create(
        &pool,
        "/api/v1/clients",
        &admin.token,
        json!({"full_name": "Doomed", "company": "Acme"}),
    )
    .await;
    let client_id = client["id"].as_i64().unwrap();
    let payment = common::create(
        &pool,
        "/api/v1/payments",
        &admin.token,
        json!({"client_id": client_id, "amount": "10.00", "due_date": "2099-01-31"}),
    )
    .await;
    let payment_id = payment["id"].as_i64().unwrap();

    let response = delete(
        build_test_app(pool.clone()),
        &format!("/api/v1/clients/{client_id}"),
        &admin.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(
        build_test_app(pool.clone()),
        &format!("/api/v1/clients/{client_id}"),
        &admin.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(
        build_test_app(pool),
        &format!("/api/v1/payments/{payment_id}"),
        &admin.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_client_embeds_its_payments(pool: PgPool) {
    let admin = common::admin(&pool).await;
    let client = common::create(
        &pool,
        "/api/v1/clients",
        &admin.token,
        json!({"full_name": "Payer", "company": "Acme"}),
    )
    .await;
    let client_id = client["id"].as_i64().unwrap();
    common::create(
        &pool,
        "/api/v1/payments",
        &admin.token,
        json!({"client_id": client_id, "amount": 2500, "due_date": "2099-01-31"}),
    )
    .await;

    let response = get(
        build_test_app(pool.clone()),
        &format!("/api/v1/clients/{client_id}"),
        &admin.token,
    )
    .await;
    let json = body_json(response).await;
    let payments = json["data"]["payments"].as_array().unwrap();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0]["amount"], "2500.00");
    assert_eq!(payments[0]["status"], "Pending");

    let response = get(build_test_app(pool), "/api/v1/clients", &admin.token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"][0]["payments"][0]["amount"], "2500.00");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_clients_listed_by_name(pool: PgPool) {
    let admin = common::admin(&pool).await;
    for name in ["Zeta", "Alpha"] {
        common::create(
            &pool,
            "/api/v1/clients",
            &admin.token,
            json!({"full_name": name, "company": "Acme"}),
        )
        .await;
    }

    let response = get(build_test_app(pool), "/api/v1/clients", &admin.token).await;
    let json = body_json(response).await;
    let names: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["full_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Alpha", "Zeta"]);
}

// ---------------------------------------------------------------------------
// Validation and constraints
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_payment_status_rejected(pool: PgPool) {
    let admin = common::admin(&pool).await;

    let response = post_json(
        build_test_app(pool),
        "/api/v1/clients",
        &admin.token,
        json!({"full_name": "X", "company": "Y", "payment_status": "Sometimes"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_blank_and_overlong_names_rejected(pool: PgPool) {
    let admin = common::admin(&pool).await;

    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/clients",
        &admin.token,
        json!({"full_name": "", "company": "Acme"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(
        build_test_app(pool),
        "/api/v1/clients",
        &admin.token,
        json!({"full_name": "x".repeat(101), "company": "Acme"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_client_for_unknown_user_rejected(pool: PgPool) {
    let admin = common::admin(&pool).await;

    let response = post_json(
        build_test_app(pool),
        "/api/v1/clients",
        &admin.token,
        json!({"user_id": 999999, "full_name": "Ghost", "company": "Acme"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_second_client_for_same_user_conflicts(pool: PgPool) {
    let admin = common::admin(&pool).await;
    let user = common::customer(&pool, "client1").await;
    common::create(
        &pool,
        "/api/v1/clients",
        &admin.token,
        json!({"user_id": user.id, "full_name": "First", "company": "Acme"}),
    )
    .await;

    let response = post_json(
        build_test_app(pool),
        "/api/v1/clients",
        &admin.token,
        json!({"user_id": user.id, "full_name": "Second", "company": "Acme"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_client_returns_404(pool: PgPool) {
    let admin = common::admin(&pool).await;

    let response = get(build_test_app(pool.clone()), "/api/v1/clients/999999", &admin.token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Client with id 999999 not found");

    let response = delete(build_test_app(pool), "/api/v1/clients/999999", &admin.token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// User link
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_replace_without_user_unlinks_client(pool: PgPool) {
    let admin = common::admin(&pool).await;
    let user = common::customer(&pool, "client1").await;
    let client = common::create(
        &pool,
        "/api/v1/clients",
        &admin.token,
        json!({"user_id": user.id, "full_name": "Linked", "company": "Acme"}),
    )
    .await;

    let response = put_json(
        build_test_app(pool),
        &format!("/api/v1/clients/{}", client["id"]),
        &admin.token,
        json!({"user_id": null, "full_name": "A", "company": "B"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"]["user_id"].is_null());
    assert_eq!(json["data"]["full_name"], "A");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_patch_user_link(pool: PgPool) {
    let admin = common::admin(&pool).await;
    let user = common::customer(&pool, "client1").await;
    let client = common::create(
        &pool,
        "/api/v1/clients",
        &admin.token,
        json!({"user_id": user.id, "full_name": "Linked", "company": "Acme"}),
    )
    .await;
    let uri = format!("/api/v1/clients/{}", client["id"]);

    // Omitting the key keeps the link.
    let response = patch_json(
        build_test_app(pool.clone()),
        &uri,
        &admin.token,
        json!({"company": "Acme Two"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["user_id"], user.id);

    let response = patch_json(
        build_test_app(pool.clone()),
        &uri,
        &admin.token,
        json!({"user_id": null}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"]["user_id"].is_null());
    assert_eq!(json["data"]["company"], "Acme Two");

    // And the link can be restored.
    let response = patch_json(
        build_test_app(pool),
        &uri,
        &admin.token,
        json!({"user_id": user.id}),
    )
    .await;
    assert_eq!(body_json(response).await["data"]["user_id"], user.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_non_numeric_client_id_is_json_400(pool: PgPool) {
    let admin = common::admin(&pool).await;

    let response = get(build_test_app(pool), "/api/v1/clients/abc", &admin.token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.headers()["content-type"], "application/json");
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}
