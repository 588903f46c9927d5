//! Handlers for the `/clients` resource. Administrators only.
//!
//! Every response embeds the client's payments, loaded at read time.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use billing_core::access::Resource;
use billing_core::error::CoreError;
use billing_core::types::DbId;
use billing_db::models::client::{ClientWithPayments, CreateClient, UpdateClient};
use billing_db::repositories::{ClientRepo, PaymentRepo};
use validator::Validate;

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

const ENTITY: &str = Resource::Client.entity_name();

/// POST /api/v1/clients
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    AppJson(input): AppJson<CreateClient>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let client = ClientRepo::create(&state.pool, &input).await?;

    tracing::info!(client_id = client.id, user_id = admin.user_id, "Client created");

    let data = ClientWithPayments {
        client,
        payments: Vec::new(),
    };
    Ok((StatusCode::CREATED, Json(DataResponse { data })))
}

/// GET /api/v1/clients
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<impl IntoResponse> {
    let clients = ClientRepo::list_with_payments(&state.pool).await?;
    Ok(Json(DataResponse { data: clients }))
}

/// GET /api/v1/clients/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let client = ClientRepo::find_with_payments(&state.pool, id)
        .await?
        .ok_or(CoreError::not_found(ENTITY, id))?;
    Ok(Json(DataResponse { data: client }))
}

/// PUT /api/v1/clients/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<CreateClient>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    apply_update(&state, admin.user_id, id, input.into()).await
}

/// PATCH /api/v1/clients/{id}
pub async fn patch(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateClient>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    apply_update(&state, admin.user_id, id, input).await
}

/// DELETE /api/v1/clients/{id}
///
/// Payments and orders of the client are removed with it.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    if ClientRepo::delete(&state.pool, id).await? {
        tracing::info!(client_id = id, user_id = admin.user_id, "Client deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CoreError::not_found(ENTITY, id).into())
    }
}

async fn apply_update(
    state: &AppState,
    user_id: DbId,
    id: DbId,
    input: UpdateClient,
) -> AppResult<Json<DataResponse<ClientWithPayments>>> {
    let client = ClientRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::not_found(ENTITY, id))?;
    let payments = PaymentRepo::list_for_clients(&state.pool, &[client.id]).await?;

    tracing::info!(client_id = id, user_id, "Client updated");
    Ok(Json(DataResponse {
        data: ClientWithPayments { client, payments },
    }))
}
