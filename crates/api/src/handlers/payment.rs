//! Handlers for the `/payments` resource.
//!
//! Administrators see every payment. Everyone else sees, and may only
//! reference, payments of their own client record.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use billing_core::access::{scope_for, Caller, Resource, RowScope};
use billing_core::error::CoreError;
use billing_core::types::DbId;
use billing_db::models::payment::{CreatePayment, Payment, UpdatePayment};
use billing_db::repositories::{ClientRepo, PaymentRepo};
use validator::Validate;

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::rbac::RequireAuth;
use crate::query::PaymentListParams;
use crate::response::DataResponse;
use crate::state::AppState;

const ENTITY: &str = Resource::Payment.entity_name();

/// POST /api/v1/payments
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    AppJson(input): AppJson<CreatePayment>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let scope = scope_for(Resource::Payment, &user.caller())?;
    ensure_client_visible(&state, input.client_id, scope).await?;

    let payment = PaymentRepo::create(&state.pool, &input).await?;

    tracing::info!(
        payment_id = payment.id,
        client_id = payment.client_id,
        user_id = user.user_id,
        "Payment created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: payment })))
}

/// GET /api/v1/payments
///
/// Optional `?client_id=` narrows the visible set to one client.
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    AppQuery(params): AppQuery<PaymentListParams>,
) -> AppResult<impl IntoResponse> {
    let scope = scope_for(Resource::Payment, &user.caller())?;
    let payments = PaymentRepo::list(&state.pool, scope, params.into()).await?;
    Ok(Json(DataResponse { data: payments }))
}

/// GET /api/v1/payments/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let scope = scope_for(Resource::Payment, &user.caller())?;
    let payment = PaymentRepo::find_by_id(&state.pool, id, scope)
        .await?
        .ok_or(CoreError::not_found(ENTITY, id))?;
    Ok(Json(DataResponse { data: payment }))
}

/// PUT /api/v1/payments/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<CreatePayment>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    apply_update(&state, user.caller(), id, input.into()).await
}

/// PATCH /api/v1/payments/{id}
pub async fn patch(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdatePayment>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    apply_update(&state, user.caller(), id, input).await
}

/// DELETE /api/v1/payments/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    let scope = scope_for(Resource::Payment, &user.caller())?;
    if PaymentRepo::delete(&state.pool, id, scope).await? {
        tracing::info!(payment_id = id, user_id = user.user_id, "Payment deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CoreError::not_found(ENTITY, id).into())
    }
}

async fn apply_update(
    state: &AppState,
    caller: Caller,
    id: DbId,
    mut input: UpdatePayment,
) -> AppResult<Json<DataResponse<Payment>>> {
    let scope = scope_for(Resource::Payment, &caller)?;
    if !scope.is_unrestricted() {
        // Only administrators move payments between clients.
        input.client_id = None;
    }

    let payment = PaymentRepo::update(&state.pool, id, scope, &input)
        .await?
        .ok_or(CoreError::not_found(ENTITY, id))?;

    tracing::info!(payment_id = id, user_id = caller.user_id, "Payment updated");
    Ok(Json(DataResponse { data: payment }))
}

/// Reject references to clients outside the caller's scope as if they did
/// not exist. Unrestricted callers are checked by the foreign key instead.
async fn ensure_client_visible(
    state: &AppState,
    client_id: DbId,
    scope: RowScope,
) -> AppResult<()> {
    let Some(owner) = scope.owner() else {
        return Ok(());
    };
    match ClientRepo::find_visible(&state.pool, client_id, Some(owner)).await? {
        Some(_) => Ok(()),
        None => Err(CoreError::missing_reference("client_id", client_id).into()),
    }
}
