//! Handlers for the `/orders` resource.
//!
//! A regular user orders on behalf of their own client record, which is
//! created on the first order if it does not exist yet. Administrators may
//! name any `client_id` explicitly.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use billing_core::access::{scope_for, Caller, Resource};
use billing_core::error::CoreError;
use billing_core::naming::{client_display_name, UNSPECIFIED_COMPANY};
use billing_core::types::DbId;
use billing_db::models::client::ProvisionClient;
use billing_db::models::order::{CreateOrder, Order, UpdateOrder};
use billing_db::repositories::{OrderRepo, UserRepo};
use validator::Validate;

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

const ENTITY: &str = Resource::Order.entity_name();

/// POST /api/v1/orders
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    AppJson(input): AppJson<CreateOrder>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let order = match input.client_id {
        Some(client_id) if user.is_staff => {
            OrderRepo::create(&state.pool, client_id, &input).await?
        }
        _ => {
            let provision = provision_for(&state, &user).await?;
            let (order, provisioned) =
                OrderRepo::create_for_user(&state.pool, &provision, &input).await?;
            if provisioned.created {
                tracing::info!(
                    client_id = provisioned.client.id,
                    user_id = user.user_id,
                    "Client auto-provisioned"
                );
            }
            order
        }
    };

    tracing::info!(
        order_id = order.id,
        client_id = order.client_id,
        product_id = order.product_id,
        user_id = user.user_id,
        "Order created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: order })))
}

/// GET /api/v1/orders
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> AppResult<impl IntoResponse> {
    let scope = scope_for(Resource::Order, &user.caller())?;
    let orders = OrderRepo::list(&state.pool, scope).await?;
    Ok(Json(DataResponse { data: orders }))
}

/// GET /api/v1/orders/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let scope = scope_for(Resource::Order, &user.caller())?;
    let order = OrderRepo::find_by_id(&state.pool, id, scope)
        .await?
        .ok_or(CoreError::not_found(ENTITY, id))?;
    Ok(Json(DataResponse { data: order }))
}

/// PUT /api/v1/orders/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<CreateOrder>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    apply_update(&state, user.caller(), id, input.into()).await
}

/// PATCH /api/v1/orders/{id}
pub async fn patch(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateOrder>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    apply_update(&state, user.caller(), id, input).await
}

/// DELETE /api/v1/orders/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    let scope = scope_for(Resource::Order, &user.caller())?;
    if OrderRepo::delete(&state.pool, id, scope).await? {
        tracing::info!(order_id = id, user_id = user.user_id, "Order deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CoreError::not_found(ENTITY, id).into())
    }
}

async fn apply_update(
    state: &AppState,
    caller: Caller,
    id: DbId,
    mut input: UpdateOrder,
) -> AppResult<Json<DataResponse<Order>>> {
    let scope = scope_for(Resource::Order, &caller)?;
    if !scope.is_unrestricted() {
        // Only administrators move orders between clients.
        input.client_id = None;
    }

    let order = OrderRepo::update(&state.pool, id, scope, &input)
        .await?
        .ok_or(CoreError::not_found(ENTITY, id))?;

    tracing::info!(order_id = id, user_id = caller.user_id, "Order updated");
    Ok(Json(DataResponse { data: order }))
}

/// Build the client record a user's first order would create.
///
/// The name comes from the user directory, not from the token.
async fn provision_for(state: &AppState, user: &AuthUser) -> AppResult<ProvisionClient> {
    let account = UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or_else(|| CoreError::Unauthorized("User account no longer exists".into()))?;

    Ok(ProvisionClient {
        user_id: account.id,
        full_name: client_display_name(
            &account.first_name,
            &account.last_name,
            &account.username,
            account.id,
        ),
        company: UNSPECIFIED_COMPANY.to_string(),
    })
}
