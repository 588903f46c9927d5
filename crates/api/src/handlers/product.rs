//! Handlers for the `/products` resource.
//!
//! The catalog is shared: every authenticated user sees and edits all rows.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use billing_core::access::Resource;
use billing_core::error::CoreError;
use billing_core::types::DbId;
use billing_db::models::product::{CreateProduct, Product, UpdateProduct};
use billing_db::repositories::ProductRepo;
use validator::Validate;

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath};
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

const ENTITY: &str = Resource::Product.entity_name();

/// POST /api/v1/products
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    AppJson(input): AppJson<CreateProduct>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let product = ProductRepo::create(&state.pool, &input).await?;

    tracing::info!(product_id = product.id, user_id = user.user_id, "Product created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: product })))
}

/// GET /api/v1/products
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<impl IntoResponse> {
    let products = ProductRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: products }))
}

/// GET /api/v1/products/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let product = ProductRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::not_found(ENTITY, id))?;
    Ok(Json(DataResponse { data: product }))
}

/// PUT /api/v1/products/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<CreateProduct>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    apply_update(&state, user.user_id, id, input.into()).await
}

/// PATCH /api/v1/products/{id}
pub async fn patch(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateProduct>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    apply_update(&state, user.user_id, id, input).await
}

/// DELETE /api/v1/products/{id}
///
/// Orders of the product are removed with it.
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    if ProductRepo::delete(&state.pool, id).await? {
        tracing::info!(product_id = id, user_id = user.user_id, "Product deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CoreError::not_found(ENTITY, id).into())
    }
}

async fn apply_update(
    state: &AppState,
    user_id: DbId,
    id: DbId,
    input: UpdateProduct,
) -> AppResult<Json<DataResponse<Product>>> {
    let product = ProductRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::not_found(ENTITY, id))?;

    tracing::info!(product_id = id, user_id, "Product updated");
    Ok(Json(DataResponse { data: product }))
}
