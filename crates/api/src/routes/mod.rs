pub mod client;
pub mod dashboard;
pub mod health;
pub mod order;
pub mod payment;
pub mod product;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /clients                     list, create (admin)
///   /{id}                      get, replace, patch, delete (admin)
/// /payments                    list (?client_id=), create
///   /{id}                      get, replace, patch, delete
/// /products                    list, create
///   /{id}                      get, replace, patch, delete
/// /orders                      list, create
///   /{id}                      get, replace, patch, delete
/// /dashboard/stats             aggregate statistics (admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/clients", client::router())
        .nest("/payments", payment::router())
        .nest("/products", product::router())
        .nest("/orders", order::router())
        .nest("/dashboard", dashboard::router())
}
