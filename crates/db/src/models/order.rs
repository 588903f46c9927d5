//! Order entity model and DTOs.

use std::fmt;

use billing_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// An order row joined with the display names of its product and client.
///
/// `product_name` and `client_name` are resolved through the foreign keys on
/// every read and are never written.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Order {
    pub id: DbId,
    pub client_id: DbId,
    pub product_id: DbId,
    /// Set by the database on insert, never updated.
    pub placed_at: Timestamp,
    pub quantity: i32,
    pub product_name: String,
    pub client_name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Order of {} by {}", self.product_name, self.client_name)
    }
}

/// DTO for creating a new order. Also the body of a full replace (`PUT`).
///
/// `client_id` is honoured for administrators only; everyone else orders on
/// behalf of their own client record.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateOrder {
    pub client_id: Option<DbId>,
    pub product_id: DbId,
    /// Defaults to 1 if omitted.
    #[validate(range(min = 1))]
    pub quantity: Option<i32>,
}

/// DTO for updating an existing order. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateOrder {
    pub client_id: Option<DbId>,
    pub product_id: Option<DbId>,
    #[validate(range(min = 1))]
    pub quantity: Option<i32>,
}

impl From<CreateOrder> for UpdateOrder {
    fn from(input: CreateOrder) -> Self {
        Self {
            client_id: input.client_id,
            product_id: Some(input.product_id),
            quantity: Some(input.quantity.unwrap_or(1)),
        }
    }
}
