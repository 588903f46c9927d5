//! Payment entity model and DTOs.

use billing_core::money::validate_money;
use billing_core::types::{Date, DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Settlement state of a payment. Changed only by explicit updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "varchar")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Overdue,
}

/// A payment row from the `payments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Payment {
    pub id: DbId,
    pub client_id: DbId,
    /// `NUMERIC(10,2)`; serialized as a string with two decimals.
    pub amount: Decimal,
    /// Set by the database on insert, never updated.
    pub issue_date: Date,
    pub due_date: Date,
    pub status: PaymentStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new payment. Also the body of a full replace (`PUT`).
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePayment {
    pub client_id: DbId,
    #[validate(custom(function = "validate_money"))]
    pub amount: Decimal,
    pub due_date: Date,
    /// Defaults to `Pending` if omitted.
    pub status: Option<PaymentStatus>,
}

/// DTO for updating an existing payment. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdatePayment {
    pub client_id: Option<DbId>,
    #[validate(custom(function = "validate_money"))]
    pub amount: Option<Decimal>,
    pub due_date: Option<Date>,
    pub status: Option<PaymentStatus>,
}

impl From<CreatePayment> for UpdatePayment {
    fn from(input: CreatePayment) -> Self {
        Self {
            client_id: Some(input.client_id),
            amount: Some(input.amount),
            due_date: Some(input.due_date),
            status: Some(input.status.unwrap_or_default()),
        }
    }
}

/// Optional filters for listing payments.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaymentFilter {
    pub client_id: Option<DbId>,
}
