//! Client entity model and DTOs.

use std::fmt;

use billing_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::payment::Payment;

/// Payment-risk classification of a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "varchar")]
pub enum PaymentRisk {
    #[default]
    OnTime,
    Moderate,
    HighRisk,
}

impl PaymentRisk {
    pub const ALL: [PaymentRisk; 3] = [
        PaymentRisk::OnTime,
        PaymentRisk::Moderate,
        PaymentRisk::HighRisk,
    ];
}

/// A client row from the `clients` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Client {
    pub id: DbId,
    /// The user account this client belongs to, if any.
    pub user_id: Option<DbId>,
    pub full_name: String,
    pub company: String,
    pub payment_status: PaymentRisk,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl fmt::Display for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name)
    }
}

/// A client together with its payments, computed at read time.
#[derive(Debug, Clone, Serialize)]
pub struct ClientWithPayments {
    #[serde(flatten)]
    pub client: Client,
    pub payments: Vec<Payment>,
}

/// DTO for creating a new client. Also the body of a full replace (`PUT`).
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateClient {
    pub user_id: Option<DbId>,
    #[validate(length(min = 1, max = 100))]
    pub full_name: String,
    #[validate(length(min = 1, max = 100))]
    pub company: String,
    /// Defaults to `OnTime` if omitted.
    pub payment_status: Option<PaymentRisk>,
}

/// DTO for updating an existing client. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateClient {
    /// Absent keeps the link; `null` unlinks the client from its user.
    #[serde(default, deserialize_with = "crate::models::nullable")]
    pub user_id: Option<Option<DbId>>,
    #[validate(length(min = 1, max = 100))]
    pub full_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub company: Option<String>,
    pub payment_status: Option<PaymentRisk>,
}

impl From<CreateClient> for UpdateClient {
    fn from(input: CreateClient) -> Self {
        Self {
            user_id: Some(input.user_id),
            full_name: Some(input.full_name),
            company: Some(input.company),
            payment_status: Some(input.payment_status.unwrap_or_default()),
        }
    }
}

/// Values for a client created implicitly from a user account.
#[derive(Debug, Clone)]
pub struct ProvisionClient {
    pub user_id: DbId,
    pub full_name: String,
    pub company: String,
}
