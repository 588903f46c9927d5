//! Query parameter types for list endpoints.

use billing_core::types::DbId;
use billing_db::models::payment::PaymentFilter;
use serde::Deserialize;

/// `GET /payments?client_id=` filter.
#[derive(Debug, Default, Deserialize)]
pub struct PaymentListParams {
    pub client_id: Option<DbId>,
}

impl From<PaymentListParams> for PaymentFilter {
    fn from(params: PaymentListParams) -> Self {
        PaymentFilter {
            client_id: params.client_id,
        }
    }
}
