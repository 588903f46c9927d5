//! Aggregates for the administrator dashboard.

use billing_core::types::DbId;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use crate::models::client::PaymentRisk;

/// Headline numbers across all clients.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    /// Sum of all payments in `Paid` status.
    pub total_revenue: Decimal,
    pub total_orders: i64,
    /// Product with the largest ordered quantity, if any order exists.
    pub top_product: Option<TopProduct>,
    /// Client count per payment-risk status; every status is listed.
    pub client_segments: Vec<ClientSegment>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TopProduct {
    pub product_id: DbId,
    pub name: String,
    pub total_quantity: i64,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ClientSegment {
    pub payment_status: PaymentRisk,
    pub count: i64,
}
