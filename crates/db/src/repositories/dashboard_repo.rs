//! Read-only aggregates for the administrator dashboard.

use billing_core::money;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::models::client::PaymentRisk;
use crate::models::dashboard::{ClientSegment, DashboardStats, TopProduct};

/// Computes dashboard statistics across all clients.
pub struct DashboardRepo;

impl DashboardRepo {
    /// Revenue, order count, best-selling product and client segmentation.
    pub async fn stats(pool: &PgPool) -> Result<DashboardStats, sqlx::Error> {
        let total_revenue: Decimal = sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount), 0) FROM payments WHERE status = 'Paid'",
        )
        .fetch_one(pool)
        .await?;

        let total_orders: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(pool)
            .await?;

        let top_product = sqlx::query_as::<_, TopProduct>(
            "SELECT p.id AS product_id, p.name, SUM(o.quantity)::BIGINT AS total_quantity
             FROM orders o
             JOIN products p ON p.id = o.product_id
             GROUP BY p.id, p.name
             ORDER BY total_quantity DESC, p.id
             LIMIT 1",
        )
        .fetch_optional(pool)
        .await?;

        let counted = sqlx::query_as::<_, ClientSegment>(
            "SELECT payment_status, COUNT(*) AS count FROM clients GROUP BY payment_status",
        )
        .fetch_all(pool)
        .await?;

        let client_segments = PaymentRisk::ALL
            .into_iter()
            .map(|status| ClientSegment {
                payment_status: status,
                count: counted
                    .iter()
                    .find(|s| s.payment_status == status)
                    .map_or(0, |s| s.count),
            })
            .collect();

        Ok(DashboardStats {
            total_revenue: money::normalize(total_revenue),
            total_orders,
            top_product,
            client_segments,
        })
    }
}
