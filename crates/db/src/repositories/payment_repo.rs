//! Repository for the `payments` table.
//!
//! Ownership is resolved through the parent client: a payment belongs to
//! the user linked to its client.

use billing_core::access::RowScope;
use billing_core::money;
use billing_core::types::DbId;
use sqlx::PgPool;

use crate::models::payment::{CreatePayment, Payment, PaymentFilter, UpdatePayment};

/// Column list shared across queries, qualified with the `p` alias.
const COLUMNS: &str = "p.id, p.client_id, p.amount, p.issue_date, p.due_date, p.status, \
                       p.created_at, p.updated_at";

/// Provides CRUD operations for payments.
pub struct PaymentRepo;

impl PaymentRepo {
    /// Insert a new payment, returning the created row.
    ///
    /// If `status` is `None` in the input, defaults to `Pending`. The issue
    /// date is stamped by the database.
    pub async fn create(pool: &PgPool, input: &CreatePayment) -> Result<Payment, sqlx::Error> {
        let query = format!(
            "INSERT INTO payments AS p (client_id, amount, due_date, status)
             VALUES ($1, $2, $3, COALESCE($4, 'Pending'))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Payment>(&query)
            .bind(input.client_id)
            .bind(money::normalize(input.amount))
            .bind(input.due_date)
            .bind(input.status)
            .fetch_one(pool)
            .await
    }

    /// Find a payment by ID within `scope`.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
        scope: RowScope,
    ) -> Result<Option<Payment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM payments p
             JOIN clients c ON c.id = p.client_id
             WHERE p.id = $1 AND ($2::BIGINT IS NULL OR c.user_id = $2)"
        );
        sqlx::query_as::<_, Payment>(&query)
            .bind(id)
            .bind(scope.owner())
            .fetch_optional(pool)
            .await
    }

    /// List payments within `scope`, ordered by due date.
    pub async fn list(
        pool: &PgPool,
        scope: RowScope,
        filter: PaymentFilter,
    ) -> Result<Vec<Payment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM payments p
             JOIN clients c ON c.id = p.client_id
             WHERE ($1::BIGINT IS NULL OR c.user_id = $1)
               AND ($2::BIGINT IS NULL OR p.client_id = $2)
             ORDER BY p.due_date, p.id"
        );
        sqlx::query_as::<_, Payment>(&query)
            .bind(scope.owner())
            .bind(filter.client_id)
            .fetch_all(pool)
            .await
    }

    /// List the payments of the given clients, ordered by due date.
    pub async fn list_for_clients(
        pool: &PgPool,
        client_ids: &[DbId],
    ) -> Result<Vec<Payment>, sqlx::Error> {
        if client_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {COLUMNS} FROM payments p
             WHERE p.client_id = ANY($1)
             ORDER BY p.due_date, p.id"
        );
        sqlx::query_as::<_, Payment>(&query)
            .bind(client_ids)
            .fetch_all(pool)
            .await
    }

    /// Update a payment within `scope`. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no visible row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        scope: RowScope,
        input: &UpdatePayment,
    ) -> Result<Option<Payment>, sqlx::Error> {
        let query = format!(
            "UPDATE payments AS p SET
                client_id = COALESCE($3, p.client_id),
                amount = COALESCE($4, p.amount),
                due_date = COALESCE($5, p.due_date),
                status = COALESCE($6, p.status)
             FROM clients c
             WHERE p.id = $1 AND c.id = p.client_id
               AND ($2::BIGINT IS NULL OR c.user_id = $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Payment>(&query)
            .bind(id)
            .bind(scope.owner())
            .bind(input.client_id)
            .bind(input.amount.map(money::normalize))
            .bind(input.due_date)
            .bind(input.status)
            .fetch_optional(pool)
            .await
    }

    /// Delete a payment within `scope`. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId, scope: RowScope) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM payments AS p USING clients c
             WHERE p.id = $1 AND c.id = p.client_id
               AND ($2::BIGINT IS NULL OR c.user_id = $2)",
        )
        .bind(id)
        .bind(scope.owner())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count the payments recorded for a client.
    pub async fn count_for_client(pool: &PgPool, client_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM payments WHERE client_id = $1")
            .bind(client_id)
            .fetch_one(pool)
            .await
    }
}
