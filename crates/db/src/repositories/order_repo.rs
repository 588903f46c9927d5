//! Repository for the `orders` table.
//!
//! Every read joins `products` and `clients` so the returned [`Order`]
//! carries both display names. Writes go through a CTE and are read back
//! through the same join in a single round trip.

use billing_core::access::RowScope;
use billing_core::types::DbId;
use sqlx::PgPool;

use crate::models::client::ProvisionClient;
use crate::models::order::{CreateOrder, Order, UpdateOrder};
use crate::repositories::{ClientRepo, ProvisionedClient};

/// Column list for the joined read model.
const COLUMNS: &str = "o.id, o.client_id, o.product_id, o.placed_at, o.quantity, \
                       p.name AS product_name, c.full_name AS client_name, \
                       o.created_at, o.updated_at";

/// Join clause resolving product and client names for the `o` relation.
const JOINS: &str = "JOIN products p ON p.id = o.product_id \
                     JOIN clients c ON c.id = o.client_id";

/// Provides CRUD operations for orders.
pub struct OrderRepo;

impl OrderRepo {
    /// Insert an order for an explicit client, returning the joined row.
    ///
    /// `input.client_id` is ignored in favour of `client_id`. Quantity
    /// defaults to 1.
    pub async fn create(
        pool: &PgPool,
        client_id: DbId,
        input: &CreateOrder,
    ) -> Result<Order, sqlx::Error> {
        sqlx::query_as::<_, Order>(&insert_query())
            .bind(client_id)
            .bind(input.product_id)
            .bind(input.quantity)
            .fetch_one(pool)
            .await
    }

    /// Insert an order on behalf of a user's own client record.
    ///
    /// The client is created from `client` when the user has none yet. Both
    /// writes share one transaction, so a rejected order leaves no client
    /// behind.
    pub async fn create_for_user(
        pool: &PgPool,
        client: &ProvisionClient,
        input: &CreateOrder,
    ) -> Result<(Order, ProvisionedClient), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let provisioned = ClientRepo::find_or_provision_in_tx(&mut tx, client).await?;
        let order = sqlx::query_as::<_, Order>(&insert_query())
            .bind(provisioned.client.id)
            .bind(input.product_id)
            .bind(input.quantity)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok((order, provisioned))
    }

    /// Find an order by ID within `scope`.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
        scope: RowScope,
    ) -> Result<Option<Order>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM orders o {JOINS}
             WHERE o.id = $1 AND ($2::BIGINT IS NULL OR c.user_id = $2)"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .bind(scope.owner())
            .fetch_optional(pool)
            .await
    }

    /// List orders within `scope`, most recently placed first.
    pub async fn list(pool: &PgPool, scope: RowScope) -> Result<Vec<Order>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM orders o {JOINS}
             WHERE ($1::BIGINT IS NULL OR c.user_id = $1)
             ORDER BY o.placed_at DESC, o.id DESC"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(scope.owner())
            .fetch_all(pool)
            .await
    }

    /// Update an order within `scope`. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no visible row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        scope: RowScope,
        input: &UpdateOrder,
    ) -> Result<Option<Order>, sqlx::Error> {
        let query = format!(
            "WITH o AS (
                UPDATE orders AS target SET
                    client_id = COALESCE($3, target.client_id),
                    product_id = COALESCE($4, target.product_id),
                    quantity = COALESCE($5, target.quantity)
                FROM clients cl
                WHERE target.id = $1 AND cl.id = target.client_id
                  AND ($2::BIGINT IS NULL OR cl.user_id = $2)
                RETURNING target.*
             )
             SELECT {COLUMNS} FROM o {JOINS}"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .bind(scope.owner())
            .bind(input.client_id)
            .bind(input.product_id)
            .bind(input.quantity)
            .fetch_optional(pool)
            .await
    }

    /// Delete an order within `scope`. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId, scope: RowScope) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM orders AS o USING clients c
             WHERE o.id = $1 AND c.id = o.client_id
               AND ($2::BIGINT IS NULL OR c.user_id = $2)",
        )
        .bind(id)
        .bind(scope.owner())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count the orders placed for a client.
    pub async fn count_for_client(pool: &PgPool, client_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE client_id = $1")
            .bind(client_id)
            .fetch_one(pool)
            .await
    }
}

/// `$1` client, `$2` product, `$3` optional quantity.
fn insert_query() -> String {
    format!(
        "WITH o AS (
            INSERT INTO orders (client_id, product_id, quantity)
            VALUES ($1, $2, COALESCE($3, 1))
            RETURNING *
         )
         SELECT {COLUMNS} FROM o {JOINS}"
    )
}
