//! Repository for the `clients` table.

use std::collections::HashMap;

use billing_core::types::DbId;
use sqlx::PgPool;

use crate::models::client::{
    Client, ClientWithPayments, CreateClient, ProvisionClient, UpdateClient,
};
use crate::repositories::PaymentRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, full_name, company, payment_status, created_at, updated_at";

/// Outcome of [`ClientRepo::find_or_provision`].
#[derive(Debug, Clone)]
pub struct ProvisionedClient {
    pub client: Client,
    /// `true` when the row was inserted by this call.
    pub created: bool,
}

/// Provides CRUD operations for clients.
pub struct ClientRepo;

impl ClientRepo {
    /// Insert a new client, returning the created row.
    ///
    /// If `payment_status` is `None` in the input, defaults to `OnTime`.
    pub async fn create(pool: &PgPool, input: &CreateClient) -> Result<Client, sqlx::Error> {
        let query = format!(
            "INSERT INTO clients (user_id, full_name, company, payment_status)
             VALUES ($1, $2, $3, COALESCE($4, 'OnTime'))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(input.user_id)
            .bind(&input.full_name)
            .bind(&input.company)
            .bind(input.payment_status)
            .fetch_one(pool)
            .await
    }

    /// Find a client by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Client>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clients WHERE id = $1");
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a client by ID, restricted to those linked to `owner` when given.
    pub async fn find_visible(
        pool: &PgPool,
        id: DbId,
        owner: Option<DbId>,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM clients
             WHERE id = $1 AND ($2::BIGINT IS NULL OR user_id = $2)"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .bind(owner)
            .fetch_optional(pool)
            .await
    }

    /// Find the client linked to a user account.
    pub async fn find_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clients WHERE user_id = $1");
        sqlx::query_as::<_, Client>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Find a client together with its payments.
    pub async fn find_with_payments(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ClientWithPayments>, sqlx::Error> {
        let Some(client) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let payments = PaymentRepo::list_for_clients(pool, &[client.id]).await?;
        Ok(Some(ClientWithPayments { client, payments }))
    }

    /// List all clients ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Client>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clients ORDER BY full_name, id");
        sqlx::query_as::<_, Client>(&query).fetch_all(pool).await
    }

    /// List all clients ordered by name, each with its payments.
    ///
    /// Payments are loaded in a single query and grouped in memory.
    pub async fn list_with_payments(
        pool: &PgPool,
    ) -> Result<Vec<ClientWithPayments>, sqlx::Error> {
        let clients = Self::list(pool).await?;
        let ids: Vec<DbId> = clients.iter().map(|c| c.id).collect();

        let mut by_client: HashMap<DbId, Vec<_>> = HashMap::new();
        for payment in PaymentRepo::list_for_clients(pool, &ids).await? {
            by_client.entry(payment.client_id).or_default().push(payment);
        }

        Ok(clients
            .into_iter()
            .map(|client| {
                let payments = by_client.remove(&client.id).unwrap_or_default();
                ClientWithPayments { client, payments }
            })
            .collect())
    }

    /// Update a client. Only non-`None` fields in `input` are applied;
    /// `user_id: Some(None)` clears the user link.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateClient,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query = format!(
            "UPDATE clients SET
                user_id = CASE WHEN $2 THEN $3 ELSE user_id END,
                full_name = COALESCE($4, full_name),
                company = COALESCE($5, company),
                payment_status = COALESCE($6, payment_status)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .bind(input.user_id.is_some())
            .bind(input.user_id.flatten())
            .bind(&input.full_name)
            .bind(&input.company)
            .bind(input.payment_status)
            .fetch_optional(pool)
            .await
    }

    /// Delete a client by ID. Its payments and orders go with it.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Return the client linked to `input.user_id`, creating it if absent.
    pub async fn find_or_provision(
        pool: &PgPool,
        input: &ProvisionClient,
    ) -> Result<ProvisionedClient, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let provisioned = Self::find_or_provision_in_tx(&mut tx, input).await?;
        tx.commit().await?;
        Ok(provisioned)
    }

    /// Transaction-scoped body of [`find_or_provision`](Self::find_or_provision).
    ///
    /// Concurrent callers for the same user converge on one row: the insert
    /// yields to a competing insert via `ON CONFLICT DO NOTHING`, and the
    /// winner is read back. If the winner has vanished again by then, a plain
    /// insert is attempted, which either succeeds or fails on
    /// `uq_clients_user_id`.
    pub(crate) async fn find_or_provision_in_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        input: &ProvisionClient,
    ) -> Result<ProvisionedClient, sqlx::Error> {
        let select = format!("SELECT {COLUMNS} FROM clients WHERE user_id = $1");

        let existing = sqlx::query_as::<_, Client>(&select)
            .bind(input.user_id)
            .fetch_optional(&mut **tx)
            .await?;
        if let Some(client) = existing {
            return Ok(ProvisionedClient {
                client,
                created: false,
            });
        }

        let insert = format!(
            "INSERT INTO clients (user_id, full_name, company, payment_status)
             VALUES ($1, $2, $3, 'OnTime')
             ON CONFLICT (user_id) DO NOTHING
             RETURNING {COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, Client>(&insert)
            .bind(input.user_id)
            .bind(&input.full_name)
            .bind(&input.company)
            .fetch_optional(&mut **tx)
            .await?;
        if let Some(client) = inserted {
            return Ok(ProvisionedClient {
                client,
                created: true,
            });
        }

        let winner = sqlx::query_as::<_, Client>(&select)
            .bind(input.user_id)
            .fetch_optional(&mut **tx)
            .await?;
        if let Some(client) = winner {
            return Ok(ProvisionedClient {
                client,
                created: false,
            });
        }

        let retry = format!(
            "INSERT INTO clients (user_id, full_name, company, payment_status)
             VALUES ($1, $2, $3, 'OnTime')
             RETURNING {COLUMNS}"
        );
        let client = sqlx::query_as::<_, Client>(&retry)
            .bind(input.user_id)
            .bind(&input.full_name)
            .bind(&input.company)
            .fetch_one(&mut **tx)
            .await?;
        Ok(ProvisionedClient {
            client,
            created: true,
        })
    }
}
