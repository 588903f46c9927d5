use sqlx::PgPool;

/// Full bootstrap test: connect, migrate, verify schema.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    billing_db::health_check(&pool).await.unwrap();

    let tables = ["users", "clients", "payments", "products", "orders"];

    for table in tables {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, 0, "{table} should start empty");
    }
}

/// Every table keeps `updated_at` current through the shared trigger.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_updated_at_triggers_installed(pool: PgPool) {
    let triggers: Vec<(String,)> = sqlx::query_as(
        "SELECT tgname::TEXT FROM pg_trigger
         WHERE tgname LIKE 'trg_%_updated_at' ORDER BY tgname",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    let names: Vec<&str> = triggers.iter().map(|t| t.0.as_str()).collect();
    assert_eq!(
        names,
        [
            "trg_clients_updated_at",
            "trg_orders_updated_at",
            "trg_payments_updated_at",
            "trg_products_updated_at",
            "trg_users_updated_at",
        ]
    );
}
