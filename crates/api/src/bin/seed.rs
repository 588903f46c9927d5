//! `billing-seed`: apply migrations and load the demo data set.

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use billing_api::seed::{self, SeedConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "billing_api=info,billing_seed=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = billing_db::create_pool(&database_url)
        .await
        .context("Failed to connect to database")?;
    billing_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let config = SeedConfig::from_env();
    if config.admin_password.is_none() {
        tracing::info!("SEED_ADMIN_PASSWORD not set, skipping administrator account");
    }

    let report = seed::run(&pool, &config).await.context("Seeding failed")?;
    if report.total() == 0 {
        tracing::info!("Demo data already present, nothing to do");
    }

    pool.close().await;
    Ok(())
}
