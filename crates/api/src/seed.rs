//! Demo data bootstrap.
//!
//! Creates a demo login, its client record, a small product catalog and a
//! few orders and payments. Every step checks for existing rows by natural
//! key first, so running the seed repeatedly is harmless.

use billing_core::types::DbId;
use billing_db::models::client::{Client, ProvisionClient};
use billing_db::models::order::CreateOrder;
use billing_db::models::payment::{CreatePayment, PaymentStatus};
use billing_db::models::product::{CreateProduct, Product};
use billing_db::models::user::{CreateUser, User};
use billing_db::repositories::{
    ClientRepo, OrderRepo, PaymentRepo, ProductRepo, ProvisionedClient, UserRepo,
};
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::auth::password::hash_password;

/// Default password of the demo account.
pub const DEFAULT_DEMO_PASSWORD: &str = "123456";

/// Username of the demo customer account.
pub const DEMO_USERNAME: &str = "client1";

/// Username of the optional administrator account.
pub const ADMIN_USERNAME: &str = "admin";

/// Catalog entries as `(name, description, price in cents)`.
const PRODUCTS: [(&str, &str, i64); 5] = [
    (
        "Corporate Web Development",
        "Responsive corporate website with content management",
        250_000,
    ),
    (
        "IT Consulting",
        "Technology consulting for small and medium businesses",
        150_000,
    ),
    (
        "Management System",
        "Custom ERP for inventory and sales",
        450_000,
    ),
    ("Web Maintenance", "Monthly maintenance plan", 35_000),
    ("Hosting Premium", "Premium hosting for one year", 15_000),
];

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),
}

/// Seed settings.
#[derive(Debug, Clone)]
pub struct SeedConfig {
    pub demo_password: String,
    /// When set, an administrator account is ensured as well.
    pub admin_password: Option<String>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            demo_password: DEFAULT_DEMO_PASSWORD.to_string(),
            admin_password: None,
        }
    }
}

impl SeedConfig {
    /// Load seed settings from the environment.
    ///
    /// | Env Var               | Default  |
    /// |-----------------------|----------|
    /// | `SEED_DEMO_PASSWORD`  | `123456` |
    /// | `SEED_ADMIN_PASSWORD` | unset    |
    pub fn from_env() -> Self {
        let demo_password = std::env::var("SEED_DEMO_PASSWORD")
            .ok()
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_DEMO_PASSWORD.to_string());
        let admin_password = std::env::var("SEED_ADMIN_PASSWORD")
            .ok()
            .filter(|p| !p.is_empty());

        Self {
            demo_password,
            admin_password,
        }
    }
}

/// Number of rows each run inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub users_created: usize,
    pub clients_created: usize,
    pub products_created: usize,
    pub orders_created: usize,
    pub payments_created: usize,
}

impl SeedReport {
    pub fn total(&self) -> usize {
        self.users_created
            + self.clients_created
            + self.products_created
            + self.orders_created
            + self.payments_created
    }
}

/// Ensure the demo data set exists.
pub async fn run(pool: &PgPool, config: &SeedConfig) -> Result<SeedReport, SeedError> {
    let mut report = SeedReport::default();

    let demo = ensure_user(
        pool,
        CreateUser {
            username: DEMO_USERNAME.to_string(),
            email: "client1@example.com".to_string(),
            first_name: "Juan".to_string(),
            last_name: "Perez".to_string(),
            password_hash: String::new(),
            is_staff: false,
        },
        &config.demo_password,
        &mut report,
    )
    .await?;

    if let Some(password) = &config.admin_password {
        ensure_user(
            pool,
            CreateUser {
                username: ADMIN_USERNAME.to_string(),
                email: "admin@example.com".to_string(),
                first_name: String::new(),
                last_name: String::new(),
                password_hash: String::new(),
                is_staff: true,
            },
            password,
            &mut report,
        )
        .await?;
    }

    let client = ensure_client(pool, demo.id, &mut report).await?;

    let mut products = Vec::with_capacity(PRODUCTS.len());
    for (name, description, cents) in PRODUCTS {
        products.push(ensure_product(pool, name, description, cents, &mut report).await?);
    }

    if OrderRepo::count_for_client(pool, client.id).await? == 0 {
        for (product, quantity) in [(&products[0], 1), (&products[1], 2)] {
            let order = CreateOrder {
                client_id: None,
                product_id: product.id,
                quantity: Some(quantity),
            };
            OrderRepo::create(pool, client.id, &order).await?;
            report.orders_created += 1;
        }
    }

    if PaymentRepo::count_for_client(pool, client.id).await? == 0 {
        let today = Utc::now().date_naive();
        let payments = [
            (250_000, 30, PaymentStatus::Pending),
            (150_000, 15, PaymentStatus::Paid),
        ];
        for (cents, due_in_days, status) in payments {
            let payment = CreatePayment {
                client_id: client.id,
                amount: Decimal::new(cents, 2),
                due_date: today + Duration::days(due_in_days),
                status: Some(status),
            };
            PaymentRepo::create(pool, &payment).await?;
            report.payments_created += 1;
        }
    }

    tracing::info!(
        users = report.users_created,
        clients = report.clients_created,
        products = report.products_created,
        orders = report.orders_created,
        payments = report.payments_created,
        "Seed complete"
    );
    Ok(report)
}

async fn ensure_user(
    pool: &PgPool,
    mut input: CreateUser,
    password: &str,
    report: &mut SeedReport,
) -> Result<User, SeedError> {
    if let Some(user) = UserRepo::find_by_username(pool, &input.username).await? {
        tracing::debug!(username = %user.username, "User already present");
        return Ok(user);
    }

    input.password_hash =
        hash_password(password).map_err(|e| SeedError::PasswordHash(e.to_string()))?;
    let user = UserRepo::create(pool, &input).await?;
    report.users_created += 1;
    tracing::info!(user_id = user.id, username = %user.username, "User created");
    Ok(user)
}

async fn ensure_client(
    pool: &PgPool,
    user_id: DbId,
    report: &mut SeedReport,
) -> Result<Client, SeedError> {
    let input = ProvisionClient {
        user_id,
        full_name: "Juan Perez Garcia".to_string(),
        company: "Empresa ABC S.A.C.".to_string(),
    };
    let ProvisionedClient { client, created } =
        ClientRepo::find_or_provision(pool, &input).await?;
    if created {
        report.clients_created += 1;
        tracing::info!(client_id = client.id, user_id, "Client created");
    }
    Ok(client)
}

async fn ensure_product(
    pool: &PgPool,
    name: &str,
    description: &str,
    cents: i64,
    report: &mut SeedReport,
) -> Result<Product, SeedError> {
    if let Some(product) = ProductRepo::find_by_name(pool, name).await? {
        return Ok(product);
    }

    let input = CreateProduct {
        name: name.to_string(),
        description: description.to_string(),
        price: Decimal::new(cents, 2),
    };
    let product = ProductRepo::create(pool, &input).await?;
    report.products_created += 1;
    Ok(product)
}
