//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Methods on owner-scoped
//! resources also take a [`RowScope`](billing_core::access::RowScope); rows
//! outside the scope behave exactly like missing rows.

pub mod client_repo;
pub mod dashboard_repo;
pub mod order_repo;
pub mod payment_repo;
pub mod product_repo;
pub mod user_repo;

pub use client_repo::{ClientRepo, ProvisionedClient};
pub use dashboard_repo::DashboardRepo;
pub use order_repo::OrderRepo;
pub use payment_repo::PaymentRepo;
pub use product_repo::ProductRepo;
pub use user_repo::UserRepo;
