pub mod client;
pub mod dashboard;
pub mod order;
pub mod payment;
pub mod product;
