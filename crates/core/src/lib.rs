//! Domain logic for the billing service that does not touch the database or
//! HTTP: identity and visibility rules, money rules, naming defaults and the
//! shared error type.

pub mod access;
pub mod error;
pub mod money;
pub mod naming;
pub mod types;
