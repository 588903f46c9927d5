//! Authentication primitives.
//!
//! - [`jwt`] -- bearer token validation, plus minting for tests and operators.
//! - [`password`] -- Argon2id hashing for the accounts the seed utility creates.

pub mod jwt;
pub mod password;
