//! Argon2id password hashing for the seeded accounts.
//!
//! Hashes use a random salt from [`OsRng`] and are stored in PHC string
//! format, so the identity provider can verify them with the parameters
//! embedded in the hash.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHasher, SaltString};
use argon2::Argon2;

/// Hash a plaintext password using Argon2id with a random salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::password_hash::{PasswordHash, PasswordVerifier};

    fn matches(password: &str, hash: &str) -> bool {
        let parsed = PasswordHash::new(hash).expect("hash should be PHC formatted");
        Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok()
    }

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("123456").expect("hashing should succeed");
        assert!(hash.starts_with("$argon2id$"));
        assert!(matches("123456", &hash));
    }

    #[test]
    fn test_wrong_password_fails() {
        let hash = hash_password("123456").unwrap();
        assert!(!matches("654321", &hash));
    }

    #[test]
    fn test_salts_differ() {
        assert_ne!(hash_password("123456").unwrap(), hash_password("123456").unwrap());
    }
}
