//! Password hashing for user credentials.
//!
//! Passwords are stored as Argon2 hashes. The hash is written once on user
//! creation or password change, read once on login, and never serialized
//! into any response.

use crate::error::ApiError;

/// Hash a password for storage.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    use argon2::{
        password_hash::{rand_core::OsRng, SaltString},
        Argon2, PasswordHasher,
    };

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ApiError::Internal(format!("Failed to hash password: {}", e)))?;

    Ok(hash.to_string())
}

/// Verify a password against its stored hash.
///
/// Returns `false` both for a wrong password and for a stored hash that
/// does not parse as a PHC string.
pub fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};

    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password("secreto123").unwrap();

        assert!(verify_password("secreto123", &hash));
        assert!(!verify_password("secreto124", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hash_password("secreto123").unwrap();
        let second = hash_password("secreto123").unwrap();

        // Same password, different salt, different hash
        assert_ne!(first, second);
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(!verify_password("secreto123", "not-a-phc-string"));
        assert!(!verify_password("secreto123", ""));
    }
}
