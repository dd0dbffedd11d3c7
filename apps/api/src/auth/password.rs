//! Salted-hash password primitive.

use anyhow::Result;
use bcrypt::{hash, verify, DEFAULT_COST};

/// Hashes a plaintext password for storage.
pub fn hash_password(plain: &str) -> Result<String> {
    Ok(hash(plain, DEFAULT_COST)?)
}

/// Compares a plaintext password against a stored hash. A stored value that
/// is not a valid hash fails verification rather than erroring.
pub fn verify_password(plain: &str, hashed: &str) -> bool {
    verify(plain, hashed).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify_roundtrip() {
        // low cost keeps the test fast; hash_password uses DEFAULT_COST
        let hashed = bcrypt::hash("hunter2", 4).unwrap();
        assert!(verify_password("hunter2", &hashed));
        assert!(!verify_password("wrong", &hashed));
    }

    #[test]
    fn test_garbage_stored_hash_fails_verification() {
        assert!(!verify_password("hunter2", "not-a-bcrypt-hash"));
    }
}
