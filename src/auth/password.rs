//! Password hashing and verification

use crate::error::{Error, Result};

/// bcrypt work factor for newly hashed passwords
pub const HASH_COST: u32 = bcrypt::DEFAULT_COST;

/// Verify a password against a stored bcrypt hash.
///
/// bcrypt comparison is CPU-bound, so it runs on the blocking pool to
/// keep it off the async runtime. A malformed stored hash is an error,
/// not a mismatch.
pub async fn verify(password: String, hash: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| Error::Other(format!("Password verification task failed: {}", e)))?
        .map_err(Error::from)
}

/// Hash a password for storage.
pub fn hash(password: &str) -> Result<String> {
    bcrypt::hash(password, HASH_COST).map_err(Error::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_verify_correct_password() {
        let hashed = hash("hunter2").unwrap();
        assert!(verify("hunter2".to_string(), hashed).await.unwrap());
    }

    #[tokio::test]
    async fn test_verify_wrong_password() {
        let hashed = hash("hunter2").unwrap();
        assert!(!verify("hunter3".to_string(), hashed).await.unwrap());
    }

    #[tokio::test]
    async fn test_malformed_hash_is_an_error() {
        let result = verify("hunter2".to_string(), "not-a-bcrypt-hash".to_string()).await;
        assert!(result.is_err());
    }
}
