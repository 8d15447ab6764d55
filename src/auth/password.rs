//! Password hashing and verification using bcrypt

use crate::core::error::{InventoryError, Result};
use tokio::task;

/// bcrypt hasher with a configured cost; work runs on the blocking pool
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash a password using bcrypt
    pub async fn hash(&self, password: &str) -> Result<String> {
        let password = password.to_string();
        let cost = self.cost;

        task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| InventoryError::TaskError(format!("Hashing task panicked: {}", e)))?
            .map_err(|e| InventoryError::HashingError(format!("Failed to hash password: {}", e)))
    }

    /// Verify a password against a hash
    pub async fn verify(&self, password: &str, hash: &str) -> Result<bool> {
        let password = password.to_string();
        let hash = hash.to_string();

        task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| InventoryError::TaskError(format!("Verification task panicked: {}", e)))?
            .map_err(|e| InventoryError::HashingError(format!("Failed to verify password: {}", e)))
    }
}
