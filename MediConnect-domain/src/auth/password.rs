use tracing::error;

use super::token::SecurityError;

/// Cost used when none is configured
pub const DEFAULT_BCRYPT_COST: u32 = 10;

/// bcrypt password hashing. Hashing is CPU-bound, so it runs on the
/// blocking thread pool.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            cost: DEFAULT_BCRYPT_COST,
        }
    }
}

impl PasswordHasher {
    /// Create a hasher with the given bcrypt cost (clamped to 4..=31)
    pub fn new(cost: u32) -> Self {
        Self {
            cost: cost.clamp(4, 31),
        }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a plain-text password
    pub async fn hash(&self, password: &str) -> Result<String, SecurityError> {
        let password = password.to_string();
        let cost = self.cost;

        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| SecurityError::Hashing(e.to_string()))?
            .map_err(|e| {
                error!("Failed to hash password: {}", e);
                SecurityError::Hashing(e.to_string())
            })
    }

    /// Check a plain-text password against a stored hash
    pub async fn verify(&self, password: &str, hash: &str) -> Result<bool, SecurityError> {
        let password = password.to_string();
        let hash = hash.to_string();

        tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| SecurityError::Hashing(e.to_string()))?
            .map_err(|e| SecurityError::Hashing(e.to_string()))
    }
}
