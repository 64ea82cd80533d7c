use crate::error::AppError;
use bcrypt::{hash, verify};

/// Bcrypt cost used unless `BCRYPT_COST` says otherwise.
pub const DEFAULT_HASH_COST: u32 = 10;

/// Salted one-way password hashing.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_HASH_COST)
    }
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Hashes `password` with a fresh random salt. The salt is embedded in the
    /// returned string, so two calls with the same input never agree.
    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        hash(password, self.cost)
            .map_err(|e| AppError::StoreError(format!("Failed to hash password: {}", e)))
    }

    /// Checks `password` against a stored hash. A malformed hash counts as a mismatch.
    pub fn verify(&self, password: &str, hashed_password: &str) -> bool {
        match verify(password, hashed_password) {
            Ok(matches) => matches,
            Err(e) => {
                log::warn!("password verification failed on stored hash: {}", e);
                false
            }
        }
    }
}
