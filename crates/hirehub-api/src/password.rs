//! Argon2id password hashing on the blocking pool.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use tracing::warn;

use crate::error::{ApiError, ApiResult};

/// Hashes and verifies passwords in PHC string format.
#[derive(Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            params: Params::default(),
        }
    }
}

impl PasswordHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use explicit cost parameters.
    pub fn with_params(params: Params) -> Self {
        Self { params }
    }

    fn argon2(params: Params) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    }

    /// Hash a plaintext password with a fresh random salt.
    pub async fn hash(&self, password: String) -> ApiResult<String> {
        let params = self.params.clone();
        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            Self::argon2(params)
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|e| ApiError::internal(format!("Password hashing failed: {}", e)))
        })
        .await
        .map_err(|e| ApiError::internal(format!("Password hashing task failed: {}", e)))?
    }

    /// Check a plaintext password against a stored hash.
    ///
    /// A malformed stored hash verifies as `false`.
    pub async fn verify(&self, password: String, stored_hash: String) -> ApiResult<bool> {
        let params = self.params.clone();
        tokio::task::spawn_blocking(move || {
            let parsed = match PasswordHash::new(&stored_hash) {
                Ok(parsed) => parsed,
                Err(e) => {
                    warn!(error = %e, "Stored password hash is malformed");
                    return false;
                }
            };
            Self::argon2(params)
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .await
        .map_err(|e| ApiError::internal(format!("Password verification task failed: {}", e)))
    }
}
