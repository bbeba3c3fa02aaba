use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};
use tracing::{error, warn};

use crate::shared::AppError;

/// Salted Argon2id hashing for user passwords
///
/// Digests are PHC strings that carry their own salt and cost parameters,
/// so verification works regardless of the cost this hasher was built with.
#[derive(Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    pub fn new() -> Self {
        Self {
            params: Params::default(),
        }
    }

    /// Builds a hasher with explicit Argon2 costs (memory in KiB)
    pub fn with_cost(
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    ) -> Result<Self, argon2::Error> {
        let params = Params::new(memory_kib, iterations, parallelism, None)?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| {
                error!(error = %e, "Failed to hash password");
                AppError::Internal
            })
    }

    pub fn verify(&self, digest: &str, password: &str) -> bool {
        let parsed = match PasswordHash::new(digest) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, "Stored password digest is not a valid PHC string");
                return false;
            }
        };

        self.argon2()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}

impl PasswordHasher {
    /// Runs [`PasswordHasher::hash`] on the blocking pool so request workers
    /// are not stalled by Argon2.
    pub async fn hash_async(&self, password: &str) -> Result<String, AppError> {
        let hasher = self.clone();
        let password = password.to_string();

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| {
                error!(error = %e, "Password hashing task failed");
                AppError::Internal
            })?
    }

    /// Runs [`PasswordHasher::verify`] on the blocking pool
    pub async fn verify_async(&self, digest: &str, password: &str) -> bool {
        let hasher = self.clone();
        let digest = digest.to_string();
        let password = password.to_string();

        tokio::task::spawn_blocking(move || hasher.verify(&digest, &password))
            .await
            .unwrap_or_else(|e| {
                error!(error = %e, "Password verification task failed");
                false
            })
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_hasher() -> PasswordHasher {
        PasswordHasher::with_cost(8, 1, 1).unwrap()
    }

    #[test]
    fn test_hash_is_phc_and_not_plaintext() {
        let hasher = fast_hasher();
        let digest = hasher.hash("secret1").unwrap();

        assert_ne!(digest, "secret1");
        assert!(digest.starts_with("$argon2id$"));
    }

    #[test]
    fn test_verify_matches_only_original_password() {
        let hasher = fast_hasher();
        let digest = hasher.hash("secret1").unwrap();

        assert!(hasher.verify(&digest, "secret1"));
        assert!(!hasher.verify(&digest, "secret2"));
    }

    #[test]
    fn test_hashes_are_salted() {
        let hasher = fast_hasher();

        let first = hasher.hash("secret1").unwrap();
        let second = hasher.hash("secret1").unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_verify_uses_cost_from_digest() {
        let digest = fast_hasher().hash("secret1").unwrap();
        assert!(PasswordHasher::with_cost(16, 2, 1)
            .unwrap()
            .verify(&digest, "secret1"));
    }

    #[test]
    fn test_verify_rejects_malformed_digest() {
        assert!(!fast_hasher().verify("not-a-digest", "secret1"));
    }

    #[test]
    fn test_invalid_cost_rejected() {
        assert!(PasswordHasher::with_cost(1, 1, 1).is_err());
    }

    #[tokio::test]
    async fn test_async_hash_verifies_off_the_runtime() {
        let hasher = fast_hasher();

        let digest = hasher.hash_async("secret1").await.unwrap();

        assert!(digest.starts_with("$argon2id$"));
        assert!(hasher.verify_async(&digest, "secret1").await);
        assert!(!hasher.verify_async(&digest, "secret2").await);
        assert!(hasher.verify(&digest, "secret1"));
    }

    #[tokio::test]
    async fn test_async_verify_rejects_malformed_digest() {
        assert!(!fast_hasher().verify_async("not-a-digest", "secret1").await);
    }
}
