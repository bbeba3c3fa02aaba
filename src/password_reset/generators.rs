use async_trait::async_trait;
use rand::{distr::Alphanumeric, Rng};

/// Length of generated reset tokens, matching 32 random bytes in URL-safe base64
pub const RESET_TOKEN_LENGTH: usize = 43;

/// Trait for generating reset tokens
#[async_trait]
pub trait ResetTokenGenerator: Send + Sync {
    async fn generate(&self) -> String;
}

/// Cryptographically random alphanumeric tokens from the thread-local CSPRNG
pub struct RandomTokenGenerator;

impl RandomTokenGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RandomTokenGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResetTokenGenerator for RandomTokenGenerator {
    async fn generate(&self) -> String {
        rand::rng()
            .sample_iter(Alphanumeric)
            .take(RESET_TOKEN_LENGTH)
            .map(char::from)
            .collect()
    }
}
