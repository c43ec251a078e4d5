//! Fixed token -> subject map for local development and tests

use crate::domain::auth::{IdentityError, IdentityProvider};
use async_trait::async_trait;
use std::collections::HashMap;

pub struct StaticTokenIdentityProvider {
    tokens: HashMap<String, String>,
}

impl StaticTokenIdentityProvider {
    pub fn new(tokens: HashMap<String, String>) -> Self {
        Self { tokens }
    }
}

#[async_trait]
impl IdentityProvider for StaticTokenIdentityProvider {
    async fn verify(&self, token: &str) -> Result<String, IdentityError> {
        self.tokens
            .get(token)
            .cloned()
            .ok_or_else(|| IdentityError::Invalid("unknown token".to_owned()))
    }
}
