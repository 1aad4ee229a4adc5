//! Authentication, authorization, accounting.
//!
//! Admin credentials come from the environment at startup; a successful
//! login yields a signed token with the configured TTL.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use stripdex_core::{auth, Error, Result};

const ADMIN_USER_VAR: &str = "ADMIN_USER";
const ADMIN_PASSWORD_VAR: &str = "ADMIN_PASSWORD";

#[derive(Clone)]
pub struct Aaa {
    users: Arc<HashMap<String, String>>,
    token_ttl: Duration,
}

impl Aaa {
    /// Build from the `ADMIN_USER` / `ADMIN_PASSWORD` environment variables.
    /// Both are required; startup fails without them.
    pub fn new(token_ttl: Duration) -> Result<Self> {
        let user = std::env::var(ADMIN_USER_VAR).map_err(|_| {
            Error::Internal(anyhow::anyhow!(
                "{ADMIN_USER_VAR} environment variable is required"
            ))
        })?;
        let password = std::env::var(ADMIN_PASSWORD_VAR).map_err(|_| {
            Error::Internal(anyhow::anyhow!(
                "{ADMIN_PASSWORD_VAR} environment variable is required"
            ))
        })?;
        Ok(Self::from_credentials(&user, &password, token_ttl))
    }

    pub fn from_credentials(user: &str, password: &str, token_ttl: Duration) -> Self {
        let mut users = HashMap::new();
        users.insert(user.to_string(), password.to_string());
        Self {
            users: Arc::new(users),
            token_ttl,
        }
    }

    /// Check credentials and issue a token.
    pub fn login(&self, name: &str, password: &str) -> Result<String> {
        match self.users.get(name) {
            Some(expected) if expected == password => auth::issue_token(self.token_ttl),
            _ => Err(Error::Unauthorized),
        }
    }

    /// Verify a presented token.
    pub fn verify(&self, token: &str) -> Result<()> {
        auth::verify_token(token)
    }
}
