//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::fmt;
use std::time::Duration;

use platform::password::{PasswordCost, PasswordHashError};
use platform::token::TokenError;

use crate::application::role_requirements::{RoleRequirements, RoleRequirementsError};

/// Default access token lifetime (10 minutes)
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(10 * 60);

/// Longest accepted access token lifetime (1 day)
pub const MAX_TOKEN_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Default `iss` claim
pub const DEFAULT_ISSUER: &str = "sso-auth-server";

/// Auth application configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC secret for access tokens
    pub token_secret: Vec<u8>,
    /// Access token lifetime
    pub token_ttl: Duration,
    /// Issuer name written to every token
    pub issuer: String,
    /// Argon2id work factor for new hashes
    pub password_cost: PasswordCost,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    /// Per-operation role requirements
    pub role_requirements: RoleRequirements,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("token secret must not be empty")]
    EmptySecret,

    #[error("token TTL must be at least one second")]
    ZeroTtl,

    #[error("token TTL must be at most {max} seconds", max = MAX_TOKEN_TTL.as_secs())]
    TtlTooLong,

    #[error("issuer must not be empty")]
    EmptyIssuer,

    #[error("invalid role requirements: {0}")]
    RoleRequirements(#[from] RoleRequirementsError),

    #[error("invalid token settings: {0}")]
    Token(#[from] TokenError),

    #[error("invalid password settings: {0}")]
    Password(#[from] PasswordHashError),
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: Vec::new(),
            token_ttl: DEFAULT_TOKEN_TTL,
            issuer: DEFAULT_ISSUER.to_string(),
            password_cost: PasswordCost::default(),
            password_pepper: None,
            role_requirements: RoleRequirements::default(),
        }
    }
}

impl AuthConfig {
    pub fn new(token_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            token_secret: token_secret.into(),
            ..Default::default()
        }
    }

    /// Create config with a random token secret
    ///
    /// Tokens do not survive a restart.
    pub fn with_random_secret() -> Self {
        use rand::RngCore;
        let mut secret = vec![0u8; 32];
        rand::rng().fill_bytes(&mut secret);
        Self::new(secret)
    }

    /// Create config for development (random secret, cheap hashing)
    pub fn development() -> Self {
        Self {
            password_cost: PasswordCost::insecure_fast(),
            ..Self::with_random_secret()
        }
    }

    /// Startup check; the process should refuse to serve on error
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token_secret.is_empty() {
            return Err(ConfigError::EmptySecret);
        }
        if self.token_ttl.as_secs() == 0 {
            return Err(ConfigError::ZeroTtl);
        }
        if self.token_ttl > MAX_TOKEN_TTL {
            return Err(ConfigError::TtlTooLong);
        }
        if self.issuer.trim().is_empty() {
            return Err(ConfigError::EmptyIssuer);
        }
        self.role_requirements.validate()?;
        Ok(())
    }

    /// Token TTL truncated to whole seconds
    pub fn token_ttl_secs(&self) -> i64 {
        i64::try_from(self.token_ttl.as_secs()).unwrap_or(i64::MAX)
    }

}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token_secret", &"[REDACTED]")
            .field("token_ttl", &self.token_ttl)
            .field("issuer", &self.issuer)
            .field("password_cost", &self.password_cost)
            .field("password_pepper", &self.password_pepper.as_ref().map(|_| "[REDACTED]"))
            .field("role_requirements", &self.role_requirements)
            .finish()
    }
}
