//! Server Configuration
//!
//! Read once at startup from the environment (after `.env` is loaded).
//!
//! | Variable | Default |
//! |----------|---------|
//! | `DATABASE_URL` | none (debug builds fall back to an in-memory store) |
//! | `DB_MAX_CONNECTIONS` | 5 |
//! | `AUTH_PORT` | 44044 |
//! | `REQUEST_TIMEOUT_SECS` | 10 |
//! | `FRONTEND_ORIGINS` | `http://localhost:40922,http://127.0.0.1:40922` |
//! | `TOKEN_SECRET` | base64; required in release builds |
//! | `TOKEN_TTL_SECS` | 600 |
//! | `TOKEN_ISSUER` | `sso-auth-server` |
//! | `ROLE_REQUIREMENTS` | `/auth.Auth/ListUsers=admin` |
//! | `PASSWORD_PEPPER` | base64; optional |

use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, bail};
use auth::AuthConfig;
use auth::application::RoleRequirements;
use axum::http::HeaderValue;
use platform::crypto::from_base64;

const DEFAULT_PORT: u16 = 44044;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:40922,http://127.0.0.1:40922";

pub struct ServerConfig {
    pub port: u16,
    pub request_timeout: Duration,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub frontend_origins: Vec<HeaderValue>,
    pub auth: AuthConfig,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok(), cfg!(debug_assertions))
    }

    /// Build from an arbitrary variable source
    ///
    /// `development` allows a missing `TOKEN_SECRET` (random secret, cheap
    /// password hashing).
    pub fn from_lookup<F>(lookup: F, development: bool) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let mut auth = match var("TOKEN_SECRET") {
            Some(secret) => {
                let secret = from_base64(secret.trim()).context("TOKEN_SECRET must be base64")?;
                AuthConfig::new(secret)
            }
            None if development => {
                tracing::warn!("TOKEN_SECRET not set, using a random development secret");
                AuthConfig::development()
            }
            None => bail!("TOKEN_SECRET must be set in production"),
        };

        if let Some(ttl) = parse_var::<u64>(&var, "TOKEN_TTL_SECS")? {
            auth.token_ttl = Duration::from_secs(ttl);
        }
        if let Some(issuer) = var("TOKEN_ISSUER") {
            auth.issuer = issuer;
        }
        if let Some(rules) = parse_var::<RoleRequirements>(&var, "ROLE_REQUIREMENTS")? {
            auth.role_requirements = rules;
        }
        if let Some(pepper) = var("PASSWORD_PEPPER") {
            auth.password_pepper =
                Some(from_base64(pepper.trim()).context("PASSWORD_PEPPER must be base64")?);
        }
        auth.validate().context("invalid auth configuration")?;

        let frontend_origins = var("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(|origin| {
                origin
                    .parse::<HeaderValue>()
                    .with_context(|| format!("FRONTEND_ORIGINS: invalid origin '{origin}'"))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(Self {
            port: parse_var(&var, "AUTH_PORT")?.unwrap_or(DEFAULT_PORT),
            request_timeout: Duration::from_secs(
                parse_var(&var, "REQUEST_TIMEOUT_SECS")?.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            ),
            database_url: var("DATABASE_URL"),
            db_max_connections: parse_var(&var, "DB_MAX_CONNECTIONS")?
                .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS),
            frontend_origins,
            auth,
        })
    }
}

fn parse_var<T>(var: &impl Fn(&str) -> Option<String>, name: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    var(name)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| anyhow::anyhow!("{name}: {e}"))
        })
        .transpose()
}
