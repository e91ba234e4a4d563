//! Token Issuer
//!
//! Turns an authenticated identity into a signed access token.

use std::sync::Arc;

use chrono::{Duration, Utc};
use platform::token::TokenCodec;

use crate::application::config::AuthConfig;
use crate::domain::entity::{claims::AccessClaims, user::UserSummary};
use crate::error::{AuthError, AuthResult};

pub struct TokenIssuer<C> {
    codec: Arc<C>,
    issuer: String,
    /// `None` if the configured TTL does not fit a `TimeDelta`
    ttl: Option<Duration>,
}

// Manual impl: `derive(Clone)` would require `C: Clone`.
impl<C> Clone for TokenIssuer<C> {
    fn clone(&self) -> Self {
        Self {
            codec: self.codec.clone(),
            issuer: self.issuer.clone(),
            ttl: self.ttl,
        }
    }
}

impl<C: TokenCodec> TokenIssuer<C> {
    pub fn new(codec: Arc<C>, config: &AuthConfig) -> Self {
        Self {
            codec,
            issuer: config.issuer.clone(),
            ttl: Duration::try_seconds(config.token_ttl_secs()),
        }
    }

    /// Issue a token for `user`, scoped to `app_id`
    pub fn issue(&self, user: &UserSummary, app_id: i64) -> AuthResult<String> {
        let claims = self
            .ttl
            .and_then(|ttl| AccessClaims::new(user, &self.issuer, app_id, Utc::now(), ttl))
            .ok_or_else(|| {
                tracing::error!(user_id = %user.id, "Access token expiry is out of range");
                AuthError::TokenIssuance
            })?;

        self.codec.sign(&claims).map_err(|e| {
            tracing::error!(error = %e, user_id = %user.id, "Failed to sign access token");
            AuthError::TokenIssuance
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{email::Email, user_id::UserId, user_role::UserRole};
    use platform::token::HmacTokenCodec;

    fn user() -> UserSummary {
        UserSummary {
            id: UserId::new(3),
            email: Email::new("ana@example.com").unwrap(),
            role: UserRole::Admin,
        }
    }

    #[test]
    fn test_issued_token_carries_identity() {
        let codec = Arc::new(HmacTokenCodec::new(b"issuer-test").unwrap());
        let issuer = TokenIssuer::new(codec.clone(), &AuthConfig::new("unused"));
        let user = user();

        let before = Utc::now().timestamp();
        let token = issuer.issue(&user, 9).unwrap();
        let claims: AccessClaims = codec.verify(&token).unwrap();

        assert_eq!(claims.user_id, user.id);
        assert_eq!(claims.sub, "3");
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.role, UserRole::Admin);
        assert_eq!(claims.aud, vec!["9".to_string()]);
        assert_eq!(claims.iss, "sso-auth-server");
        assert!(claims.iat >= before);
        assert_eq!(claims.exp - claims.iat, 600);
    }

    #[test]
    fn test_out_of_range_ttl_is_issuance_error() {
        let codec = Arc::new(HmacTokenCodec::new(b"issuer-test").unwrap());

        // Fits a TimeDelta, but not a DateTime once added to now
        let far = AuthConfig {
            token_ttl: std::time::Duration::from_secs(1_000_000_000_000_000),
            ..AuthConfig::new("unused")
        };
        let issuer = TokenIssuer::new(codec.clone(), &far);
        assert!(matches!(issuer.issue(&user(), 1), Err(AuthError::TokenIssuance)));

        // Does not fit a TimeDelta at all
        let huge = AuthConfig {
            token_ttl: std::time::Duration::from_secs(u64::MAX),
            ..AuthConfig::new("unused")
        };
        let issuer = TokenIssuer::new(codec, &huge);
        assert!(matches!(issuer.issue(&user(), 1), Err(AuthError::TokenIssuance)));
    }
}
