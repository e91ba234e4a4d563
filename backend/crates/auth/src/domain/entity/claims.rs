//! Access Token Claims
//!
//! Payload of the bearer token handed out on sign-in. Registered claim names
//! follow RFC 7519; timestamps are whole seconds since the Unix epoch.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entity::user::UserSummary;
use crate::domain::value_object::{email::Email, user_id::UserId, user_role::UserRole};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    pub user_id: UserId,
    pub email: Email,
    pub role: UserRole,
    /// Issuer
    pub iss: String,
    /// Subject (stringified user id)
    pub sub: String,
    /// Audience: the application id the token was issued for
    pub aud: Vec<String>,
    /// Issued at
    pub iat: i64,
    /// Expiration
    pub exp: i64,
}

impl AccessClaims {
    /// `None` when `now + ttl` is not representable
    pub fn new(
        user: &UserSummary,
        issuer: &str,
        app_id: i64,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Option<Self> {
        let expires_at = now.checked_add_signed(ttl)?;

        Some(Self {
            user_id: user.id,
            email: user.email.clone(),
            role: user.role,
            iss: issuer.to_string(),
            sub: user.id.to_string(),
            aud: vec![app_id.to_string()],
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> UserSummary {
        UserSummary {
            id: UserId::new(12),
            email: Email::new("kim@example.com").unwrap(),
            role: UserRole::Manager,
        }
    }

    #[test]
    fn test_claims_fields() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let claims = AccessClaims::new(&summary(), "sso-auth-server", 5, now, Duration::minutes(10)).unwrap();

        assert_eq!(claims.sub, "12");
        assert_eq!(claims.user_id, UserId::new(12));
        assert_eq!(claims.aud, vec!["5".to_string()]);
        assert_eq!(claims.iss, "sso-auth-server");
        assert_eq!(claims.iat, 1_700_000_000);
        assert_eq!(claims.exp, 1_700_000_600);
    }

    #[test]
    fn test_sub_second_precision_is_dropped() {
        let now = DateTime::from_timestamp(1_700_000_000, 999_000_000).unwrap();
        let claims = AccessClaims::new(&summary(), "iss", 1, now, Duration::seconds(1)).unwrap();
        assert_eq!(claims.iat, 1_700_000_000);
        assert_eq!(claims.exp, 1_700_000_001);
    }

    #[test]
    fn test_json_shape() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let claims = AccessClaims::new(&summary(), "iss", 1, now, Duration::minutes(1)).unwrap();
        let json = serde_json::to_value(&claims).unwrap();

        assert_eq!(json["user_id"], 12);
        assert_eq!(json["role"], "manager");
        assert_eq!(json["email"], "kim@example.com");
        assert_eq!(json["aud"][0], "1");
    }

    #[test]
    fn test_unrepresentable_expiry_is_none() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let ttl = Duration::seconds(1_000_000_000_000_000);
        assert!(AccessClaims::new(&summary(), "iss", 1, now, ttl).is_none());
    }
}
