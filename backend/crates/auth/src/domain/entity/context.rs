use crate::domain::entity::claims::AccessClaims;
use crate::domain::value_object::{email::Email, user_id::UserId, user_role::UserRole};

/// Identity established for one call
///
/// Built from verified claims by the authentication middleware and carried
/// in that request's extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedContext {
    pub user_id: UserId,
    pub email: Email,
    pub role: UserRole,
}

impl From<AccessClaims> for AuthenticatedContext {
    fn from(claims: AccessClaims) -> Self {
        Self {
            user_id: claims.user_id,
            email: claims.email,
            role: claims.role,
        }
    }
}
