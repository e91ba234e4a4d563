//! User Entity
//!
//! The stored identity. Owned by the `UserStore`; use cases hold it for the
//! duration of one request only.

use platform::password::HashedPassword;
use serde::Serialize;

use crate::domain::value_object::{email::Email, user_id::UserId, user_role::UserRole};

/// Stored identity, including its credential
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub password_hash: HashedPassword,
    pub role: UserRole,
}

impl User {
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            email: self.email.clone(),
            role: self.role,
        }
    }
}

/// Identity before the store has assigned an id
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Email,
    pub password_hash: HashedPassword,
    pub role: UserRole,
}

impl NewUser {
    /// Registration only ever creates the default role
    pub fn register(email: Email, password_hash: HashedPassword) -> Self {
        Self {
            email,
            password_hash,
            role: UserRole::User,
        }
    }

    pub fn into_user(self, id: UserId) -> User {
        User {
            id,
            email: self.email,
            password_hash: self.password_hash,
            role: self.role,
        }
    }
}

/// Non-secret projection used in tokens and listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub id: UserId,
    pub email: Email,
    pub role: UserRole,
}
