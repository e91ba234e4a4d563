//! Repository Traits
//!
//! Storage capability consumed by the use cases. Implementations live in the
//! infrastructure layer.

use kernel::error::app_error::AppError;
use thiserror::Error;

use crate::domain::entity::user::{NewUser, User, UserSummary};
use crate::domain::value_object::{email::Email, user_filter::UserFilter, user_id::UserId};

#[derive(Debug, Error)]
pub enum StoreError {
    /// Insert rejected by the unique email constraint
    #[error("Unique constraint violated")]
    UniqueViolation,

    #[error("Storage backend error: {0}")]
    Backend(#[source] AppError),
}

/// User store
///
/// Lookups report absence as `Ok(None)`. No method retries.
#[trait_variant::make(UserStore: Send)]
pub trait LocalUserStore {
    async fn exists_by_email(&self, email: &Email) -> Result<bool, StoreError>;

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, StoreError>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError>;

    /// Persist a new user and return it with its assigned id
    async fn insert(&self, user: NewUser) -> Result<User, StoreError>;

    async fn list_filtered(&self, filter: &UserFilter) -> Result<Vec<UserSummary>, StoreError>;
}
