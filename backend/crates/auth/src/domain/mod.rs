//! Domain Layer
//!
//! Contains entities, value objects, token claims, and the storage capability.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{
    claims::AccessClaims,
    context::AuthenticatedContext,
    user::{NewUser, User, UserSummary},
};
pub use repository::{StoreError, UserStore};
