//! Auth (Authentication & Authorization) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, claims, the `UserStore` capability
//! - `application/` - Use cases, token issuance, bearer authentication, RBAC
//! - `infra/` - `UserStore` backends (PostgreSQL, in-memory)
//! - `presentation/` - HTTP handlers, DTOs, middleware, router
//!
//! ## Features
//! - Registration and password sign-in scoped to an application id
//! - Stateless HS256 access tokens (no server-side sessions)
//! - Per-operation role requirements (User, Manager, Admin)
//!
//! ## Security Model
//! - Passwords hashed with Argon2id (NIST SP 800-63B compliant)
//! - Sign-in failures never reveal whether an email is registered
//! - Token verification failures collapse to a single `Unauthenticated`
//! - Role checks fail closed when no identity was established

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use infra::{memory::InMemoryUserStore, postgres::PgUserStore};
pub use presentation::router::auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod store {
    pub use crate::domain::repository::{StoreError, UserStore};
    pub use crate::infra::{memory::InMemoryUserStore, postgres::PgUserStore};
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
