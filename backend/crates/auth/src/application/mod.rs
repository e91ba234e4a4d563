//! Application Layer
//!
//! Use cases and application services.

pub mod authenticator;
pub mod config;
pub mod is_admin;
pub mod list_users;
pub mod login;
pub mod operation;
pub mod register;
pub mod role_requirements;
pub mod token_issuer;

// Re-exports
pub use authenticator::{Authenticator, extract_bearer};
pub use config::AuthConfig;
pub use is_admin::{IsAdminInput, IsAdminOutput, IsAdminUseCase};
pub use list_users::{ListUsersInput, ListUsersOutput, ListUsersUseCase};
pub use login::{LoginInput, LoginOutput, LoginUseCase};
pub use register::{RegisterInput, RegisterOutput, RegisterUseCase};
pub use role_requirements::RoleRequirements;
pub use token_issuer::TokenIssuer;
