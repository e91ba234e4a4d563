//! Register Use Case
//!
//! Creates a new identity with the default role.

use std::sync::Arc;

use platform::password::{ClearTextPassword, PasswordHasher};

use crate::domain::entity::user::NewUser;
use crate::domain::repository::{StoreError, UserStore};
use crate::domain::value_object::{email::Email, user_id::UserId};
use crate::error::{AuthError, AuthResult};

/// Register input
pub struct RegisterInput {
    pub email: String,
    pub password: String,
}

/// Register output
pub struct RegisterOutput {
    pub user_id: UserId,
}

/// Register use case
pub struct RegisterUseCase<S>
where
    S: UserStore,
{
    store: Arc<S>,
    hasher: Arc<PasswordHasher>,
}

impl<S> RegisterUseCase<S>
where
    S: UserStore,
{
    pub fn new(store: Arc<S>, hasher: Arc<PasswordHasher>) -> Self {
        Self { store, hasher }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<RegisterOutput> {
        if input.email.trim().is_empty() {
            return Err(AuthError::InvalidArgument("email is required".to_string()));
        }
        if input.password.is_empty() {
            return Err(AuthError::InvalidArgument("password is required".to_string()));
        }

        let email =
            Email::new(&input.email).map_err(|e| AuthError::InvalidArgument(e.to_string()))?;
        let password = ClearTextPassword::new(input.password)
            .map_err(|e| AuthError::InvalidArgument(e.to_string()))?;

        // Fast path only; the unique index decides below
        if self.store.exists_by_email(&email).await? {
            return Err(AuthError::EmailAlreadyExists);
        }

        let hasher = self.hasher.clone();
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Password hashing task failed");
                AuthError::PasswordHashingFailed
            })?
            .map_err(|e| {
                tracing::error!(error = %e, "Password hashing failed");
                AuthError::PasswordHashingFailed
            })?;

        let user = match self
            .store
            .insert(NewUser::register(email, password_hash))
            .await
        {
            Ok(user) => user,
            Err(StoreError::UniqueViolation) => return Err(AuthError::EmailAlreadyExists),
            Err(e) => return Err(AuthError::Storage(e)),
        };

        tracing::info!(user_id = %user.id, "User registered");

        Ok(RegisterOutput { user_id: user.id })
    }
}
