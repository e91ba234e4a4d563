//! Login Use Case
//!
//! Verifies a password and issues an access token for one application.

use std::sync::Arc;

use platform::password::{ClearTextPassword, PasswordHasher};
use platform::token::TokenCodec;

use crate::application::token_issuer::TokenIssuer;
use crate::domain::repository::UserStore;
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

/// Login input
pub struct LoginInput {
    pub email: String,
    pub password: String,
    pub app_id: i64,
}

/// Login output
pub struct LoginOutput {
    pub token: String,
}

/// Login use case
///
/// Unknown email, wrong password and unreadable stored hash all end in
/// `InvalidCredentials`, and unknown emails still pay for one hash
/// verification.
pub struct LoginUseCase<S, C>
where
    S: UserStore,
    C: TokenCodec,
{
    store: Arc<S>,
    hasher: Arc<PasswordHasher>,
    issuer: TokenIssuer<C>,
}

impl<S, C> LoginUseCase<S, C>
where
    S: UserStore,
    C: TokenCodec + 'static,
{
    pub fn new(store: Arc<S>, hasher: Arc<PasswordHasher>, issuer: TokenIssuer<C>) -> Self {
        Self {
            store,
            hasher,
            issuer,
        }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        if input.email.trim().is_empty() {
            return Err(AuthError::InvalidArgument("email is required".to_string()));
        }
        if input.password.is_empty() {
            return Err(AuthError::InvalidArgument("password is required".to_string()));
        }
        if input.app_id <= 0 {
            return Err(AuthError::InvalidArgument("app_id is required".to_string()));
        }

        let password = ClearTextPassword::unchecked(input.password);

        let user = match Email::new(&input.email) {
            Ok(email) => self.store.find_by_email(&email).await?,
            Err(_) => None,
        };

        let Some(user) = user else {
            self.burn_verification(password).await;
            return Err(AuthError::InvalidCredentials);
        };

        let hasher = self.hasher.clone();
        let stored = user.password_hash.clone();
        let verified = tokio::task::spawn_blocking(move || hasher.verify(&password, &stored))
            .await
            .map_err(|e| AuthError::Internal(format!("password verification task failed: {e}")))?;

        match verified {
            Ok(true) => {}
            Ok(false) => return Err(AuthError::InvalidCredentials),
            Err(e) => {
                tracing::warn!(user_id = %user.id, error = %e, "Stored password hash is unusable");
                return Err(AuthError::InvalidCredentials);
            }
        }

        if user.password_hash.needs_rehash(self.hasher.cost()) {
            tracing::info!(user_id = %user.id, "Password hash uses an outdated cost");
        }

        let token = self.issuer.issue(&user.summary(), input.app_id)?;

        tracing::info!(user_id = %user.id, app_id = input.app_id, "User logged in");

        Ok(LoginOutput { token })
    }

    async fn burn_verification(&self, password: ClearTextPassword) {
        let hasher = self.hasher.clone();
        let _ = tokio::task::spawn_blocking(move || hasher.verify_dummy(&password)).await;
    }
}
