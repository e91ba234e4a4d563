//! IsAdmin Use Case

use std::sync::Arc;

use crate::domain::repository::UserStore;
use crate::domain::value_object::user_id::UserId;
use crate::error::{AuthError, AuthResult};

pub struct IsAdminInput {
    pub user_id: i64,
}

pub struct IsAdminOutput {
    pub is_admin: bool,
}

/// Administrative lookup; unlike login, an unknown id is reported as such.
pub struct IsAdminUseCase<S>
where
    S: UserStore,
{
    store: Arc<S>,
}

impl<S> IsAdminUseCase<S>
where
    S: UserStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn execute(&self, input: IsAdminInput) -> AuthResult<IsAdminOutput> {
        let user_id = UserId::new(input.user_id);
        if !user_id.is_valid() {
            return Err(AuthError::InvalidArgument("user_id is required".to_string()));
        }

        let user = self
            .store
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(IsAdminOutput {
            is_admin: user.role.is_admin(),
        })
    }
}
