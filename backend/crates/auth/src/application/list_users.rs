//! ListUsers Use Case

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::entity::user::UserSummary;
use crate::domain::repository::UserStore;
use crate::domain::value_object::user_filter::UserFilter;
use crate::error::{AuthError, AuthResult};

pub struct ListUsersInput {
    pub filters: BTreeMap<String, String>,
}

pub struct ListUsersOutput {
    pub users: Vec<UserSummary>,
}

pub struct ListUsersUseCase<S>
where
    S: UserStore,
{
    store: Arc<S>,
}

impl<S> ListUsersUseCase<S>
where
    S: UserStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn execute(&self, input: ListUsersInput) -> AuthResult<ListUsersOutput> {
        let filter = UserFilter::try_from(&input.filters)
            .map_err(|e| AuthError::InvalidFilter(e.to_string()))?;

        let users = self.store.list_filtered(&filter).await?;

        tracing::debug!(count = users.len(), "Listed users");

        Ok(ListUsersOutput { users })
    }
}
