//! In-memory User Store
//!
//! Same contract as the PostgreSQL store: unique emails and increasing ids
//! starting at 1. Nothing is persisted.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::entity::user::{NewUser, User, UserSummary};
use crate::domain::repository::{StoreError, UserStore};
use crate::domain::value_object::{
    email::Email, user_filter::UserFilter, user_id::UserId, user_role::UserRole,
};

#[derive(Default)]
struct Users {
    last_id: i64,
    by_id: BTreeMap<i64, User>,
}

#[derive(Clone, Default)]
pub struct InMemoryUserStore {
    users: Arc<RwLock<Users>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Change a stored role; `false` if the id is unknown
    pub async fn set_role(&self, id: UserId, role: UserRole) -> bool {
        let mut users = self.users.write().await;
        match users.by_id.get_mut(&id.get()) {
            Some(user) => {
                user.role = role;
                true
            }
            None => false,
        }
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.by_id.len()
    }
}

impl UserStore for InMemoryUserStore {
    async fn exists_by_email(&self, email: &Email) -> Result<bool, StoreError> {
        let users = self.users.read().await;
        Ok(users.by_id.values().any(|u| &u.email == email))
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.by_id.values().find(|u| &u.email == email).cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.by_id.get(&id.get()).cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users.by_id.values().any(|u| u.email == user.email) {
            return Err(StoreError::UniqueViolation);
        }

        users.last_id += 1;
        let user = user.into_user(UserId::new(users.last_id));
        users.by_id.insert(user.id.get(), user.clone());
        Ok(user)
    }

    async fn list_filtered(&self, filter: &UserFilter) -> Result<Vec<UserSummary>, StoreError> {
        let users = self.users.read().await;
        Ok(users
            .by_id
            .values()
            .filter(|u| filter.matches(u.id, &u.email, u.role))
            .map(User::summary)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::password::HashedPassword;

    fn new_user(email: &str) -> NewUser {
        NewUser::register(
            Email::new(email).unwrap(),
            HashedPassword::from_db("$argon2id$v=19$m=8,t=1,p=1$c2FsdHNhbHQ$aGFzaA"),
        )
    }

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let store = InMemoryUserStore::new();
        let a = store.insert(new_user("a@example.com")).await.unwrap();
        let b = store.insert(new_user("b@example.com")).await.unwrap();

        assert_eq!(a.id, UserId::new(1));
        assert_eq!(b.id, UserId::new(2));
        assert_eq!(a.role, UserRole::User);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_unique_violation() {
        let store = InMemoryUserStore::new();
        store.insert(new_user("a@example.com")).await.unwrap();

        let result = store.insert(new_user("a@example.com")).await;
        assert!(matches!(result, Err(StoreError::UniqueViolation)));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_lookups() {
        let store = InMemoryUserStore::new();
        let user = store.insert(new_user("a@example.com")).await.unwrap();
        let email = Email::new("a@example.com").unwrap();

        assert!(store.exists_by_email(&email).await.unwrap());
        assert_eq!(store.find_by_email(&email).await.unwrap().map(|u| u.id), Some(user.id));
        assert!(store.find_by_id(user.id).await.unwrap().is_some());
        assert!(store.find_by_id(UserId::new(99)).await.unwrap().is_none());

        let other = Email::new("b@example.com").unwrap();
        assert!(!store.exists_by_email(&other).await.unwrap());
        assert!(store.find_by_email(&other).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_filtered() {
        let store = InMemoryUserStore::new();
        let a = store.insert(new_user("a@example.com")).await.unwrap();
        store.insert(new_user("b@example.com")).await.unwrap();
        assert!(store.set_role(a.id, UserRole::Admin).await);
        assert!(!store.set_role(UserId::new(42), UserRole::Admin).await);

        let all = store.list_filtered(&UserFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);

        let admins = store
            .list_filtered(&UserFilter::parse([("role", "admin")]).unwrap())
            .await
            .unwrap();
        assert_eq!(admins.len(), 1);
        assert_eq!(admins[0].email.as_str(), "a@example.com");
    }
}
