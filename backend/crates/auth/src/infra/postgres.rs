//! PostgreSQL User Store

use kernel::error::app_error::AppError;
use platform::password::HashedPassword;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::domain::entity::user::{NewUser, User, UserSummary};
use crate::domain::repository::{StoreError, UserStore};
use crate::domain::value_object::{
    email::Email, user_filter::{FilterField, UserFilter}, user_id::UserId, user_role::UserRole,
};

/// PostgreSQL-backed user store
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Unique violations are reported on their own; everything else is
/// classified by the kernel's SQLSTATE mapping.
fn store_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return StoreError::UniqueViolation;
        }
    }
    StoreError::Backend(AppError::from(err))
}

fn parse_role(code: &str) -> Result<UserRole, StoreError> {
    code.parse::<UserRole>()
        .map_err(|e| StoreError::Backend(AppError::internal("Corrupt user row").with_source(e)))
}

// ============================================================================
// Rows
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    email: String,
    password_hash: String,
    role: String,
}

impl UserRow {
    fn into_user(self) -> Result<User, StoreError> {
        Ok(User {
            id: UserId::new(self.id),
            email: Email::from_db(self.email),
            password_hash: HashedPassword::from_db(self.password_hash),
            role: parse_role(&self.role)?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct UserSummaryRow {
    id: i64,
    email: String,
    role: String,
}

impl UserSummaryRow {
    fn into_summary(self) -> Result<UserSummary, StoreError> {
        Ok(UserSummary {
            id: UserId::new(self.id),
            email: Email::from_db(self.email),
            role: parse_role(&self.role)?,
        })
    }
}

// ============================================================================
// UserStore Implementation
// ============================================================================

impl UserStore for PgUserStore {
    async fn exists_by_email(&self, email: &Email) -> Result<bool, StoreError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(store_error)
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, password_hash, role
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, password_hash, role
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        row.map(UserRow::into_user).transpose()
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO users (email, password_hash, role)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(user.email.as_str())
        .bind(user.password_hash.as_phc_string())
        .bind(user.role.code())
        .fetch_one(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(user.into_user(UserId::new(id)))
    }

    async fn list_filtered(&self, filter: &UserFilter) -> Result<Vec<UserSummary>, StoreError> {
        let mut query = QueryBuilder::<Postgres>::new("SELECT id, email, role FROM users");

        // Column names come from the filter allow-list; values are always bound.
        let mut keyword = " WHERE ";
        if let Some(id) = filter.id {
            query
                .push(keyword)
                .push(FilterField::Id.column())
                .push(" = ")
                .push_bind(id.get());
            keyword = " AND ";
        }
        if let Some(email) = &filter.email {
            query
                .push(keyword)
                .push(FilterField::Email.column())
                .push(" = ")
                .push_bind(email.as_str().to_owned());
            keyword = " AND ";
        }
        if let Some(role) = filter.role {
            query
                .push(keyword)
                .push(FilterField::Role.column())
                .push(" = ")
                .push_bind(role.code());
        }
        query.push(" ORDER BY id");

        let rows = query
            .build_query_as::<UserSummaryRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(store_error)?;

        rows.into_iter().map(UserSummaryRow::into_summary).collect()
    }
}
