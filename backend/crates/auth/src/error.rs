//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::domain::repository::StoreError;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Missing, malformed, forged or expired bearer token
    #[error("Authentication required")]
    Unauthenticated,

    /// Authenticated, but the role is not allowed for the operation
    #[error("Permission denied")]
    PermissionDenied,

    /// Unknown email or wrong password (deliberately indistinguishable)
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Email already exists")]
    EmailAlreadyExists,

    /// Only for administrative lookups, never for sign-in
    #[error("User not found")]
    UserNotFound,

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Password hashing failed")]
    PasswordHashingFailed,

    #[error("Token issuance failed")]
    TokenIssuance,

    #[error("Storage error")]
    Storage(#[source] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Unauthenticated | AuthError::InvalidCredentials => ErrorKind::Unauthorized,
            AuthError::PermissionDenied => ErrorKind::Forbidden,
            AuthError::EmailAlreadyExists => ErrorKind::Conflict,
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::InvalidFilter(_) | AuthError::InvalidArgument(_) => ErrorKind::BadRequest,
            AuthError::Storage(StoreError::Backend(e)) if e.kind() == ErrorKind::ServiceUnavailable => {
                ErrorKind::ServiceUnavailable
            }
            AuthError::PasswordHashingFailed
            | AuthError::TokenIssuance
            | AuthError::Storage(_)
            | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    ///
    /// Server-side failures get a generic message; their detail stays in the logs.
    pub fn to_app_error(&self) -> AppError {
        let kind = self.kind();
        if kind.is_server_error() {
            let message = if kind == ErrorKind::ServiceUnavailable {
                "Service temporarily unavailable"
            } else {
                "Internal server error"
            };
            return AppError::new(kind, message).with_action("Retry the request later");
        }
        AppError::new(kind, self.to_string())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Storage(e) => {
                tracing::error!(error = ?e, "Auth storage error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::PasswordHashingFailed | AuthError::TokenIssuance => {
                tracing::error!(error = %self, "Auth credential error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::PermissionDenied => {
                tracing::warn!("Operation denied by role requirements");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        AuthError::Storage(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AuthError::Unauthenticated.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::InvalidCredentials.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::PermissionDenied.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AuthError::EmailAlreadyExists.status_code(), StatusCode::CONFLICT);
        assert_eq!(AuthError::UserNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AuthError::InvalidFilter("name".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::TokenIssuance.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_storage_detail_not_exposed() {
        let backend = AppError::internal("Database error")
            .with_source(std::io::Error::other("relation \"users\" does not exist"));
        let err = AuthError::Storage(StoreError::Backend(backend));

        let app_err = err.to_app_error();
        assert_eq!(app_err.status_code(), 500);
        assert!(!app_err.message().contains("users"));
    }

    #[test]
    fn test_unavailable_backend_maps_to_503() {
        let backend = AppError::service_unavailable("Database connection pool exhausted");
        let err = AuthError::Storage(StoreError::Backend(backend));
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
