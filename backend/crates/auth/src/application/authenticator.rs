//! Bearer Authentication
//!
//! Transport-neutral half of the interceptor: given an operation name and
//! the caller's `authorization` metadata, decide who is calling.

use std::sync::Arc;

use platform::token::TokenCodec;

use crate::application::operation;
use crate::domain::entity::{claims::AccessClaims, context::AuthenticatedContext};
use crate::error::{AuthError, AuthResult};

const BEARER_PREFIX: &str = "Bearer ";

/// Token part of an `authorization` value, if it is a non-empty bearer
pub fn extract_bearer(authorization: &str) -> Option<&str> {
    let token = authorization.strip_prefix(BEARER_PREFIX)?.trim();
    (!token.is_empty()).then_some(token)
}

pub struct Authenticator<C> {
    codec: Arc<C>,
}

impl<C> Clone for Authenticator<C> {
    fn clone(&self) -> Self {
        Self {
            codec: self.codec.clone(),
        }
    }
}

impl<C: TokenCodec> Authenticator<C> {
    pub fn new(codec: Arc<C>) -> Self {
        Self { codec }
    }

    /// `Ok(None)` for public operations, the caller's identity otherwise
    ///
    /// Every failure is reported as `Unauthenticated`; the specific reason
    /// is only logged.
    pub fn authenticate(
        &self,
        operation: &str,
        authorization: Option<&str>,
    ) -> AuthResult<Option<AuthenticatedContext>> {
        if operation::is_public(operation) {
            return Ok(None);
        }

        let Some(token) = authorization.and_then(extract_bearer) else {
            tracing::debug!(operation = %operation, "Missing or malformed bearer token");
            return Err(AuthError::Unauthenticated);
        };

        match self.codec.verify::<AccessClaims>(token) {
            Ok(claims) => Ok(Some(AuthenticatedContext::from(claims))),
            Err(e) => {
                tracing::debug!(operation = %operation, reason = %e, "Token rejected");
                Err(AuthError::Unauthenticated)
            }
        }
    }
}
