//! Auth Middleware
//!
//! Two stages, applied per route in this order:
//! 1. [`authenticate`] - public bypass, bearer verification, context injection
//! 2. [`enforce_roles`] - role requirements for the operation
//!
//! The operation name is the matched route path.

use axum::body::Body;
use axum::extract::{MatchedPath, State};
use axum::http::{Request, header::AUTHORIZATION};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::domain::entity::context::AuthenticatedContext;
use crate::domain::repository::UserStore;
use crate::presentation::handlers::AuthAppState;

fn operation_name(req: &Request<Body>) -> String {
    req.extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_owned())
        .unwrap_or_else(|| req.uri().path().to_owned())
}

/// Verify the bearer token and attach the caller's [`AuthenticatedContext`]
pub async fn authenticate<S>(
    State(state): State<AuthAppState<S>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response>
where
    S: UserStore + Send + Sync + 'static,
{
    let operation = operation_name(&req);

    // A header that is not valid UTF-8 counts as absent
    let authorization = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let context = state
        .authenticator
        .authenticate(&operation, authorization)
        .map_err(IntoResponse::into_response)?;

    if let Some(context) = context {
        req.extensions_mut().insert(context);
    }

    Ok(next.run(req).await)
}

/// Reject callers whose role is not allowed for the operation
pub async fn enforce_roles<S>(
    State(state): State<AuthAppState<S>>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, Response>
where
    S: UserStore + Send + Sync + 'static,
{
    let operation = operation_name(&req);

    state
        .config
        .role_requirements
        .authorize(&operation, req.extensions().get::<AuthenticatedContext>())
        .map_err(IntoResponse::into_response)?;

    Ok(next.run(req).await)
}
