//! Auth Router

use axum::{Router, middleware, routing::post};

use crate::application::config::{AuthConfig, ConfigError};
use crate::application::operation;
use crate::domain::repository::UserStore;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{authenticate, enforce_roles};

/// Create the Auth router for any store implementation
pub fn auth_router<S>(store: S, config: AuthConfig) -> Result<Router, ConfigError>
where
    S: UserStore + Send + Sync + 'static,
{
    Ok(auth_router_with_state(AuthAppState::new(store, config)?))
}

/// Create the Auth router from prepared state
pub fn auth_router_with_state<S>(state: AuthAppState<S>) -> Router
where
    S: UserStore + Send + Sync + 'static,
{
    // Last layer runs first: authenticate, then enforce_roles.
    Router::new()
        .route(operation::REGISTER, post(handlers::register::<S>))
        .route(operation::LOGIN, post(handlers::login::<S>))
        .route(operation::IS_ADMIN, post(handlers::is_admin::<S>))
        .route(operation::LIST_USERS, post(handlers::list_users::<S>))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            enforce_roles::<S>,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            authenticate::<S>,
        ))
        .with_state(state)
}
