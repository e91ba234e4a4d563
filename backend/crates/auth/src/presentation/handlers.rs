//! HTTP Handlers

use std::sync::Arc;

use axum::extract::State;
use axum::{Extension, Json};
use platform::password::PasswordHasher;
use platform::token::HmacTokenCodec;

use crate::application::config::{AuthConfig, ConfigError};
use crate::application::{
    Authenticator, IsAdminInput, IsAdminUseCase, ListUsersInput, ListUsersUseCase, LoginInput,
    LoginUseCase, RegisterInput, RegisterUseCase, TokenIssuer,
};
use crate::domain::entity::context::AuthenticatedContext;
use crate::domain::repository::UserStore;
use crate::error::AuthResult;
use crate::presentation::dto::{
    IsAdminRequest, IsAdminResponse, ListUsersRequest, ListUsersResponse, LoginRequest,
    LoginResponse, RegisterRequest, RegisterResponse,
};

/// Shared state for auth handlers and middleware
pub struct AuthAppState<S> {
    pub store: Arc<S>,
    pub config: Arc<AuthConfig>,
    pub hasher: Arc<PasswordHasher>,
    pub issuer: TokenIssuer<HmacTokenCodec>,
    pub authenticator: Authenticator<HmacTokenCodec>,
}

impl<S> Clone for AuthAppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            config: self.config.clone(),
            hasher: self.hasher.clone(),
            issuer: self.issuer.clone(),
            authenticator: self.authenticator.clone(),
        }
    }
}

impl<S> AuthAppState<S>
where
    S: UserStore + Send + Sync + 'static,
{
    /// Validate `config` and build the signing and hashing services from it
    pub fn new(store: S, config: AuthConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let codec = Arc::new(HmacTokenCodec::new(&config.token_secret)?);
        let hasher = Arc::new(PasswordHasher::new(
            config.password_cost,
            config.password_pepper.clone(),
        )?);

        Ok(Self {
            store: Arc::new(store),
            issuer: TokenIssuer::new(codec.clone(), &config),
            authenticator: Authenticator::new(codec),
            hasher,
            config: Arc::new(config),
        })
    }
}

// ============================================================================
// Register
// ============================================================================

/// POST /auth.Auth/Register
pub async fn register<S>(
    State(state): State<AuthAppState<S>>,
    Json(req): Json<RegisterRequest>,
) -> AuthResult<Json<RegisterResponse>>
where
    S: UserStore + Send + Sync + 'static,
{
    let use_case = RegisterUseCase::new(state.store.clone(), state.hasher.clone());

    let output = use_case
        .execute(RegisterInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(Json(RegisterResponse {
        user_id: output.user_id.get(),
    }))
}

// ============================================================================
// Login
// ============================================================================

/// POST /auth.Auth/Login
pub async fn login<S>(
    State(state): State<AuthAppState<S>>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<Json<LoginResponse>>
where
    S: UserStore + Send + Sync + 'static,
{
    let use_case = LoginUseCase::new(
        state.store.clone(),
        state.hasher.clone(),
        state.issuer.clone(),
    );

    let output = use_case
        .execute(LoginInput {
            email: req.email,
            password: req.password,
            app_id: req.app_id,
        })
        .await?;

    Ok(Json(LoginResponse {
        token: output.token,
    }))
}

// ============================================================================
// IsAdmin
// ============================================================================

/// POST /auth.Auth/IsAdmin
pub async fn is_admin<S>(
    State(state): State<AuthAppState<S>>,
    Json(req): Json<IsAdminRequest>,
) -> AuthResult<Json<IsAdminResponse>>
where
    S: UserStore + Send + Sync + 'static,
{
    let use_case = IsAdminUseCase::new(state.store.clone());

    let output = use_case
        .execute(IsAdminInput {
            user_id: req.user_id,
        })
        .await?;

    Ok(Json(IsAdminResponse {
        is_admin: output.is_admin,
    }))
}

// ============================================================================
// ListUsers
// ============================================================================

/// POST /auth.Auth/ListUsers
pub async fn list_users<S>(
    State(state): State<AuthAppState<S>>,
    Extension(caller): Extension<AuthenticatedContext>,
    Json(req): Json<ListUsersRequest>,
) -> AuthResult<Json<ListUsersResponse>>
where
    S: UserStore + Send + Sync + 'static,
{
    let use_case = ListUsersUseCase::new(state.store.clone());

    let output = use_case
        .execute(ListUsersInput {
            filters: req.filters,
        })
        .await?;

    tracing::info!(
        caller_id = %caller.user_id,
        count = output.users.len(),
        "Users listed"
    );

    Ok(Json(ListUsersResponse {
        users: output.users.into_iter().map(Into::into).collect(),
    }))
}
