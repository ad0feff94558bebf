use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use examhall_auth::{Claims, verify_token};
use examhall_config::JwtConfig;
use examhall_core::AppError;
use examhall_core::permissions::{PermissionError, Role};
use examhall_models::{Account, UserId};

use crate::state::AppState;

/// Verifies the bearer token on a request and returns its claims.
pub fn resolve_principal(parts: &Parts, jwt_config: &JwtConfig) -> Result<Claims, PermissionError> {
    let auth_header = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| PermissionError::Authentication("Missing authorization header".to_string()))?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        PermissionError::Authentication("Invalid authorization header format".to_string())
    })?;

    verify_token(token, jwt_config)
}

/// Extractor for a valid access token. Says nothing about the account behind it.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn user_id(&self) -> Result<UserId, PermissionError> {
        self.0.user_id().map(UserId::from)
    }

    pub fn email(&self) -> &str {
        &self.0.email
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = resolve_principal(parts, &state.jwt_config)?;
        Ok(AuthUser(claims))
    }
}

/// Extractor for the caller's account, freshly loaded from the store.
#[derive(Debug, Clone)]
pub struct CurrentAccount(pub Account);

impl FromRequestParts<AppState> for CurrentAccount {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_user = AuthUser::from_request_parts(parts, state).await?;
        let account = state
            .store
            .find_account(auth_user.user_id()?)
            .await
            .map_err(PermissionError::from)?
            .ok_or(PermissionError::PrincipalNotFound)?;

        Ok(CurrentAccount(account))
    }
}

/// The authorized caller, placed in request extensions by the permission gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub account_id: UserId,
    pub role: Role,
}

impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Principal>().copied().ok_or_else(|| {
            AppError::internal_error("Route is not behind require_permission".to_string())
        })
    }
}
