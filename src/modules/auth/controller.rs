use axum::Json;
use axum::extract::State;
use examhall_core::AppError;
use examhall_core::permissions::PermissionDecision;
use examhall_models::{CheckPermissionDto, LoginRequest, LoginResponse, ProfileResponse};
use tracing::instrument;
use utoipa::ToSchema;

use super::service::AuthService;
use crate::middleware::auth::CurrentAccount;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[derive(ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Login and receive an access token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Bad request - validation error", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn login_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = AuthService::login(state.store.as_ref(), dto, &state.jwt_config).await?;
    Ok(Json(response))
}

/// Current account and its effective permissions
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Profile of the caller", body = ProfileResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Account no longer exists", body = ErrorResponse)
    ),
    tag = "Authentication",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, account))]
pub async fn get_profile(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = AuthService::profile(state.store.as_ref(), account).await?;
    Ok(Json(profile))
}

/// Check whether the caller may use a module, and optionally an action
#[utoipa::path(
    post,
    path = "/api/auth/me/permissions/check",
    request_body = CheckPermissionDto,
    responses(
        (status = 200, description = "Decision for the caller", body = PermissionDecision),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Account no longer exists", body = ErrorResponse)
    ),
    tag = "Authentication",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, account, dto))]
pub async fn check_permission(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    ValidatedJson(dto): ValidatedJson<CheckPermissionDto>,
) -> Result<Json<PermissionDecision>, AppError> {
    let decision = AuthService::check_permission(state.store.as_ref(), &account, dto).await?;
    Ok(Json(decision))
}
