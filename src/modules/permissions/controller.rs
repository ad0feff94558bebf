use axum::Json;
use axum::extract::{Path, State};
use examhall_core::AppError;
use examhall_models::{
    ModuleCatalog, PermissionsView, RoleDefaultsResponse, SetPermissionsDto, UserId,
};
use tracing::instrument;

use super::service::PermissionService;
use crate::middleware::auth::Principal;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// List assignable modules and action flags
#[utoipa::path(
    get,
    path = "/api/permissions/modules",
    responses(
        (status = 200, description = "Module registry and action flags", body = ModuleCatalog),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Access denied to module 'admin_permissions'", body = ErrorResponse)
    ),
    tag = "Permissions",
    security(("bearer_auth" = []))
)]
pub async fn list_modules() -> Json<ModuleCatalog> {
    Json(PermissionService::list_modules())
}

/// Default policy of a role
#[utoipa::path(
    get,
    path = "/api/permissions/defaults/{role}",
    params(("role" = String, Path, description = "super_admin, campus_admin or course_admin")),
    responses(
        (status = 200, description = "Default policy", body = RoleDefaultsResponse),
        (status = 400, description = "Unknown role", body = ErrorResponse),
        (status = 403, description = "Access denied", body = ErrorResponse)
    ),
    tag = "Permissions",
    security(("bearer_auth" = []))
)]
pub async fn get_role_defaults(
    Path(role): Path<String>,
) -> Result<Json<RoleDefaultsResponse>, AppError> {
    Ok(Json(PermissionService::role_defaults(&role)?))
}

/// Effective permissions of an admin
#[utoipa::path(
    get,
    path = "/api/permissions/admins/{admin_id}",
    params(("admin_id" = String, Path, description = "Admin account id")),
    responses(
        (status = 200, description = "Override or role default", body = PermissionsView),
        (status = 400, description = "Target is not an admin", body = ErrorResponse),
        (status = 403, description = "Access denied", body = ErrorResponse),
        (status = 404, description = "Admin not found", body = ErrorResponse)
    ),
    tag = "Permissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_permissions(
    State(state): State<AppState>,
    Path(admin_id): Path<UserId>,
) -> Result<Json<PermissionsView>, AppError> {
    let view = PermissionService::get_permissions(state.store.as_ref(), admin_id).await?;
    Ok(Json(view))
}

/// Replace an admin's permissions
#[utoipa::path(
    put,
    path = "/api/permissions/admins/{admin_id}",
    params(("admin_id" = String, Path, description = "Admin account id")),
    request_body = SetPermissionsDto,
    responses(
        (status = 200, description = "Stored override", body = PermissionsView),
        (status = 400, description = "Unknown module, action flag or non-admin target", body = ErrorResponse),
        (status = 403, description = "Caller is not a super admin", body = ErrorResponse),
        (status = 404, description = "Admin not found", body = ErrorResponse)
    ),
    tag = "Permissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, principal, dto))]
pub async fn set_permissions(
    State(state): State<AppState>,
    principal: Principal,
    Path(admin_id): Path<UserId>,
    ValidatedJson(dto): ValidatedJson<SetPermissionsDto>,
) -> Result<Json<PermissionsView>, AppError> {
    let view = PermissionService::set_permissions(
        state.store.as_ref(),
        admin_id,
        dto,
        principal,
    )
    .await?;
    Ok(Json(view))
}

/// Reset an admin to the role default
#[utoipa::path(
    delete,
    path = "/api/permissions/admins/{admin_id}",
    params(("admin_id" = String, Path, description = "Admin account id")),
    responses(
        (status = 200, description = "Restored default", body = PermissionsView),
        (status = 400, description = "Target is not an admin", body = ErrorResponse),
        (status = 403, description = "Access denied", body = ErrorResponse),
        (status = 404, description = "Admin not found", body = ErrorResponse)
    ),
    tag = "Permissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, principal))]
pub async fn reset_permissions(
    State(state): State<AppState>,
    principal: Principal,
    Path(admin_id): Path<UserId>,
) -> Result<Json<PermissionsView>, AppError> {
    let view =
        PermissionService::reset_permissions(state.store.as_ref(), admin_id, principal)
            .await?;
    Ok(Json(view))
}
