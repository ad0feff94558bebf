use examhall_core::permissions::{ActionFlag, Module, PermissionDecision, PermissionPolicy, Role};
use examhall_models::{
    Account, ActionFlagInfo, CheckPermissionDto, EffectivePermissions, LoginRequest,
    LoginResponse, ModuleCatalog, PermissionsView, PolicySource, ProfileResponse,
    RoleDefaultsResponse, SetPermissionsDto,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::controller::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::get_profile,
        crate::modules::auth::controller::check_permission,
        crate::modules::permissions::controller::list_modules,
        crate::modules::permissions::controller::get_role_defaults,
        crate::modules::permissions::controller::get_permissions,
        crate::modules::permissions::controller::set_permissions,
        crate::modules::permissions::controller::reset_permissions,
    ),
    components(
        schemas(
            Account,
            Role,
            Module,
            ActionFlag,
            PermissionPolicy,
            PermissionDecision,
            PolicySource,
            EffectivePermissions,
            PermissionsView,
            SetPermissionsDto,
            CheckPermissionDto,
            ModuleCatalog,
            ActionFlagInfo,
            RoleDefaultsResponse,
            LoginRequest,
            LoginResponse,
            ProfileResponse,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Login, profile and self permission checks"),
        (name = "Permissions", description = "Per-admin permission administration")
    ),
    info(
        title = "Examhall API",
        version = "0.1.0",
        description = "Role-based administrative permissions for the Examhall test-management backend.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
