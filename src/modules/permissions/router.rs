use axum::{
    Router,
    routing::{delete, get},
};
use examhall_core::permissions::{ActionFlag, Module};

use super::controller::{
    get_permissions, get_role_defaults, list_modules, reset_permissions, set_permissions,
};
use crate::middleware::permission::require_permission;
use crate::state::AppState;

/// Reads need the `admin_permissions` module; writes also need `manage_admins`.
/// The write handlers additionally refuse any caller that is not a super admin.
pub fn init_permissions_router(state: AppState) -> Router<AppState> {
    let read = require_permission(state.clone(), Module::AdminPermissions, None);
    let write = require_permission(
        state,
        Module::AdminPermissions,
        Some(ActionFlag::ManageAdmins),
    );

    Router::new()
        .route("/modules", get(list_modules).route_layer(read.clone()))
        .route(
            "/defaults/{role}",
            get(get_role_defaults).route_layer(read.clone()),
        )
        .route(
            "/admins/{admin_id}",
            get(get_permissions).route_layer(read).merge(
                delete(reset_permissions)
                    .put(set_permissions)
                    .route_layer(write),
            ),
        )
}
