use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{check_permission, get_profile, login_user};
use crate::state::AppState;

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login_user))
        .route("/me", get(get_profile))
        .route("/me/permissions/check", post(check_permission))
}
