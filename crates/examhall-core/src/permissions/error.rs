use thiserror::Error;

use super::registry::Module;

/// Failures raised by the permission component.
///
/// None of these carry transport details; the web layer decides how each kind
/// is reported.
#[derive(Debug, Error)]
pub enum PermissionError {
    /// No valid principal on the request.
    #[error("{0}")]
    Authentication(String),

    /// The principal resolved but its account no longer exists.
    #[error("Account not found")]
    PrincipalNotFound,

    #[error("Access denied to module '{module}'")]
    Authorization { module: Module },

    #[error("Unknown modules: {}", .0.join(", "))]
    UnknownModules(Vec<String>),

    #[error("Unknown action flags: {}", .0.join(", "))]
    UnknownActionFlags(Vec<String>),

    #[error("Unknown role: {0}")]
    UnknownRole(String),

    /// Persistence failure, propagated unchanged.
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}
