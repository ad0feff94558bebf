//! Authentication extractors and the permission gate.
//!
//! - [`auth`]: bearer-token extractors (`AuthUser`, `CurrentAccount`)
//! - [`permission`]: the `require_permission` route layer
//!
//! # Example
//!
//! ```ignore
//! use examhall_core::permissions::{ActionFlag, Module};
//! use crate::middleware::permission::require_permission;
//!
//! Router::new()
//!     .route("/batches", post(create_batch))
//!     .route_layer(require_permission(
//!         state.clone(),
//!         Module::BatchManagement,
//!         Some(ActionFlag::CreateBatch),
//!     ));
//! ```

pub mod auth;
pub mod permission;
