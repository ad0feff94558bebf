//! # Examhall Core
//!
//! Core types, errors, and the administrative permission model for the Examhall API.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`password`]: Secure password hashing and verification
//! - [`permissions`]: Module registry, role defaults and the permission evaluator
//!
//! # Example
//!
//! ```
//! use examhall_core::permissions::{ActionFlag, Module, Role, evaluate};
//!
//! let decision = evaluate(Role::CourseAdmin, None, Module::BatchManagement, Some(ActionFlag::CreateBatch));
//! assert!(decision.allowed);
//! ```

pub mod errors;
pub mod password;
pub mod permissions;

// Re-export commonly used types at crate root
pub use errors::AppError;
pub use password::{hash_password, verify_password};
pub use permissions::{
    ActionFlag, Module, PermissionDecision, PermissionError, PermissionPolicy, Role,
};
