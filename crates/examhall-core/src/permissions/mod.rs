//! Administrative permission model.
//!
//! Every administrative capability in Examhall is gated by a [`Module`] and,
//! optionally, a finer grained [`ActionFlag`]. Each administrative [`Role`] has
//! an immutable default [`PermissionPolicy`]; an admin account may carry a stored
//! override that replaces the default wholesale.
//!
//! # Evaluation order
//!
//! 1. `super_admin` is always allowed, whatever the override says.
//! 2. The effective policy is the override when present, otherwise the role default.
//!    An override is never merged with the default.
//! 3. The requested module must be in the effective module set.
//! 4. If an action is requested and the effective policy has an explicit flag for
//!    it, that flag decides. A missing flag does not gate the action.
//!
//! ```
//! use examhall_core::permissions::{Module, PermissionPolicy, Role, evaluate};
//!
//! # fn main() -> Result<(), examhall_core::PermissionError> {
//! let custom = PermissionPolicy::from_raw(
//!     ["dashboard", "student_management"],
//!     [("can_create_batch", false)],
//! )?;
//!
//! assert!(evaluate(Role::CampusAdmin, Some(&custom), Module::StudentManagement, None).allowed);
//! assert!(!evaluate(Role::CampusAdmin, Some(&custom), Module::BatchManagement, None).allowed);
//! # Ok(())
//! # }
//! ```

mod defaults;
mod error;
mod evaluator;
mod policy;
mod registry;

pub use defaults::default_policy_for;
pub use error::PermissionError;
pub use evaluator::{evaluate, evaluate_named};
pub use policy::{PermissionDecision, PermissionPolicy};
pub use registry::{ActionFlag, FLAG_PREFIX, Module, Role, list_action_flags, list_modules};
