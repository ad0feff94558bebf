//! # Examhall Models
//!
//! Strongly typed ids, account records and the request/response DTOs of the
//! Examhall API.

pub mod accounts;
pub mod auth;
pub mod ids;
pub mod permissions;

pub use accounts::{Account, NewAccount};
pub use auth::{LoginRequest, LoginResponse, ProfileResponse};
pub use ids::{CampusId, CourseId, UserId};
pub use permissions::{
    ActionFlagInfo, AdminPermissionOverride, CheckPermissionDto, EffectivePermissions,
    ModuleCatalog, PermissionsView, PolicySource, RoleDefaultsResponse, SetPermissionsDto,
};
