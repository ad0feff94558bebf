//! The closed vocabulary of the permission model: modules, action flags and roles.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};
use utoipa::ToSchema;

use super::error::PermissionError;

/// Prefix that turns an action name into its flag key (`create_batch` -> `can_create_batch`).
pub const FLAG_PREFIX: &str = "can_";

/// An administrative capability area.
///
/// The set is fixed at build time; adding a variant is the only way to register
/// a new module.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Module {
    Dashboard,
    CampusManagement,
    CourseManagement,
    BatchManagement,
    StudentManagement,
    TestManagement,
    ResultsManagement,
    Analytics,
    AdminPermissions,
}

impl Module {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// A named boolean permission finer than module access.
///
/// `Display`/`FromStr` use the action name (`create_batch`); serde uses the
/// stored flag key (`can_create_batch`).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum ActionFlag {
    #[serde(rename = "can_create_campus")]
    CreateCampus,
    #[serde(rename = "can_create_course")]
    CreateCourse,
    #[serde(rename = "can_create_batch")]
    CreateBatch,
    #[serde(rename = "can_manage_students")]
    ManageStudents,
    #[serde(rename = "can_manage_tests")]
    ManageTests,
    #[serde(rename = "can_upload_questions")]
    UploadQuestions,
    #[serde(rename = "can_upload_tests")]
    UploadTests,
    #[serde(rename = "can_view_results")]
    ViewResults,
    #[serde(rename = "can_export_results")]
    ExportResults,
    #[serde(rename = "can_manage_admins")]
    ManageAdmins,
}

impl ActionFlag {
    /// The action name a caller asks for, e.g. `upload_tests`.
    pub fn action(self) -> &'static str {
        self.into()
    }

    /// The key under which the flag is stored, e.g. `can_upload_tests`.
    pub fn flag_key(self) -> &'static str {
        match self {
            Self::CreateCampus => "can_create_campus",
            Self::CreateCourse => "can_create_course",
            Self::CreateBatch => "can_create_batch",
            Self::ManageStudents => "can_manage_students",
            Self::ManageTests => "can_manage_tests",
            Self::UploadQuestions => "can_upload_questions",
            Self::UploadTests => "can_upload_tests",
            Self::ViewResults => "can_view_results",
            Self::ExportResults => "can_export_results",
            Self::ManageAdmins => "can_manage_admins",
        }
    }

    /// Parses a stored flag key. Returns `None` for anything outside the registry.
    pub fn from_flag_key(key: &str) -> Option<Self> {
        key.strip_prefix(FLAG_PREFIX)?.parse().ok()
    }
}

/// Account roles. Only the first three take part in the permission model.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    CampusAdmin,
    CourseAdmin,
    Student,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Strict parse; case variants such as `Super_Admin` are rejected.
    pub fn parse(value: &str) -> Result<Self, PermissionError> {
        value
            .parse()
            .map_err(|_| PermissionError::UnknownRole(value.to_string()))
    }

    pub fn is_admin(self) -> bool {
        !matches!(self, Role::Student)
    }

    /// The roles that own a default policy.
    pub fn admin_roles() -> impl Iterator<Item = Role> {
        Role::iter().filter(|role| role.is_admin())
    }
}

/// Every module an admin can be granted.
pub fn list_modules() -> BTreeSet<Module> {
    Module::iter().collect()
}

/// Every action flag an override may set.
pub fn list_action_flags() -> BTreeSet<ActionFlag> {
    ActionFlag::iter().collect()
}
