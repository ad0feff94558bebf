//! Immutable per-role default policies.
//!
//! Defaults live in code rather than in the database so a missing or corrupt
//! override can never strip an admin of every capability.

use std::sync::LazyLock;

use strum::IntoEnumIterator;

use super::error::PermissionError;
use super::policy::PermissionPolicy;
use super::registry::{ActionFlag, Module, Role};

// Display only: super_admin bypasses evaluation entirely.
static SUPER_ADMIN: LazyLock<PermissionPolicy> = LazyLock::new(|| {
    PermissionPolicy::new(Module::iter(), ActionFlag::iter().map(|flag| (flag, true)))
});

static CAMPUS_ADMIN: LazyLock<PermissionPolicy> = LazyLock::new(|| {
    PermissionPolicy::new(
        [
            Module::Dashboard,
            Module::CourseManagement,
            Module::BatchManagement,
            Module::StudentManagement,
            Module::TestManagement,
            Module::ResultsManagement,
            Module::Analytics,
        ],
        [
            (ActionFlag::CreateCampus, false),
            (ActionFlag::CreateCourse, true),
            (ActionFlag::CreateBatch, true),
            (ActionFlag::ManageStudents, true),
            (ActionFlag::ManageTests, true),
            (ActionFlag::UploadQuestions, true),
            (ActionFlag::UploadTests, true),
            (ActionFlag::ViewResults, true),
            (ActionFlag::ExportResults, true),
            (ActionFlag::ManageAdmins, false),
        ],
    )
});

static COURSE_ADMIN: LazyLock<PermissionPolicy> = LazyLock::new(|| {
    PermissionPolicy::new(
        [
            Module::Dashboard,
            Module::BatchManagement,
            Module::StudentManagement,
            Module::TestManagement,
            Module::ResultsManagement,
        ],
        [
            (ActionFlag::CreateCampus, false),
            (ActionFlag::CreateCourse, false),
            (ActionFlag::CreateBatch, true),
            (ActionFlag::ManageStudents, true),
            (ActionFlag::ManageTests, true),
            (ActionFlag::UploadQuestions, true),
            (ActionFlag::UploadTests, true),
            (ActionFlag::ViewResults, true),
            (ActionFlag::ExportResults, false),
            (ActionFlag::ManageAdmins, false),
        ],
    )
});

/// The compiled default policy for an administrative role.
///
/// # Errors
///
/// Returns [`PermissionError::UnknownRole`] for roles outside the permission
/// model (`student`).
pub fn default_policy_for(role: Role) -> Result<&'static PermissionPolicy, PermissionError> {
    match role {
        Role::SuperAdmin => Ok(&SUPER_ADMIN),
        Role::CampusAdmin => Ok(&CAMPUS_ADMIN),
        Role::CourseAdmin => Ok(&COURSE_ADMIN),
        Role::Student => Err(PermissionError::UnknownRole(role.to_string())),
    }
}
