//! Persisted overrides and the permission-administration DTOs.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use examhall_core::permissions::{
    ActionFlag, Module, PermissionPolicy, Role, list_action_flags, list_modules,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::UserId;

/// A per-admin replacement policy. At most one exists per admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AdminPermissionOverride {
    pub admin_id: UserId,
    #[serde(flatten)]
    pub policy: PermissionPolicy,
    pub updated_at: DateTime<Utc>,
}

/// Where an admin's effective policy comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PolicySource {
    Override,
    Default,
}

/// Body of `PUT /api/permissions/admins/{admin_id}`.
///
/// Names stay untyped here so every unknown module or flag can be reported
/// together instead of failing on the first one.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SetPermissionsDto {
    #[schema(example = json!(["dashboard", "student_management"]))]
    pub modules: Vec<String>,
    #[serde(default)]
    #[schema(example = json!({"can_create_batch": false}))]
    pub action_flags: BTreeMap<String, bool>,
}

/// Body of `POST /api/auth/me/permissions/check`.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CheckPermissionDto {
    #[validate(length(min = 1))]
    #[schema(example = "batch_management")]
    pub module: String,
    #[schema(example = "create_batch")]
    pub action: Option<String>,
}

/// A policy tagged with its origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct EffectivePermissions {
    pub source: PolicySource,
    #[serde(flatten)]
    pub policy: PermissionPolicy,
}

/// What an administrator sees when inspecting another admin's permissions.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PermissionsView {
    pub admin_id: UserId,
    pub role: Role,
    pub source: PolicySource,
    pub modules: Vec<Module>,
    pub action_flags: BTreeMap<ActionFlag, bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    pub available_modules: Vec<Module>,
    pub available_action_flags: Vec<ActionFlag>,
}

impl PermissionsView {
    pub fn from_override(role: Role, stored: AdminPermissionOverride) -> Self {
        Self::build(
            stored.admin_id,
            role,
            PolicySource::Override,
            stored.policy,
            Some(stored.updated_at),
        )
    }

    pub fn from_default(admin_id: UserId, role: Role, policy: &PermissionPolicy) -> Self {
        Self::build(admin_id, role, PolicySource::Default, policy.clone(), None)
    }

    fn build(
        admin_id: UserId,
        role: Role,
        source: PolicySource,
        policy: PermissionPolicy,
        updated_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            admin_id,
            role,
            source,
            modules: policy.modules.into_iter().collect(),
            action_flags: policy.action_flags,
            updated_at,
            available_modules: list_modules().into_iter().collect(),
            available_action_flags: list_action_flags().into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ActionFlagInfo {
    pub action: &'static str,
    pub flag_key: &'static str,
}

/// The Module Registry and the action-flag catalogue.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ModuleCatalog {
    pub modules: Vec<Module>,
    pub action_flags: Vec<ActionFlagInfo>,
}

impl ModuleCatalog {
    pub fn current() -> Self {
        Self {
            modules: list_modules().into_iter().collect(),
            action_flags: list_action_flags()
                .into_iter()
                .map(|flag| ActionFlagInfo {
                    action: flag.action(),
                    flag_key: flag.flag_key(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RoleDefaultsResponse {
    pub role: Role,
    #[serde(flatten)]
    pub policy: PermissionPolicy,
}

#[cfg(test)]
mod tests {
    use super::*;
    use examhall_core::permissions::default_policy_for;

    #[test]
    fn test_set_permissions_dto_defaults_action_flags() {
        let dto: SetPermissionsDto =
            serde_json::from_str(r#"{"modules":["dashboard"]}"#).unwrap();
        assert_eq!(dto.modules, vec!["dashboard"]);
        assert!(dto.action_flags.is_empty());
    }

    #[test]
    fn test_default_view_shape() {
        let admin_id = UserId::new();
        let policy = default_policy_for(Role::CourseAdmin).unwrap();
        let view = PermissionsView::from_default(admin_id, Role::CourseAdmin, policy);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["source"], "default");
        assert_eq!(json["role"], "course_admin");
        assert_eq!(json["action_flags"]["can_export_results"], false);
        assert!(json.get("updated_at").is_none());
        assert_eq!(json["available_modules"].as_array().unwrap().len(), 9);
        assert_eq!(json["available_action_flags"].as_array().unwrap().len(), 10);
    }

    #[test]
    fn test_override_view_shape() {
        let stored = AdminPermissionOverride {
            admin_id: UserId::new(),
            policy: PermissionPolicy::new([Module::Dashboard], [(ActionFlag::CreateBatch, false)]),
            updated_at: Utc::now(),
        };
        let view = PermissionsView::from_override(Role::CampusAdmin, stored);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["source"], "override");
        assert_eq!(json["modules"], serde_json::json!(["dashboard"]));
        assert_eq!(json["action_flags"], serde_json::json!({"can_create_batch": false}));
        assert!(json.get("updated_at").is_some());
    }

    #[test]
    fn test_override_flattens_policy() {
        let stored = AdminPermissionOverride {
            admin_id: UserId::new(),
            policy: PermissionPolicy::new([Module::Analytics], []),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&stored).unwrap();
        assert_eq!(json["modules"], serde_json::json!(["analytics"]));
        assert_eq!(json["action_flags"], serde_json::json!({}));
    }

    #[test]
    fn test_catalog_lists_flag_keys() {
        let catalog = ModuleCatalog::current();
        assert_eq!(catalog.modules.len(), 9);
        assert!(
            catalog
                .action_flags
                .iter()
                .any(|info| info.action == "upload_tests" && info.flag_key == "can_upload_tests")
        );
    }
}
