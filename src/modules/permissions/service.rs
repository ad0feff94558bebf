use anyhow::anyhow;
use examhall_core::AppError;
use examhall_core::permissions::{
    Module, PermissionError, PermissionPolicy, Role, default_policy_for,
};
use examhall_db::AccountStore;
use examhall_models::{
    Account, ModuleCatalog, PermissionsView, RoleDefaultsResponse, SetPermissionsDto, UserId,
};
use tracing::{info, instrument, warn};

use crate::metrics::track_permission_change;
use crate::middleware::auth::Principal;

pub struct PermissionService;

impl PermissionService {
    pub fn list_modules() -> ModuleCatalog {
        ModuleCatalog::current()
    }

    pub fn role_defaults(role: &str) -> Result<RoleDefaultsResponse, AppError> {
        let role = Role::parse(role)?;
        let policy = default_policy_for(role)?;
        Ok(RoleDefaultsResponse {
            role,
            policy: policy.clone(),
        })
    }

    /// The admin's override if one is stored, otherwise the role default.
    #[instrument(skip(store))]
    pub async fn get_permissions(
        store: &dyn AccountStore,
        admin_id: UserId,
    ) -> Result<PermissionsView, AppError> {
        let account = Self::find_admin(store, admin_id).await?;

        match store.read_override(admin_id).await? {
            Some(stored) => Ok(PermissionsView::from_override(account.role, stored)),
            None => Self::default_view(&account),
        }
    }

    /// Validates every name first, then stores `dto` as a full replacement.
    /// On a validation error the previous override is left untouched.
    /// Only a super admin may call this.
    #[instrument(skip(store, dto), fields(modules = dto.modules.len(), flags = dto.action_flags.len()))]
    pub async fn set_permissions(
        store: &dyn AccountStore,
        admin_id: UserId,
        dto: SetPermissionsDto,
        principal: Principal,
    ) -> Result<PermissionsView, AppError> {
        let changed_by = Self::require_super_admin(principal)?;
        let account = Self::find_admin(store, admin_id).await?;
        let policy = PermissionPolicy::from_raw(dto.modules, dto.action_flags)?;

        let stored = store.write_override(admin_id, &policy).await?;
        track_permission_change("set");
        info!(
            admin_id = %admin_id,
            changed_by = %changed_by,
            modules = ?policy.module_names(),
            "Permission override stored"
        );

        Ok(PermissionsView::from_override(account.role, stored))
    }

    /// Drops the override and returns the restored default. Idempotent.
    /// Only a super admin may call this.
    #[instrument(skip(store))]
    pub async fn reset_permissions(
        store: &dyn AccountStore,
        admin_id: UserId,
        principal: Principal,
    ) -> Result<PermissionsView, AppError> {
        let changed_by = Self::require_super_admin(principal)?;
        let account = Self::find_admin(store, admin_id).await?;

        let removed = store.delete_override(admin_id).await?;
        track_permission_change("reset");
        info!(
            admin_id = %admin_id,
            changed_by = %changed_by,
            removed,
            "Permission override reset"
        );

        Self::default_view(&account)
    }

    // the route gate admits any admin whose policy grants admin_permissions
    fn require_super_admin(principal: Principal) -> Result<UserId, PermissionError> {
        if principal.role != Role::SuperAdmin {
            warn!(
                account_id = %principal.account_id,
                role = %principal.role,
                "Permission change refused"
            );
            return Err(PermissionError::Authorization {
                module: Module::AdminPermissions,
            });
        }
        Ok(principal.account_id)
    }

    async fn find_admin(store: &dyn AccountStore, admin_id: UserId) -> Result<Account, AppError> {
        let account = store
            .find_account(admin_id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Admin account not found")))?;

        if !account.role.is_admin() {
            return Err(PermissionError::UnknownRole(account.role.to_string()).into());
        }

        Ok(account)
    }

    fn default_view(account: &Account) -> Result<PermissionsView, AppError> {
        let policy = default_policy_for(account.role)?;
        Ok(PermissionsView::from_default(account.id, account.role, policy))
    }
}
