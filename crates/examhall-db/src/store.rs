use async_trait::async_trait;
use examhall_core::permissions::PermissionPolicy;
use examhall_models::{Account, AdminPermissionOverride, NewAccount, UserId};

use crate::error::StoreResult;

/// Accounts and their permission overrides.
///
/// Every read goes to the backing store; implementations must not cache, so a
/// permission change is visible to the very next request.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_account(&self, id: UserId) -> StoreResult<Option<Account>>;

    async fn find_account_by_email(&self, email: &str) -> StoreResult<Option<Account>>;

    async fn create_account(&self, account: NewAccount) -> StoreResult<Account>;

    async fn read_override(&self, admin_id: UserId)
    -> StoreResult<Option<AdminPermissionOverride>>;

    /// Creates or fully replaces the override. Concurrent writers: last one wins.
    async fn write_override(
        &self,
        admin_id: UserId,
        policy: &PermissionPolicy,
    ) -> StoreResult<AdminPermissionOverride>;

    /// Returns whether an override existed.
    async fn delete_override(&self, admin_id: UserId) -> StoreResult<bool>;
}
