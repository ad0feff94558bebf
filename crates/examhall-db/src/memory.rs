use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::Utc;
use examhall_core::permissions::{PermissionPolicy, Role};
use examhall_models::{Account, AdminPermissionOverride, NewAccount, UserId};
use tokio::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::store::AccountStore;

/// In-process [`AccountStore`] with the same contract as the Postgres one.
///
/// Cloning shares the underlying maps.
#[derive(Clone, Default)]
pub struct MemoryAccountStore {
    accounts: Arc<RwLock<HashMap<UserId, Account>>>,
    overrides: Arc<RwLock<HashMap<UserId, AdminPermissionOverride>>>,
    offline: Arc<AtomicBool>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail, as an unreachable database would.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Changes an account's role in place.
    pub async fn update_role(&self, id: UserId, role: Role) -> StoreResult<()> {
        self.ensure_online()?;
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .get_mut(&id)
            .ok_or_else(|| StoreError::UnknownAccount(id.to_string()))?;
        account.role = role;
        account.updated_at = Utc::now();
        Ok(())
    }

    /// Removes an account along with its override, like `ON DELETE CASCADE`.
    pub async fn remove_account(&self, id: UserId) -> StoreResult<bool> {
        self.ensure_online()?;
        // lock order everywhere: accounts, then overrides
        let mut accounts = self.accounts.write().await;
        self.overrides.write().await.remove(&id);
        Ok(accounts.remove(&id).is_some())
    }

    fn ensure_online(&self) -> StoreResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unexpected(anyhow!("account store is unavailable")));
        }
        Ok(())
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn find_account(&self, id: UserId) -> StoreResult<Option<Account>> {
        self.ensure_online()?;
        Ok(self.accounts.read().await.get(&id).cloned())
    }

    async fn find_account_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        self.ensure_online()?;
        Ok(self
            .accounts
            .read()
            .await
            .values()
            .find(|account| account.email == email)
            .cloned())
    }

    async fn create_account(&self, account: NewAccount) -> StoreResult<Account> {
        self.ensure_online()?;
        let mut accounts = self.accounts.write().await;
        if accounts.values().any(|a| a.email == account.email) {
            return Err(StoreError::Conflict(format!(
                "email '{}' is already registered",
                account.email
            )));
        }

        let now = Utc::now();
        let created = Account {
            id: UserId::new(),
            name: account.name,
            email: account.email,
            password: account.password,
            role: account.role,
            campus_id: account.campus_id,
            course_id: account.course_id,
            created_at: now,
            updated_at: now,
        };
        accounts.insert(created.id, created.clone());
        Ok(created)
    }

    async fn read_override(
        &self,
        admin_id: UserId,
    ) -> StoreResult<Option<AdminPermissionOverride>> {
        self.ensure_online()?;
        Ok(self.overrides.read().await.get(&admin_id).cloned())
    }

    async fn write_override(
        &self,
        admin_id: UserId,
        policy: &PermissionPolicy,
    ) -> StoreResult<AdminPermissionOverride> {
        self.ensure_online()?;
        // held until the insert so a concurrent remove_account cannot orphan the row
        let accounts = self.accounts.read().await;
        if !accounts.contains_key(&admin_id) {
            return Err(StoreError::UnknownAccount(admin_id.to_string()));
        }

        let stored = AdminPermissionOverride {
            admin_id,
            policy: policy.clone(),
            updated_at: Utc::now(),
        };
        self.overrides.write().await.insert(admin_id, stored.clone());
        drop(accounts);
        Ok(stored)
    }

    async fn delete_override(&self, admin_id: UserId) -> StoreResult<bool> {
        self.ensure_online()?;
        Ok(self.overrides.write().await.remove(&admin_id).is_some())
    }
}
