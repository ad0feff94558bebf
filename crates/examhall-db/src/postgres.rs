use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use examhall_core::permissions::{PermissionPolicy, Role};
use examhall_models::{
    Account, AdminPermissionOverride, CampusId, CourseId, NewAccount, UserId,
};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tracing::instrument;

use crate::error::{StoreError, StoreResult};
use crate::store::AccountStore;

const ACCOUNT_COLUMNS: &str =
    "id, name, email, password, role, campus_id, course_id, created_at, updated_at";

const OVERRIDE_COLUMNS: &str = "admin_id, modules, action_flags, updated_at";

/// [`AccountStore`] backed by the `users` and `admin_permissions` tables.
#[derive(Clone)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[derive(FromRow)]
struct AccountRow {
    id: UserId,
    name: String,
    email: String,
    password: String,
    role: String,
    campus_id: Option<CampusId>,
    course_id: Option<CourseId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = StoreError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let role = Role::parse(&row.role).map_err(|_| {
            StoreError::Corrupt(format!("account {} has unknown role '{}'", row.id, row.role))
        })?;

        Ok(Account {
            id: row.id,
            name: row.name,
            email: row.email,
            password: row.password,
            role,
            campus_id: row.campus_id,
            course_id: row.course_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(FromRow)]
struct OverrideRow {
    admin_id: UserId,
    modules: Vec<String>,
    action_flags: Json<BTreeMap<String, bool>>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<OverrideRow> for AdminPermissionOverride {
    type Error = StoreError;

    fn try_from(row: OverrideRow) -> Result<Self, Self::Error> {
        let policy = PermissionPolicy::from_raw(row.modules, row.action_flags.0)
            .map_err(|e| StoreError::Corrupt(format!("override for {}: {}", row.admin_id, e)))?;

        Ok(AdminPermissionOverride {
            admin_id: row.admin_id,
            policy,
            updated_at: row.updated_at,
        })
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}

#[async_trait]
impl AccountStore for PgAccountStore {
    #[instrument(skip(self))]
    async fn find_account(&self, id: UserId) -> StoreResult<Option<Account>> {
        let query = format!("SELECT {ACCOUNT_COLUMNS} FROM users WHERE id = $1");
        let row: Option<AccountRow> = sqlx::query_as(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Account::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_account_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        let query = format!("SELECT {ACCOUNT_COLUMNS} FROM users WHERE email = $1");
        let row: Option<AccountRow> = sqlx::query_as(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Account::try_from).transpose()
    }

    #[instrument(skip(self, account), fields(email = %account.email, role = %account.role))]
    async fn create_account(&self, account: NewAccount) -> StoreResult<Account> {
        let query = format!(
            "INSERT INTO users (name, email, password, role, campus_id, course_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {ACCOUNT_COLUMNS}"
        );
        let row: AccountRow = sqlx::query_as(&query)
            .bind(&account.name)
            .bind(&account.email)
            .bind(&account.password)
            .bind(account.role.as_str())
            .bind(account.campus_id)
            .bind(account.course_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StoreError::Conflict(format!("email '{}' is already registered", account.email))
                } else {
                    StoreError::Database(e)
                }
            })?;

        row.try_into()
    }

    #[instrument(skip(self))]
    async fn read_override(
        &self,
        admin_id: UserId,
    ) -> StoreResult<Option<AdminPermissionOverride>> {
        let query =
            format!("SELECT {OVERRIDE_COLUMNS} FROM admin_permissions WHERE admin_id = $1");
        let row: Option<OverrideRow> = sqlx::query_as(&query)
            .bind(admin_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(AdminPermissionOverride::try_from).transpose()
    }

    #[instrument(skip(self, policy))]
    async fn write_override(
        &self,
        admin_id: UserId,
        policy: &PermissionPolicy,
    ) -> StoreResult<AdminPermissionOverride> {
        // single upsert: concurrent writers never interleave modules and flags
        let query = format!(
            "INSERT INTO admin_permissions (admin_id, modules, action_flags, updated_at)
             VALUES ($1, $2, $3, NOW())
             ON CONFLICT (admin_id) DO UPDATE
             SET modules = EXCLUDED.modules,
                 action_flags = EXCLUDED.action_flags,
                 updated_at = EXCLUDED.updated_at
             RETURNING {OVERRIDE_COLUMNS}"
        );
        let row: OverrideRow = sqlx::query_as(&query)
            .bind(admin_id)
            .bind(policy.module_names())
            .bind(Json(policy.flag_keys()))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    StoreError::UnknownAccount(admin_id.to_string())
                } else {
                    StoreError::Database(e)
                }
            })?;

        row.try_into()
    }

    #[instrument(skip(self))]
    async fn delete_override(&self, admin_id: UserId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM admin_permissions WHERE admin_id = $1")
            .bind(admin_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
