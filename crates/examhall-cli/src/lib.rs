//! # Examhall CLI
//!
//! Operator commands: bootstrap admin accounts and inspect the permission
//! registry without going through the HTTP API.

use anyhow::{Context, Result, bail};
use examhall_core::hash_password;
use examhall_core::permissions::{Role, default_policy_for, list_action_flags, list_modules};
use examhall_db::AccountStore;
use examhall_models::{Account, NewAccount, RoleDefaultsResponse};

/// Creates an administrative account with a bcrypt-hashed password.
///
/// Fails for `student`, unknown roles and already registered emails.
pub async fn create_admin(
    store: &dyn AccountStore,
    role: &str,
    name: &str,
    email: &str,
    password: &str,
) -> Result<Account> {
    let role = Role::parse(role)?;
    if !role.is_admin() {
        bail!("'{}' is not an administrative role", role);
    }
    if password.len() < 8 {
        bail!("Password must be at least 8 characters");
    }

    let hashed = hash_password(password).map_err(|e| e.error)?;
    let account = store
        .create_account(NewAccount::new(name, email, hashed, role))
        .await
        .context("Failed to create admin account")?;

    Ok(account)
}

/// The Module Registry followed by the action-flag catalogue, one per line.
pub fn render_modules() -> String {
    let mut out = String::from("Modules:\n");
    for module in list_modules() {
        out.push_str(&format!("  {}\n", module));
    }
    out.push_str("Action flags:\n");
    for flag in list_action_flags() {
        out.push_str(&format!("  {:<20} {}\n", flag.action(), flag.flag_key()));
    }
    out
}

/// The default policy of `role` as pretty JSON.
pub fn render_defaults(role: &str) -> Result<String> {
    let role = Role::parse(role)?;
    let policy = default_policy_for(role)?;
    let response = RoleDefaultsResponse {
        role,
        policy: policy.clone(),
    };
    Ok(serde_json::to_string_pretty(&response)?)
}
