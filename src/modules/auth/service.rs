use examhall_auth::create_access_token;
use examhall_config::JwtConfig;
use examhall_core::permissions::{
    PermissionDecision, PermissionPolicy, default_policy_for, evaluate_named,
};
use examhall_core::{AppError, Role, verify_password};
use examhall_db::AccountStore;
use examhall_models::{
    Account, CheckPermissionDto, EffectivePermissions, LoginRequest, LoginResponse, PolicySource,
    ProfileResponse,
};
use tracing::{info, instrument};

use crate::metrics::{track_user_login_failure, track_user_login_success};

pub struct AuthService;

impl AuthService {
    #[instrument(skip(store, dto, jwt_config), fields(email = %dto.email))]
    pub async fn login(
        store: &dyn AccountStore,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let Some(account) = store.find_account_by_email(&dto.email).await? else {
            track_user_login_failure("unknown_email");
            return Err(AppError::unauthorized("Invalid email or password".to_string()));
        };

        if !verify_password(&dto.password, &account.password)? {
            track_user_login_failure("bad_password");
            return Err(AppError::unauthorized("Invalid email or password".to_string()));
        }

        let access_token = create_access_token(
            account.id.into_inner(),
            &account.email,
            account.role,
            jwt_config,
        )?;

        track_user_login_success(account.role);
        info!(account_id = %account.id, role = %account.role, "Login succeeded");

        Ok(LoginResponse {
            access_token,
            token_type: "Bearer",
            expires_in: jwt_config.access_token_expiry,
            user: account,
        })
    }

    /// The stored override, if any, else the role default. `None` for students.
    #[instrument(skip(store, account), fields(account_id = %account.id))]
    pub async fn effective_permissions(
        store: &dyn AccountStore,
        account: &Account,
    ) -> Result<Option<EffectivePermissions>, AppError> {
        if !account.role.is_admin() {
            return Ok(None);
        }

        let permissions = match store.read_override(account.id).await? {
            Some(stored) if account.role != Role::SuperAdmin => EffectivePermissions {
                source: PolicySource::Override,
                policy: stored.policy,
            },
            _ => EffectivePermissions {
                source: PolicySource::Default,
                policy: default_policy_for(account.role)?.clone(),
            },
        };

        Ok(Some(permissions))
    }

    pub async fn profile(
        store: &dyn AccountStore,
        account: Account,
    ) -> Result<ProfileResponse, AppError> {
        let permissions = Self::effective_permissions(store, &account).await?;
        Ok(ProfileResponse {
            user: account,
            permissions,
        })
    }

    /// Answers "may I use this?" for the caller, e.g. to show or hide a button.
    #[instrument(skip(store, account), fields(account_id = %account.id))]
    pub async fn check_permission(
        store: &dyn AccountStore,
        account: &Account,
        dto: CheckPermissionDto,
    ) -> Result<PermissionDecision, AppError> {
        let stored = store.read_override(account.id).await?;
        let override_policy: Option<&PermissionPolicy> = stored.as_ref().map(|o| &o.policy);

        Ok(evaluate_named(
            account.role,
            override_policy,
            &dto.module,
            dto.action.as_deref(),
        ))
    }
}
