use tracing::trace;

use super::defaults::default_policy_for;
use super::policy::{PermissionDecision, PermissionPolicy};
use super::registry::{ActionFlag, Module, Role};

/// Decides whether `role`, with an optional stored override, may use `module`
/// and, when given, `action`.
///
/// Pure: the caller fetches the override fresh for every request.
pub fn evaluate(
    role: Role,
    override_policy: Option<&PermissionPolicy>,
    module: Module,
    action: Option<ActionFlag>,
) -> PermissionDecision {
    if role == Role::SuperAdmin {
        return PermissionDecision::ALLOW;
    }

    // students never hold administrative permissions, even with a stray override
    let effective = match (role.is_admin(), override_policy) {
        (false, _) => return PermissionDecision::DENY,
        (true, Some(policy)) => policy,
        (true, None) => match default_policy_for(role) {
            Ok(policy) => policy,
            Err(_) => return PermissionDecision::DENY,
        },
    };

    let decision = decide(effective, module, action);
    trace!(
        role = %role,
        module = %module,
        action = ?action,
        overridden = override_policy.is_some(),
        allowed = decision.allowed,
        "Permission evaluated"
    );
    decision
}

/// Untyped variant of [`evaluate`] for names that come straight from a client.
///
/// Unregistered module names deny for everyone except `super_admin`. An
/// unregistered action name can never match an explicit flag, so it does not
/// gate the module grant.
pub fn evaluate_named(
    role: Role,
    override_policy: Option<&PermissionPolicy>,
    module: &str,
    action: Option<&str>,
) -> PermissionDecision {
    if role == Role::SuperAdmin {
        return PermissionDecision::ALLOW;
    }

    let Ok(module) = module.parse::<Module>() else {
        return PermissionDecision::DENY;
    };
    let action = action.and_then(|name| name.parse::<ActionFlag>().ok());

    evaluate(role, override_policy, module, action)
}

fn decide(
    policy: &PermissionPolicy,
    module: Module,
    action: Option<ActionFlag>,
) -> PermissionDecision {
    if !policy.grants_module(module) {
        return PermissionDecision::DENY;
    }

    match action.and_then(|flag| policy.flag(flag)) {
        Some(granted) => granted.into(),
        None => PermissionDecision::ALLOW,
    }
}
