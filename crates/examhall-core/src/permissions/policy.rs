use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::error::PermissionError;
use super::registry::{ActionFlag, Module};

/// A module set plus explicit action flags.
///
/// Used both for role defaults and for per-admin overrides. A flag missing from
/// `action_flags` means "not gated", never `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PermissionPolicy {
    pub modules: BTreeSet<Module>,
    #[serde(default)]
    pub action_flags: BTreeMap<ActionFlag, bool>,
}

impl PermissionPolicy {
    pub fn new(
        modules: impl IntoIterator<Item = Module>,
        action_flags: impl IntoIterator<Item = (ActionFlag, bool)>,
    ) -> Self {
        Self {
            modules: modules.into_iter().collect(),
            action_flags: action_flags.into_iter().collect(),
        }
    }

    /// Builds a policy from untyped names, as received from clients or storage.
    ///
    /// Module names are checked first; every unknown name is reported at once.
    /// Flag keys must use the stored `can_*` form.
    pub fn from_raw<M, K>(
        modules: impl IntoIterator<Item = M>,
        action_flags: impl IntoIterator<Item = (K, bool)>,
    ) -> Result<Self, PermissionError>
    where
        M: AsRef<str>,
        K: AsRef<str>,
    {
        let mut known_modules = BTreeSet::new();
        let mut unknown_modules = BTreeSet::new();
        for name in modules {
            let name = name.as_ref();
            match name.parse::<Module>() {
                Ok(module) => {
                    known_modules.insert(module);
                }
                Err(_) => {
                    unknown_modules.insert(name.to_string());
                }
            }
        }
        if !unknown_modules.is_empty() {
            return Err(PermissionError::UnknownModules(
                unknown_modules.into_iter().collect(),
            ));
        }

        let mut known_flags = BTreeMap::new();
        let mut unknown_flags = BTreeSet::new();
        for (key, value) in action_flags {
            let key = key.as_ref();
            match ActionFlag::from_flag_key(key) {
                Some(flag) => {
                    known_flags.insert(flag, value);
                }
                None => {
                    unknown_flags.insert(key.to_string());
                }
            }
        }
        if !unknown_flags.is_empty() {
            return Err(PermissionError::UnknownActionFlags(
                unknown_flags.into_iter().collect(),
            ));
        }

        Ok(Self {
            modules: known_modules,
            action_flags: known_flags,
        })
    }

    pub fn grants_module(&self, module: Module) -> bool {
        self.modules.contains(&module)
    }

    /// The explicit flag value, if the policy sets one.
    pub fn flag(&self, flag: ActionFlag) -> Option<bool> {
        self.action_flags.get(&flag).copied()
    }

    /// Module names in registry order, for persistence.
    pub fn module_names(&self) -> Vec<String> {
        self.modules.iter().map(|m| m.as_str().to_string()).collect()
    }

    /// Flags keyed by their stored `can_*` name, for persistence.
    pub fn flag_keys(&self) -> BTreeMap<String, bool> {
        self.action_flags
            .iter()
            .map(|(flag, value)| (flag.flag_key().to_string(), *value))
            .collect()
    }
}

/// Outcome of a single evaluation. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PermissionDecision {
    pub allowed: bool,
}

impl PermissionDecision {
    pub const ALLOW: Self = Self { allowed: true };
    pub const DENY: Self = Self { allowed: false };
}

impl From<bool> for PermissionDecision {
    fn from(allowed: bool) -> Self {
        Self { allowed }
    }
}
