//! Module-scoped view of the settings store.

use agora_core::error::AgoraResult;
use agora_core::repository::SettingsRepository;

/// Namespace of the user module's settings.
pub const USER_MODULE: &str = "user";

/// Cached id of the admin group.
pub const ADMIN_GROUP_ID: &str = "group.adminGroupId";

/// Group every new user is put in; disables the registration choice.
pub const DEFAULT_USER_GROUP: &str = "auth.defaultUserGroup";

/// Enables the approval workflow for new accounts.
pub const NEED_APPROVAL: &str = "auth.needApproval";

/// Interpret a stored flag. Empty, `0` and `false` are off.
pub fn is_truthy(value: Option<&str>) -> bool {
    match value.map(str::trim) {
        None | Some("") | Some("0") => false,
        Some(v) => !v.eq_ignore_ascii_case("false"),
    }
}

/// Settings repository bound to one module namespace.
#[derive(Debug, Clone)]
pub struct ModuleSettings<S> {
    repo: S,
    module_id: String,
}

impl<S: SettingsRepository> ModuleSettings<S> {
    pub fn new(repo: S, module_id: impl Into<String>) -> Self {
        Self {
            repo,
            module_id: module_id.into(),
        }
    }

    pub fn module_id(&self) -> &str {
        &self.module_id
    }

    pub async fn get(&self, name: &str) -> AgoraResult<Option<String>> {
        self.repo.get(&self.module_id, name).await
    }

    pub async fn set(&self, name: &str, value: &str) -> AgoraResult<()> {
        self.repo.set(&self.module_id, name, value).await
    }

    pub async fn delete(&self, name: &str) -> AgoraResult<()> {
        self.repo.delete(&self.module_id, name).await
    }

    pub async fn is_enabled(&self, name: &str) -> AgoraResult<bool> {
        Ok(is_truthy(self.get(name).await?.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness_of_stored_flags() {
        assert!(!is_truthy(None));
        assert!(!is_truthy(Some("")));
        assert!(!is_truthy(Some(" 0 ")));
        assert!(!is_truthy(Some("False")));
        assert!(is_truthy(Some("1")));
        assert!(is_truthy(Some("yes")));
    }
}
