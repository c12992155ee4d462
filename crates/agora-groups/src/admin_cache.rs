//! Memoized admin-group lookup.

use agora_core::error::{AgoraError, AgoraResult};
use agora_core::repository::{GroupRepository, SettingsRepository};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::settings::{ADMIN_GROUP_ID, ModuleSettings};

/// Caches the admin group id in the settings store.
///
/// The memo outlives the process. Anything that changes which group is
/// the admin group must call [`AdminGroupCache::invalidate`].
#[derive(Debug, Clone)]
pub struct AdminGroupCache<S> {
    settings: ModuleSettings<S>,
}

impl<S: SettingsRepository> AdminGroupCache<S> {
    pub fn new(settings: ModuleSettings<S>) -> Self {
        Self { settings }
    }

    /// The memoized id, if one is stored and well-formed.
    pub async fn cached(&self) -> AgoraResult<Option<Uuid>> {
        let Some(raw) = self.settings.get(ADMIN_GROUP_ID).await? else {
            return Ok(None);
        };
        match Uuid::parse_str(raw.trim()) {
            Ok(id) => Ok(Some(id)),
            Err(e) => {
                warn!(value = %raw, error = %e, "Ignoring malformed admin group id setting");
                Ok(None)
            }
        }
    }

    /// Return the cached id, resolving and storing it on a miss.
    pub async fn get_or_resolve<G: GroupRepository>(&self, groups: &G) -> AgoraResult<Uuid> {
        if let Some(id) = self.cached().await? {
            return Ok(id);
        }

        let group = groups
            .find_admin_group()
            .await?
            .ok_or_else(|| AgoraError::NotFound {
                entity: "admin group".into(),
                id: "is_admin_group = true".into(),
            })?;

        self.settings
            .set(ADMIN_GROUP_ID, &group.id.to_string())
            .await?;
        debug!(group_id = %group.id, "Admin group id cached");

        Ok(group.id)
    }

    pub async fn invalidate(&self) -> AgoraResult<()> {
        debug!("Admin group id cache invalidated");
        self.settings.delete(ADMIN_GROUP_ID).await
    }
}
