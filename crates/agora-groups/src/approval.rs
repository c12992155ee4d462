//! Approval notification — mails group managers about pending sign-ups.

use agora_core::error::AgoraResult;
use agora_core::models::user::{User, UserStatus};
use agora_core::repository::{GroupRepository, SettingsRepository};
use tracing::{debug, info, warn};

use crate::config::GroupsConfig;
use crate::i18n::Translator;
use crate::mail::{ApprovalEmailContent, MailMessage, Mailer};
use crate::settings::{ModuleSettings, NEED_APPROVAL, USER_MODULE};

/// Sends "new user needs approval" mails to the managers of the
/// registration group a new user signed up for.
pub struct ApprovalNotifier<G, S, M> {
    groups: G,
    settings: ModuleSettings<S>,
    mailer: M,
    translator: Translator,
    config: GroupsConfig,
}

impl<G, S, M> ApprovalNotifier<G, S, M>
where
    G: GroupRepository,
    S: SettingsRepository,
    M: Mailer,
{
    pub fn new(
        groups: G,
        settings: S,
        mailer: M,
        translator: Translator,
        config: GroupsConfig,
    ) -> Self {
        Self {
            groups,
            settings: ModuleSettings::new(settings, USER_MODULE),
            mailer,
            translator,
            config,
        }
    }

    /// Notify the managers of `user`'s registration group.
    ///
    /// Returns `false` when nothing was sent because the user does not
    /// need approval, approval is disabled, or there is no group.
    pub async fn notify_admins_for_user_approval(&self, user: &User) -> AgoraResult<bool> {
        if user.status != UserStatus::NeedApproval {
            return Ok(false);
        }
        if !self.settings.is_enabled(NEED_APPROVAL).await? {
            debug!(user_id = %user.id, "User approval is disabled");
            return Ok(false);
        }

        let Some(group_id) = user.registration_group_id else {
            return Ok(false);
        };
        let Some(group) = self.groups.find_by_id(group_id).await? else {
            warn!(
                user_id = %user.id,
                group_id = %group_id,
                "Registration group of user awaiting approval does not exist"
            );
            return Ok(false);
        };

        let managers = self.groups.get_managers(group.id).await?;
        let approval_url = self.config.approval_url();
        let mut sent = 0usize;

        for manager in &managers {
            let locale = manager
                .language
                .as_deref()
                .filter(|lang| !lang.is_empty())
                .unwrap_or(&self.config.default_locale);

            let content =
                ApprovalEmailContent::render(&self.translator, locale, manager, user, &approval_url);

            let message = MailMessage {
                to: manager.email.clone(),
                subject: content.subject,
                html: content.html,
            };

            match self.mailer.send(message).await {
                Ok(()) => sent += 1,
                Err(e) => warn!(
                    manager_id = %manager.id,
                    user_id = %user.id,
                    error = %e,
                    "Failed to send approval mail"
                ),
            }
        }

        info!(
            user_id = %user.id,
            group_id = %group.id,
            managers = managers.len(),
            sent,
            "Approval notifications dispatched"
        );

        Ok(true)
    }
}
