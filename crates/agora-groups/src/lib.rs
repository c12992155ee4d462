//! Agora Groups — group membership, directory/registration listings,
//! admin-group resolution and approval notifications.
//!
//! Generic over the `agora-core` repository traits so the service
//! layer has no dependency on the database crate.

pub mod actor;
pub mod admin_cache;
pub mod approval;
pub mod config;
pub mod error;
pub mod i18n;
pub mod mail;
pub mod notifier;
pub mod service;
pub mod settings;

pub use actor::Actor;
pub use admin_cache::AdminGroupCache;
pub use approval::ApprovalNotifier;
pub use config::GroupsConfig;
pub use error::GroupError;
pub use i18n::Translator;
pub use mail::{MailConfig, MailMessage, Mailer, SmtpMailer};
pub use notifier::{Notifier, StoredNotifier};
pub use service::GroupService;
pub use settings::ModuleSettings;
