//! Server configuration from `AGORA_*` environment variables.

use agora_db::DbConfig;
use agora_groups::{GroupsConfig, MailConfig};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Complete server configuration.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub db: DbConfig,
    pub groups: GroupsConfig,
    pub mail: MailConfig,
}

impl AppConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from a key lookup. Unset keys keep their
    /// defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(v) = var("AGORA_DB_URL") {
            config.db.url = v;
        }
        if let Some(v) = var("AGORA_DB_NAMESPACE") {
            config.db.namespace = v;
        }
        if let Some(v) = var("AGORA_DB_DATABASE") {
            config.db.database = v;
        }
        if let Some(v) = var("AGORA_DB_USERNAME") {
            config.db.username = Some(v);
        }
        if let Some(v) = var("AGORA_DB_PASSWORD") {
            config.db.password = Some(v);
        }

        if let Some(v) = var("AGORA_BASE_URL") {
            if !(v.starts_with("http://") || v.starts_with("https://")) {
                return Err(ConfigError::Invalid {
                    key: "AGORA_BASE_URL",
                    reason: "must be an absolute http(s) URL".into(),
                });
            }
            config.groups.base_url = v;
        }
        if let Some(v) = var("AGORA_DEFAULT_LOCALE") {
            config.groups.default_locale = v;
        }

        if let Some(v) = var("AGORA_SMTP_HOST") {
            config.mail.host = v;
        }
        if let Some(v) = var("AGORA_SMTP_PORT") {
            config.mail.port = v.trim().parse().map_err(|e| ConfigError::Invalid {
                key: "AGORA_SMTP_PORT",
                reason: format!("{e}"),
            })?;
        }
        config.mail.username = var("AGORA_SMTP_USERNAME");
        config.mail.password = var("AGORA_SMTP_PASSWORD");
        if let Some(v) = var("AGORA_SMTP_TLS") {
            config.mail.use_tls = parse_bool("AGORA_SMTP_TLS", &v)?;
        }
        if let Some(v) = var("AGORA_MAIL_FROM") {
            config.mail.from_address = v;
        }
        config.mail.from_name = var("AGORA_MAIL_FROM_NAME");

        Ok(config)
    }
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::Invalid {
            key,
            reason: format!("expected a boolean, got `{other}`"),
        }),
    }
}
