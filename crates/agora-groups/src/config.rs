//! Group service configuration.

/// Configuration for the group services.
#[derive(Debug, Clone)]
pub struct GroupsConfig {
    /// Absolute base URL of the site, used for links in e-mails.
    pub base_url: String,
    /// Locale for recipients without a language preference.
    pub default_locale: String,
}

impl GroupsConfig {
    /// Absolute URL of the user approval screen.
    pub fn approval_url(&self) -> String {
        format!("{}/admin/approval", self.base_url.trim_end_matches('/'))
    }
}

impl Default for GroupsConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost".into(),
            default_locale: "en".into(),
        }
    }
}
