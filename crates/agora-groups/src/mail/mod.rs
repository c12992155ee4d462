//! Outgoing e-mail.

mod smtp;
mod templates;

pub use smtp::SmtpMailer;
pub use templates::{ApprovalEmailContent, text_only_layout};

use agora_core::error::AgoraResult;

/// A rendered HTML e-mail for a single recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Delivers e-mail.
pub trait Mailer: Send + Sync {
    fn send(&self, message: MailMessage) -> impl Future<Output = AgoraResult<()>> + Send;
}

/// SMTP relay and sender settings.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    /// STARTTLS, or implicit TLS when `port` is 465.
    pub use_tls: bool,
    pub from_address: String,
    pub from_name: Option<String>,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            port: 25,
            username: None,
            password: None,
            use_tls: false,
            from_address: "noreply@localhost".into(),
            from_name: None,
        }
    }
}
