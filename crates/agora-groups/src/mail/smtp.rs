//! SMTP mailer.

use agora_core::error::AgoraResult;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

use super::{MailConfig, MailMessage, Mailer};
use crate::error::GroupError;

/// [`Mailer`] backed by an async SMTP transport.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

fn parse_mailbox(address: &str) -> Result<Mailbox, GroupError> {
    address.parse().map_err(|e| GroupError::InvalidAddress {
        address: address.to_string(),
        reason: format!("{e}"),
    })
}

impl SmtpMailer {
    pub fn new(config: &MailConfig) -> Result<Self, GroupError> {
        let mut builder = if config.use_tls {
            let tls_params = TlsParameters::new(config.host.clone())
                .map_err(|e| GroupError::MailTransport(format!("TLS configuration error: {e}")))?;

            // Port 465 is implicit TLS; everything else upgrades via STARTTLS.
            if config.port == 465 {
                AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
                    .map_err(|e| GroupError::MailTransport(format!("SMTP relay error: {e}")))?
                    .port(config.port)
                    .tls(Tls::Wrapper(tls_params))
            } else {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                    .map_err(|e| GroupError::MailTransport(format!("SMTP relay error: {e}")))?
                    .port(config.port)
                    .tls(Tls::Required(tls_params))
            }
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host).port(config.port)
        };

        if let (Some(user), Some(pass)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        let from = match &config.from_name {
            Some(name) => parse_mailbox(&format!("{name} <{}>", config.from_address))?,
            None => parse_mailbox(&config.from_address)?,
        };

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

impl Mailer for SmtpMailer {
    async fn send(&self, message: MailMessage) -> AgoraResult<()> {
        let email = Message::builder()
            .from(self.from.clone())
            .to(parse_mailbox(&message.to)?)
            .subject(message.subject)
            .header(ContentType::TEXT_HTML)
            .body(message.html)
            .map_err(|e| GroupError::MailTransport(format!("failed to build email: {e}")))?;

        self.transport
            .send(email)
            .await
            .map_err(|e| GroupError::MailTransport(e.to_string()))?;

        debug!(to = %message.to, "Mail sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_transport_builds() {
        let mailer = SmtpMailer::new(&MailConfig::default());
        assert!(mailer.is_ok());
    }

    #[test]
    fn sender_name_is_included() {
        let config = MailConfig {
            from_address: "noreply@example.org".into(),
            from_name: Some("Example Network".into()),
            ..Default::default()
        };
        let mailer = SmtpMailer::new(&config).unwrap();
        assert_eq!(mailer.from.name.as_deref(), Some("Example Network"));
    }

    #[test]
    fn invalid_sender_is_rejected() {
        let config = MailConfig {
            from_address: "not an address".into(),
            ..Default::default()
        };
        assert!(matches!(
            SmtpMailer::new(&config),
            Err(GroupError::InvalidAddress { .. })
        ));
    }
}
