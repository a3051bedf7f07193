//! Email notification service using lettre

use async_trait::async_trait;
use greenkenya_submission::{DeliveryChannel, DeliveryError, OutboundMessage};
use lettre::{
    Address, Message, SmtpTransport, Transport,
    message::{Mailbox, header},
    transport::smtp::authentication::Credentials,
};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct EmailConfig {
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    #[serde(default)]
    pub smtp_username: String,
    #[serde(default)]
    pub smtp_password: String,
    #[serde(default = "default_from_address")]
    pub from_address: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_address: default_from_address(),
        }
    }
}

fn default_smtp_host() -> String {
    "localhost".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_from_address() -> String {
    "noreply@greenkenyainitiative.org".to_string()
}

/// Delivers visitor messages through an SMTP relay.
#[derive(Clone)]
pub struct EmailService {
    mailer: SmtpTransport,
    from: Address,
}

impl EmailService {
    /// Create a new email service from configuration
    pub fn new(config: &EmailConfig) -> anyhow::Result<Self> {
        let mailer = if config.smtp_username.is_empty() || config.smtp_password.is_empty() {
            tracing::info!(
                smtp_host = %config.smtp_host,
                smtp_port = config.smtp_port,
                "SMTP credentials not configured, using unauthenticated connection (e.g., MailDev)"
            );
            SmtpTransport::builder_dangerous(&config.smtp_host)
                .port(config.smtp_port)
                .build()
        } else {
            tracing::info!(
                smtp_host = %config.smtp_host,
                smtp_port = config.smtp_port,
                from = %config.from_address,
                "Email service initialized with authentication and TLS"
            );

            let creds =
                Credentials::new(config.smtp_username.clone(), config.smtp_password.clone());

            SmtpTransport::relay(&config.smtp_host)?
                .port(config.smtp_port)
                .credentials(creds)
                .build()
        };

        Ok(Self {
            mailer,
            from: config.from_address.parse()?,
        })
    }

    /// Builds the plain-text mail: sent from the service address under the
    /// visitor's name, with replies going to the visitor.
    pub fn build(&self, message: &OutboundMessage) -> Result<Message, DeliveryError> {
        let to: Mailbox = message
            .recipient()
            .parse()
            .map_err(|_| DeliveryError::Address(message.recipient().to_owned()))?;

        let reply_to: Mailbox = message
            .reply_to()
            .parse()
            .map_err(|_| DeliveryError::Address(message.reply_to().to_owned()))?;

        let from = Mailbox::new(Some(message.sender_label().to_owned()), self.from.clone());

        Message::builder()
            .from(from)
            .reply_to(reply_to)
            .to(to)
            .subject(message.subject())
            .header(header::ContentType::TEXT_PLAIN)
            .body(format!(
                "{}\n\nSent: {}",
                message.body(),
                message.timestamp()
            ))
            .map_err(|err| DeliveryError::Transport(err.to_string()))
    }
}

#[async_trait]
impl DeliveryChannel for EmailService {
    async fn send(&self, message: &OutboundMessage) -> Result<(), DeliveryError> {
        let email = self.build(message)?;
        let mailer = self.mailer.clone();

        tracing::info!(
            to = %message.recipient(),
            subject = %message.subject(),
            "Sending email text plain"
        );

        tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|err| DeliveryError::Transport(err.to_string()))?
            .map_err(|err| DeliveryError::Transport(err.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use greenkenya_submission::{ContactForm, FormState};
    use time::macros::datetime;

    use super::*;

    fn service() -> EmailService {
        EmailService::new(&EmailConfig {
            smtp_host: "localhost".to_owned(),
            smtp_port: 1025,
            ..EmailConfig::default()
        })
        .unwrap()
    }

    fn message(email: &str) -> OutboundMessage {
        let form = FormState::Contact(ContactForm {
            name: "Amina".to_owned(),
            email: email.to_owned(),
            subject: "Volunteering".to_owned(),
            message: "I'd like to help".to_owned(),
        });

        OutboundMessage::compose(
            &form,
            &greenkenya_submission::Mailbox::default(),
            datetime!(2026-10-17 08:00 UTC),
        )
        .unwrap()
    }

    #[test]
    fn test_build_sets_reply_to_visitor() {
        let email = service().build(&message("a@x.com")).unwrap();
        let raw = String::from_utf8(email.formatted()).unwrap();

        assert!(raw.contains("Reply-To: a@x.com"));
        assert!(raw.contains("To: greenkenyainitiative985@gmail.com"));
        assert!(raw.contains("Subject: Volunteering"));
        assert!(raw.contains("noreply@greenkenyainitiative.org"));
    }

    #[test]
    fn test_build_rejects_bad_reply_to() {
        let err = service().build(&message("not an address")).unwrap_err();

        assert_eq!(err, DeliveryError::Address("not an address".to_owned()));
    }

    #[test]
    fn test_invalid_from_address() {
        let result = EmailService::new(&EmailConfig {
            from_address: "nope".to_owned(),
            ..EmailConfig::default()
        });

        assert!(result.is_err());
    }
}
