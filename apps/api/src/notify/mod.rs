//! Notifier — sends a report email with the PDF attached over an
//! authenticated SMTP-over-TLS session.
//!
//! The contract is a boolean: one synchronous submission, any transport or
//! auth failure is logged and becomes `false`. No retry, no queueing.

use anyhow::{Context, Result};
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::warn;

use crate::config::Config;

const SENDER_DISPLAY_NAME: &str = "Resume Analyzer";
const ATTACHMENT_NAME: &str = "Resume_Report.pdf";

/// Outbound mailer. Built once at startup; without SMTP credentials it is a
/// valid object whose `send` always reports failure, leaving the rest of the
/// app functional.
#[derive(Clone)]
pub struct Mailer {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    sender: Option<Mailbox>,
}

impl Mailer {
    pub fn from_config(config: &Config) -> Self {
        let (Some(email), Some(password)) = (&config.sender_email, &config.sender_password)
        else {
            return Self {
                transport: None,
                sender: None,
            };
        };

        let sender = match email.parse() {
            Ok(address) => Mailbox::new(Some(SENDER_DISPLAY_NAME.to_string()), address),
            Err(e) => {
                warn!("SENDER_EMAIL is not a valid address: {e}");
                return Self {
                    transport: None,
                    sender: None,
                };
            }
        };

        // Implicit TLS on port 465.
        let transport = match AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_relay) {
            Ok(builder) => builder
                .credentials(Credentials::new(email.clone(), password.clone()))
                .build(),
            Err(e) => {
                warn!("Failed to configure SMTP relay {}: {e}", config.smtp_relay);
                return Self {
                    transport: None,
                    sender: None,
                };
            }
        };

        Self {
            transport: Some(transport),
            sender: Some(sender),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.transport.is_some()
    }

    /// Sends one email, optionally with a PDF report attached. Returns
    /// whether the SMTP server acknowledged it.
    pub async fn send(
        &self,
        recipient: &str,
        subject: &str,
        body: &str,
        attachment: Option<Vec<u8>>,
    ) -> bool {
        match self.try_send(recipient, subject, body, attachment).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Error sending email to {recipient}: {e:#}");
                false
            }
        }
    }

    async fn try_send(
        &self,
        recipient: &str,
        subject: &str,
        body: &str,
        attachment: Option<Vec<u8>>,
    ) -> Result<()> {
        let (Some(transport), Some(sender)) = (&self.transport, &self.sender) else {
            anyhow::bail!("SENDER_EMAIL and SENDER_PASSWORD are required for email delivery");
        };

        let builder = Message::builder()
            .from(sender.clone())
            .to(recipient
                .parse()
                .with_context(|| format!("Invalid recipient address '{recipient}'"))?)
            .subject(subject);

        let message = match attachment {
            Some(pdf) => builder.multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::plain(body.to_string()))
                    .singlepart(
                        Attachment::new(ATTACHMENT_NAME.to_string())
                            .body(pdf, ContentType::parse("application/pdf")?),
                    ),
            )?,
            None => builder.body(body.to_string())?,
        };

        transport.send(message).await.context("SMTP send failed")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unconfigured_mailer() -> Mailer {
        let config = Config {
            database_url: "sqlite::memory:".to_string(),
            gemini_api_key: None,
            session_secret: "0123456789abcdef0123456789abcdef".to_string(),
            sender_email: None,
            sender_password: None,
            smtp_relay: "smtp.gmail.com".to_string(),
            port: 8080,
            rust_log: "info".to_string(),
        };
        Mailer::from_config(&config)
    }

    #[tokio::test]
    async fn test_unconfigured_mailer_reports_failure() {
        let mailer = unconfigured_mailer();
        assert!(!mailer.is_configured());
        assert!(!mailer.send("user@example.com", "Subject", "Body", None).await);
    }

    #[tokio::test]
    async fn test_invalid_recipient_reports_failure() {
        let mailer = unconfigured_mailer();
        assert!(!mailer.send("not-an-address", "Subject", "Body", None).await);
    }
}
