//! Outbound email delivery over SMTP via lettre.
//!
//! When SMTP is not configured the mailer runs in a disabled mode that
//! logs and drops every message, so order flow never depends on email.

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::header::ContentType,
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::EmailConfig;

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum MailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
}

/// Outbound mailer.
#[derive(Clone)]
pub enum Mailer {
    /// Delivers over an SMTP relay.
    Smtp(SmtpMailer),
    /// Logs and drops every message.
    Disabled,
}

/// SMTP-backed delivery transport.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl Mailer {
    /// Build a mailer from optional SMTP configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the SMTP relay settings are invalid.
    pub fn from_config(config: Option<&EmailConfig>) -> Result<Self, SmtpError> {
        let Some(config) = config else {
            tracing::warn!("SMTP not configured; transactional email is disabled");
            return Ok(Self::Disabled);
        };

        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self::Smtp(SmtpMailer {
            transport,
            from_address: config.from_address.clone(),
        }))
    }

    /// Send a plain-text email.
    ///
    /// # Errors
    ///
    /// Returns error if the address is invalid, the message cannot be
    /// built, or the SMTP relay rejects it.
    pub async fn deliver(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError> {
        match self {
            Self::Smtp(mailer) => mailer.deliver(to, subject, body).await,
            Self::Disabled => {
                tracing::debug!(to = %to, subject = %subject, "Mailer disabled, dropping email");
                Ok(())
            }
        }
    }
}

impl SmtpMailer {
    async fn deliver(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError> {
        let email = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| MailError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(to
                .parse()
                .map_err(|_| MailError::InvalidAddress(to.to_string()))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())?;

        self.transport.send(email).await?;

        tracing::info!(to = %to, subject = %subject, "Email sent successfully");
        Ok(())
    }
}
