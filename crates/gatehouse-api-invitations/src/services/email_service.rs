//! Email dispatch for invitation mail.
//!
//! The `EmailSender` trait keeps delivery an injected collaborator: the
//! SMTP implementation goes through lettre, and the mock implementation
//! records messages for tests and local development.

use async_trait::async_trait;
use lettre::{
    message::header::ContentType,
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use thiserror::Error;
use tokio::sync::Mutex;

/// Errors that can occur while sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport configuration is invalid.
    #[error("Invalid email configuration: {0}")]
    InvalidConfig(String),

    /// The message could not be delivered.
    #[error("Failed to send email: {0}")]
    SendFailed(String),
}

/// Sends plain-text email on behalf of the invitation service.
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Send a message. `from` and `to` are bare email addresses.
    async fn send(&self, from: &str, to: &str, subject: &str, body: &str)
        -> Result<(), EmailError>;
}

/// SMTP transport configuration.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub use_tls: bool,
}

/// `EmailSender` implementation backed by an SMTP relay.
pub struct SmtpEmailSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpEmailSender {
    /// Build the SMTP transport.
    ///
    /// Port 465 uses implicit TLS (SMTPS); other ports use STARTTLS when
    /// TLS is enabled.
    pub fn new(config: &SmtpConfig) -> Result<Self, EmailError> {
        let host = config.host.clone();

        let mut builder = if config.use_tls {
            let tls_params = TlsParameters::new(host.clone())
                .map_err(|e| EmailError::InvalidConfig(format!("TLS configuration error: {e}")))?;

            if config.port == 465 {
                AsyncSmtpTransport::<Tokio1Executor>::relay(&host)
                    .map_err(|e| EmailError::InvalidConfig(format!("SMTP relay error: {e}")))?
                    .port(config.port)
                    .tls(Tls::Wrapper(tls_params))
            } else {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&host)
                    .map_err(|e| EmailError::InvalidConfig(format!("SMTP relay error: {e}")))?
                    .port(config.port)
                    .tls(Tls::Required(tls_params))
            }
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&host).port(config.port)
        };

        if let (Some(user), Some(pass)) = (config.username.clone(), config.password.clone()) {
            builder = builder.credentials(Credentials::new(user, pass));
        }

        Ok(Self {
            transport: builder.build(),
        })
    }
}

#[async_trait]
impl EmailSender for SmtpEmailSender {
    async fn send(
        &self,
        from: &str,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), EmailError> {
        let message = Message::builder()
            .from(from
                .parse()
                .map_err(|e| EmailError::InvalidConfig(format!("Invalid from address: {e}")))?)
            .to(to
                .parse()
                .map_err(|e| EmailError::InvalidConfig(format!("Invalid to address: {e}")))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| EmailError::SendFailed(format!("Failed to build email: {e}")))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| EmailError::SendFailed(e.to_string()))?;

        Ok(())
    }
}

/// A message captured by [`MockEmailSender`].
#[derive(Debug, Clone)]
pub struct SentEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Records messages instead of sending them.
///
/// Used by tests and as the development fallback when SMTP is not
/// configured.
#[derive(Default)]
pub struct MockEmailSender {
    messages: Mutex<Vec<SentEmail>>,
}

impl MockEmailSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages captured so far, oldest first.
    pub async fn sent(&self) -> Vec<SentEmail> {
        self.messages.lock().await.clone()
    }
}

#[async_trait]
impl EmailSender for MockEmailSender {
    async fn send(
        &self,
        from: &str,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), EmailError> {
        tracing::debug!(to = %to, subject = %subject, "Mock email captured");
        self.messages.lock().await.push(SentEmail {
            from: from.to_string(),
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_smtp_sender_creation_no_tls() {
        let config = SmtpConfig {
            host: "localhost".to_string(),
            port: 25,
            username: None,
            password: None,
            use_tls: false,
        };
        assert!(SmtpEmailSender::new(&config).is_ok());
    }

    #[tokio::test]
    async fn test_smtp_sender_creation_with_credentials() {
        let config = SmtpConfig {
            host: "localhost".to_string(),
            port: 587,
            username: Some("user".to_string()),
            password: Some("pass".to_string()),
            use_tls: false,
        };
        assert!(SmtpEmailSender::new(&config).is_ok());
    }

    #[tokio::test]
    async fn test_mock_sender_records_messages() {
        let sender = MockEmailSender::new();
        sender
            .send("noreply@example.com", "friend@example.com", "Hello", "Hi")
            .await
            .unwrap();

        let sent = sender.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "friend@example.com");
        assert_eq!(sent[0].subject, "Hello");
    }
}
