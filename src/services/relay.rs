//! Mail relay seam and SMTP implementation.

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::response::{Category, Code, Severity};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, info};

use crate::config::SmtpConfig;
use crate::error::RelayError;

/// A composed contact message, ready for the relay.
///
/// Sender and recipient are both the operator address and are supplied by
/// the relay itself; the visitor's address only appears in the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    /// Full subject line, prefix included.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
}

/// Delivery seam between the contact pipeline and the outside world.
///
/// Exactly one delivery attempt per call; implementations must not retry.
#[async_trait]
pub trait MailRelay: Send + Sync {
    /// Transmit one message, at most once.
    async fn send(&self, email: &OutboundEmail) -> Result<(), RelayError>;
}

/// `MailRelay` backed by an authenticated STARTTLS session to the
/// configured SMTP relay.
pub struct SmtpRelay {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    operator: Mailbox,
}

impl SmtpRelay {
    /// Build a relay from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the operator address does not parse or the
    /// transport cannot be constructed for the configured host.
    pub fn new(config: &SmtpConfig) -> anyhow::Result<Self> {
        let operator: Mailbox = config.sender.parse()?;

        // Pooling is off (crate feature), so every send owns its session:
        // connect, STARTTLS, authenticate, transmit, close.
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port)
            .credentials(Credentials::new(
                config.sender.clone(),
                config.password.clone(),
            ))
            .build();

        info!(
            host = %config.host,
            port = config.port,
            sender = %config.sender,
            "SMTP relay configured"
        );

        Ok(Self { transport, operator })
    }
}

#[async_trait]
impl MailRelay for SmtpRelay {
    async fn send(&self, email: &OutboundEmail) -> Result<(), RelayError> {
        let message = Message::builder()
            .from(self.operator.clone())
            .to(self.operator.clone())
            .subject(email.subject.clone())
            .body(email.body.clone())
            .map_err(|e| RelayError::Send(e.to_string()))?;

        debug!(subject = %email.subject, "opening relay session");
        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| classify(&e))?;

        if !response.is_positive() {
            return Err(RelayError::Send(format!(
                "relay answered {}",
                response.code()
            )));
        }

        info!(subject = %email.subject, "message accepted by relay");
        Ok(())
    }
}

/// Sort a lettre transport error into the relay taxonomy.
///
/// Client-side and timeout failures happen before the relay accepts
/// anything, so they read as connection errors. Responses carrying an
/// authentication code become credential rejections; every other response
/// is a send failure.
fn classify(err: &lettre::transport::smtp::Error) -> RelayError {
    let detail = err.to_string();
    if err.is_timeout() || !err.is_response() {
        RelayError::Connection(detail)
    } else if err.status().is_some_and(is_auth_rejection) {
        RelayError::Authentication(detail)
    } else {
        RelayError::Send(detail)
    }
}

/// Whether a reply code is an authentication rejection.
///
/// The 53z block holds the SMTP AUTH replies (530 auth required, 534
/// mechanism too weak, 535 bad credentials, 538 encryption required);
/// other permanent codes, 552 for one, are message rejections.
fn is_auth_rejection(code: Code) -> bool {
    code.severity == Severity::PermanentNegativeCompletion
        && code.category == Category::Unspecified3
}

#[cfg(test)]
mod tests {
    use lettre::transport::smtp::response::Detail;

    use super::*;

    #[test]
    fn auth_reply_codes_are_credential_rejections() {
        for detail in [Detail::Zero, Detail::Four, Detail::Five, Detail::Eight] {
            let code = Code::new(
                Severity::PermanentNegativeCompletion,
                Category::Unspecified3,
                detail,
            );
            assert!(is_auth_rejection(code), "code: {code}");
        }
    }

    #[test]
    fn storage_rejection_is_not_an_auth_failure() {
        // 552: exceeded storage allocation
        let code = Code::new(
            Severity::PermanentNegativeCompletion,
            Category::MailSystem,
            Detail::Two,
        );
        assert!(!is_auth_rejection(code));
    }

    #[test]
    fn transient_auth_category_is_not_an_auth_failure() {
        // 435: transient, must not read as a credential rejection
        let code = Code::new(
            Severity::TransientNegativeCompletion,
            Category::Unspecified3,
            Detail::Five,
        );
        assert!(!is_auth_rejection(code));
    }
}
