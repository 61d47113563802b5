//! Contact-form submission pipeline: validate, compose, deliver.

use std::sync::Arc;

use chrono::{DateTime, Local};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::ContactError;
use crate::services::relay::{MailRelay, OutboundEmail};
use crate::validation::{is_valid_email, sanitize};

/// A validated contact-form submission.
///
/// Only constructed through [`ContactSubmission::from_payload`]; once built
/// it is composed into an [`OutboundEmail`] and discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    /// Visitor's name.
    pub name: String,
    /// Visitor's reply address; appears only in the message body.
    pub email: String,
    /// Visitor-supplied subject.
    pub subject: String,
    /// Message text.
    pub message: String,
}

const REQUIRED_FIELDS: [&str; 4] = ["name", "email", "subject", "message"];

impl ContactSubmission {
    /// Validate a raw JSON payload into a submission.
    ///
    /// # Errors
    ///
    /// `MissingFields` when the payload is not an object or lacks any of
    /// the four keys, `EmptyFields` when a sanitized value is blank, and
    /// `InvalidEmail` when the address fails the format check.
    pub fn from_payload(payload: &Value) -> Result<Self, ContactError> {
        let record = payload.as_object().ok_or(ContactError::MissingFields)?;

        if !REQUIRED_FIELDS.iter().all(|f| record.contains_key(*f)) {
            return Err(ContactError::MissingFields);
        }

        let submission = Self {
            name: sanitize(record.get("name")),
            email: sanitize(record.get("email")),
            subject: sanitize(record.get("subject")),
            message: sanitize(record.get("message")),
        };

        if [
            &submission.name,
            &submission.email,
            &submission.subject,
            &submission.message,
        ]
        .iter()
        .any(|v| v.is_empty())
        {
            return Err(ContactError::EmptyFields);
        }

        if !is_valid_email(&submission.email) {
            return Err(ContactError::InvalidEmail);
        }

        Ok(submission)
    }

    /// Compose the relay message for this submission.
    #[must_use]
    pub fn compose(&self, sent_at: DateTime<Local>) -> OutboundEmail {
        OutboundEmail {
            subject: format!("Portfolio Contact: {}", self.subject),
            body: format!(
                "New contact from portfolio website:\n\
                 \n\
                 Name: {}\n\
                 Email: {}\n\
                 Subject: {}\n\
                 \n\
                 Message:\n\
                 {}\n\
                 \n\
                 Sent at: {}\n",
                self.name,
                self.email,
                self.subject,
                self.message,
                sent_at.format("%Y-%m-%d %H:%M:%S"),
            ),
        }
    }
}

/// Orchestrates one submission end to end.
#[derive(Clone)]
pub struct ContactService {
    relay: Arc<dyn MailRelay>,
}

impl ContactService {
    /// Create a service delivering through the given relay.
    pub fn new(relay: Arc<dyn MailRelay>) -> Self {
        Self { relay }
    }

    /// Run the full pipeline for one raw payload.
    ///
    /// Strictly at-most-once: a delivery failure is returned to the caller
    /// and never retried.
    ///
    /// # Errors
    ///
    /// Validation errors from [`ContactSubmission::from_payload`], or
    /// `Delivery` when the relay session fails.
    pub async fn submit(&self, payload: &Value) -> Result<(), ContactError> {
        debug!(?payload, "received contact payload");

        let submission = ContactSubmission::from_payload(payload)?;
        let email = submission.compose(Local::now());

        info!(
            name = %submission.name,
            reply_to = %submission.email,
            subject = %email.subject,
            "relaying contact message"
        );
        self.relay.send(&email).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;
    use crate::error::RelayError;

    #[derive(Default)]
    struct StubRelay {
        sent: Mutex<Vec<OutboundEmail>>,
        reject: Option<RelayError>,
    }

    impl StubRelay {
        fn rejecting(err: RelayError) -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                reject: Some(err),
            }
        }

        fn sent(&self) -> Vec<OutboundEmail> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MailRelay for StubRelay {
        async fn send(&self, email: &OutboundEmail) -> Result<(), RelayError> {
            if let Some(err) = &self.reject {
                return Err(err.clone());
            }
            self.sent.lock().unwrap().push(email.clone());
            Ok(())
        }
    }

    fn valid_payload() -> Value {
        json!({
            "name": "Jane",
            "email": "jane@example.com",
            "subject": "Hi",
            "message": "Hello there",
        })
    }

    #[test]
    fn payload_must_be_an_object() {
        let err = ContactSubmission::from_payload(&json!("just a string")).unwrap_err();
        assert!(matches!(err, ContactError::MissingFields));
    }

    #[test]
    fn each_field_is_required() {
        for field in ["name", "email", "subject", "message"] {
            let mut payload = valid_payload();
            payload.as_object_mut().unwrap().remove(field);
            let err = ContactSubmission::from_payload(&payload).unwrap_err();
            assert!(matches!(err, ContactError::MissingFields), "field: {field}");
        }
    }

    #[test]
    fn blank_fields_are_rejected_after_trimming() {
        for field in ["name", "email", "subject", "message"] {
            let mut payload = valid_payload();
            payload[field] = json!("   ");
            let err = ContactSubmission::from_payload(&payload).unwrap_err();
            assert!(matches!(err, ContactError::EmptyFields), "field: {field}");
        }
    }

    #[test]
    fn non_string_fields_count_as_empty() {
        let mut payload = valid_payload();
        payload["name"] = json!(42);
        let err = ContactSubmission::from_payload(&payload).unwrap_err();
        assert!(matches!(err, ContactError::EmptyFields));
    }

    #[test]
    fn email_format_is_checked_after_presence() {
        let mut payload = valid_payload();
        payload["email"] = json!("a@b.c");
        let err = ContactSubmission::from_payload(&payload).unwrap_err();
        assert!(matches!(err, ContactError::InvalidEmail));
    }

    #[test]
    fn fields_are_trimmed_on_the_way_in() {
        let payload = json!({
            "name": "  Jane  ",
            "email": " jane@example.com ",
            "subject": "Hi",
            "message": "Hello there",
        });
        let submission = ContactSubmission::from_payload(&payload).unwrap();
        assert_eq!(submission.name, "Jane");
        assert_eq!(submission.email, "jane@example.com");
    }

    #[test]
    fn composed_message_carries_all_fields_and_timestamp() {
        let submission = ContactSubmission::from_payload(&valid_payload()).unwrap();
        let sent_at = Local.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap();
        let email = submission.compose(sent_at);

        assert_eq!(email.subject, "Portfolio Contact: Hi");
        assert!(email.body.contains("Name: Jane"));
        assert!(email.body.contains("Email: jane@example.com"));
        assert!(email.body.contains("Subject: Hi"));
        assert!(email.body.contains("Hello there"));
        assert!(email.body.contains("Sent at: 2025-03-14 09:26:53"));
    }

    #[tokio::test]
    async fn submit_delivers_exactly_one_message() {
        let relay = Arc::new(StubRelay::default());
        let service = ContactService::new(Arc::clone(&relay) as Arc<dyn MailRelay>);

        service.submit(&valid_payload()).await.unwrap();

        let sent = relay.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "Portfolio Contact: Hi");
    }

    #[tokio::test]
    async fn submit_surfaces_relay_failure_without_retry() {
        let relay = Arc::new(StubRelay::rejecting(RelayError::Authentication(
            "535 bad credentials".into(),
        )));
        let service = ContactService::new(Arc::clone(&relay) as Arc<dyn MailRelay>);

        let err = service.submit(&valid_payload()).await.unwrap_err();
        assert!(matches!(
            err,
            ContactError::Delivery(RelayError::Authentication(_))
        ));
        assert!(relay.sent().is_empty());
    }

    #[tokio::test]
    async fn submit_does_not_touch_the_relay_on_validation_failure() {
        let relay = Arc::new(StubRelay::default());
        let service = ContactService::new(Arc::clone(&relay) as Arc<dyn MailRelay>);

        let err = service.submit(&json!({"name": "Jane"})).await.unwrap_err();
        assert!(matches!(err, ContactError::MissingFields));
        assert!(relay.sent().is_empty());
    }
}
