//! Application services.

pub mod contact;
pub mod relay;

pub use contact::{ContactService, ContactSubmission};
pub use relay::{MailRelay, OutboundEmail, SmtpRelay};
