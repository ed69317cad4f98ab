//! Outbound mail.
//!
//! Messages are assembled as [`OutgoingMail`] values and handed to a
//! [`MailTransport`]. The production transport relays through SMTP; tests
//! plug in recording fakes.

mod smtp;
mod types;

pub use smtp::SmtpTransport;
pub use types::OutgoingMail;

use thiserror::Error;

/// Mail transport errors.
#[derive(Error, Debug)]
pub enum TransportError {
    /// An address could not be parsed as a mailbox.
    #[error("invalid address: {0}")]
    Address(String),

    /// The message could not be assembled.
    #[error("failed to build message: {0}")]
    Build(String),

    /// The relay refused or failed the delivery.
    #[error("delivery failed: {0}")]
    Send(String),

    /// The transport could not be set up.
    #[error("transport configuration error: {0}")]
    Config(String),
}

/// Something that can deliver a single plain-text message.
#[axum::async_trait]
pub trait MailTransport: Send + Sync {
    /// Deliver a message. Returns once the relay accepted or refused it.
    async fn send(&self, mail: &OutgoingMail) -> Result<(), TransportError>;
}
