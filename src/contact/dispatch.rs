//! Message composition and delivery.

use super::directory::RecipientDirectory;
use super::form::SubmittedForm;
use crate::mail::{MailTransport, OutgoingMail};

/// Result of a dispatch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The transport accepted the message.
    Delivered,
    /// Nothing was sent because the message body was empty.
    Skipped,
    /// The recipient key is not configured.
    UnknownRecipient,
    /// The transport refused or failed the delivery.
    DeliveryFailed,
}

/// Compose the message body: sender name, sender email, a blank line, then
/// the message text.
pub fn compose_body(form: &SubmittedForm) -> String {
    format!("{}\r\n{}\r\n\r\n{}", form.name, form.email, form.content)
}

/// Build the message for a destination address.
///
/// The reply address is the recipient. The sender is `sender` when set,
/// otherwise the recipient.
pub fn compose_mail(form: &SubmittedForm, to: &str, sender: Option<&str>) -> OutgoingMail {
    let mail = OutgoingMail::new(to, form.subject.clone(), compose_body(form));
    match sender {
        Some(from) => mail.with_from(from),
        None => mail,
    }
}

/// Sends validated submissions to their configured destination.
pub struct Dispatcher<'a> {
    transport: &'a dyn MailTransport,
    directory: &'a RecipientDirectory,
    sender: Option<&'a str>,
}

impl<'a> Dispatcher<'a> {
    pub fn new(transport: &'a dyn MailTransport, directory: &'a RecipientDirectory) -> Self {
        Self {
            transport,
            directory,
            sender: None,
        }
    }

    /// Use a fixed sender address instead of the recipient.
    pub fn with_sender(mut self, sender: Option<&'a str>) -> Self {
        self.sender = sender;
        self
    }

    /// Deliver a submission that already passed validation.
    ///
    /// Exactly one message is sent per call, or none when the outcome is not
    /// [`DispatchOutcome::Delivered`].
    pub async fn dispatch(&self, form: &SubmittedForm) -> DispatchOutcome {
        let Some(to) = self.directory.resolve(form.recipient_key()) else {
            tracing::warn!(
                key = form.recipient_key().unwrap_or(""),
                "Recipient key not configured"
            );
            return DispatchOutcome::UnknownRecipient;
        };

        let mail = compose_mail(form, to, self.sender);
        if mail.body.trim().is_empty() {
            tracing::debug!("Empty message body, nothing sent");
            return DispatchOutcome::Skipped;
        }

        match self.transport.send(&mail).await {
            Ok(()) => {
                tracing::info!(to = %mail.to, "Contact message delivered");
                DispatchOutcome::Delivered
            }
            Err(e) => {
                tracing::error!(to = %mail.to, error = %e, "Contact message delivery failed");
                DispatchOutcome::DeliveryFailed
            }
        }
    }
}
