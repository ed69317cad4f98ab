//! Contact submission pipeline.
//!
//! Resolves the destination, validates the submission and, when every
//! check passes, dispatches exactly one message.

use std::sync::Arc;

use super::directory::RecipientDirectory;
use super::dispatch::{DispatchOutcome, Dispatcher};
use super::form::{Field, SubmittedForm};
use super::validation::{CaptchaChallenge, ErrorKind, ValidationResult, Validator};
use crate::captcha::{CaptchaVerifier, RecaptchaVerifier};
use crate::config::Config;
use crate::mail::{MailTransport, SmtpTransport};
use crate::Result;

/// Final state of a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// At least one check failed; nothing was sent.
    Rejected(ValidationResult),
    Delivered,
    /// Valid, but the message was empty so nothing was sent.
    Skipped,
    /// The transport failed. Details are logged, never shown.
    DeliveryFailed,
}

impl SubmissionOutcome {
    /// Check if the submission was accepted.
    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionOutcome::Delivered | SubmissionOutcome::Skipped)
    }

    /// Get the validation errors of a rejected submission.
    pub fn validation(&self) -> Option<&ValidationResult> {
        match self {
            SubmissionOutcome::Rejected(result) => Some(result),
            _ => None,
        }
    }
}

/// Runs submissions through validation and dispatch.
pub struct ContactService {
    directory: RecipientDirectory,
    transport: Arc<dyn MailTransport>,
    validator: Validator,
    sender: Option<String>,
}

impl ContactService {
    /// Create a service with CAPTCHA checking disabled.
    pub fn new(directory: RecipientDirectory, transport: Arc<dyn MailTransport>) -> Self {
        Self {
            directory,
            transport,
            validator: Validator::new(),
            sender: None,
        }
    }

    /// Require a CAPTCHA answer on every submission.
    pub fn with_captcha(mut self, verifier: Arc<dyn CaptchaVerifier>) -> Self {
        self.validator = self.validator.with_captcha(verifier);
        self
    }

    /// Use a fixed From address.
    pub fn with_sender(mut self, sender: Option<String>) -> Self {
        self.sender = sender;
        self
    }

    /// Build the production service: SMTP transport and, when enabled, the
    /// reCAPTCHA verifier.
    pub fn from_config(config: &Config) -> Result<Self> {
        let transport = SmtpTransport::from_config(&config.smtp)?;
        let mut service = Self::new(
            RecipientDirectory::from_config(&config.contact),
            Arc::new(transport),
        )
        .with_sender(config.contact.sender.clone());

        if config.captcha.enabled {
            let verifier = RecaptchaVerifier::from_config(&config.captcha)?;
            service = service.with_captcha(Arc::new(verifier));
        }

        Ok(service)
    }

    /// Check if submissions must pass a CAPTCHA.
    pub fn captcha_enabled(&self) -> bool {
        self.validator.captcha_enabled()
    }

    pub fn directory(&self) -> &RecipientDirectory {
        &self.directory
    }

    /// Process one submission.
    pub async fn submit(
        &self,
        form: &SubmittedForm,
        challenge: Option<&CaptchaChallenge>,
    ) -> SubmissionOutcome {
        tracing::info!(
            recipient = form.recipient_key().unwrap_or("default"),
            "Contact submission received"
        );

        let recipient = self.directory.resolve(form.recipient_key());
        let result = self.validator.validate(form, recipient, challenge).await;

        if !result.is_ok() {
            let fields: Vec<&str> = result.failed_fields().iter().map(Field::as_str).collect();
            tracing::info!(fields = %fields.join(","), "Contact submission rejected");
            return SubmissionOutcome::Rejected(result);
        }

        tracing::debug!("Dispatching contact submission");
        let outcome = Dispatcher::new(self.transport.as_ref(), &self.directory)
            .with_sender(self.sender.as_deref())
            .dispatch(form)
            .await;

        match outcome {
            DispatchOutcome::Delivered => SubmissionOutcome::Delivered,
            DispatchOutcome::Skipped => SubmissionOutcome::Skipped,
            DispatchOutcome::DeliveryFailed => SubmissionOutcome::DeliveryFailed,
            DispatchOutcome::UnknownRecipient => {
                let mut result = ValidationResult::new();
                result.push(Field::To, ErrorKind::UnknownRecipient);
                SubmissionOutcome::Rejected(result)
            }
        }
    }
}
