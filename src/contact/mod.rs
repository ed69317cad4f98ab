//! Contact form submission handling.
//!
//! This module provides:
//! - Submitted form data and field names
//! - Validation with email grammar checks and a header-injection guard
//! - The recipient directory
//! - Message composition and dispatch
//! - The submission pipeline tying these together

mod directory;
mod dispatch;
mod form;
mod service;
mod validation;

pub use directory::{RecipientDirectory, DEFAULT_RECIPIENT_KEY};
pub use dispatch::{compose_body, compose_mail, DispatchOutcome, Dispatcher};
pub use form::{Field, SubmittedForm};
pub use service::{ContactService, SubmissionOutcome};
pub use validation::{
    check_fields, contains_header_token, contains_injection, guard_injection, is_valid_email,
    CaptchaChallenge, ErrorKind, FieldError, ValidationResult, ValidationStatus, Validator,
    MAX_DOMAIN_LENGTH, MAX_LABEL_LENGTH, MAX_LOCAL_PART_LENGTH, MIN_CONTENT_LENGTH,
    MIN_NAME_LENGTH,
};

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use crate::captcha::{CaptchaError, CaptchaVerdict, CaptchaVerifier, INCORRECT_SOLUTION};
    use crate::mail::{MailTransport, OutgoingMail, TransportError};

    /// Transport that records messages instead of sending them.
    pub struct RecordingTransport {
        sent: Mutex<Vec<OutgoingMail>>,
        fail: bool,
    }

    impl RecordingTransport {
        pub fn new() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail: false,
            }
        }

        /// A transport that refuses every message.
        pub fn failing() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        pub fn sent(&self) -> Vec<OutgoingMail> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[axum::async_trait]
    impl MailTransport for RecordingTransport {
        async fn send(&self, mail: &OutgoingMail) -> Result<(), TransportError> {
            if self.fail {
                return Err(TransportError::Send("550 relay refused".to_string()));
            }
            self.sent.lock().unwrap().push(mail.clone());
            Ok(())
        }
    }

    enum Answer {
        Accept,
        Reject,
        Unavailable,
    }

    /// Verifier with a fixed answer that counts its calls.
    pub struct StaticCaptcha {
        answer: Answer,
        calls: AtomicUsize,
        last_client_addr: Mutex<Option<String>>,
    }

    impl StaticCaptcha {
        fn with_answer(answer: Answer) -> Self {
            Self {
                answer,
                calls: AtomicUsize::new(0),
                last_client_addr: Mutex::new(None),
            }
        }

        pub fn accepting() -> Self {
            Self::with_answer(Answer::Accept)
        }

        pub fn rejecting() -> Self {
            Self::with_answer(Answer::Reject)
        }

        pub fn unavailable() -> Self {
            Self::with_answer(Answer::Unavailable)
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn last_client_addr(&self) -> Option<String> {
            self.last_client_addr.lock().unwrap().clone()
        }
    }

    #[axum::async_trait]
    impl CaptchaVerifier for StaticCaptcha {
        async fn verify(
            &self,
            client_addr: &str,
            _challenge: &str,
            _response: &str,
        ) -> Result<CaptchaVerdict, CaptchaError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_client_addr.lock().unwrap() = Some(client_addr.to_string());
            match self.answer {
                Answer::Accept => Ok(CaptchaVerdict::valid()),
                Answer::Reject => Ok(CaptchaVerdict::invalid(INCORRECT_SOLUTION)),
                Answer::Unavailable => Err(CaptchaError::MissingClientAddress),
            }
        }
    }
}
