//! CAPTCHA verification.
//!
//! A [`CaptchaVerifier`] checks a challenge/response pair against an
//! external service. [`RecaptchaVerifier`] talks to a reCAPTCHA-style HTTP
//! endpoint; [`widget_html`] emits the matching browser widget.

mod recaptcha;
mod widget;

pub use recaptcha::{parse_verdict, RecaptchaVerifier, INCORRECT_SOLUTION};
pub use widget::{widget_html, CHALLENGE_FIELD, RESPONSE_FIELD};

use thiserror::Error;

/// CAPTCHA verification errors.
#[derive(Error, Debug)]
pub enum CaptchaError {
    /// The verification request failed.
    #[error("verification request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service requires the client address and none was available.
    #[error("client address is required for verification")]
    MissingClientAddress,

    /// The HTTP client could not be created.
    #[error("failed to create HTTP client: {0}")]
    Client(String),
}

/// Answer of the verification service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptchaVerdict {
    pub valid: bool,
    /// Error code reported by the service, if any.
    pub error: Option<String>,
}

impl CaptchaVerdict {
    /// A positive verdict.
    pub fn valid() -> Self {
        Self {
            valid: true,
            error: None,
        }
    }

    /// A negative verdict with an error code.
    pub fn invalid(error: impl Into<String>) -> Self {
        Self {
            valid: false,
            error: Some(error.into()),
        }
    }
}

/// Checks a CAPTCHA answer.
#[axum::async_trait]
pub trait CaptchaVerifier: Send + Sync {
    /// Verify a challenge/response pair submitted from `client_addr`.
    async fn verify(
        &self,
        client_addr: &str,
        challenge: &str,
        response: &str,
    ) -> Result<CaptchaVerdict, CaptchaError>;
}
