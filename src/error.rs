//! Error types for the contact form service.

use thiserror::Error;

/// Common error type for the contact form service.
#[derive(Error, Debug)]
pub enum ContactError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Validation error for configuration or user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// CAPTCHA verification service error.
    #[error("captcha error: {0}")]
    Captcha(#[from] crate::captcha::CaptchaError),

    /// Mail transport error.
    #[error("mail error: {0}")]
    Mail(#[from] crate::mail::TransportError),

    /// Locale resources could not be loaded.
    #[error("locale error: {0}")]
    Locale(#[from] crate::i18n::I18nError),
}

/// Result type alias for contact form operations.
pub type Result<T> = std::result::Result<T, ContactError>;
