//! Contact form service
//!
//! Renders embeddable contact forms, validates submissions with a
//! header-injection guard, optionally verifies a CAPTCHA and forwards valid
//! messages to a configured recipient by email.

pub mod captcha;
pub mod config;
pub mod contact;
pub mod error;
pub mod i18n;
pub mod logging;
pub mod mail;
pub mod markup;
pub mod render;
pub mod web;

pub use config::Config;
pub use contact::{
    ContactService, Field, RecipientDirectory, SubmissionOutcome, SubmittedForm,
    ValidationResult, Validator,
};
pub use error::{ContactError, Result};
pub use mail::{MailTransport, OutgoingMail};
