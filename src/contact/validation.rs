//! Submission validation.
//!
//! Every check runs regardless of earlier failures so the form can report
//! all problems at once. Checks, in order:
//!
//! 1. name has at least [`MIN_NAME_LENGTH`] characters after trimming
//! 2. email matches the local/domain grammar
//! 3. content has at least [`MIN_CONTENT_LENGTH`] characters after trimming
//! 4. CAPTCHA verdict, only when a verifier is configured
//! 5. header-injection guard over name, email, subject, the resolved
//!    destination address and the composed message body

use std::sync::Arc;

use thiserror::Error;

use super::dispatch::compose_body;
use super::form::{Field, SubmittedForm};
use crate::captcha::CaptchaVerifier;

/// Minimum name length.
pub const MIN_NAME_LENGTH: usize = 2;

/// Minimum message length.
pub const MIN_CONTENT_LENGTH: usize = 10;

/// Maximum length of the local part of an email address.
pub const MAX_LOCAL_PART_LENGTH: usize = 64;

/// Maximum length of the domain part of an email address.
pub const MAX_DOMAIN_LENGTH: usize = 255;

/// Maximum length of a single domain label.
pub const MAX_LABEL_LENGTH: usize = 63;

/// Maximum length of the text between the quotes of a quoted local segment.
const MAX_QUOTED_LENGTH: usize = 62;

/// Symbols allowed in an unquoted local segment besides ASCII alphanumerics.
const ATOM_SYMBOLS: &str = "!#$%&'*+/=?^_`{|}~-";

/// Characters never allowed inside a quoted local segment.
const QUOTED_FORBIDDEN: &str = "()\\|\"";

/// Header names that must never appear in a field value (lowercase).
const HEADER_TOKENS: &[&str] = &["mime-version:", "content-type:"];

/// Kind of a field-level validation failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[error("name must be at least {MIN_NAME_LENGTH} characters")]
    NameTooShort,

    #[error("invalid email address")]
    InvalidEmail,

    #[error("content must be at least {MIN_CONTENT_LENGTH} characters")]
    ContentTooShort,

    #[error("captcha verification failed")]
    CaptchaFailed,

    #[error("header injection detected in {0}")]
    InjectionDetected(Field),

    #[error("unknown recipient")]
    UnknownRecipient,
}

impl ErrorKind {
    /// Translation key of the user-facing message.
    pub fn message_key(&self) -> &'static str {
        match self {
            ErrorKind::NameTooShort => "error.name",
            ErrorKind::InvalidEmail => "error.email",
            ErrorKind::ContentTooShort => "error.content",
            ErrorKind::CaptchaFailed => "error.captcha",
            ErrorKind::InjectionDetected(field) => match field {
                Field::Name => "error.valid_name",
                Field::Email => "error.valid_email",
                Field::Subject => "error.valid_subject",
                Field::To => "error.valid_to",
                Field::Content | Field::Captcha => "error.valid_content",
            },
            ErrorKind::UnknownRecipient => "error.unknown_recipient",
        }
    }
}

/// A failure attributed to one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub kind: ErrorKind,
}

/// Overall verdict of a validation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationStatus {
    Success,
    Failure,
}

/// Accumulated field errors, in check order.
///
/// An empty result is the only kind eligible for dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    errors: Vec<FieldError>,
}

impl ValidationResult {
    /// Create an empty (successful) result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure.
    pub fn push(&mut self, field: Field, kind: ErrorKind) {
        self.errors.push(FieldError { field, kind });
    }

    /// Check if no check failed.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn status(&self) -> ValidationStatus {
        if self.is_ok() {
            ValidationStatus::Success
        } else {
            ValidationStatus::Failure
        }
    }

    /// All failures in check order.
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Number of recorded failures.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Check if a field has any failure.
    pub fn has_error(&self, field: Field) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// Check if a specific failure was recorded.
    pub fn contains(&self, field: Field, kind: &ErrorKind) -> bool {
        self.errors
            .iter()
            .any(|e| e.field == field && &e.kind == kind)
    }

    /// Failing fields, first occurrence order, without duplicates.
    pub fn failed_fields(&self) -> Vec<Field> {
        let mut fields = Vec::new();
        for error in &self.errors {
            if !fields.contains(&error.field) {
                fields.push(error.field);
            }
        }
        fields
    }
}

/// Client-supplied answer to a CAPTCHA challenge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptchaChallenge {
    /// Network address of the submitting client.
    pub client_addr: String,
    pub challenge: String,
    pub response: String,
}

/// Runs every check over a submission.
#[derive(Clone, Default)]
pub struct Validator {
    captcha: Option<Arc<dyn CaptchaVerifier>>,
}

impl Validator {
    /// Create a validator with CAPTCHA checking disabled.
    pub fn new() -> Self {
        Self { captcha: None }
    }

    /// Require a positive CAPTCHA verdict for every submission.
    pub fn with_captcha(mut self, verifier: Arc<dyn CaptchaVerifier>) -> Self {
        self.captcha = Some(verifier);
        self
    }

    /// Check if CAPTCHA verification is part of validation.
    pub fn captcha_enabled(&self) -> bool {
        self.captcha.is_some()
    }

    /// Validate a submission.
    ///
    /// `recipient` is the destination address resolved from the recipient
    /// directory; `None` means the requested key is not configured.
    pub async fn validate(
        &self,
        form: &SubmittedForm,
        recipient: Option<&str>,
        challenge: Option<&CaptchaChallenge>,
    ) -> ValidationResult {
        let mut result = check_fields(form);

        if let Some(verifier) = &self.captcha {
            if !captcha_passes(verifier.as_ref(), challenge).await {
                result.push(Field::Captcha, ErrorKind::CaptchaFailed);
            }
        }

        guard_injection(form, recipient, &mut result);
        result
    }
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validator")
            .field("captcha_enabled", &self.captcha_enabled())
            .finish()
    }
}

async fn captcha_passes(
    verifier: &dyn CaptchaVerifier,
    challenge: Option<&CaptchaChallenge>,
) -> bool {
    let Some(challenge) = challenge else {
        tracing::debug!("Submission carries no captcha answer");
        return false;
    };

    match verifier
        .verify(
            &challenge.client_addr,
            &challenge.challenge,
            &challenge.response,
        )
        .await
    {
        Ok(verdict) => {
            if !verdict.valid {
                tracing::info!(
                    error = verdict.error.as_deref().unwrap_or(""),
                    "Captcha answer rejected"
                );
            }
            verdict.valid
        }
        Err(e) => {
            tracing::warn!(error = %e, "Captcha verification failed");
            false
        }
    }
}

/// Run the length and syntax checks (1 to 3).
pub fn check_fields(form: &SubmittedForm) -> ValidationResult {
    let mut result = ValidationResult::new();

    if form.name.trim().chars().count() < MIN_NAME_LENGTH {
        result.push(Field::Name, ErrorKind::NameTooShort);
    }

    if !is_valid_email(&form.email) {
        result.push(Field::Email, ErrorKind::InvalidEmail);
    }

    if form.content.trim().chars().count() < MIN_CONTENT_LENGTH {
        result.push(Field::Content, ErrorKind::ContentTooShort);
    }

    result
}

/// Run the header-injection guard (check 5).
///
/// An unresolvable recipient is recorded as [`ErrorKind::UnknownRecipient`]
/// on the `to` field.
pub fn guard_injection(form: &SubmittedForm, recipient: Option<&str>, result: &mut ValidationResult) {
    for (field, value) in [
        (Field::Name, form.name.as_str()),
        (Field::Email, form.email.as_str()),
        (Field::Subject, form.subject.as_str()),
    ] {
        if contains_injection(value) {
            result.push(field, ErrorKind::InjectionDetected(field));
        }
    }

    match recipient {
        Some(address) if contains_injection(address) => {
            result.push(Field::To, ErrorKind::InjectionDetected(Field::To));
        }
        Some(_) => {}
        None => result.push(Field::To, ErrorKind::UnknownRecipient),
    }

    // The body legitimately spans several lines; only header names are refused.
    if contains_header_token(&compose_body(form)) {
        result.push(Field::Content, ErrorKind::InjectionDetected(Field::Content));
    }
}

/// Check if a single-line value could smuggle headers into a message.
pub fn contains_injection(value: &str) -> bool {
    value.contains(['\r', '\n']) || contains_header_token(value)
}

/// Check if a value contains a MIME header name (case-insensitive).
pub fn contains_header_token(value: &str) -> bool {
    let lower = value.to_ascii_lowercase();
    HEADER_TOKENS.iter().any(|token| lower.contains(token))
}

/// Check an email address against the local/domain grammar.
///
/// This is a syntactic filter only. No DNS or mailbox lookup is done.
///
/// # Examples
///
/// ```
/// use contactform::contact::is_valid_email;
///
/// assert!(is_valid_email("user@example.com"));
/// assert!(is_valid_email("\"john doe\".smith@[192.168.0.1]"));
/// assert!(!is_valid_email("user@@example.com"));
/// assert!(!is_valid_email("user@domain"));
/// ```
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if domain.contains('@') {
        return false;
    }

    let local_len = local.chars().count();
    if local_len == 0 || local_len > MAX_LOCAL_PART_LENGTH {
        return false;
    }
    let domain_len = domain.chars().count();
    if domain_len == 0 || domain_len > MAX_DOMAIN_LENGTH {
        return false;
    }

    local.split('.').all(is_valid_local_segment) && is_valid_domain(domain)
}

fn is_atom_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || ATOM_SYMBOLS.contains(c)
}

fn is_valid_local_segment(segment: &str) -> bool {
    if let Some(inner) = segment
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    {
        return inner.chars().count() <= MAX_QUOTED_LENGTH
            && inner
                .chars()
                .all(|c| !c.is_control() && !QUOTED_FORBIDDEN.contains(c));
    }

    !segment.is_empty()
        && segment.chars().count() <= MAX_LOCAL_PART_LENGTH
        && segment.chars().all(is_atom_char)
}

fn is_valid_domain(domain: &str) -> bool {
    if is_ip_literal(domain) {
        return true;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| is_valid_label(label))
}

/// Loose IP literal: dot-separated groups of 1 to 3 digits, optionally in
/// matching brackets.
fn is_ip_literal(domain: &str) -> bool {
    let inner = match (domain.strip_prefix('['), domain.ends_with(']')) {
        (Some(rest), true) => &rest[..rest.len() - 1],
        (None, false) => domain,
        _ => return false,
    };
    inner.split('.').all(|group| {
        (1..=3).contains(&group.len()) && group.chars().all(|c| c.is_ascii_digit())
    })
}

fn is_valid_label(label: &str) -> bool {
    let len = label.len();
    if len == 0 || len > MAX_LABEL_LENGTH {
        return false;
    }
    if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return false;
    }
    !label.starts_with('-') && !label.ends_with('-')
}
