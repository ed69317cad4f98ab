//! Submitted form data.

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;

/// A named input of the contact form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Email,
    Subject,
    Content,
    /// The resolved destination address.
    To,
    Captcha,
}

impl Field {
    /// Form input name of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Subject => "subject",
            Field::Content => "content",
            Field::To => "to",
            Field::Captcha => "captcha",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One submission of the contact form.
///
/// Created per request from untrusted input and discarded afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SubmittedForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub content: String,
    /// Recipient key selecting a configured destination.
    #[serde(default)]
    pub to: Option<String>,
}

impl SubmittedForm {
    /// Create a submission without a recipient key.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        subject: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            subject: subject.into(),
            content: content.into(),
            to: None,
        }
    }

    /// Select a configured destination.
    pub fn with_recipient(mut self, key: impl Into<String>) -> Self {
        self.to = Some(key.into());
        self
    }

    /// Build a submission from urlencoded POST fields.
    ///
    /// Missing inputs become empty strings; `to` stays unset when absent.
    pub fn from_fields(fields: &HashMap<String, String>) -> Self {
        let get = |key: &str| fields.get(key).cloned().unwrap_or_default();
        Self {
            name: get("name"),
            email: get("email"),
            subject: get("subject"),
            content: get("content"),
            to: fields.get("to").cloned(),
        }
    }

    /// The recipient key, trimmed. A supplied but blank key stays `Some("")`
    /// and resolves to no destination.
    pub fn recipient_key(&self) -> Option<&str> {
        self.to.as_deref().map(str::trim)
    }

    /// Raw value of an input, for echoing back into the form.
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Subject => &self.subject,
            Field::Content => &self.content,
            Field::To => self.to.as_deref().unwrap_or(""),
            Field::Captcha => "",
        }
    }
}
