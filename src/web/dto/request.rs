//! Request DTOs.

use serde::Deserialize;

use crate::contact::{CaptchaChallenge, SubmittedForm};

/// JSON body of `POST /api/contact`.
#[derive(Debug, Clone, Deserialize)]
pub struct ContactRequest {
    #[serde(flatten)]
    pub form: SubmittedForm,
    #[serde(default)]
    pub captcha_challenge: Option<String>,
    #[serde(default)]
    pub captcha_response: Option<String>,
}

impl ContactRequest {
    /// CAPTCHA answer carried by the request, if any.
    pub fn challenge(&self, client_addr: &str) -> Option<CaptchaChallenge> {
        if self.captcha_challenge.is_none() && self.captcha_response.is_none() {
            return None;
        }

        Some(CaptchaChallenge {
            client_addr: client_addr.to_string(),
            challenge: self.captcha_challenge.clone().unwrap_or_default(),
            response: self.captcha_response.clone().unwrap_or_default(),
        })
    }
}
