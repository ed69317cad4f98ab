//! reCAPTCHA verification over HTTP.

use std::time::Duration;

use reqwest::Client;

use super::{CaptchaError, CaptchaVerdict, CaptchaVerifier};
use crate::config::CaptchaConfig;

/// Error code for a wrong or missing answer.
pub const INCORRECT_SOLUTION: &str = "incorrect-captcha-sol";

/// Connect timeout in seconds.
const CONNECT_TIMEOUT_SECS: u64 = 5;

/// User agent string for verification requests.
const USER_AGENT: &str = concat!("contactform/", env!("CARGO_PKG_VERSION"));

/// Verifies answers against a reCAPTCHA-style endpoint.
///
/// The endpoint receives `privatekey`, `remoteip`, `challenge` and
/// `response` as a urlencoded POST and answers with `true` or `false` on
/// the first line, followed by an error code.
pub struct RecaptchaVerifier {
    client: Client,
    verify_url: String,
    secret: String,
}

impl RecaptchaVerifier {
    /// Create a verifier.
    pub fn new(
        verify_url: impl Into<String>,
        secret: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, CaptchaError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS).min(timeout))
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| CaptchaError::Client(e.to_string()))?;

        Ok(Self {
            client,
            verify_url: verify_url.into(),
            secret: secret.into(),
        })
    }

    /// Create a verifier from the `[captcha]` section.
    pub fn from_config(config: &CaptchaConfig) -> Result<Self, CaptchaError> {
        Self::new(
            config.verify_url.clone(),
            config.secret.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }
}

#[axum::async_trait]
impl CaptchaVerifier for RecaptchaVerifier {
    async fn verify(
        &self,
        client_addr: &str,
        challenge: &str,
        response: &str,
    ) -> Result<CaptchaVerdict, CaptchaError> {
        if client_addr.is_empty() {
            return Err(CaptchaError::MissingClientAddress);
        }

        // Spam bots often submit nothing at all
        if challenge.is_empty() || response.is_empty() {
            return Ok(CaptchaVerdict::invalid(INCORRECT_SOLUTION));
        }

        let params = [
            ("privatekey", self.secret.as_str()),
            ("remoteip", client_addr),
            ("challenge", challenge),
            ("response", response),
        ];

        let body = self
            .client
            .post(&self.verify_url)
            .form(&params)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(parse_verdict(&body))
    }
}

/// Parse the service answer.
///
/// Anything other than `true` on the first line is a negative verdict.
pub fn parse_verdict(body: &str) -> CaptchaVerdict {
    let mut lines = body.lines().map(str::trim);

    match lines.next() {
        Some("true") => CaptchaVerdict::valid(),
        _ => {
            let error = lines
                .next()
                .filter(|code| !code.is_empty())
                .unwrap_or(INCORRECT_SOLUTION);
            CaptchaVerdict::invalid(error)
        }
    }
}
