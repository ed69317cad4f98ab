//! Shared fakes and server setup for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum_test::TestServer;
use contactform::captcha::{CaptchaError, CaptchaVerdict, CaptchaVerifier};
use contactform::config::{CaptchaConfig, PageConfig};
use contactform::i18n::I18n;
use contactform::mail::{MailTransport, OutgoingMail, TransportError};
use contactform::web::{create_health_router, create_router, AppState};
use contactform::{ContactService, RecipientDirectory};

/// Transport that records every message it is asked to send.
#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<OutgoingMail>>,
    fail: bool,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport whose relay refuses everything.
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().unwrap().clone()
    }

    /// Number of send attempts, successful or not.
    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[axum::async_trait]
impl MailTransport for RecordingTransport {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), TransportError> {
        self.sent.lock().unwrap().push(mail.clone());
        if self.fail {
            return Err(TransportError::Send(
                "554 5.7.1 relay access denied for internal-host-17".to_string(),
            ));
        }
        Ok(())
    }
}

/// Verifier with a fixed answer that counts calls.
pub struct StaticCaptcha {
    valid: bool,
    calls: AtomicUsize,
}

impl StaticCaptcha {
    pub fn accepting() -> Self {
        Self {
            valid: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn rejecting() -> Self {
        Self {
            valid: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[axum::async_trait]
impl CaptchaVerifier for StaticCaptcha {
    async fn verify(
        &self,
        _client_addr: &str,
        _challenge: &str,
        _response: &str,
    ) -> Result<CaptchaVerdict, CaptchaError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.valid {
            Ok(CaptchaVerdict::valid())
        } else {
            Ok(CaptchaVerdict::invalid("incorrect-captcha-sol"))
        }
    }
}

pub fn directory() -> RecipientDirectory {
    [
        ("default", "webmaster@example.com"),
        ("sales", "sales@example.com"),
    ]
    .into_iter()
    .collect()
}

/// Builder for a test server around fake collaborators.
pub struct TestApp {
    pub transport: Arc<RecordingTransport>,
    pub captcha: Option<Arc<StaticCaptcha>>,
    pub page: PageConfig,
    pub language: String,
}

impl TestApp {
    pub fn new() -> Self {
        Self {
            transport: Arc::new(RecordingTransport::new()),
            captcha: None,
            page: PageConfig::default(),
            language: "en".to_string(),
        }
    }

    pub fn with_transport(mut self, transport: RecordingTransport) -> Self {
        self.transport = Arc::new(transport);
        self
    }

    pub fn with_captcha(mut self, captcha: StaticCaptcha) -> Self {
        self.captcha = Some(Arc::new(captcha));
        self
    }

    pub fn with_page_body(mut self, body: &str) -> Self {
        self.page.body = body.to_string();
        self
    }

    pub fn with_language(mut self, language: &str) -> Self {
        self.language = language.to_string();
        self
    }

    pub fn i18n(&self) -> I18n {
        I18n::builtin(&self.language).unwrap()
    }

    pub fn server(&self) -> TestServer {
        let mut service = ContactService::new(directory(), self.transport.clone());
        let mut captcha_config = CaptchaConfig::default();

        if let Some(captcha) = &self.captcha {
            service = service.with_captcha(captcha.clone());
            captcha_config.enabled = true;
            captcha_config.site_key = "public-key".to_string();
            captcha_config.secret = "private-key".to_string();
        }

        let state = AppState::new(service, self.i18n())
            .with_captcha(captcha_config)
            .with_page(self.page.clone());

        let router = create_router(Arc::new(state), &[]).merge(create_health_router());
        TestServer::new(router).expect("Failed to create test server")
    }
}
