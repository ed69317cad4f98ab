//! Handlers for the contact pages and API.

pub mod contact;

pub use contact::*;

use crate::config::{CaptchaConfig, Config, PageConfig};
use crate::contact::ContactService;
use crate::i18n::I18n;
use crate::Result;

/// Application state shared by all handlers.
pub struct AppState {
    /// Submission pipeline.
    pub service: ContactService,
    /// Strings for the configured language.
    pub i18n: I18n,
    /// Widget settings.
    pub captcha: CaptchaConfig,
    /// Page hosting the forms.
    pub page: PageConfig,
}

impl AppState {
    /// Create a new application state with default page and widget settings.
    pub fn new(service: ContactService, i18n: I18n) -> Self {
        Self {
            service,
            i18n,
            captcha: CaptchaConfig::default(),
            page: PageConfig::default(),
        }
    }

    pub fn with_captcha(mut self, captcha: CaptchaConfig) -> Self {
        self.captcha = captcha;
        self
    }

    pub fn with_page(mut self, page: PageConfig) -> Self {
        self.page = page;
        self
    }

    /// Build the production state from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let service = ContactService::from_config(config)?;
        let i18n = I18n::resolve(&config.locale.language, &config.locale.path)?;

        Ok(Self::new(service, i18n)
            .with_captcha(config.captcha.clone())
            .with_page(config.page.clone()))
    }
}
