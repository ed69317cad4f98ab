//! Configuration module for the contact form service.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::contact::DEFAULT_RECIPIENT_KEY;
use crate::{ContactError, Result};

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origins.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
        }
    }
}

/// Contact form configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ContactConfig {
    /// Address used in the From header. Falls back to the recipient when unset.
    #[serde(default)]
    pub sender: Option<String>,
    /// Recipient directory (key -> email address). Must contain `default`.
    #[serde(default)]
    pub recipients: HashMap<String, String>,
}

/// CAPTCHA configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CaptchaConfig {
    /// Whether submissions must pass a CAPTCHA challenge.
    #[serde(default)]
    pub enabled: bool,
    /// Public site key embedded in the widget.
    #[serde(default)]
    pub site_key: String,
    /// Private key sent to the verification service.
    #[serde(default)]
    pub secret: String,
    /// Widget theme (red, white, blackglass, clean).
    #[serde(default = "default_captcha_theme")]
    pub theme: String,
    /// Verification endpoint.
    #[serde(default = "default_captcha_verify_url")]
    pub verify_url: String,
    /// Base URL of the widget scripts.
    #[serde(default = "default_captcha_script_url")]
    pub script_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_captcha_timeout")]
    pub timeout_secs: u64,
}

fn default_captcha_theme() -> String {
    "red".to_string()
}

fn default_captcha_verify_url() -> String {
    "http://www.google.com/recaptcha/api/verify".to_string()
}

fn default_captcha_script_url() -> String {
    "http://www.google.com/recaptcha/api".to_string()
}

fn default_captcha_timeout() -> u64 {
    10
}

impl Default for CaptchaConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            site_key: String::new(),
            secret: String::new(),
            theme: default_captcha_theme(),
            verify_url: default_captcha_verify_url(),
            script_url: default_captcha_script_url(),
            timeout_secs: default_captcha_timeout(),
        }
    }
}

/// Connection security for the SMTP relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SmtpTls {
    /// Plain connection.
    #[default]
    None,
    /// Upgrade with STARTTLS.
    Starttls,
    /// Implicit TLS (SMTPS).
    Tls,
}

/// SMTP relay configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    /// Relay host.
    #[serde(default = "default_smtp_host")]
    pub host: String,
    /// Relay port.
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    /// Username for authentication (empty = no authentication).
    #[serde(default)]
    pub username: String,
    /// Password for authentication.
    #[serde(default)]
    pub password: String,
    /// Connection security.
    #[serde(default)]
    pub tls: SmtpTls,
    /// Timeout in seconds for a single delivery.
    #[serde(default = "default_smtp_timeout")]
    pub timeout_secs: u64,
}

fn default_smtp_host() -> String {
    "localhost".to_string()
}

fn default_smtp_port() -> u16 {
    25
}

fn default_smtp_timeout() -> u64 {
    30
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: default_smtp_host(),
            port: default_smtp_port(),
            username: String::new(),
            password: String::new(),
            tls: SmtpTls::None,
            timeout_secs: default_smtp_timeout(),
        }
    }
}

/// Locale configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LocaleConfig {
    /// Language code (en / fr).
    #[serde(default = "default_language")]
    pub language: String,
    /// Directory holding `<language>.toml` overrides.
    #[serde(default = "default_locales_path")]
    pub path: String,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_locales_path() -> String {
    "locales".to_string()
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            path: default_locales_path(),
        }
    }
}

/// Page configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PageConfig {
    /// Page title.
    #[serde(default = "default_page_title")]
    pub title: String,
    /// Page source; `{{contact>...}}` directives are replaced by forms.
    #[serde(default = "default_page_body")]
    pub body: String,
}

fn default_page_title() -> String {
    "Contact".to_string()
}

fn default_page_body() -> String {
    "{{contact>}}".to_string()
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            title: default_page_title(),
            body: default_page_body(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/contactform.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Contact form configuration.
    #[serde(default)]
    pub contact: ContactConfig,
    /// CAPTCHA configuration.
    #[serde(default)]
    pub captcha: CaptchaConfig,
    /// SMTP relay configuration.
    #[serde(default)]
    pub smtp: SmtpConfig,
    /// Locale configuration.
    #[serde(default)]
    pub locale: LocaleConfig,
    /// Page configuration.
    #[serde(default)]
    pub page: PageConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ContactError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| ContactError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `CONTACT_SMTP_PASSWORD`: Override the SMTP password
    /// - `CONTACT_CAPTCHA_SECRET`: Override the CAPTCHA private key
    pub fn apply_env_overrides(&mut self) {
        if let Ok(password) = std::env::var("CONTACT_SMTP_PASSWORD") {
            if !password.is_empty() {
                self.smtp.password = password;
            }
        }
        if let Ok(secret) = std::env::var("CONTACT_CAPTCHA_SECRET") {
            if !secret.is_empty() {
                self.captcha.secret = secret;
            }
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - The recipient directory has no `default` entry
    /// - CAPTCHA is enabled but the site key or secret is not set
    pub fn validate(&self) -> Result<()> {
        if !self.contact.recipients.contains_key(DEFAULT_RECIPIENT_KEY) {
            return Err(ContactError::Validation(
                "contact.recipients must contain a `default` entry".to_string(),
            ));
        }
        if self.captcha.enabled && (self.captcha.site_key.is_empty() || self.captcha.secret.is_empty())
        {
            return Err(ContactError::Validation(
                "CAPTCHA is enabled but site_key or secret is not set. \
                 Set them in config.toml or via CONTACT_CAPTCHA_SECRET environment variable."
                    .to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert!(config.server.cors_origins.is_empty());

        assert!(config.contact.sender.is_none());
        assert!(config.contact.recipients.is_empty());

        assert!(!config.captcha.enabled);
        assert_eq!(config.captcha.theme, "red");
        assert_eq!(
            config.captcha.verify_url,
            "http://www.google.com/recaptcha/api/verify"
        );
        assert_eq!(config.captcha.timeout_secs, 10);

        assert_eq!(config.smtp.host, "localhost");
        assert_eq!(config.smtp.port, 25);
        assert_eq!(config.smtp.tls, SmtpTls::None);

        assert_eq!(config.locale.language, "en");
        assert_eq!(config.locale.path, "locales");

        assert_eq!(config.page.title, "Contact");
        assert_eq!(config.page.body, "{{contact>}}");

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.file, "logs/contactform.log");
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 3000
cors_origins = ["http://localhost:3000"]

[contact]
sender = "noreply@example.com"

[contact.recipients]
default = "webmaster@example.com"
sales = "sales@example.com"

[captcha]
enabled = true
site_key = "public-key"
secret = "private-key"
theme = "clean"
timeout_secs = 5

[smtp]
host = "mail.example.com"
port = 587
username = "mailer"
password = "hunter2"
tls = "starttls"

[locale]
language = "fr"
path = "custom/locales"

[page]
title = "Write to us"
body = "Hello {{contact>to=sales}}"

[logging]
level = "debug"
file = "custom/logs/app.log"
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.cors_origins.len(), 1);

        assert_eq!(config.contact.sender.as_deref(), Some("noreply@example.com"));
        assert_eq!(config.contact.recipients.len(), 2);
        assert_eq!(config.contact.recipients["sales"], "sales@example.com");

        assert!(config.captcha.enabled);
        assert_eq!(config.captcha.site_key, "public-key");
        assert_eq!(config.captcha.secret, "private-key");
        assert_eq!(config.captcha.theme, "clean");
        assert_eq!(config.captcha.timeout_secs, 5);

        assert_eq!(config.smtp.host, "mail.example.com");
        assert_eq!(config.smtp.port, 587);
        assert_eq!(config.smtp.username, "mailer");
        assert_eq!(config.smtp.tls, SmtpTls::Starttls);

        assert_eq!(config.locale.language, "fr");
        assert_eq!(config.locale.path, "custom/locales");

        assert_eq!(config.page.title, "Write to us");
        assert_eq!(config.page.body, "Hello {{contact>to=sales}}");

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.file, "custom/logs/app.log");

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_empty_config() {
        let config = Config::parse("").unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.smtp.port, 25);
        assert!(!config.captcha.enabled);
    }

    #[test]
    fn test_parse_invalid_config() {
        let result = Config::parse("this is not valid toml [[[");

        assert!(result.is_err());
        if let Err(ContactError::Config(msg)) = result {
            assert!(msg.contains("config parse error"));
        } else {
            panic!("Expected Config error");
        }
    }

    #[test]
    fn test_parse_invalid_tls_mode() {
        let result = Config::parse("[smtp]\ntls = \"ssl3\"\n");
        assert!(matches!(result, Err(ContactError::Config(_))));
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load("nonexistent.toml");

        assert!(matches!(result, Err(ContactError::Io(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[contact.recipients]\ndefault = \"a@example.com\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.contact.recipients["default"], "a@example.com");
    }

    #[test]
    fn test_apply_env_overrides() {
        let original = std::env::var("CONTACT_CAPTCHA_SECRET").ok();

        std::env::set_var("CONTACT_CAPTCHA_SECRET", "env-secret");
        let mut config = Config::default();
        config.apply_env_overrides();
        assert_eq!(config.captcha.secret, "env-secret");

        // Empty values never override
        std::env::set_var("CONTACT_CAPTCHA_SECRET", "");
        let mut config = Config::default();
        config.captcha.secret = "original".to_string();
        config.apply_env_overrides();
        assert_eq!(config.captcha.secret, "original");

        if let Some(val) = original {
            std::env::set_var("CONTACT_CAPTCHA_SECRET", val);
        } else {
            std::env::remove_var("CONTACT_CAPTCHA_SECRET");
        }
    }

    #[test]
    fn test_validate_missing_default_recipient() {
        let mut config = Config::default();
        config
            .contact
            .recipients
            .insert("sales".to_string(), "sales@example.com".to_string());

        let result = config.validate();
        if let Err(ContactError::Validation(msg)) = result {
            assert!(msg.contains("default"));
        } else {
            panic!("Expected Validation error");
        }
    }

    #[test]
    fn test_validate_captcha_without_secret() {
        let mut config = Config::default();
        config
            .contact
            .recipients
            .insert("default".to_string(), "admin@example.com".to_string());
        config.captcha.enabled = true;
        config.captcha.site_key = "public".to_string();

        assert!(config.validate().is_err());

        config.captcha.secret = "private".to_string();
        assert!(config.validate().is_ok());
    }
}
