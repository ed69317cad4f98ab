//! Internationalization (i18n) module.
//!
//! Form labels and user-facing messages come from TOML string tables.
//! Built-in tables for `en` and `fr` are compiled into the binary; a
//! `<locale>.toml` file in the configured directory overrides them key by key.
//!
//! # Usage
//!
//! ```
//! use contactform::i18n::I18n;
//!
//! let i18n = I18n::builtin("en").unwrap();
//! assert_eq!(i18n.t("contact"), "Send");
//! assert_eq!(i18n.t("missing.key"), "missing.key");
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use thiserror::Error;

/// Default locale.
pub const DEFAULT_LOCALE: &str = "en";

const BUILTIN_EN: &str = include_str!("../../locales/en.toml");
const BUILTIN_FR: &str = include_str!("../../locales/fr.toml");

/// I18n-related errors.
#[derive(Error, Debug)]
pub enum I18nError {
    /// Failed to read locale file.
    #[error("Failed to read locale file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML.
    #[error("Failed to parse locale file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Locale not found.
    #[error("Locale not found: {0}")]
    LocaleNotFound(String),
}

/// Result type for i18n operations.
pub type Result<T> = std::result::Result<T, I18nError>;

/// Flattened string table for one locale.
#[derive(Debug, Clone)]
pub struct I18n {
    locale: String,
    /// Flattened message map (key -> value).
    messages: HashMap<String, String>,
}

impl I18n {
    /// Load a locale file `<locales_dir>/<locale>.toml`.
    pub fn load<P: AsRef<Path>>(locale: &str, locales_dir: P) -> Result<Self> {
        let path = locales_dir.as_ref().join(format!("{locale}.toml"));

        if !path.exists() {
            return Err(I18nError::LocaleNotFound(locale.to_string()));
        }

        let content = fs::read_to_string(&path)?;
        Self::from_toml(locale, &content)
    }

    /// Build a table from TOML source.
    pub fn from_toml(locale: &str, content: &str) -> Result<Self> {
        let table: toml::Table = toml::from_str(content)?;

        let mut messages = HashMap::new();
        flatten_toml("", &toml::Value::Table(table), &mut messages);

        Ok(Self {
            locale: locale.to_string(),
            messages,
        })
    }

    /// Get the compiled-in table for a locale.
    pub fn builtin(locale: &str) -> Result<Self> {
        let source = match locale {
            "en" => BUILTIN_EN,
            "fr" => BUILTIN_FR,
            other => return Err(I18nError::LocaleNotFound(other.to_string())),
        };
        Self::from_toml(locale, source)
    }

    /// Resolve the table for a locale.
    ///
    /// Starts from the built-in table (English when the locale has none)
    /// and merges `<locales_dir>/<locale>.toml` over it when present.
    pub fn resolve<P: AsRef<Path>>(locale: &str, locales_dir: P) -> Result<Self> {
        let mut base = match Self::builtin(locale) {
            Ok(i18n) => i18n,
            Err(I18nError::LocaleNotFound(_)) => {
                let mut fallback = Self::builtin(DEFAULT_LOCALE)?;
                fallback.locale = locale.to_string();
                fallback
            }
            Err(e) => return Err(e),
        };

        match Self::load(locale, locales_dir) {
            Ok(overrides) => base.merge(&overrides),
            Err(I18nError::LocaleNotFound(_)) => {}
            Err(e) => return Err(e),
        }

        Ok(base)
    }

    /// Create an empty table. Every lookup returns the key itself.
    pub fn empty(locale: &str) -> Self {
        Self {
            locale: locale.to_string(),
            messages: HashMap::new(),
        }
    }

    /// Get the locale code.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Get the number of loaded messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Check if no messages are loaded.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Translate a key. Unknown keys translate to themselves.
    pub fn t<'a>(&'a self, key: &'a str) -> &'a str {
        self.messages.get(key).map(|s| s.as_str()).unwrap_or(key)
    }

    /// Check if a translation key exists.
    pub fn has_key(&self, key: &str) -> bool {
        self.messages.contains_key(key)
    }

    /// Merge another table into this one; its messages win.
    pub fn merge(&mut self, other: &I18n) {
        for (key, value) in &other.messages {
            self.messages.insert(key.clone(), value.clone());
        }
    }
}

impl Default for I18n {
    fn default() -> Self {
        Self::empty(DEFAULT_LOCALE)
    }
}

/// Flatten a TOML value into a HashMap with dot-separated keys.
fn flatten_toml(prefix: &str, value: &toml::Value, map: &mut HashMap<String, String>) {
    match value {
        toml::Value::Table(table) => {
            for (key, val) in table {
                let new_prefix = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten_toml(&new_prefix, val, map);
            }
        }
        toml::Value::String(s) => {
            map.insert(prefix.to_string(), s.clone());
        }
        toml::Value::Integer(i) => {
            map.insert(prefix.to_string(), i.to_string());
        }
        toml::Value::Float(f) => {
            map.insert(prefix.to_string(), f.to_string());
        }
        toml::Value::Boolean(b) => {
            map.insert(prefix.to_string(), b.to_string());
        }
        toml::Value::Datetime(dt) => {
            map.insert(prefix.to_string(), dt.to_string());
        }
        // Arrays are not supported for translations
        toml::Value::Array(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const REQUIRED_KEYS: &[&str] = &[
        "name",
        "email",
        "subject",
        "content",
        "contact",
        "success",
        "error.unknown",
        "error.name",
        "error.email",
        "error.content",
        "error.captcha",
        "error.valid_name",
        "error.valid_email",
        "error.valid_subject",
        "error.valid_to",
        "error.valid_content",
        "error.unknown_recipient",
    ];

    #[test]
    fn test_builtin_tables_are_complete() {
        for locale in ["en", "fr"] {
            let i18n = I18n::builtin(locale).unwrap();
            for key in REQUIRED_KEYS {
                assert!(i18n.has_key(key), "{locale} is missing {key}");
            }
        }
    }

    #[test]
    fn test_builtin_unknown_locale() {
        assert!(matches!(
            I18n::builtin("de"),
            Err(I18nError::LocaleNotFound(_))
        ));
    }

    #[test]
    fn test_nested_keys() {
        let i18n = I18n::from_toml(
            "en",
            r#"
contact = "Send"

[error]
name = "Name too short"
"#,
        )
        .unwrap();

        assert_eq!(i18n.t("contact"), "Send");
        assert_eq!(i18n.t("error.name"), "Name too short");
        assert_eq!(i18n.len(), 2);
    }

    #[test]
    fn test_missing_key_returns_key() {
        let i18n = I18n::empty("en");
        assert!(i18n.is_empty());
        assert_eq!(i18n.t("error.name"), "error.name");
    }

    #[test]
    fn test_resolve_merges_file_over_builtin() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("en.toml"), "contact = \"Submit\"\n").unwrap();

        let i18n = I18n::resolve("en", dir.path()).unwrap();
        assert_eq!(i18n.t("contact"), "Submit");
        assert_eq!(i18n.t("name"), "Your name");
    }

    #[test]
    fn test_resolve_unknown_locale_falls_back_to_english() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("de.toml"), "contact = \"Senden\"\n").unwrap();

        let i18n = I18n::resolve("de", dir.path()).unwrap();
        assert_eq!(i18n.locale(), "de");
        assert_eq!(i18n.t("contact"), "Senden");
        assert_eq!(i18n.t("subject"), "Subject");
    }

    #[test]
    fn test_resolve_without_directory() {
        let i18n = I18n::resolve("fr", "does/not/exist").unwrap();
        assert_eq!(i18n.t("contact"), "Envoyer");
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("en.toml"), "this is not valid toml [[[").unwrap();

        assert!(matches!(
            I18n::load("en", dir.path()),
            Err(I18nError::Parse(_))
        ));
        assert!(I18n::resolve("en", dir.path()).is_err());
    }
}
