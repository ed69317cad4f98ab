//! Recipient directory.

use std::collections::HashMap;

use crate::config::ContactConfig;

/// Key of the destination used when a submission names none.
pub const DEFAULT_RECIPIENT_KEY: &str = "default";

/// Maps recipient keys to destination addresses.
///
/// Loaded once from configuration and read-only afterwards. Untrusted input
/// only ever supplies a key, never an address.
#[derive(Debug, Clone, Default)]
pub struct RecipientDirectory {
    entries: HashMap<String, String>,
}

impl RecipientDirectory {
    /// Create a directory from key/address pairs.
    pub fn new(entries: HashMap<String, String>) -> Self {
        Self { entries }
    }

    /// Create a directory from the `[contact.recipients]` table.
    pub fn from_config(config: &ContactConfig) -> Self {
        Self::new(config.recipients.clone())
    }

    /// Resolve a key to an address. `None` selects the default entry.
    pub fn resolve(&self, key: Option<&str>) -> Option<&str> {
        let key = key.unwrap_or(DEFAULT_RECIPIENT_KEY);
        self.entries.get(key).map(String::as_str)
    }

    /// Check if a key is configured.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Get the number of configured destinations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no destinations are configured.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RecipientDirectory {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
