//! Translation bundles: flat key to string mappings for one language.

use std::collections::HashMap;

use crate::i18n::LanguageCode;

/// The full key to string translation mapping for one language.
///
/// Bundles are immutable once built; the store swaps whole bundles
/// rather than editing entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationBundle {
    language: Option<LanguageCode>,
    entries: HashMap<String, String>,
}

impl TranslationBundle {
    /// Create a bundle for a language from its entries.
    pub fn new(language: LanguageCode, entries: HashMap<String, String>) -> Self {
        Self {
            language: Some(language),
            entries,
        }
    }

    /// A bundle with no entries and no language, handed out when every
    /// source in the fallback chain failed.
    pub fn empty() -> Self {
        Self {
            language: None,
            entries: HashMap::new(),
        }
    }

    /// Parse a bundle from the JSON body served by the translation source.
    ///
    /// Non-string values are a parse failure: the source format is a flat
    /// string mapping.
    pub fn from_json(language: LanguageCode, body: &str) -> serde_json::Result<Self> {
        let entries: HashMap<String, String> = serde_json::from_str(body)?;
        Ok(Self::new(language, entries))
    }

    /// The language this bundle was loaded for, `None` for the empty bundle.
    pub fn language(&self) -> Option<&LanguageCode> {
        self.language.as_ref()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
