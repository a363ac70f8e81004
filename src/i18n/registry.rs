//! Language registry: the ordered set of languages the site serves.
//!
//! The set is built once from configuration and is immutable afterwards.
//! Its construction enforces that the fallback language is always a member.

use anyhow::{bail, Result};

use crate::i18n::LanguageCode;

/// Display metadata for a language the site knows how to label.
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// ISO 639-1 language code (e.g., "en", "pt")
    pub code: &'static str,

    /// English name of the language (e.g., "English", "Portuguese")
    pub name: &'static str,

    /// Native name of the language (e.g., "English", "Português")
    pub native_name: &'static str,
}

/// Labels for the languages shipped with the site.
const KNOWN_LANGUAGES: &[LanguageConfig] = &[
    LanguageConfig {
        code: "en",
        name: "English",
        native_name: "English",
    },
    LanguageConfig {
        code: "pt",
        name: "Portuguese",
        native_name: "Português",
    },
    LanguageConfig {
        code: "es",
        name: "Spanish",
        native_name: "Español",
    },
    LanguageConfig {
        code: "de",
        name: "German",
        native_name: "Deutsch",
    },
    LanguageConfig {
        code: "fr",
        name: "French",
        native_name: "Français",
    },
];

/// Look up display metadata for a language code.
///
/// # Returns
/// * `Some(&LanguageConfig)` for built-in languages
/// * `None` for codes the site has no labels for
pub fn language_config(code: &LanguageCode) -> Option<&'static LanguageConfig> {
    KNOWN_LANGUAGES.iter().find(|lang| lang.code == code.as_str())
}

/// Ordered set of language codes the site is willing to serve.
///
/// Invariant: `fallback` is always a member of `languages`.
#[derive(Debug, Clone)]
pub struct SupportedLanguageSet {
    languages: Vec<LanguageCode>,
    fallback: LanguageCode,
}

impl SupportedLanguageSet {
    /// Build the set from configured codes.
    ///
    /// Duplicates are dropped, keeping the first occurrence.
    ///
    /// # Returns
    /// * `Ok(SupportedLanguageSet)` if the list is non-empty and contains the fallback
    /// * `Err` otherwise
    pub fn new(
        languages: impl IntoIterator<Item = LanguageCode>,
        fallback: LanguageCode,
    ) -> Result<Self> {
        let mut ordered: Vec<LanguageCode> = Vec::new();
        for code in languages {
            if !ordered.contains(&code) {
                ordered.push(code);
            }
        }

        if ordered.is_empty() {
            bail!("Supported language list is empty");
        }
        if !ordered.contains(&fallback) {
            bail!(
                "Fallback language '{}' is not in the supported set ({})",
                fallback,
                ordered
                    .iter()
                    .map(|c| c.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }

        Ok(Self {
            languages: ordered,
            fallback,
        })
    }

    /// The language used when a requested language or key is unavailable.
    pub fn fallback(&self) -> &LanguageCode {
        &self.fallback
    }

    /// Check whether a code is served.
    pub fn contains(&self, code: &LanguageCode) -> bool {
        self.languages.contains(code)
    }

    /// All supported codes in configured order.
    pub fn iter(&self) -> impl Iterator<Item = &LanguageCode> {
        self.languages.iter()
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}
