//! Static per-document, per-language page metadata.
//!
//! Titles and descriptions live in separate tables. Not every locale that has
//! a title has a description; a missing description falls back through the
//! same chain as a missing title.

use crate::content::ContentIdentifier;
use crate::i18n::LanguageCode;

type LocalizedTable = &'static [(&'static str, &'static [(&'static str, &'static str)])];

const TITLES: LocalizedTable = &[
    (
        "handbook",
        &[
            ("en", "Handbook"),
            ("pt", "Manual"),
            ("es", "Manual"),
        ],
    ),
    (
        "credits",
        &[
            ("en", "Credits"),
            ("pt", "Créditos"),
            ("es", "Créditos"),
        ],
    ),
    (
        "privacy",
        &[
            ("en", "Privacy Policy"),
            ("pt", "Política de Privacidade"),
        ],
    ),
];

const DESCRIPTIONS: LocalizedTable = &[
    (
        "handbook",
        &[
            ("en", "Everything you need to know to get started and get around."),
            ("pt", "Tudo o que você precisa saber para começar e se orientar."),
        ],
    ),
    (
        "credits",
        &[
            ("en", "The people and projects that made this possible."),
            ("es", "Las personas y proyectos que lo hicieron posible."),
        ],
    ),
    (
        "privacy",
        &[
            ("en", "How we collect, use and protect your data."),
            ("pt", "Como coletamos, usamos e protegemos seus dados."),
        ],
    ),
];

/// Title and description shown for a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
}

fn lookup(table: LocalizedTable, identifier: &str, language: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(id, _)| *id == identifier)
        .and_then(|(_, entries)| entries.iter().find(|(lang, _)| *lang == language))
        .map(|(_, value)| *value)
}

/// Read-only metadata lookup with site-wide defaults.
#[derive(Debug, Clone)]
pub struct MetadataTable {
    titles: LocalizedTable,
    descriptions: LocalizedTable,
    site_name: String,
    site_description: String,
}

impl MetadataTable {
    /// The built-in table with the given generic site name and description.
    pub fn builtin(site_name: &str, site_description: &str) -> Self {
        Self {
            titles: TITLES,
            descriptions: DESCRIPTIONS,
            site_name: site_name.to_string(),
            site_description: site_description.to_string(),
        }
    }

    pub fn title(&self, identifier: &ContentIdentifier, language: &LanguageCode) -> Option<&'static str> {
        lookup(self.titles, identifier.as_str(), language.as_str())
    }

    pub fn description(
        &self,
        identifier: &ContentIdentifier,
        language: &LanguageCode,
    ) -> Option<&'static str> {
        lookup(self.descriptions, identifier.as_str(), language.as_str())
    }

    /// Identifiers lacking a title or a description in `language`.
    ///
    /// The fallback language must come back empty here, otherwise pages in it
    /// would silently show the generic site values.
    pub fn missing_for(&self, language: &LanguageCode) -> Vec<&'static str> {
        let mut missing = Vec::new();
        for (identifier, _) in self.titles.iter().chain(self.descriptions.iter()) {
            let covered = lookup(self.titles, identifier, language.as_str()).is_some()
                && lookup(self.descriptions, identifier, language.as_str()).is_some();
            if !covered && !missing.contains(identifier) {
                missing.push(*identifier);
            }
        }
        missing
    }

    /// Resolve metadata: identifier + language, then identifier + fallback
    /// language, then the generic site values.
    pub fn resolve(
        &self,
        identifier: &ContentIdentifier,
        language: &LanguageCode,
        fallback: &LanguageCode,
    ) -> PageMetadata {
        let title = self
            .title(identifier, language)
            .or_else(|| self.title(identifier, fallback))
            .map(str::to_string)
            .unwrap_or_else(|| self.site_name.clone());

        let description = self
            .description(identifier, language)
            .or_else(|| self.description(identifier, fallback))
            .map(str::to_string)
            .unwrap_or_else(|| self.site_description.clone());

        PageMetadata { title, description }
    }
}
