//! Language codes: normalized locale identifiers and browser preference parsing.
//!
//! A `LanguageCode` is the short identifier the site serves content under
//! (e.g. "en", "pt"). Browser preferences arrive as full tags ("pt-BR") and
//! are matched on their primary subtag.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A normalized language code.
///
/// Codes are stored trimmed and lowercased, with `_` region separators
/// rewritten to `-` so that "pt_BR" and "pt-BR" compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Create a language code from any locale-ish string.
    ///
    /// # Arguments
    /// * `code` - A language code or full tag (e.g., "en", "pt-BR", "pt_br")
    ///
    /// # Returns
    /// * `Some(LanguageCode)` with the normalized form
    /// * `None` if the input is empty or contains characters that cannot
    ///   appear in a language tag
    pub fn parse(code: &str) -> Option<LanguageCode> {
        let normalized = code.trim().replace('_', "-").to_ascii_lowercase();
        if normalized.is_empty()
            || normalized.starts_with('-')
            || !normalized
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return None;
        }
        Some(LanguageCode(normalized))
    }

    /// Get the normalized code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The primary subtag: everything before the first region/script suffix.
    ///
    /// "pt-br" yields "pt"; a bare "en" yields itself.
    pub fn primary_subtag(&self) -> LanguageCode {
        match self.0.split_once('-') {
            Some((primary, _)) => LanguageCode(primary.to_string()),
            None => self.clone(),
        }
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LanguageCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Parse an HTTP `Accept-Language` header into an ordered preference list.
///
/// Entries are sorted by descending quality; entries with equal quality keep
/// their header order. Wildcards, `q=0` entries and malformed tags are dropped.
///
/// ```ignore
/// let prefs = parse_accept_language("fr-FR,pt-BR;q=0.9,en-US;q=0.8");
/// assert_eq!(prefs[1].as_str(), "pt-br");
/// ```
pub fn parse_accept_language(header: &str) -> Vec<LanguageCode> {
    let mut weighted: Vec<(f32, LanguageCode)> = header
        .split(',')
        .filter_map(|entry| {
            let mut parts = entry.split(';');
            let tag = parts.next()?.trim();
            if tag == "*" {
                return None;
            }

            let quality = parts
                .filter_map(|p| p.trim().strip_prefix("q="))
                .next()
                .map(|q| q.trim().parse::<f32>().unwrap_or(0.0))
                .unwrap_or(1.0);

            if quality <= 0.0 {
                return None;
            }
            LanguageCode::parse(tag).map(|code| (quality, code))
        })
        .collect();

    // sort_by is stable, so equal weights keep header order
    weighted.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    weighted.into_iter().map(|(_, code)| code).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== parse Tests ====================

    #[test]
    fn test_parse_simple_code() {
        let code = LanguageCode::parse("en").expect("Should parse");
        assert_eq!(code.as_str(), "en");
    }

    #[test]
    fn test_parse_normalizes_case_and_separator() {
        let a = LanguageCode::parse("pt_BR").expect("Should parse");
        let b = LanguageCode::parse(" pt-br ").expect("Should parse");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "pt-br");
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(LanguageCode::parse("").is_none());
        assert!(LanguageCode::parse("   ").is_none());
    }

    #[test]
    fn test_parse_rejects_path_characters() {
        assert!(LanguageCode::parse("../en").is_none());
        assert!(LanguageCode::parse("en/x").is_none());
        assert!(LanguageCode::parse("-en").is_none());
    }

    // ==================== primary_subtag Tests ====================

    #[test]
    fn test_primary_subtag_strips_region() {
        let code = LanguageCode::parse("fr-FR").unwrap();
        assert_eq!(code.primary_subtag().as_str(), "fr");
    }

    #[test]
    fn test_primary_subtag_of_bare_code() {
        let code = LanguageCode::parse("en").unwrap();
        assert_eq!(code.primary_subtag(), code);
    }

    #[test]
    fn test_primary_subtag_with_script() {
        let code = LanguageCode::parse("zh-Hant-TW").unwrap();
        assert_eq!(code.primary_subtag().as_str(), "zh");
    }

    // ==================== parse_accept_language Tests ====================

    #[test]
    fn test_accept_language_keeps_order_without_weights() {
        let prefs = parse_accept_language("fr-FR,pt-BR,en-US");
        let codes: Vec<&str> = prefs.iter().map(|c| c.as_str()).collect();
        assert_eq!(codes, vec!["fr-fr", "pt-br", "en-us"]);
    }

    #[test]
    fn test_accept_language_sorts_by_quality() {
        let prefs = parse_accept_language("en;q=0.5, pt;q=0.9, es");
        let codes: Vec<&str> = prefs.iter().map(|c| c.as_str()).collect();
        assert_eq!(codes, vec!["es", "pt", "en"]);
    }

    #[test]
    fn test_accept_language_drops_wildcard_and_zero_quality() {
        let prefs = parse_accept_language("*, de;q=0, pt");
        assert_eq!(prefs.len(), 1);
        assert_eq!(prefs[0].as_str(), "pt");
    }

    #[test]
    fn test_accept_language_empty_header() {
        assert!(parse_accept_language("").is_empty());
    }

    // ==================== Trait Tests ====================

    #[test]
    fn test_display_matches_as_str() {
        let code = LanguageCode::parse("PT").unwrap();
        assert_eq!(code.to_string(), "pt");
    }

    #[test]
    fn test_serde_transparent() {
        let code = LanguageCode::parse("es").unwrap();
        let json = serde_json::to_string(&code).expect("Should serialize");
        assert_eq!(json, "\"es\"");
        let back: LanguageCode = serde_json::from_str(&json).expect("Should deserialize");
        assert_eq!(back, code);
    }
}
