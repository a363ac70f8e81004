//! Content identifiers: which document a page displays.

use std::fmt;
use std::sync::OnceLock;

use anyhow::Result;
use regex::Regex;
use reqwest::Url;

/// Query parameter that names the document explicitly.
pub const CONTENT_QUERY_PARAM: &str = "content";

/// Page that displays a document named by the `content` query parameter.
pub const PAGE_TEMPLATE: &str = "page-template";

/// Path substrings that identify a document when no query parameter is given.
const KNOWN_PATHS: &[(&str, &str)] = &[
    ("handbook", "handbook"),
    ("credits", "credits"),
    ("privacy", "privacy"),
];

fn slug_pattern() -> &'static Regex {
    static SLUG: OnceLock<Regex> = OnceLock::new();
    SLUG.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9_-]*$").expect("valid slug regex"))
}

/// Logical name of a document (e.g. "handbook").
///
/// Only lowercase slugs are valid, so an identifier can always be embedded
/// in a source path without escaping out of it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentIdentifier(String);

impl ContentIdentifier {
    pub fn parse(value: &str) -> Option<ContentIdentifier> {
        let value = value.trim();
        if slug_pattern().is_match(value) {
            Some(ContentIdentifier(value.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolve the identifier for a page URL.
///
/// The `content` query parameter wins when it holds a valid slug; otherwise the
/// path is matched against the known path substrings.
pub fn resolve_identifier(url: &Url) -> Option<ContentIdentifier> {
    let from_query = url
        .query_pairs()
        .find(|(name, _)| name == CONTENT_QUERY_PARAM)
        .and_then(|(_, value)| ContentIdentifier::parse(&value));
    if from_query.is_some() {
        return from_query;
    }

    let path = url.path();
    KNOWN_PATHS
        .iter()
        .find(|(needle, _)| path.contains(needle))
        .and_then(|(_, identifier)| ContentIdentifier::parse(identifier))
}

/// Build the same-site link that opens `identifier` on the content page.
pub fn content_link(base: &Url, identifier: &ContentIdentifier) -> Result<Url> {
    let mut url = base.join(PAGE_TEMPLATE)?;
    url.query_pairs_mut()
        .clear()
        .append_pair(CONTENT_QUERY_PARAM, identifier.as_str());
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    // ==================== parse Tests ====================

    #[test]
    fn test_parse_valid_slugs() {
        assert!(ContentIdentifier::parse("handbook").is_some());
        assert!(ContentIdentifier::parse("getting-started_2").is_some());
    }

    #[test]
    fn test_parse_rejects_traversal_and_case() {
        assert!(ContentIdentifier::parse("../secrets").is_none());
        assert!(ContentIdentifier::parse("a/b").is_none());
        assert!(ContentIdentifier::parse("Handbook").is_none());
        assert!(ContentIdentifier::parse("").is_none());
        assert!(ContentIdentifier::parse("-x").is_none());
    }

    // ==================== resolve_identifier Tests ====================

    #[test]
    fn test_query_parameter_takes_precedence() {
        let id = resolve_identifier(&url("https://docs.example.com/handbook?content=credits"));
        assert_eq!(id.unwrap().as_str(), "credits");
    }

    #[test]
    fn test_query_parameter_need_not_be_a_known_path() {
        let id = resolve_identifier(&url("https://docs.example.com/page-template?content=roadmap"));
        assert_eq!(id.unwrap().as_str(), "roadmap");
    }

    #[test]
    fn test_path_substring_match() {
        let id = resolve_identifier(&url("https://docs.example.com/docs/handbook.html"));
        assert_eq!(id.unwrap().as_str(), "handbook");
    }

    #[test]
    fn test_invalid_query_falls_through_to_path() {
        let id = resolve_identifier(&url("https://docs.example.com/credits?content=../x"));
        assert_eq!(id.unwrap().as_str(), "credits");
    }

    #[test]
    fn test_unknown_url_resolves_nothing() {
        assert!(resolve_identifier(&url("https://docs.example.com/about")).is_none());
        assert!(resolve_identifier(&url("https://docs.example.com/page-template")).is_none());
    }

    // ==================== content_link Tests ====================

    #[test]
    fn test_content_link() {
        let base = url("https://docs.example.com/site/");
        let id = ContentIdentifier::parse("handbook").unwrap();
        let link = content_link(&base, &id).unwrap();
        assert_eq!(
            link.as_str(),
            "https://docs.example.com/site/page-template?content=handbook"
        );
        assert_eq!(resolve_identifier(&link), Some(id));
    }
}
