use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::i18n::{LanguageCode, SupportedLanguageSet};

#[derive(Debug, Clone)]
pub struct Config {
    // Sources
    pub site_base_url: String,
    pub http_timeout: Option<Duration>,

    // Languages
    pub supported_languages: Vec<LanguageCode>,
    pub fallback_language: LanguageCode,

    // Persistence
    pub preferences_file: PathBuf,

    // Generic metadata
    pub site_name: String,
    pub site_description: String,

    // Behavior
    pub refresh_content_on_switch: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let supported_raw =
            std::env::var("SUPPORTED_LANGUAGES").unwrap_or_else(|_| "en,pt,es".to_string());
        let supported_languages = supported_raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                LanguageCode::parse(s)
                    .with_context(|| format!("Invalid language code in SUPPORTED_LANGUAGES: '{}'", s))
            })
            .collect::<Result<Vec<_>>>()?;

        let fallback_raw = std::env::var("FALLBACK_LANGUAGE").unwrap_or_else(|_| "en".to_string());
        let fallback_language = LanguageCode::parse(&fallback_raw)
            .with_context(|| format!("Invalid FALLBACK_LANGUAGE: '{}'", fallback_raw))?;

        let http_timeout = match std::env::var("HTTP_TIMEOUT_SECS") {
            Ok(v) => Some(Duration::from_secs(
                v.trim()
                    .parse()
                    .with_context(|| format!("Invalid HTTP_TIMEOUT_SECS: '{}'", v))?,
            )),
            Err(_) => None,
        };

        let config = Self {
            // Sources
            site_base_url: std::env::var("SITE_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080/".to_string()),
            http_timeout,

            // Languages
            supported_languages,
            fallback_language,

            // Persistence
            preferences_file: std::env::var("PREFERENCES_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".docs-locale/preferences.json")),

            // Generic metadata
            site_name: std::env::var("SITE_NAME").unwrap_or_else(|_| "Documentation".to_string()),
            site_description: std::env::var("SITE_DESCRIPTION")
                .unwrap_or_else(|_| "Project documentation".to_string()),

            // Behavior
            refresh_content_on_switch: std::env::var("REFRESH_CONTENT_ON_SWITCH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        };

        // Fail at startup rather than on first use
        config.supported_set()?;

        Ok(config)
    }

    /// Build the supported language set, validating that it contains the fallback.
    pub fn supported_set(&self) -> Result<SupportedLanguageSet> {
        SupportedLanguageSet::new(
            self.supported_languages.iter().cloned(),
            self.fallback_language.clone(),
        )
    }
}
