//! HTTP access to the site's translation bundles and markdown documents.
//!
//! - `GET {base}/translations/{language}.json` returns a flat key/string mapping
//! - `GET {base}/content/{language}/{identifier}.md` returns raw markdown
//!
//! A non-success status is a failure just like a transport error. No retries
//! happen here; fallback decisions belong to the callers.

use anyhow::{Context, Result};
use reqwest::Url;
use tracing::debug;

use crate::config::Config;
use crate::content::ContentIdentifier;
use crate::error::{PageError, PageResult};
use crate::i18n::{LanguageCode, TranslationBundle};

/// Client for the translation and document sources of one site.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpSource {
    /// Create a source rooted at `base_url`.
    ///
    /// A trailing slash is added if missing so relative joins stay under the base path.
    pub fn new(client: reqwest::Client, base_url: &str) -> Result<Self> {
        let mut base = base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).with_context(|| format!("Invalid base URL: {}", base))?;
        Ok(Self { client, base_url })
    }

    /// Create a source from configuration, building the HTTP client it describes.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.http_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build HTTP client")?;
        Self::new(client, &config.site_base_url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn translation_url(&self, language: &LanguageCode) -> Result<Url> {
        Ok(self
            .base_url
            .join(&format!("translations/{}.json", language))?)
    }

    fn document_url(
        &self,
        identifier: &ContentIdentifier,
        language: &LanguageCode,
    ) -> Result<Url> {
        Ok(self
            .base_url
            .join(&format!("content/{}/{}.md", language, identifier))?)
    }

    /// Fetch and parse one language's translation bundle.
    ///
    /// Every failure (transport, status, body, JSON) maps to `PageError::BundleLoad`.
    pub async fn fetch_bundle(&self, language: &LanguageCode) -> PageResult<TranslationBundle> {
        let load_error = |reason: String| PageError::BundleLoad {
            language: language.to_string(),
            reason,
        };

        let url = self
            .translation_url(language)
            .map_err(|e| load_error(format!("invalid URL: {}", e)))?;
        debug!("Fetching translation bundle from {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| load_error(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(load_error(format!("HTTP {}", response.status())));
        }

        let body = response
            .text()
            .await
            .map_err(|e| load_error(format!("failed to read body: {}", e)))?;

        TranslationBundle::from_json(language.clone(), &body)
            .map_err(|e| load_error(format!("invalid bundle JSON: {}", e)))
    }

    /// Fetch the raw markdown for one document in one language.
    ///
    /// Every failure maps to `PageError::DocumentNotFound`.
    pub async fn fetch_markdown(
        &self,
        identifier: &ContentIdentifier,
        language: &LanguageCode,
    ) -> PageResult<String> {
        let not_found = || PageError::DocumentNotFound {
            identifier: identifier.to_string(),
            language: language.to_string(),
        };

        let url = self
            .document_url(identifier, language)
            .map_err(|_| not_found())?;
        debug!("Fetching document from {}", url);

        let response = self.client.get(url).send().await.map_err(|e| {
            debug!("Document request failed: {}", e);
            not_found()
        })?;

        if !response.status().is_success() {
            debug!("Document request returned HTTP {}", response.status());
            return Err(not_found());
        }

        response.text().await.map_err(|e| {
            debug!("Failed to read document body: {}", e);
            not_found()
        })
    }
}
