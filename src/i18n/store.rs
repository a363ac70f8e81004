//! Translation store: lazy, cached bundle loading with a fixed fallback chain.
//!
//! Loading never fails from the caller's point of view. The chain is at most
//! two steps long (requested language, then the fallback language), and if
//! both fail the caller gets an empty bundle.

use std::sync::Arc;

use tracing::{info, warn};

use crate::context::PageContext;
use crate::i18n::{LanguageCode, TranslationBundle};
use crate::source::HttpSource;

#[derive(Debug, Clone)]
pub struct TranslationStore {
    context: Arc<PageContext>,
    source: HttpSource,
}

impl TranslationStore {
    pub fn new(context: Arc<PageContext>, source: HttpSource) -> Self {
        Self { context, source }
    }

    /// Languages attempted when loading `language`, in order.
    pub fn fallback_chain(&self, language: &LanguageCode) -> Vec<LanguageCode> {
        let fallback = self.context.fallback_language();
        if language == fallback {
            vec![language.clone()]
        } else {
            vec![language.clone(), fallback.clone()]
        }
    }

    /// Load the bundle for `language`.
    ///
    /// Returns the cached bundle when present. Otherwise fetches it; on
    /// failure the fallback language's bundle is returned instead, and if that
    /// fails too an empty bundle. Failed languages are not cached, so a later
    /// call tries the network again.
    pub async fn load_bundle(&self, language: &LanguageCode) -> Arc<TranslationBundle> {
        for candidate in self.fallback_chain(language) {
            if let Some(bundle) = self.context.bundle(&candidate) {
                return bundle;
            }

            match self.source.fetch_bundle(&candidate).await {
                Ok(bundle) => {
                    info!(
                        "Loaded translation bundle for '{}' ({} keys)",
                        candidate,
                        bundle.len()
                    );
                    let bundle = Arc::new(bundle);
                    self.context.insert_bundle(candidate, bundle.clone());
                    return bundle;
                }
                Err(e) => warn!("{}", e),
            }
        }

        warn!(
            "No translation bundle available for '{}', continuing with an empty bundle",
            language
        );
        Arc::new(TranslationBundle::empty())
    }
}
