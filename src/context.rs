//! Shared page state.
//!
//! One `PageContext` exists per page load and is handed to both the language
//! resolver and the content fetcher. Each field has a single writer:
//!
//! - the bundle cache is written only by `TranslationStore`
//! - the active language is written only by `LanguageResolver`
//!
//! Bundles are stored behind `Arc` and replaced whole, so readers always see
//! either the old or the new bundle, never a partially filled one.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::events::LanguageEvents;
use crate::i18n::{LanguageCode, SupportedLanguageSet, TranslationBundle};

#[derive(Debug)]
pub struct PageContext {
    languages: SupportedLanguageSet,
    active: RwLock<LanguageCode>,
    bundles: RwLock<HashMap<LanguageCode, Arc<TranslationBundle>>>,
    events: LanguageEvents,
}

impl PageContext {
    /// Create a context whose active language starts as the fallback.
    pub fn new(languages: SupportedLanguageSet) -> Self {
        let active = languages.fallback().clone();
        Self {
            languages,
            active: RwLock::new(active),
            bundles: RwLock::new(HashMap::new()),
            events: LanguageEvents::new(),
        }
    }

    pub fn languages(&self) -> &SupportedLanguageSet {
        &self.languages
    }

    pub fn fallback_language(&self) -> &LanguageCode {
        self.languages.fallback()
    }

    pub fn events(&self) -> &LanguageEvents {
        &self.events
    }

    pub fn active_language(&self) -> LanguageCode {
        self.active.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub(crate) fn set_active_language(&self, language: LanguageCode) {
        *self.active.write().unwrap_or_else(|e| e.into_inner()) = language;
    }

    /// The cached bundle for a language, if one was loaded successfully.
    pub fn bundle(&self, language: &LanguageCode) -> Option<Arc<TranslationBundle>> {
        self.bundles
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(language)
            .cloned()
    }

    pub(crate) fn insert_bundle(&self, language: LanguageCode, bundle: Arc<TranslationBundle>) {
        self.bundles
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(language, bundle);
    }

    pub fn cached_languages(&self) -> Vec<LanguageCode> {
        let mut codes: Vec<LanguageCode> = self
            .bundles
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .cloned()
            .collect();
        codes.sort();
        codes
    }
}
