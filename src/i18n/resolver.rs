//! Language resolver: decides, applies and persists the active language.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::context::PageContext;
use crate::dom::Dom;
use crate::error::{PageError, PageResult};
use crate::i18n::apply::{apply_translations, update_language_selector};
use crate::i18n::{LanguageCode, SupportedLanguageSet, TranslationStore};
use crate::storage::{KeyValueStore, PREFERRED_LANGUAGE_KEY};

/// Optional collaborator told to refresh page content after a language switch.
pub trait ContentRefresh: Send + Sync {
    fn refresh(&self, language: &LanguageCode);
}

/// Pick the initial language.
///
/// Priority, first match wins:
/// 1. the stored preference, if it is supported
/// 2. the first browser preference whose primary subtag is supported
/// 3. the fallback language
pub fn resolve_initial_language(
    stored: Option<&str>,
    browser_preferences: &[LanguageCode],
    languages: &SupportedLanguageSet,
) -> LanguageCode {
    if let Some(stored) = stored.and_then(LanguageCode::parse) {
        if languages.contains(&stored) {
            return stored;
        }
        debug!("Ignoring stored language '{}': not supported", stored);
    }

    browser_preferences
        .iter()
        .map(LanguageCode::primary_subtag)
        .find(|primary| languages.contains(primary))
        .unwrap_or_else(|| languages.fallback().clone())
}

pub struct LanguageResolver {
    context: Arc<PageContext>,
    store: TranslationStore,
    preferences: Arc<dyn KeyValueStore>,
    refresh: Option<Arc<dyn ContentRefresh>>,
    // Set once a language has been applied to the page
    applied: AtomicBool,
}

impl LanguageResolver {
    pub fn new(
        context: Arc<PageContext>,
        store: TranslationStore,
        preferences: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            context,
            store,
            preferences,
            refresh: None,
            applied: AtomicBool::new(false),
        }
    }

    /// Register the collaborator notified after each language switch.
    pub fn with_refresh(mut self, refresh: Arc<dyn ContentRefresh>) -> Self {
        self.refresh = Some(refresh);
        self
    }

    pub fn current_language(&self) -> LanguageCode {
        self.context.active_language()
    }

    /// Resolve the initial language and apply it to the page.
    ///
    /// Initialization does not persist the choice or notify listeners; only
    /// explicit switches do.
    pub async fn initialize(
        &self,
        browser_preferences: &[LanguageCode],
        dom: &mut dyn Dom,
    ) -> LanguageCode {
        let stored = self.preferences.get(PREFERRED_LANGUAGE_KEY);
        let language =
            resolve_initial_language(stored.as_deref(), browser_preferences, self.context.languages());
        info!("Initial language resolved to '{}'", language);

        self.activate(&language, dom).await;
        self.applied.store(true, Ordering::Release);
        language
    }

    /// Switch the active language.
    ///
    /// Loads the bundle, applies translations and selector state, notifies the
    /// refresh collaborator and `languageChanged` subscribers, then persists
    /// the preference. Calling it again with the language already on the page
    /// only re-applies the DOM state; nobody is notified a second time.
    pub async fn set_language(&self, language: &LanguageCode, dom: &mut dyn Dom) -> PageResult<()> {
        if !self.context.languages().contains(language) {
            return Err(PageError::UnsupportedLanguage(language.to_string()));
        }

        let unchanged =
            self.applied.load(Ordering::Acquire) && *language == self.context.active_language();

        self.activate(language, dom).await;
        self.applied.store(true, Ordering::Release);

        if unchanged {
            debug!("Language '{}' already active, skipping notifications", language);
        } else {
            if let Some(refresh) = &self.refresh {
                refresh.refresh(language);
            }
            self.context.events().emit(language);
        }

        // A lost preference is not worth failing the switch for
        if let Err(e) = self.preferences.set(PREFERRED_LANGUAGE_KEY, language.as_str()) {
            warn!("Failed to persist language preference: {}", e);
        }

        info!("Language switched to '{}'", language);
        Ok(())
    }

    /// Re-apply the active language's translations to the page.
    pub fn apply_translations(&self, dom: &mut dyn Dom) -> usize {
        let active = self.context.active_language();
        let active_bundle = self.context.bundle(&active);
        let fallback_bundle = self.context.bundle(self.context.fallback_language());
        apply_translations(dom, active_bundle.as_deref(), fallback_bundle.as_deref())
    }

    async fn activate(&self, language: &LanguageCode, dom: &mut dyn Dom) {
        // Key-level fallback needs the fallback bundle even when the requested one loads
        self.store.load_bundle(self.context.fallback_language()).await;
        self.store.load_bundle(language).await;

        self.context.set_active_language(language.clone());

        let applied = self.apply_translations(dom);
        debug!("Applied {} translation(s) for '{}'", applied, language);

        update_language_selector(dom, language);
        dom.set_document_language(language);
    }
}
