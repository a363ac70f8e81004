//! Host page: wires the language resolver and content fetcher together.
//!
//! Initialization order matters: the resolver runs first so the content
//! fetcher sees the resolved active language. After a switch, the page reacts
//! to the `languageChanged` notification by running a fresh content fetcher.

use std::sync::Arc;

use anyhow::{bail, Result};
use reqwest::Url;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{debug, info};

use crate::config::Config;
use crate::content::{
    content_link, CommonMarkRenderer, ContentFetcher, ContentIdentifier, MarkdownRenderer,
    MetadataTable, ViewState,
};
use crate::context::PageContext;
use crate::dom::Dom;
use crate::error::PageResult;
use crate::events::LanguageChanged;
use crate::i18n::{ContentRefresh, LanguageCode, LanguageResolver, TranslationStore};
use crate::source::HttpSource;
use crate::storage::KeyValueStore;

pub struct Page<D: Dom> {
    context: Arc<PageContext>,
    resolver: LanguageResolver,
    source: HttpSource,
    renderer: Arc<dyn MarkdownRenderer>,
    metadata: MetadataTable,
    page_url: Url,
    refresh_on_switch: bool,
    language_changes: broadcast::Receiver<LanguageChanged>,
    fetcher: Option<ContentFetcher>,
    dom: D,
}

impl<D: Dom> Page<D> {
    pub fn new(
        config: &Config,
        source: HttpSource,
        preferences: Arc<dyn KeyValueStore>,
        page_url: Url,
        dom: D,
    ) -> Result<Self> {
        let metadata = MetadataTable::builtin(&config.site_name, &config.site_description);
        let missing = metadata.missing_for(&config.fallback_language);
        if !missing.is_empty() {
            bail!(
                "Fallback language '{}' lacks page metadata for: {}",
                config.fallback_language,
                missing.join(", ")
            );
        }

        let context = Arc::new(PageContext::new(config.supported_set()?));
        let store = TranslationStore::new(context.clone(), source.clone());
        let resolver = LanguageResolver::new(context.clone(), store, preferences);
        let language_changes = context.events().subscribe();

        Ok(Self {
            context,
            resolver,
            source,
            renderer: Arc::new(CommonMarkRenderer::new()),
            metadata,
            page_url,
            refresh_on_switch: config.refresh_content_on_switch,
            language_changes,
            fetcher: None,
            dom,
        })
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn MarkdownRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    /// Register an extra collaborator notified after each language switch.
    pub fn with_refresh(mut self, refresh: Arc<dyn ContentRefresh>) -> Self {
        self.resolver = self.resolver.with_refresh(refresh);
        self
    }

    pub fn context(&self) -> &Arc<PageContext> {
        &self.context
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut D {
        &mut self.dom
    }

    pub fn current_language(&self) -> LanguageCode {
        self.resolver.current_language()
    }

    pub fn view_state(&self) -> ViewState {
        self.fetcher
            .as_ref()
            .map(ContentFetcher::state)
            .unwrap_or(ViewState::Idle)
    }

    /// Link to another document on this site's content page.
    pub fn content_link(&self, identifier: &ContentIdentifier) -> Result<Url> {
        content_link(self.source.base_url(), identifier)
    }

    /// Resolve and apply the language, then load the requested document.
    pub async fn init(&mut self, browser_preferences: &[LanguageCode]) -> ViewState {
        let language = self.resolver.initialize(browser_preferences, &mut self.dom).await;
        info!("Page initialized in '{}'", language);
        self.load_content().await
    }

    /// Re-apply the active language, e.g. after a toggle changed state.
    pub fn reapply_translations(&mut self) -> usize {
        self.resolver.apply_translations(&mut self.dom)
    }

    /// Switch language and, if configured, redisplay the document in it.
    pub async fn switch_language(&mut self, language: &LanguageCode) -> PageResult<ViewState> {
        self.resolver.set_language(language, &mut self.dom).await?;

        let mut latest = None;
        loop {
            match self.language_changes.try_recv() {
                Ok(event) => latest = Some(event.language),
                Err(TryRecvError::Lagged(skipped)) => {
                    debug!("Skipped {} stale language notification(s)", skipped)
                }
                Err(_) => break,
            }
        }

        if let Some(changed) = latest {
            if self.refresh_on_switch {
                debug!("Refreshing content for '{}'", changed);
                return Ok(self.load_content().await);
            }
        }
        Ok(self.view_state())
    }

    async fn load_content(&mut self) -> ViewState {
        let mut fetcher = ContentFetcher::new(
            self.context.clone(),
            self.source.clone(),
            self.renderer.clone(),
            self.metadata.clone(),
            &self.page_url,
        );
        let state = fetcher.load(&mut self.dom).await;
        self.fetcher = Some(fetcher);
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{MemoryDom, Region};
    use crate::error::PageError;
    use crate::storage::MemoryStore;
    use std::path::PathBuf;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn code(s: &str) -> LanguageCode {
        LanguageCode::parse(s).unwrap()
    }

    fn test_config(base_url: &str) -> Config {
        Config {
            site_base_url: base_url.to_string(),
            http_timeout: None,
            supported_languages: vec![code("en"), code("pt")],
            fallback_language: code("en"),
            preferences_file: PathBuf::from("unused.json"),
            site_name: "Docs".to_string(),
            site_description: "Project docs".to_string(),
            refresh_content_on_switch: true,
        }
    }

    fn test_page(server: &MockServer, page_url: &str) -> Page<MemoryDom> {
        let config = test_config(&server.uri());
        let source = HttpSource::new(reqwest::Client::new(), &server.uri()).unwrap();
        let dom = MemoryDom::page_template(&config.supported_set().unwrap());
        Page::new(
            &config,
            source,
            Arc::new(MemoryStore::new()),
            Url::parse(page_url).unwrap(),
            dom,
        )
        .unwrap()
    }

    async fn mount(server: &MockServer, route: &str, body: &str) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(server)
            .await;
    }

    struct RejectingRenderer;

    impl MarkdownRenderer for RejectingRenderer {
        fn render(&self, _markdown: &str) -> PageResult<String> {
            Err(PageError::Render("renderer offline".to_string()))
        }
    }

    #[test]
    fn test_new_rejects_fallback_without_metadata() {
        let mut config = test_config("http://localhost:8080/");
        config.fallback_language = code("pt");
        let source = HttpSource::new(reqwest::Client::new(), &config.site_base_url).unwrap();
        let dom = MemoryDom::page_template(&config.supported_set().unwrap());

        let err = Page::new(
            &config,
            source,
            Arc::new(MemoryStore::new()),
            Url::parse("https://docs.example.com/").unwrap(),
            dom,
        )
        .err()
        .expect("pt lacks the credits description");

        assert!(err.to_string().contains("credits"));
    }

    #[tokio::test]
    async fn test_view_state_idle_before_init() {
        let server = MockServer::start().await;
        let page = test_page(&server, "https://docs.example.com/?content=handbook");
        assert_eq!(page.view_state(), ViewState::Idle);
    }

    #[tokio::test]
    async fn test_switch_language_reloads_content() {
        let server = MockServer::start().await;
        mount(&server, "/translations/en.json", r#"{"nav-home": "Home"}"#).await;
        mount(&server, "/translations/pt.json", r#"{"nav-home": "Início"}"#).await;
        mount(&server, "/content/en/handbook.md", "# Handbook").await;
        mount(&server, "/content/pt/handbook.md", "# Manual").await;

        let mut page = test_page(&server, "https://docs.example.com/?content=handbook");
        assert_eq!(page.init(&[]).await, ViewState::Content);
        assert!(page.dom().region(Region::Content).unwrap().text().contains("Handbook"));

        let state = page.switch_language(&code("pt")).await.unwrap();

        assert_eq!(state, ViewState::Content);
        assert!(page.dom().region(Region::Content).unwrap().text().contains("Manual"));
        assert_eq!(page.dom().title(), "Manual");
    }

    #[tokio::test]
    async fn test_custom_renderer_failure_shows_error() {
        let server = MockServer::start().await;
        mount(&server, "/content/en/handbook.md", "# Handbook").await;

        let mut page = test_page(&server, "https://docs.example.com/?content=handbook")
            .with_renderer(Arc::new(RejectingRenderer));

        assert_eq!(page.init(&[]).await, ViewState::Error);
        assert!(page.dom().is_region_visible(Region::Error));
        assert_eq!(page.dom().region(Region::Content).unwrap().text(), "");
    }

    #[tokio::test]
    async fn test_content_link_uses_site_base() {
        let server = MockServer::start().await;
        let page = test_page(&server, "https://docs.example.com/");
        let link = page
            .content_link(&ContentIdentifier::parse("credits").unwrap())
            .unwrap();
        assert_eq!(
            link.as_str(),
            format!("{}/page-template?content=credits", server.uri())
        );
    }
}
