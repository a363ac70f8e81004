//! Content fetcher: loads, renders and displays one localized document.
//!
//! A fetcher lives for one page load and walks its state machine once:
//! `Idle -> Loading -> {Content, Error}` (or `Idle -> Error` when no
//! identifier could be resolved). Showing a different document or language
//! means building a new fetcher.

use std::sync::Arc;

use reqwest::Url;
use tracing::{error, info, warn};

use crate::content::{resolve_identifier, ContentIdentifier, MarkdownRenderer, MetadataTable};
use crate::context::PageContext;
use crate::dom::{Dom, MetaTag, Region};
use crate::error::{PageError, PageResult};
use crate::i18n::LanguageCode;
use crate::source::HttpSource;

/// Which region of the page is on display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Idle,
    Loading,
    Content,
    Error,
}

/// A fetched document and the language it was actually served in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedDocument {
    pub text: String,
    pub language: LanguageCode,
}

pub struct ContentFetcher {
    context: Arc<PageContext>,
    source: HttpSource,
    renderer: Arc<dyn MarkdownRenderer>,
    metadata: MetadataTable,
    identifier: Option<ContentIdentifier>,
    state: ViewState,
}

impl ContentFetcher {
    /// Create a fetcher for the page at `page_url`, resolving its identifier once.
    pub fn new(
        context: Arc<PageContext>,
        source: HttpSource,
        renderer: Arc<dyn MarkdownRenderer>,
        metadata: MetadataTable,
        page_url: &Url,
    ) -> Self {
        let identifier = resolve_identifier(page_url);
        Self {
            context,
            source,
            renderer,
            metadata,
            identifier,
            state: ViewState::Idle,
        }
    }

    pub fn identifier(&self) -> Option<&ContentIdentifier> {
        self.identifier.as_ref()
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    /// Fetch `identifier` in `language`, retrying once in the fallback language.
    ///
    /// The retry only happens when `language` is not already the fallback.
    /// If both attempts fail the error names the originally requested language.
    pub async fn fetch_document(
        &self,
        identifier: &ContentIdentifier,
        language: &LanguageCode,
    ) -> PageResult<FetchedDocument> {
        match self.source.fetch_markdown(identifier, language).await {
            Ok(text) => {
                return Ok(FetchedDocument {
                    text,
                    language: language.clone(),
                })
            }
            Err(e) => warn!("{}", e),
        }

        let fallback = self.context.fallback_language();
        if language == fallback {
            return Err(PageError::DocumentNotFound {
                identifier: identifier.to_string(),
                language: language.to_string(),
            });
        }

        info!(
            "Document '{}' unavailable in '{}', trying '{}'",
            identifier, language, fallback
        );
        match self.source.fetch_markdown(identifier, fallback).await {
            Ok(text) => Ok(FetchedDocument {
                text,
                language: fallback.clone(),
            }),
            Err(e) => {
                warn!("{}", e);
                Err(PageError::DocumentNotFound {
                    identifier: identifier.to_string(),
                    language: language.to_string(),
                })
            }
        }
    }

    /// Run the render pipeline for the active language.
    ///
    /// Returns the final state. Calling this on a fetcher that already ran
    /// does nothing and returns the state it ended in.
    pub async fn load(&mut self, dom: &mut dyn Dom) -> ViewState {
        if self.state != ViewState::Idle {
            warn!("Content fetcher already ran (state {:?}), ignoring", self.state);
            return self.state;
        }

        let identifier = match self.identifier.clone() {
            Some(identifier) => identifier,
            None => {
                error!("{}", PageError::UnknownContentIdentifier);
                self.show_error(dom);
                return self.state;
            }
        };

        self.state = ViewState::Loading;
        dom.set_region_visible(Region::Loading, true);
        dom.set_region_visible(Region::Content, false);
        dom.set_region_visible(Region::Error, false);

        let language = self.context.active_language();
        match self.fetch_and_render(&identifier, &language).await {
            Ok(markup) => {
                dom.set_region_markup(Region::Content, &markup);
                self.update_metadata(dom, &identifier, &language);

                dom.set_region_visible(Region::Loading, false);
                dom.set_region_visible(Region::Content, true);
                dom.scroll_to_top();
                self.state = ViewState::Content;
                info!("Displayed '{}' for language '{}'", identifier, language);
            }
            Err(e) => {
                error!("Failed to display '{}': {}", identifier, e);
                self.show_error(dom);
            }
        }

        self.state
    }

    async fn fetch_and_render(
        &self,
        identifier: &ContentIdentifier,
        language: &LanguageCode,
    ) -> PageResult<String> {
        let document = self.fetch_document(identifier, language).await?;
        self.renderer.render(&document.text)
    }

    fn update_metadata(&self, dom: &mut dyn Dom, identifier: &ContentIdentifier, language: &LanguageCode) {
        let meta = self
            .metadata
            .resolve(identifier, language, self.context.fallback_language());

        dom.set_title(&meta.title);
        dom.set_meta(MetaTag::Description, &meta.description);
        dom.set_meta(MetaTag::OgTitle, &meta.title);
        dom.set_meta(MetaTag::OgDescription, &meta.description);
        dom.set_meta(MetaTag::OgLocale, language.as_str());
        dom.set_meta(MetaTag::TwitterTitle, &meta.title);
        dom.set_meta(MetaTag::TwitterDescription, &meta.description);
    }

    fn show_error(&mut self, dom: &mut dyn Dom) {
        dom.set_region_visible(Region::Loading, false);
        dom.set_region_visible(Region::Content, false);
        dom.set_region_visible(Region::Error, true);
        self.state = ViewState::Error;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::CommonMarkRenderer;
    use crate::dom::MemoryDom;
    use crate::i18n::SupportedLanguageSet;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    // ==================== Helper Functions ====================

    fn code(s: &str) -> LanguageCode {
        LanguageCode::parse(s).unwrap()
    }

    fn context(active: &str) -> Arc<PageContext> {
        let languages = SupportedLanguageSet::new(
            vec![code("en"), code("pt"), code("es"), code("de")],
            code("en"),
        )
        .unwrap();
        let context = Arc::new(PageContext::new(languages));
        context.set_active_language(code(active));
        context
    }

    fn fetcher(server_uri: &str, active: &str, page_url: &str) -> ContentFetcher {
        fetcher_with_renderer(server_uri, active, page_url, Arc::new(CommonMarkRenderer::new()))
    }

    fn fetcher_with_renderer(
        server_uri: &str,
        active: &str,
        page_url: &str,
        renderer: Arc<dyn MarkdownRenderer>,
    ) -> ContentFetcher {
        let source = HttpSource::new(reqwest::Client::new(), server_uri).unwrap();
        ContentFetcher::new(
            context(active),
            source,
            renderer,
            MetadataTable::builtin("Docs", "Project docs"),
            &Url::parse(page_url).unwrap(),
        )
    }

    fn page(fetcher: &ContentFetcher) -> MemoryDom {
        MemoryDom::page_template(fetcher.context.languages())
    }

    async fn mount_document(server: &MockServer, language: &str, identifier: &str, body: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/content/{}/{}.md", language, identifier)))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(server)
            .await;
    }

    struct FailingRenderer;

    impl MarkdownRenderer for FailingRenderer {
        fn render(&self, _markdown: &str) -> PageResult<String> {
            Err(PageError::Render("unbalanced fence".to_string()))
        }
    }

    // ==================== fetch_document Tests ====================

    #[tokio::test]
    async fn test_fetch_document_requested_language() {
        let server = MockServer::start().await;
        mount_document(&server, "pt", "handbook", "# Manual").await;

        let f = fetcher(&server.uri(), "pt", "https://docs.example.com/?content=handbook");
        let id = ContentIdentifier::parse("handbook").unwrap();
        let doc = f.fetch_document(&id, &code("pt")).await.unwrap();

        assert_eq!(doc.text, "# Manual");
        assert_eq!(doc.language, code("pt"));
    }

    #[tokio::test]
    async fn test_fetch_document_falls_back_to_fallback_language() {
        let server = MockServer::start().await;
        mount_document(&server, "en", "handbook", "# Handbook").await;

        let f = fetcher(&server.uri(), "de", "https://docs.example.com/?content=handbook");
        let id = ContentIdentifier::parse("handbook").unwrap();
        let doc = f.fetch_document(&id, &code("de")).await.unwrap();

        assert_eq!(doc.text, "# Handbook");
        assert_eq!(doc.language, code("en"));
    }

    #[tokio::test]
    async fn test_fetch_document_fallback_language_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/content/en/handbook.md"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let f = fetcher(&server.uri(), "en", "https://docs.example.com/?content=handbook");
        let id = ContentIdentifier::parse("handbook").unwrap();
        let err = f.fetch_document(&id, &code("en")).await.unwrap_err();

        assert!(matches!(err, PageError::DocumentNotFound { .. }));
    }

    #[tokio::test]
    async fn test_fetch_document_both_missing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(2)
            .mount(&server)
            .await;

        let f = fetcher(&server.uri(), "es", "https://docs.example.com/?content=credits");
        let id = ContentIdentifier::parse("credits").unwrap();
        let err = f.fetch_document(&id, &code("es")).await.unwrap_err();

        assert!(matches!(
            err,
            PageError::DocumentNotFound { ref language, .. } if language == "es"
        ));
    }

    // ==================== load Tests ====================

    #[tokio::test]
    async fn test_load_success_shows_content_and_metadata() {
        let server = MockServer::start().await;
        mount_document(&server, "en", "handbook", "# Handbook\n\nHello.").await;

        let mut f = fetcher(&server.uri(), "de", "https://docs.example.com/?content=handbook");
        let mut dom = page(&f);
        dom.set_scroll_position(900);

        let state = f.load(&mut dom).await;

        assert_eq!(state, ViewState::Content);
        assert!(dom.is_region_visible(Region::Content));
        assert!(!dom.is_region_visible(Region::Loading));
        assert!(!dom.is_region_visible(Region::Error));
        assert!(dom
            .region(Region::Content)
            .unwrap()
            .text()
            .contains("<h1>Handbook</h1>"));
        // No German metadata exists, so English is used
        assert_eq!(dom.title(), "Handbook");
        assert_eq!(dom.meta(MetaTag::OgLocale), Some("de"));
        assert_eq!(dom.scroll_position(), 0);
    }

    #[tokio::test]
    async fn test_load_uses_localized_metadata_with_fallback_document() {
        let server = MockServer::start().await;
        mount_document(&server, "en", "handbook", "# Handbook").await;

        let mut f = fetcher(&server.uri(), "pt", "https://docs.example.com/?content=handbook");
        let mut dom = page(&f);
        f.load(&mut dom).await;

        assert_eq!(dom.title(), "Manual");
        assert_eq!(dom.meta(MetaTag::TwitterTitle), Some("Manual"));
    }

    #[tokio::test]
    async fn test_load_unknown_identifier_skips_fetch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut f = fetcher(&server.uri(), "en", "https://docs.example.com/about");
        let mut dom = page(&f);
        let state = f.load(&mut dom).await;

        assert!(f.identifier().is_none());
        assert_eq!(state, ViewState::Error);
        assert!(dom.is_region_visible(Region::Error));
        assert!(!dom.is_region_visible(Region::Loading));
    }

    #[tokio::test]
    async fn test_load_not_found_shows_error_only() {
        let server = MockServer::start().await;

        let mut f = fetcher(&server.uri(), "pt", "https://docs.example.com/credits");
        let mut dom = page(&f);
        let state = f.load(&mut dom).await;

        assert_eq!(state, ViewState::Error);
        assert!(dom.is_region_visible(Region::Error));
        assert!(!dom.is_region_visible(Region::Content));
        assert_eq!(dom.region(Region::Content).unwrap().text(), "");
        assert_eq!(dom.title(), "");
    }

    #[tokio::test]
    async fn test_load_render_failure_shows_error() {
        let server = MockServer::start().await;
        mount_document(&server, "en", "handbook", "```\nunterminated").await;

        let mut f = fetcher_with_renderer(
            &server.uri(),
            "en",
            "https://docs.example.com/?content=handbook",
            Arc::new(FailingRenderer),
        );
        let mut dom = page(&f);
        let state = f.load(&mut dom).await;

        assert_eq!(state, ViewState::Error);
        assert!(!dom.is_region_visible(Region::Content));
    }

    #[tokio::test]
    async fn test_load_runs_only_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/content/en/handbook.md"))
            .respond_with(ResponseTemplate::new(200).set_body_string("# Handbook"))
            .expect(1)
            .mount(&server)
            .await;

        let mut f = fetcher(&server.uri(), "en", "https://docs.example.com/?content=handbook");
        let mut dom = page(&f);

        assert_eq!(f.load(&mut dom).await, ViewState::Content);
        assert_eq!(f.load(&mut dom).await, ViewState::Content);
    }
}
