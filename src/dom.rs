//! Page document capability.
//!
//! The localization engine never walks a real browser tree; it talks to a
//! `Dom` that can enumerate translatable elements, mutate text and markup,
//! set head metadata and toggle the loading/content/error regions.
//! `MemoryDom` is the in-process implementation used by the CLI and tests.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::i18n::{language_config, LanguageCode, SupportedLanguageSet};

/// Index of an element inside a document.
pub type ElementId = usize;

/// The three mutually exclusive display regions of a content page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Loading,
    Content,
    Error,
}

impl Region {
    /// The element id the region is bound to in the page template.
    pub fn element_id(&self) -> &'static str {
        match self {
            Region::Loading => "loading",
            Region::Content => "content",
            Region::Error => "error",
        }
    }
}

/// Head metadata tags the content fetcher maintains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MetaTag {
    Description,
    OgTitle,
    OgDescription,
    OgLocale,
    TwitterTitle,
    TwitterDescription,
}

impl MetaTag {
    /// Attribute that names the tag (`name` or `property`).
    pub fn attribute(&self) -> &'static str {
        match self {
            MetaTag::Description | MetaTag::TwitterTitle | MetaTag::TwitterDescription => "name",
            MetaTag::OgTitle | MetaTag::OgDescription | MetaTag::OgLocale => "property",
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            MetaTag::Description => "description",
            MetaTag::OgTitle => "og:title",
            MetaTag::OgDescription => "og:description",
            MetaTag::OgLocale => "og:locale",
            MetaTag::TwitterTitle => "twitter:title",
            MetaTag::TwitterDescription => "twitter:description",
        }
    }
}

/// Mutation and query capability over a rendered page.
pub trait Dom: Send {
    /// Every element tagged with a translation key, in document order.
    fn translatable_elements(&self) -> Vec<(ElementId, String)>;

    /// Replace an element's content with plain text.
    fn set_text(&mut self, element: ElementId, text: &str);

    /// Replace an element's content with trusted markup.
    fn set_markup(&mut self, element: ElementId, markup: &str);

    /// Whether the element a toggle button controls is currently expanded.
    fn sibling_expanded(&self, element: ElementId) -> bool;

    /// Language selector options and the language each one selects.
    fn language_options(&self) -> Vec<(ElementId, LanguageCode)>;

    fn set_selected(&mut self, element: ElementId, selected: bool);

    /// Set the document-level `lang` attribute.
    fn set_document_language(&mut self, language: &LanguageCode);

    fn set_title(&mut self, title: &str);

    fn set_meta(&mut self, tag: MetaTag, content: &str);

    fn set_region_markup(&mut self, region: Region, markup: &str);

    fn set_region_visible(&mut self, region: Region, visible: bool);

    fn scroll_to_top(&mut self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementContent {
    Text(String),
    Markup(String),
}

impl ElementContent {
    pub fn as_str(&self) -> &str {
        match self {
            ElementContent::Text(s) | ElementContent::Markup(s) => s,
        }
    }
}

/// One node of a `MemoryDom`.
#[derive(Debug, Clone)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    pub i18n_key: Option<String>,
    pub lang_option: Option<LanguageCode>,
    pub content: ElementContent,
    /// Expand/collapse state for collapsible sections
    pub expanded: Option<bool>,
    /// The collapsible element a toggle button controls
    pub controls: Option<ElementId>,
    pub selected: bool,
    pub hidden: bool,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            id: None,
            i18n_key: None,
            lang_option: None,
            content: ElementContent::Text(String::new()),
            expanded: None,
            controls: None,
            selected: false,
            hidden: false,
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    /// Tag the element with a translation key; its initial text is the key itself.
    pub fn translatable(mut self, key: &str) -> Self {
        self.i18n_key = Some(key.to_string());
        self.content = ElementContent::Text(key.to_string());
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.content = ElementContent::Text(text.to_string());
        self
    }

    pub fn language_option(mut self, language: LanguageCode) -> Self {
        self.lang_option = Some(language);
        self
    }

    pub fn collapsible(mut self, expanded: bool) -> Self {
        self.expanded = Some(expanded);
        self
    }

    pub fn controlling(mut self, target: ElementId) -> Self {
        self.controls = Some(target);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn text(&self) -> &str {
        self.content.as_str()
    }
}

/// In-memory page document.
#[derive(Debug, Clone, Default)]
pub struct MemoryDom {
    elements: Vec<Element>,
    title: String,
    meta: BTreeMap<MetaTag, String>,
    language: Option<LanguageCode>,
    scroll_position: u32,
}

impl MemoryDom {
    pub fn new() -> Self {
        Self::default()
    }

    /// The documentation page skeleton: navigation, language selector,
    /// a collapsible details section, the three content regions and a footer.
    pub fn page_template(languages: &SupportedLanguageSet) -> Self {
        let mut dom = Self::new();

        dom.push(Element::new("h1").with_id("site-title").translatable("site-title"));
        dom.push(Element::new("a").translatable("nav-home"));
        dom.push(Element::new("a").translatable("nav-handbook"));
        dom.push(Element::new("a").translatable("nav-credits"));

        for code in languages.iter() {
            let label = language_config(code)
                .map(|c| c.native_name.to_string())
                .unwrap_or_else(|| code.to_string());
            dom.push(
                Element::new("button")
                    .with_text(&label)
                    .language_option(code.clone()),
            );
        }

        let details = dom.push(
            Element::new("div")
                .with_id("details")
                .translatable("details-text")
                .collapsible(false),
        );
        dom.push(
            Element::new("button")
                .translatable("toggle-button")
                .controlling(details),
        );

        dom.push(
            Element::new("div")
                .with_id(Region::Loading.element_id())
                .translatable("loading-text")
                .hidden(),
        );
        dom.push(
            Element::new("article")
                .with_id(Region::Content.element_id())
                .hidden(),
        );
        dom.push(
            Element::new("div")
                .with_id(Region::Error.element_id())
                .translatable("error-message")
                .hidden(),
        );

        dom.push(Element::new("footer").translatable("footer-text"));
        dom
    }

    pub fn push(&mut self, element: Element) -> ElementId {
        self.elements.push(element);
        self.elements.len() - 1
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn find_by_id(&self, id: &str) -> Option<ElementId> {
        self.elements
            .iter()
            .position(|e| e.id.as_deref() == Some(id))
    }

    /// First element carrying the given translation key.
    pub fn find_by_key(&self, key: &str) -> Option<ElementId> {
        self.elements
            .iter()
            .position(|e| e.i18n_key.as_deref() == Some(key))
    }

    pub fn region(&self, region: Region) -> Option<&Element> {
        self.find_by_id(region.element_id())
            .and_then(|id| self.element(id))
    }

    pub fn is_region_visible(&self, region: Region) -> bool {
        self.region(region).map(|e| !e.hidden).unwrap_or(false)
    }

    /// Flip a collapsible element, as a click on its toggle would.
    pub fn toggle_expanded(&mut self, id: ElementId) {
        if let Some(expanded) = self.elements.get_mut(id).and_then(|e| e.expanded.as_mut()) {
            *expanded = !*expanded;
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn meta(&self, tag: MetaTag) -> Option<&str> {
        self.meta.get(&tag).map(String::as_str)
    }

    pub fn document_language(&self) -> Option<&LanguageCode> {
        self.language.as_ref()
    }

    pub fn scroll_position(&self) -> u32 {
        self.scroll_position
    }

    pub fn set_scroll_position(&mut self, position: u32) {
        self.scroll_position = position;
    }

    /// Serialize the document as an HTML page.
    pub fn render_html(&self) -> String {
        let mut out = String::new();
        let lang = self
            .language
            .as_ref()
            .map(|l| l.as_str())
            .unwrap_or("");

        out.push_str("<!DOCTYPE html>\n");
        let _ = writeln!(out, "<html lang=\"{}\">", escape_html(lang));
        out.push_str("<head>\n<meta charset=\"utf-8\">\n");
        let _ = writeln!(out, "<title>{}</title>", escape_html(&self.title));
        for (tag, content) in &self.meta {
            let _ = writeln!(
                out,
                "<meta {}=\"{}\" content=\"{}\">",
                tag.attribute(),
                tag.key(),
                escape_html(content)
            );
        }
        out.push_str("</head>\n<body>\n");

        for element in &self.elements {
            let _ = write!(out, "<{}", element.tag);
            if let Some(id) = &element.id {
                let _ = write!(out, " id=\"{}\"", escape_html(id));
            }
            if let Some(key) = &element.i18n_key {
                let _ = write!(out, " data-i18n=\"{}\"", escape_html(key));
            }
            if let Some(code) = &element.lang_option {
                let _ = write!(out, " data-lang=\"{}\"", escape_html(code.as_str()));
            }
            if let Some(expanded) = element.expanded {
                let _ = write!(out, " aria-expanded=\"{}\"", expanded);
            }
            if element.selected {
                out.push_str(" class=\"active\"");
            }
            if element.hidden {
                out.push_str(" hidden");
            }
            out.push('>');
            match &element.content {
                ElementContent::Text(text) => out.push_str(&escape_html(text)),
                ElementContent::Markup(markup) => out.push_str(markup),
            }
            let _ = writeln!(out, "</{}>", element.tag);
        }

        out.push_str("</body>\n</html>\n");
        out
    }
}

impl Dom for MemoryDom {
    fn translatable_elements(&self) -> Vec<(ElementId, String)> {
        self.elements
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.i18n_key.clone().map(|key| (i, key)))
            .collect()
    }

    fn set_text(&mut self, element: ElementId, text: &str) {
        if let Some(e) = self.elements.get_mut(element) {
            e.content = ElementContent::Text(text.to_string());
        }
    }

    fn set_markup(&mut self, element: ElementId, markup: &str) {
        if let Some(e) = self.elements.get_mut(element) {
            e.content = ElementContent::Markup(markup.to_string());
        }
    }

    fn sibling_expanded(&self, element: ElementId) -> bool {
        self.elements
            .get(element)
            .and_then(|e| e.controls)
            .and_then(|target| self.elements.get(target))
            .and_then(|target| target.expanded)
            .unwrap_or(false)
    }

    fn language_options(&self) -> Vec<(ElementId, LanguageCode)> {
        self.elements
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.lang_option.clone().map(|code| (i, code)))
            .collect()
    }

    fn set_selected(&mut self, element: ElementId, selected: bool) {
        if let Some(e) = self.elements.get_mut(element) {
            e.selected = selected;
        }
    }

    fn set_document_language(&mut self, language: &LanguageCode) {
        self.language = Some(language.clone());
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn set_meta(&mut self, tag: MetaTag, content: &str) {
        self.meta.insert(tag, content.to_string());
    }

    fn set_region_markup(&mut self, region: Region, markup: &str) {
        if let Some(id) = self.find_by_id(region.element_id()) {
            self.set_markup(id, markup);
        }
    }

    fn set_region_visible(&mut self, region: Region, visible: bool) {
        if let Some(id) = self.find_by_id(region.element_id()) {
            self.elements[id].hidden = !visible;
        }
    }

    fn scroll_to_top(&mut self) {
        self.scroll_position = 0;
    }
}

/// Escape text for use in HTML content and double-quoted attributes.
fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
