//! Localized document display: identifier resolution, fetching with
//! fallback, markdown rendering and page metadata.

mod fetcher;
mod identifier;
mod metadata;
mod render;

pub use fetcher::{ContentFetcher, FetchedDocument, ViewState};
pub use identifier::{
    content_link, resolve_identifier, ContentIdentifier, CONTENT_QUERY_PARAM, PAGE_TEMPLATE,
};
pub use metadata::{MetadataTable, PageMetadata};
pub use render::{CommonMarkRenderer, MarkdownRenderer};
