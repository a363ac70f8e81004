//! Language resolution and content fallback for a localized documentation site.
//!
//! A page load runs in two steps: the `LanguageResolver` picks the active
//! language (stored preference, then browser preferences, then the fallback)
//! and applies its translation bundle to the page; the `ContentFetcher` then
//! fetches the requested markdown document in that language, falling back to
//! the fallback language, renders it and updates the page metadata.

pub mod config;
pub mod content;
pub mod context;
pub mod dom;
pub mod error;
pub mod events;
pub mod i18n;
pub mod page;
pub mod source;
pub mod storage;

pub use error::{PageError, PageResult};
