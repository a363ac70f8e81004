//! Internationalization (i18n) module: language resolution and translation bundles.
//!
//! # Architecture
//!
//! - `language`: Normalized `LanguageCode` type and Accept-Language parsing
//! - `registry`: The supported language set and language display names
//! - `bundle`: Flat key/string translation bundles
//! - `store`: Cached bundle loading with the fallback chain
//! - `resolver`: Initial language resolution, switching and persistence
//! - `apply`: Writing translations into the page
//!
//! # Example
//!
//! ```rust,ignore
//! use docs_locale::i18n::{resolve_initial_language, LanguageCode};
//!
//! let browser = parse_accept_language("fr-FR,pt-BR;q=0.9");
//! let language = resolve_initial_language(None, &browser, &languages);
//! ```

pub mod apply;
mod bundle;
mod language;
mod registry;
mod resolver;
mod store;

pub use bundle::TranslationBundle;
pub use language::{parse_accept_language, LanguageCode};
pub use registry::{language_config, LanguageConfig, SupportedLanguageSet};
pub use resolver::{resolve_initial_language, ContentRefresh, LanguageResolver};
pub use store::TranslationStore;
