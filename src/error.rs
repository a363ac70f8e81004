use thiserror::Error;

/// Failures raised while localizing and displaying a page.
///
/// Only `BundleLoad` is recovered inside the translation store. The document
/// and render variants all end up as the single user-visible error panel; they
/// are kept distinct so the logs say what actually went wrong.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("failed to load translation bundle for '{language}': {reason}")]
    BundleLoad { language: String, reason: String },

    #[error("document '{identifier}' not found for language '{language}'")]
    DocumentNotFound { identifier: String, language: String },

    #[error("no content identifier could be resolved from the page URL")]
    UnknownContentIdentifier,

    #[error("markdown rendering failed: {0}")]
    Render(String),

    #[error("language '{0}' is not supported")]
    UnsupportedLanguage(String),

    #[error("preference storage error: {0}")]
    Storage(String),
}

/// Result type for page localization operations
pub type PageResult<T> = Result<T, PageError>;
