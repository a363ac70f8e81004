use std::sync::Arc;

use anyhow::{Context, Result};
use docs_locale::config::Config;
use docs_locale::content::ViewState;
use docs_locale::dom::MemoryDom;
use docs_locale::i18n::{parse_accept_language, LanguageCode};
use docs_locale::page::Page;
use docs_locale::source::HttpSource;
use docs_locale::storage::FileStore;
use tracing::{info, warn};

/// Usage: docs-locale [PAGE_URL] [SWITCH_TO_LANGUAGE]
///
/// Renders the page at PAGE_URL (absolute, or relative to SITE_BASE_URL) the
/// way a visitor whose browser sends ACCEPT_LANGUAGE would see it, optionally
/// switching language afterwards, and prints the resulting HTML.
#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("docs_locale=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;
    let source = HttpSource::from_config(&config)?;

    let mut args = std::env::args().skip(1);
    let page_arg = args
        .next()
        .or_else(|| std::env::var("PAGE_URL").ok())
        .unwrap_or_else(|| "page-template?content=handbook".to_string());
    let page_url = source
        .base_url()
        .join(&page_arg)
        .with_context(|| format!("Invalid page URL: {}", page_arg))?;

    let switch_to = match args.next() {
        Some(code) => Some(
            LanguageCode::parse(&code).with_context(|| format!("Invalid language code: {}", code))?,
        ),
        None => None,
    };

    let browser_preferences = std::env::var("ACCEPT_LANGUAGE")
        .map(|header| parse_accept_language(&header))
        .unwrap_or_default();

    info!("Rendering {}", page_url);

    let dom = MemoryDom::page_template(&config.supported_set()?);
    let preferences = Arc::new(FileStore::new(&config.preferences_file));
    let mut page = Page::new(&config, source, preferences, page_url, dom)?;

    let mut state = page.init(&browser_preferences).await;

    if let Some(language) = switch_to {
        state = page.switch_language(&language).await?;
    }

    if state == ViewState::Error {
        warn!("Page ended in the error state");
    }

    println!("{}", page.dom().render_html());
    Ok(())
}
