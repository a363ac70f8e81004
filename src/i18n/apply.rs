//! Writing resolved translations into the page.

use tracing::debug;

use crate::dom::Dom;
use crate::i18n::{LanguageCode, TranslationBundle};

/// Key whose text depends on the expand/collapse state of the section it controls.
pub const TOGGLE_BUTTON_KEY: &str = "toggle-button";

/// Text shown on the toggle while its section is collapsed.
pub const TOGGLE_EXPAND_KEY: &str = "toggle-show-more";

/// Text shown on the toggle while its section is expanded.
pub const TOGGLE_COLLAPSE_KEY: &str = "toggle-show-less";

/// Whether a translated value should be inserted as markup rather than text.
///
/// Only values carrying a link are treated as markup.
pub fn contains_markup(value: &str) -> bool {
    value.contains("<a ") || value.contains("<a>")
}

/// Look a key up in the active bundle, then the fallback bundle.
pub fn lookup<'a>(
    key: &str,
    active: Option<&'a TranslationBundle>,
    fallback: Option<&'a TranslationBundle>,
) -> Option<&'a str> {
    active
        .and_then(|bundle| bundle.get(key))
        .or_else(|| fallback.and_then(|bundle| bundle.get(key)))
}

/// Apply translations to every translatable element of the page.
///
/// Elements whose key is in neither bundle are left untouched.
/// Returns the number of elements that were updated.
pub fn apply_translations(
    dom: &mut dyn Dom,
    active: Option<&TranslationBundle>,
    fallback: Option<&TranslationBundle>,
) -> usize {
    let mut applied = 0;

    for (element, key) in dom.translatable_elements() {
        let effective_key = if key == TOGGLE_BUTTON_KEY {
            if dom.sibling_expanded(element) {
                TOGGLE_COLLAPSE_KEY
            } else {
                TOGGLE_EXPAND_KEY
            }
        } else {
            key.as_str()
        };

        match lookup(effective_key, active, fallback) {
            Some(value) if contains_markup(value) => {
                dom.set_markup(element, value);
                applied += 1;
            }
            Some(value) => {
                dom.set_text(element, value);
                applied += 1;
            }
            None => debug!("No translation for key '{}'", effective_key),
        }
    }

    applied
}

/// Mark the selector option for `active` as selected and clear the others.
pub fn update_language_selector(dom: &mut dyn Dom, active: &LanguageCode) {
    for (element, language) in dom.language_options() {
        dom.set_selected(element, &language == active);
    }
}
