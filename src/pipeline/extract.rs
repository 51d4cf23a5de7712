//! Extraction: recover HTML and CSS from the model's free-form reply.
//!
//! Models answer with prose around fenced code blocks, and not always in the
//! same shape. This is a pure `&str → ExtractedDocument` function so every
//! odd reply we have seen can be pinned down as a literal test case.
//!
//! ## Rules (first match wins at each step)
//!
//! 1. The first ```` ```html ```` block is the HTML.
//! 2. The first ```` ```css ```` block is the CSS.
//! 3. No CSS block but HTML found: the first `<style>…</style>` inside the
//!    HTML is the CSS. The HTML keeps its style block.
//! 4. No HTML block at all: the whole reply is the HTML, so a page is always
//!    produced.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

static RE_HTML_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```html\s*(.*?)\s*```").unwrap());

static RE_CSS_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)```css\s*(.*?)\s*```").unwrap());

static RE_INLINE_STYLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<style>(.*?)</style>").unwrap());

/// HTML and CSS recovered from one reply.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtractedDocument {
    pub html: String,
    /// Empty when neither a `css` block nor an inline style was found.
    pub css: String,
    /// True when no `html` block existed and `html` is the raw reply.
    pub html_fallback: bool,
}

/// Apply the extraction rules to a model reply.
pub fn extract_markup(response: &str) -> ExtractedDocument {
    let html = first_capture(&RE_HTML_BLOCK, response);
    let mut css = first_capture(&RE_CSS_BLOCK, response).unwrap_or_default();

    if css.is_empty() {
        if let Some(ref html) = html {
            css = first_capture(&RE_INLINE_STYLE, html).unwrap_or_default();
        }
    }

    match html.filter(|h| !h.is_empty()) {
        Some(html) => ExtractedDocument {
            html,
            css,
            html_fallback: false,
        },
        None => {
            warn!("Could not extract HTML code blocks. Using full response.");
            ExtractedDocument {
                html: response.to_string(),
                css,
                html_fallback: true,
            }
        }
    }
}

fn first_capture(re: &Regex, haystack: &str) -> Option<String> {
    re.captures(haystack)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
