//! Assembly: turn extracted HTML/CSS into a page a browser can open.
//!
//! CSS is externalised into `styles.css` only when there is some and the
//! HTML carries no inline `<style>` of its own. When externalised, the page
//! must reference the stylesheet, so a `<link>` is inserted at the first
//! usable spot:
//!
//! 1. just before `</head>`;
//! 2. else right after the opening `<html …>` tag, inside a new `<head>`;
//! 3. else the fragment is wrapped in a minimal HTML5 document.
//!
//! All checks are literal, case-sensitive substring searches.

use tracing::{debug, warn};

const STYLESHEET_LINK: &str = r#"<link rel="stylesheet" href="styles.css">"#;

/// Prefix that marks an existing stylesheet reference.
const STYLESHEET_LINK_PREFIX: &str = r#"<link rel="stylesheet""#;

const INLINE_STYLE_TAG: &str = "<style>";

/// The page as it will be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledSite {
    pub html: String,
    /// Content of `styles.css`; None means no stylesheet file is written.
    pub css: Option<String>,
}

/// Decide whether `css` is externalised and link it from `html` if so.
///
/// When the HTML already holds an inline `<style>`, a separately extracted
/// CSS block is dropped rather than merged.
pub fn assemble_site(html: &str, css: &str) -> AssembledSite {
    if css.is_empty() {
        return AssembledSite {
            html: html.to_string(),
            css: None,
        };
    }

    if html.contains(INLINE_STYLE_TAG) {
        warn!(
            "HTML already has an inline <style>; discarding {} bytes of separate CSS",
            css.len()
        );
        return AssembledSite {
            html: html.to_string(),
            css: None,
        };
    }

    let html = if html.contains(STYLESHEET_LINK_PREFIX) {
        debug!("HTML already links a stylesheet");
        html.to_string()
    } else {
        insert_stylesheet_link(html)
    };

    AssembledSite {
        html,
        css: Some(css.to_string()),
    }
}

/// Insert a `<link>` to [`crate::output::CSS_FILE_NAME`] at the first applicable spot.
pub fn insert_stylesheet_link(html: &str) -> String {
    if let Some(pos) = html.find("</head>") {
        debug!("Linking stylesheet before </head>");
        return format!("{}\n  {}\n{}", &html[..pos], STYLESHEET_LINK, &html[pos..]);
    }

    if let Some(start) = html.find("<html") {
        // An `<html` with no closing `>` is left as is.
        return match html[start..].find('>') {
            Some(rel) => {
                debug!("Linking stylesheet in a new <head> after <html>");
                let end = start + rel + 1;
                format!(
                    "{}\n<head>\n  {}\n</head>\n{}",
                    &html[..end],
                    STYLESHEET_LINK,
                    &html[end..]
                )
            }
            None => html.to_string(),
        };
    }

    debug!("Wrapping HTML fragment in a full document");
    wrap_fragment(html)
}

fn wrap_fragment(body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  {link}
  <title>Converted Design</title>
</head>
<body>
{body}
</body>
</html>"#,
        link = STYLESHEET_LINK,
        body = body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::CSS_FILE_NAME;

    #[test]
    fn link_points_at_the_css_file() {
        assert!(STYLESHEET_LINK.contains(CSS_FILE_NAME));
        assert!(STYLESHEET_LINK.starts_with(STYLESHEET_LINK_PREFIX));
    }

    #[test]
    fn no_css_leaves_html_alone() {
        let site = assemble_site("<div>X</div>", "");
        assert_eq!(site.html, "<div>X</div>");
        assert_eq!(site.css, None);
    }

    #[test]
    fn inserts_before_closing_head() {
        let site = assemble_site("<html><head></head><body>X</body></html>", "body{}");
        assert_eq!(
            site.html,
            "<html><head>\n  <link rel=\"stylesheet\" href=\"styles.css\">\n</head><body>X</body></html>"
        );
        assert_eq!(site.css.as_deref(), Some("body{}"));
    }

    #[test]
    fn reassembling_does_not_duplicate_link() {
        let first = assemble_site("<html><head></head><body>X</body></html>", "body{}");
        let second = assemble_site(&first.html, "body{}");
        assert_eq!(second.html, first.html);
        assert_eq!(second.html.matches("<link").count(), 1);
        assert_eq!(second.css.as_deref(), Some("body{}"));
    }

    #[test]
    fn synthesises_head_after_html_tag() {
        let site = assemble_site("<html lang=\"en\"><body>X</body></html>", "p{}");
        assert_eq!(
            site.html,
            "<html lang=\"en\">\n<head>\n  <link rel=\"stylesheet\" href=\"styles.css\">\n</head>\n<body>X</body></html>"
        );
    }

    #[test]
    fn head_without_closing_tag_uses_html_branch() {
        let site = assemble_site("<html><head><title>T</title><body>X</body></html>", "p{}");
        assert!(site
            .html
            .starts_with("<html>\n<head>\n  <link rel=\"stylesheet\" href=\"styles.css\">\n</head>\n<head><title>"));
    }

    #[test]
    fn unterminated_html_tag_is_left_unchanged() {
        let site = assemble_site("<p>X</p><html", "p{}");
        assert_eq!(site.html, "<p>X</p><html");
        assert_eq!(site.css.as_deref(), Some("p{}"));
    }

    #[test]
    fn wraps_bare_fragment_in_boilerplate() {
        let site = assemble_site("<div>X</div>", "div{}");
        let expected = "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n  <meta charset=\"UTF-8\">\n  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n  <link rel=\"stylesheet\" href=\"styles.css\">\n  <title>Converted Design</title>\n</head>\n<body>\n<div>X</div>\n</body>\n</html>";
        assert_eq!(site.html, expected);
        assert_eq!(site.css.as_deref(), Some("div{}"));
    }

    #[test]
    fn existing_link_is_kept_as_is() {
        let html = "<head><link rel=\"stylesheet\" href=\"main.css\"></head>";
        let site = assemble_site(html, "a{}");
        assert_eq!(site.html, html);
        assert_eq!(site.css.as_deref(), Some("a{}"));
    }

    #[test]
    fn inline_style_discards_separate_css() {
        let html = "<html><head><style>p{}</style></head></html>";
        let site = assemble_site(html, "h1{color:red}");
        assert_eq!(site.html, html);
        assert_eq!(site.css, None);
    }

    #[test]
    fn inline_style_extracted_from_html_is_not_externalised() {
        // The extractor copies the inline style into `css`; the HTML still
        // carries it, so nothing is externalised.
        let html = "<style>body{color:red}</style><p>x</p>";
        let site = assemble_site(html, "body{color:red}");
        assert_eq!(site.css, None);
        assert_eq!(site.html, html);
    }

    #[test]
    fn head_match_is_case_sensitive() {
        let site = assemble_site("<HTML><HEAD></HEAD><p>x</p></HTML>", "p{}");
        assert!(site.html.starts_with("<!DOCTYPE html>"));
        assert!(site.html.contains("<body>\n<HTML><HEAD></HEAD>"));
    }
}
