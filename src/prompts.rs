//! Instruction prompt sent alongside the image.
//!
//! Callers can override it via [`crate::config::ConversionConfig::prompt`];
//! the constant here is used only when no override is provided.

/// Default instruction for converting a design image to HTML and CSS.
///
/// The extractor relies on the model answering with ```` ```html ```` and
/// ```` ```css ```` fenced blocks, which is what this wording reliably yields.
pub const DEFAULT_PROMPT: &str = "Convert this image to responsive HTML and CSS code. \
Provide the HTML and CSS separately. \
Make the design as accurate as possible to the original image. \
Include appropriate structure with semantic HTML5 tags.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_asks_for_separate_semantic_markup() {
        assert!(DEFAULT_PROMPT.contains("HTML and CSS separately"));
        assert!(DEFAULT_PROMPT.contains("semantic HTML5"));
        assert!(DEFAULT_PROMPT.contains("responsive"));
    }
}
