//! Progress-callback trait for conversion events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to be told
//! as the pipeline moves from loading the image, to waiting on the model, to
//! writing files. The CLI drives its spinner from these events; library
//! callers can forward them anywhere.
//!
//! # Example
//!
//! ```rust
//! use img2html::{ConversionConfig, ConversionProgressCallback};
//! use std::sync::Arc;
//!
//! struct Printer;
//!
//! impl ConversionProgressCallback for Printer {
//!     fn on_request_start(&self, model: &str) {
//!         eprintln!("asking {model}…");
//!     }
//! }
//!
//! let config = ConversionConfig::builder()
//!     .progress_callback(Arc::new(Printer) as Arc<dyn ConversionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use crate::output::OutputArtifacts;
use std::path::Path;
use std::sync::Arc;

/// Called by the conversion pipeline as it advances.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once the image path is resolved, before the file is checked.
    fn on_image_lookup(&self, path: &Path) {
        let _ = path;
    }

    /// Called after the image was read and base64-encoded.
    ///
    /// # Arguments
    /// * `path`         — absolute image path
    /// * `mime_type`    — detected MIME type
    /// * `encoded_len`  — length of the base64 payload
    fn on_image_loaded(&self, path: &Path, mime_type: &str, encoded_len: usize) {
        let _ = (path, mime_type, encoded_len);
    }

    /// Called just before the completion request is sent.
    fn on_request_start(&self, model: &str) {
        let _ = model;
    }

    /// Called when the model replied.
    ///
    /// # Arguments
    /// * `response_len` — byte length of the reply text
    /// * `html_fallback` — true when no `html` block was found and the whole
    ///   reply is used as HTML
    fn on_response(&self, response_len: usize, html_fallback: bool) {
        let _ = (response_len, html_fallback);
    }

    /// Called once the output files are on disk.
    fn on_files_written(&self, artifacts: &OutputArtifacts) {
        let _ = artifacts;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl ConversionProgressCallback for Recorder {
        fn on_image_loaded(&self, _path: &Path, mime_type: &str, _encoded_len: usize) {
            self.events.lock().unwrap().push(format!("loaded {mime_type}"));
        }

        fn on_response(&self, response_len: usize, html_fallback: bool) {
            self.events
                .lock()
                .unwrap()
                .push(format!("response {response_len} {html_fallback}"));
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_image_lookup(Path::new("/tmp/a.png"));
        cb.on_image_loaded(Path::new("/tmp/a.png"), "image/png", 12);
        cb.on_request_start("gpt-4o");
        cb.on_response(42, false);
        cb.on_files_written(&OutputArtifacts {
            html_path: PathBuf::from("converted.html"),
            css_path: None,
        });
    }

    #[test]
    fn overridden_methods_receive_events() {
        let rec = Arc::new(Recorder::default());
        let cb: ProgressCallback = Arc::clone(&rec) as ProgressCallback;
        cb.on_image_loaded(Path::new("/tmp/a.png"), "image/png", 12);
        cb.on_request_start("gpt-4o");
        cb.on_response(7, true);
        assert_eq!(
            *rec.events.lock().unwrap(),
            vec!["loaded image/png".to_string(), "response 7 true".to_string()]
        );
    }
}
