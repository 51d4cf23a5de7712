//! # img2html
//!
//! Convert a screenshot or design mock-up into a static HTML/CSS page using a
//! Vision Language Model (VLM).
//!
//! The model does all of the seeing. This crate does the plumbing around it:
//! it ships the image as a data URL, digs the `html` and `css` fenced blocks
//! out of whatever prose the model wraps around them, and writes a page that
//! opens in a browser even when the reply is partial or inlines its styles.
//!
//! ## Pipeline Overview
//!
//! ```text
//! image file
//!  │
//!  ├─ 1. Input     expand ~, absolutise, check file, pick API key, MIME type
//!  ├─ 2. Encode    bytes → base64 data URL
//!  ├─ 3. VLM       one edgequake-llm chat call (gpt-4o by default)
//!  ├─ 4. Extract   ```html / ```css blocks, inline <style>, raw fallback
//!  ├─ 5. Assemble  externalise CSS and link it from the page
//!  └─ 6. Output    converted.html (+ styles.css)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use img2html::{convert, ConversionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // API key from OPENAI_API_KEY unless set with `.api_key(..)`;
//!     // `.provider(..)` swaps in any edgequake-llm provider
//!     let config = ConversionConfig::builder().output_dir("site").build()?;
//!     let out = convert("~/Desktop/mockup.png", &config).await?;
//!     println!("{}", out.html_path.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `img2html` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use convert::{convert, convert_sync, load_image};
pub use error::Img2HtmlError;
pub use output::{write_site, OutputArtifacts, CSS_FILE_NAME, HTML_FILE_NAME};
pub use pipeline::assemble::{assemble_site, AssembledSite};
pub use pipeline::encode::ImageAsset;
pub use pipeline::extract::{extract_markup, ExtractedDocument};
pub use pipeline::llm::{build_messages, request_markup, resolve_provider};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
