//! Conversion entry points.
//!
//! One run is a straight line: load the image, ask the model once, assemble
//! the page, write it. Each step awaits the previous one and the first error
//! ends the run, so nothing is written when loading or the model call fails.

use crate::config::ConversionConfig;
use crate::error::Img2HtmlError;
use crate::output::{write_site, OutputArtifacts};
use crate::pipeline::assemble::assemble_site;
use crate::pipeline::encode::{encode_image, ImageAsset};
use crate::pipeline::extract::ExtractedDocument;
use crate::pipeline::input;
use crate::pipeline::llm::{request_markup, resolve_provider};
use edgequake_llm::LLMProvider;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Convert an image to `converted.html` (+ `styles.css`) in `config.output_dir`.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `image_path` — path as the user typed it; `~` and relative paths are resolved
/// * `config` — conversion configuration; `config.api_key` falls back to
///   `OPENAI_API_KEY`, `config.provider` replaces the OpenAI provider
///
/// # Errors
/// - [`Img2HtmlError::ImageNotFound`] — nothing at the resolved path
/// - [`Img2HtmlError::MissingCredential`] — no key anywhere
/// - [`Img2HtmlError::UnsupportedFile`] — extension is not an image type
/// - [`Img2HtmlError::Upstream`] — the model call failed
/// - [`Img2HtmlError::ImageReadFailed`] / [`Img2HtmlError::OutputWriteFailed`] — file I/O
pub async fn convert(
    image_path: impl AsRef<str>,
    config: &ConversionConfig,
) -> Result<OutputArtifacts, Img2HtmlError> {
    let (asset, api_key) = load_image(image_path.as_ref(), config).await?;
    let provider = resolve_provider(config, &api_key);
    generate_site(&provider, &asset, config).await
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync(
    image_path: impl AsRef<str>,
    config: &ConversionConfig,
) -> Result<OutputArtifacts, Img2HtmlError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Img2HtmlError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(convert(image_path, config))
}

/// Resolve, validate and encode the image; resolve the API key.
///
/// The key is resolved even when `config.provider` is set, so a missing
/// credential fails the same way in every setup.
///
/// Order matters for which error a bad invocation reports: the file is
/// checked before the credential, the credential before the MIME type.
pub async fn load_image(
    image_path: &str,
    config: &ConversionConfig,
) -> Result<(ImageAsset, String), Img2HtmlError> {
    let path = input::absolutize(image_path)?;
    info!("Looking for image at: {}", path.display());
    if let Some(ref cb) = config.progress_callback {
        cb.on_image_lookup(&path);
    }

    let path = input::ensure_image_exists(path)?;
    let api_key = input::resolve_credential(config.api_key.as_deref())?;
    let mime_type = input::detect_mime_type(&path)?;

    info!("Reading image from: {}", path.display());
    let asset = encode_image(&path, &mime_type).await?;

    if let Some(ref cb) = config.progress_callback {
        cb.on_image_loaded(&asset.path, &asset.mime_type, asset.data.len());
    }
    Ok((asset, api_key))
}

/// Model call → assembly → files.
async fn generate_site(
    provider: &Arc<dyn LLMProvider>,
    asset: &ImageAsset,
    config: &ConversionConfig,
) -> Result<OutputArtifacts, Img2HtmlError> {
    let start = Instant::now();
    let ExtractedDocument { html, css, .. } = request_markup(provider, asset, config).await?;
    info!("Conversion completed in {}ms", start.elapsed().as_millis());

    let site = assemble_site(&html, &css);
    let artifacts = write_site(&site, &config.output_dir).await?;

    if let Some(ref cb) = config.progress_callback {
        cb.on_files_written(&artifacts);
    }
    Ok(artifacts)
}
