//! Input resolution: turn what the user typed into a checked image path,
//! a credential and a MIME type.
//!
//! Paths pasted from a file manager often arrive quoted or with a leading
//! `~`, so both are normalised before the existence check. The MIME type is
//! inferred from the extension only; the file content is never decoded.

use crate::error::Img2HtmlError;
use image::ImageFormat;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable consulted when no explicit API key is given.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Normalise a user-supplied path and verify a file exists there.
///
/// Trims whitespace and one pair of surrounding quotes, expands a leading
/// `~`, and makes the result absolute against the current directory.
pub fn resolve_image_path(input: &str) -> Result<PathBuf, Img2HtmlError> {
    ensure_image_exists(absolutize(input)?)
}

/// Fail with [`Img2HtmlError::ImageNotFound`] unless `path` is a regular file.
pub fn ensure_image_exists(path: PathBuf) -> Result<PathBuf, Img2HtmlError> {
    if !path.is_file() {
        return Err(Img2HtmlError::ImageNotFound { path });
    }
    debug!("Resolved image: {}", path.display());
    Ok(path)
}

/// Expand and absolutise `input` without touching the filesystem.
pub fn absolutize(input: &str) -> Result<PathBuf, Img2HtmlError> {
    let expanded = expand_home(strip_quotes(input.trim()));
    std::path::absolute(&expanded).map_err(|_| Img2HtmlError::ImageNotFound { path: expanded })
}

fn strip_quotes(s: &str) -> &str {
    for q in ['"', '\''] {
        if s.len() >= 2 && s.starts_with(q) && s.ends_with(q) {
            return &s[1..s.len() - 1];
        }
    }
    s
}

fn expand_home(path: &str) -> PathBuf {
    let rest = if path == "~" {
        Some("")
    } else {
        path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\"))
    };

    match (rest, dirs::home_dir()) {
        (Some(rest), Some(home)) if rest.is_empty() => home,
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

/// Pick the API key: the explicit argument, else `OPENAI_API_KEY`.
pub fn resolve_credential(explicit: Option<&str>) -> Result<String, Img2HtmlError> {
    resolve_credential_from(explicit, std::env::var(API_KEY_ENV).ok())
}

/// [`resolve_credential`] with the environment value passed in.
///
/// Empty strings count as absent on both sides.
pub fn resolve_credential_from(
    explicit: Option<&str>,
    env_value: Option<String>,
) -> Result<String, Img2HtmlError> {
    if let Some(key) = explicit.filter(|k| !k.is_empty()) {
        return Ok(key.to_string());
    }
    env_value
        .filter(|k| !k.is_empty())
        .ok_or(Img2HtmlError::MissingCredential)
}

/// Image extensions [`ImageFormat`] has no variant for.
const EXTRA_IMAGE_TYPES: &[(&str, &str)] = &[
    ("svg", "image/svg+xml"),
    ("heic", "image/heic"),
    ("heif", "image/heif"),
];

/// Infer the MIME type from the file extension.
///
/// Fails with [`Img2HtmlError::UnsupportedFile`] when the extension is
/// unknown or maps to something other than `image/*`.
pub fn detect_mime_type(path: &Path) -> Result<String, Img2HtmlError> {
    let mime = ImageFormat::from_path(path)
        .ok()
        .map(|format| format.to_mime_type())
        .or_else(|| extra_mime_type(path))
        .filter(|mime| mime.starts_with("image/"))
        .ok_or_else(|| Img2HtmlError::UnsupportedFile {
            path: path.to_path_buf(),
        })?;

    debug!("Detected MIME type {} for {}", mime, path.display());
    Ok(mime.to_string())
}

fn extra_mime_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    EXTRA_IMAGE_TYPES
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, mime)| *mime)
}
