//! Image encoding: file bytes → base64 [`ImageAsset`].
//!
//! Vision chat APIs take images inline as `data:` URLs, so the raw bytes are
//! wrapped as-is and handed to the provider as an [`ImageData`]. No
//! re-encoding happens: the model sees exactly the file the user pointed at.

use crate::error::Img2HtmlError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use edgequake_llm::ImageData;
use std::path::{Path, PathBuf};
use tracing::debug;

/// An image ready to be attached to a completion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    /// Absolute path the bytes were read from.
    pub path: PathBuf,
    /// MIME type, e.g. `image/png`.
    pub mime_type: String,
    /// Standard (padded) base64 of the file content.
    pub data: String,
}

impl ImageAsset {
    /// Wrap already-read bytes.
    pub fn from_bytes(path: impl Into<PathBuf>, mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            path: path.into(),
            mime_type: mime_type.into(),
            data: STANDARD.encode(bytes),
        }
    }

    /// Attachment form understood by the LLM providers.
    pub fn to_image_data(&self) -> ImageData {
        ImageData::new(self.data.clone(), self.mime_type.clone())
    }

    /// `data:<mime>;base64,<payload>`
    pub fn data_url(&self) -> String {
        self.to_image_data().to_data_uri()
    }
}

/// Read `path` and base64-encode it.
pub async fn encode_image(path: &Path, mime_type: &str) -> Result<ImageAsset, Img2HtmlError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| Img2HtmlError::ImageReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    let asset = ImageAsset::from_bytes(path, mime_type, &bytes);
    debug!(
        "Encoded {} ({} bytes) → {} bytes base64",
        path.display(),
        bytes.len(),
        asset.data.len()
    );
    Ok(asset)
}
