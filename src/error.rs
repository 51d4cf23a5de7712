//! Error type for the img2html library.
//!
//! Every failure is fatal: a run either produces its output files or stops at
//! the first error. [`Img2HtmlError`] is raised where the failure happens and
//! propagated unchanged to the caller with `?`.
//!
//! The CLI maps each kind to its own exit status via
//! [`Img2HtmlError::exit_code`], so scripts can tell a missing image from a
//! rejected API key without parsing the message.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the img2html library.
#[derive(Debug, Error)]
pub enum Img2HtmlError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// No file exists at the resolved image path.
    #[error("Image not found at path: {}", path.display())]
    ImageNotFound { path: PathBuf },

    /// Neither an explicit key nor `OPENAI_API_KEY` was available.
    #[error(
        "No API key provided. Either pass it as an argument or set the OPENAI_API_KEY environment variable"
    )]
    MissingCredential,

    /// The file extension does not map to an `image/*` MIME type.
    #[error("The file at {} is not recognized as an image", path.display())]
    UnsupportedFile { path: PathBuf },

    /// The image exists but could not be read.
    #[error("Failed to read image '{}': {source}", path.display())]
    ImageReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── LLM errors ────────────────────────────────────────────────────────
    /// The chat-completion call failed or returned nothing usable.
    #[error("{message}")]
    Upstream { message: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create the output directory or write an output file.
    #[error("Failed to write output file '{}': {source}", path.display())]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Img2HtmlError {
    /// Process exit status for this error kind.
    ///
    /// | Kind | Code |
    /// |------|------|
    /// | image not found | 2 |
    /// | missing credential | 3 |
    /// | unsupported file | 4 |
    /// | upstream | 5 |
    /// | I/O (read or write) | 6 |
    /// | invalid configuration | 64 |
    /// | internal | 70 |
    pub fn exit_code(&self) -> u8 {
        match self {
            Img2HtmlError::ImageNotFound { .. } => 2,
            Img2HtmlError::MissingCredential => 3,
            Img2HtmlError::UnsupportedFile { .. } => 4,
            Img2HtmlError::Upstream { .. } => 5,
            Img2HtmlError::ImageReadFailed { .. } | Img2HtmlError::OutputWriteFailed { .. } => 6,
            Img2HtmlError::InvalidConfig(_) => 64,
            Img2HtmlError::Internal(_) => 70,
        }
    }

    pub(crate) fn upstream(message: impl Into<String>) -> Self {
        Img2HtmlError::Upstream {
            message: message.into(),
        }
    }
}
