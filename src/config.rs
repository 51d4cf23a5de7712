//! Configuration types for image-to-HTML conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. The CLI maps its flags onto the
//! builder; library callers set only what they care about and rely on the
//! defaults for the rest.

use crate::error::Img2HtmlError;
use crate::progress::ProgressCallback;
use edgequake_llm::LLMProvider;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Vision model used when none is configured.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Chat-completion API root used when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Configuration for an image-to-HTML conversion.
///
/// # Example
/// ```rust
/// use img2html::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .model("gpt-4o-mini")
///     .output_dir("site")
///     .build()
///     .unwrap();
/// assert_eq!(config.max_tokens, 4096);
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Vision-capable model identifier. Default: `gpt-4o`.
    pub model: String,

    /// Upper bound on generated tokens. Default: 4096.
    ///
    /// A full landing page with its stylesheet routinely runs past 2 000
    /// tokens; a lower cap truncates the reply mid-block and the extractor
    /// then falls back to the raw text.
    pub max_tokens: usize,

    /// Sampling temperature. Default: unset (provider default).
    pub temperature: Option<f32>,

    /// Root of the chat-completion API, without the `/chat/completions` suffix.
    pub base_url: String,

    /// Explicit API key. Takes precedence over `OPENAI_API_KEY`.
    pub api_key: Option<String>,

    /// Custom instruction prompt. If None, uses [`crate::prompts::DEFAULT_PROMPT`].
    pub prompt: Option<String>,

    /// Directory receiving `converted.html` and `styles.css`. Default: `.`.
    pub output_dir: PathBuf,

    /// Timeout for the completion request in seconds. Default: None
    /// (wait for the provider as long as it takes).
    pub request_timeout_secs: Option<u64>,

    /// Pre-constructed LLM provider. When set, `model`, `base_url` and the
    /// credential are not used to build one.
    pub provider: Option<Arc<dyn LLMProvider>>,

    /// Optional progress callback.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 4096,
            temperature: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            prompt: None,
            output_dir: PathBuf::from("."),
            request_timeout_secs: None,
            provider: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("prompt", &self.prompt.as_ref().map(|p| p.len()))
            .field("output_dir", &self.output_dir)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn LLMProvider>"))
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = Some(t.clamp(0.0, 2.0));
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.prompt = Some(prompt.into());
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = Some(secs);
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Img2HtmlError> {
        let c = &self.config;
        if c.model.trim().is_empty() {
            return Err(Img2HtmlError::InvalidConfig("model must not be empty".into()));
        }
        if c.max_tokens == 0 {
            return Err(Img2HtmlError::InvalidConfig(
                "max_tokens must be ≥ 1".into(),
            ));
        }
        if !c.base_url.starts_with("http://") && !c.base_url.starts_with("https://") {
            return Err(Img2HtmlError::InvalidConfig(format!(
                "base URL must be http:// or https://, got '{}'",
                c.base_url
            )));
        }
        if c.request_timeout_secs == Some(0) {
            return Err(Img2HtmlError::InvalidConfig(
                "request timeout must be ≥ 1 second".into(),
            ));
        }
        Ok(self.config)
    }
}
