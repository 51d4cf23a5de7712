//! VLM interaction: build the vision message and call the provider.
//!
//! The module is intentionally thin. Prompt wording lives in
//! [`crate::prompts`], reply parsing in [`super::extract`]. What remains is
//! provider construction and a single `chat` call.
//!
//! ## One attempt only
//!
//! There is no retry loop. Any [`edgequake_llm::LlmError`], an elapsed
//! timeout, or a reply without text surfaces as [`Img2HtmlError::Upstream`]
//! carrying the underlying message.

use crate::config::ConversionConfig;
use crate::error::Img2HtmlError;
use crate::pipeline::encode::ImageAsset;
use crate::pipeline::extract::{extract_markup, ExtractedDocument};
use crate::prompts::DEFAULT_PROMPT;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider, LLMResponse, OpenAIProvider};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Pick the provider for this run.
///
/// A pre-built `config.provider` is used as-is. Otherwise an OpenAI-compatible
/// provider is created for `config.base_url` and `config.model`, authenticated
/// with `api_key`. The key is handed to the provider directly and never
/// written to the environment.
pub fn resolve_provider(config: &ConversionConfig, api_key: &str) -> Arc<dyn LLMProvider> {
    if let Some(ref provider) = config.provider {
        debug!("Using caller-supplied provider {}", provider.name());
        return Arc::clone(provider);
    }

    debug!("Creating OpenAI-compatible provider for {}", config.base_url);
    Arc::new(
        OpenAIProvider::compatible(api_key, config.base_url.trim_end_matches('/'))
            .with_model(&config.model),
    )
}

/// The single user message: instruction text plus the image attachment.
pub fn build_messages(asset: &ImageAsset, config: &ConversionConfig) -> Vec<ChatMessage> {
    let prompt = config.prompt.as_deref().unwrap_or(DEFAULT_PROMPT);
    vec![ChatMessage::user_with_images(prompt, vec![asset.to_image_data()])]
}

/// Build `CompletionOptions` from the conversion config.
fn build_options(config: &ConversionConfig) -> CompletionOptions {
    CompletionOptions {
        max_tokens: Some(config.max_tokens),
        temperature: config.temperature,
        ..Default::default()
    }
}

/// Send `asset` to the model and extract HTML/CSS from the reply.
pub async fn request_markup(
    provider: &Arc<dyn LLMProvider>,
    asset: &ImageAsset,
    config: &ConversionConfig,
) -> Result<ExtractedDocument, Img2HtmlError> {
    let messages = build_messages(asset, config);
    let options = build_options(config);

    if let Some(ref cb) = config.progress_callback {
        cb.on_request_start(provider.model());
    }
    info!("Converting image to HTML/CSS with {}", provider.model());

    let start = Instant::now();
    let response = chat_once(provider, &messages, &options, config.request_timeout_secs).await?;
    debug!(
        "{} input tokens, {} output tokens, {:?} ({})",
        response.prompt_tokens,
        response.completion_tokens,
        start.elapsed(),
        response.model,
    );

    if response.content.trim().is_empty() {
        return Err(Img2HtmlError::upstream("Model returned no content"));
    }

    let document = extract_markup(&response.content);

    if let Some(ref cb) = config.progress_callback {
        cb.on_response(response.content.len(), document.html_fallback);
    }
    Ok(document)
}

async fn chat_once(
    provider: &Arc<dyn LLMProvider>,
    messages: &[ChatMessage],
    options: &CompletionOptions,
    timeout_secs: Option<u64>,
) -> Result<LLMResponse, Img2HtmlError> {
    let call = provider.chat(messages, Some(options));
    let result = match timeout_secs {
        Some(secs) => tokio::time::timeout(Duration::from_secs(secs), call)
            .await
            .map_err(|_| Img2HtmlError::upstream(format!("Request timed out after {secs}s")))?,
        None => call.await,
    };
    result.map_err(|e| Img2HtmlError::upstream(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use edgequake_llm::{ChatRole, MockProvider};

    fn asset() -> ImageAsset {
        ImageAsset::from_bytes("/tmp/a.png", "image/png", b"png")
    }

    #[test]
    fn message_carries_prompt_and_image() {
        let messages = build_messages(&asset(), &ConversionConfig::default());
        assert_eq!(messages.len(), 1);

        let msg = &messages[0];
        assert!(matches!(msg.role, ChatRole::User));
        assert_eq!(msg.content, DEFAULT_PROMPT);

        let images = msg.images.as_ref().expect("image attached");
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].to_api_url(), "data:image/png;base64,cG5n");
    }

    #[test]
    fn prompt_override_is_used() {
        let config = ConversionConfig::builder()
            .prompt("Only HTML please")
            .build()
            .unwrap();
        let messages = build_messages(&asset(), &config);
        assert_eq!(messages[0].content, "Only HTML please");
    }

    #[test]
    fn build_options_defaults() {
        let opts = build_options(&ConversionConfig::default());
        assert_eq!(opts.max_tokens, Some(4096));
        assert_eq!(opts.temperature, None);
    }

    #[test]
    fn build_options_carries_temperature() {
        let config = ConversionConfig::builder().temperature(0.2).build().unwrap();
        assert_eq!(build_options(&config).temperature, Some(0.2));
    }

    #[test]
    fn default_provider_uses_configured_model() {
        let provider = resolve_provider(&ConversionConfig::default(), "sk-test");
        assert_eq!(provider.name(), "openai");
        assert_eq!(provider.model(), "gpt-4o");
    }

    #[test]
    fn injected_provider_wins() {
        let config = ConversionConfig::builder()
            .provider(Arc::new(MockProvider::new()))
            .build()
            .unwrap();
        assert_eq!(resolve_provider(&config, "sk-test").name(), "mock");
    }

    #[tokio::test]
    async fn reply_is_extracted() {
        let mock = MockProvider::new();
        mock.add_response("```html\n<p>x</p>\n```\n```css\np{}\n```")
            .await;
        let provider: Arc<dyn LLMProvider> = Arc::new(mock);

        let doc = request_markup(&provider, &asset(), &ConversionConfig::default())
            .await
            .unwrap();
        assert_eq!(doc.html, "<p>x</p>");
        assert_eq!(doc.css, "p{}");
        assert!(!doc.html_fallback);
    }

    #[tokio::test]
    async fn blank_reply_is_upstream_error() {
        let mock = MockProvider::new();
        mock.add_response("   \n").await;
        let provider: Arc<dyn LLMProvider> = Arc::new(mock);

        let err = request_markup(&provider, &asset(), &ConversionConfig::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Model returned no content");
        assert_eq!(err.exit_code(), 5);
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_upstream_error() {
        let config = ConversionConfig::builder()
            .base_url("http://127.0.0.1:1/v1")
            .request_timeout_secs(10)
            .build()
            .unwrap();
        let provider = resolve_provider(&config, "sk-test");

        let err = request_markup(&provider, &asset(), &config)
            .await
            .unwrap_err();
        assert!(matches!(err, Img2HtmlError::Upstream { .. }), "{err:?}");
    }
}
