/*!
 * Core translation service implementation.
 *
 * This module contains the main TranslationService struct and its
 * implementation, which translates single card words (with their context
 * sentence) using various AI providers.
 */

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use url::Url;

use crate::app_config::{TranslationConfig, TranslationProvider as ConfigTranslationProvider};
use crate::translation::providers::anthropic::{Anthropic, AnthropicRequest};
use crate::translation::providers::ollama::{Ollama, GenerationRequest};
use crate::translation::providers::openai::{OpenAI, OpenAIRequest};

/// Word translations are one or a few tokens; this cap is generous
const WORD_MAX_TOKENS: u32 = 64;

/// Seam between the deck build loop and whatever produces translations.
///
/// The build loop only needs one operation, so controllers and tests can
/// substitute a mock without constructing a whole service.
#[async_trait]
pub trait WordTranslator: Send + Sync {
    /// Translate one word into the target language, honoring its usage in
    /// the given context sentence when one is supplied.
    async fn translate_word(
        &self,
        word: &str,
        context: Option<&str>,
        target_language: &str,
    ) -> Result<String>;
}

/// Parse an endpoint string into host and port
fn parse_endpoint(endpoint: &str) -> Result<(String, u16)> {
    if endpoint.is_empty() {
        return Err(anyhow!("Endpoint cannot be empty"));
    }

    let url = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        Url::parse(endpoint)?
    } else {
        Url::parse(&format!("http://{}", endpoint))?
    };

    let host = url.host_str()
        .ok_or_else(|| anyhow!("Invalid host in endpoint: {}", endpoint))?
        .to_string();

    let port = url.port().unwrap_or(if url.scheme() == "https" { 443 } else { 80 });

    Ok((host, port))
}

/// Translation provider implementation variants
enum TranslationProviderImpl {
    /// Ollama LLM service
    Ollama {
        /// Client instance
        client: Ollama,
    },

    /// OpenAI API service
    OpenAI {
        /// Client instance
        client: OpenAI,
    },

    /// LM Studio local server (OpenAI-compatible)
    LMStudio {
        /// Client instance (OpenAI-compatible)
        client: OpenAI,
    },

    /// Anthropic API service
    Anthropic {
        /// Client instance
        client: Anthropic,
    },
}

/// Main translation service for card-word translation
pub struct TranslationService {
    /// Provider implementation
    provider: TranslationProviderImpl,

    /// Configuration for the translation service
    pub config: TranslationConfig,
}

impl TranslationService {
    /// Create a new translation service with the given configuration
    pub fn new(config: TranslationConfig) -> Result<Self> {
        let retry_count = config.common.retry_count;
        let retry_backoff_ms = config.common.retry_backoff_ms;
        let rate_limit = config.get_rate_limit();

        let provider = match config.provider {
            ConfigTranslationProvider::Ollama => {
                let (host, port) = parse_endpoint(&config.get_endpoint())?;

                TranslationProviderImpl::Ollama {
                    client: Ollama::new_with_config(&host, port, retry_count, retry_backoff_ms, rate_limit),
                }
            },
            ConfigTranslationProvider::OpenAI => {
                TranslationProviderImpl::OpenAI {
                    client: OpenAI::new_with_config(
                        config.get_api_key(),
                        config.get_endpoint(),
                        retry_count,
                        retry_backoff_ms,
                        rate_limit,
                    ),
                }
            },
            ConfigTranslationProvider::LMStudio => {
                // LM Studio often doesn't require an API key; use a default if empty
                let api_key = {
                    let k = config.get_api_key();
                    if k.is_empty() { "lm-studio".to_string() } else { k }
                };

                TranslationProviderImpl::LMStudio {
                    client: OpenAI::new_with_config(
                        api_key,
                        config.get_endpoint(),
                        retry_count,
                        retry_backoff_ms,
                        rate_limit,
                    ),
                }
            },
            ConfigTranslationProvider::Anthropic => {
                TranslationProviderImpl::Anthropic {
                    client: Anthropic::new_with_config(
                        config.get_api_key(),
                        config.get_endpoint(),
                        retry_count,
                        retry_backoff_ms,
                        rate_limit,
                    ),
                }
            },
        };

        Ok(Self { provider, config })
    }

    /// Build the user prompt for a single word, filling the configured
    /// template's placeholders.
    fn build_word_prompt(&self, word: &str, context: Option<&str>, target_language: &str) -> String {
        match context {
            Some(context) => self.config.common.word_prompt
                .replace("{word}", word)
                .replace("{context}", context)
                .replace("{target_language}", target_language),
            None => self.config.common.bare_word_prompt
                .replace("{word}", word)
                .replace("{target_language}", target_language),
        }
    }

    /// Test the connection to the translation provider
    pub async fn test_connection(&self, target_language: &str) -> Result<()> {
        match &self.provider {
            TranslationProviderImpl::Ollama { client } => {
                client.version().await
                    .map(|_| ())
                    .map_err(|e| anyhow!("Failed to connect to Ollama: {}", e))
            },
            // The remote APIs have no cheap health endpoint; do one tiny
            // word translation instead
            _ => {
                self.translate_word("hello", None, target_language).await
                    .map(|_| ())
                    .map_err(|e| anyhow!(
                        "Failed to connect to {}: {}",
                        self.config.provider.display_name(),
                        e
                    ))
            }
        }
    }

    /// Translate a single word through the configured provider.
    ///
    /// The raw model output is trimmed; an empty result is an error so the
    /// caller can substitute its placeholder.
    async fn request_word(
        &self,
        word: &str,
        context: Option<&str>,
        target_language: &str,
    ) -> Result<String> {
        let system_prompt = &self.config.common.system_prompt;
        let user_prompt = self.build_word_prompt(word, context, target_language);
        let temperature = self.config.common.temperature;

        let raw = match &self.provider {
            TranslationProviderImpl::Ollama { client } => {
                let request = GenerationRequest::new(self.config.get_model(), user_prompt)
                    .system(system_prompt)
                    .temperature(temperature)
                    .num_predict(WORD_MAX_TOKENS);

                client.generate(request).await?.response
            },
            TranslationProviderImpl::OpenAI { client }
            | TranslationProviderImpl::LMStudio { client } => {
                let request = OpenAIRequest::new(self.config.get_model())
                    .add_message("system", system_prompt)
                    .add_message("user", user_prompt)
                    .temperature(temperature)
                    .max_tokens(WORD_MAX_TOKENS);

                let response = client.complete(request).await?;
                OpenAI::extract_text_from_response(&response)
            },
            TranslationProviderImpl::Anthropic { client } => {
                let request = AnthropicRequest::new(self.config.get_model(), WORD_MAX_TOKENS)
                    .system(system_prompt)
                    .add_message("user", user_prompt)
                    .temperature(temperature);

                let response = client.complete(request).await?;
                Anthropic::extract_text_from_response(&response)
            },
        };

        let translated = raw.trim().to_string();
        if translated.is_empty() {
            return Err(anyhow!(
                "{} returned an empty translation for '{}'",
                self.config.provider.display_name(),
                word
            ));
        }

        Ok(translated)
    }
}

#[async_trait]
impl WordTranslator for TranslationService {
    async fn translate_word(
        &self,
        word: &str,
        context: Option<&str>,
        target_language: &str,
    ) -> Result<String> {
        self.request_word(word, context, target_language).await
    }
}
