/*!
 * Core translation service implementation.
 *
 * This module contains the TranslationService struct, the `TextTranslator`
 * backed by the provider selected in the configuration.
 */

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::{debug, info};
use url::Url;

use crate::app_config::{TranslationConfig, TranslationProvider as ConfigTranslationProvider};
use crate::errors::TranslationError;
use crate::language_utils;
use crate::providers::anthropic::{Anthropic, AnthropicRequest};
use crate::providers::ollama::{ChatRequest, Ollama};
use crate::providers::openai::{OpenAI, OpenAIRequest};
use crate::providers::Provider;

use super::TextTranslator;

/// Normalize an endpoint into a base URL with scheme and without trailing slash
fn parse_endpoint(endpoint: &str) -> Result<String> {
    if endpoint.trim().is_empty() {
        return Err(anyhow!("Endpoint cannot be empty"));
    }

    let url = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        Url::parse(endpoint)?
    } else {
        Url::parse(&format!("http://{}", endpoint))?
    };

    if url.host_str().is_none() {
        return Err(anyhow!("Invalid host in endpoint: {}", endpoint));
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}

/// Translation provider implementation variants
#[derive(Debug)]
enum TranslationProviderImpl {
    /// Ollama LLM service
    Ollama { client: Ollama },

    /// OpenAI API service
    OpenAI { client: OpenAI },

    /// LM Studio local server (OpenAI-compatible)
    LMStudio { client: OpenAI },

    /// Anthropic API service
    Anthropic { client: Anthropic },
}

/// Main translation service
#[derive(Debug)]
pub struct TranslationService {
    /// Provider implementation
    provider: TranslationProviderImpl,

    /// Configuration for the translation service
    pub config: TranslationConfig,

    /// Rendered system prompt
    system_prompt: String,

    /// English names of the languages, substituted into the user prompt
    source_language: String,
    target_language: String,
}

impl TranslationService {
    /// Create a new translation service translating `source_language` into `target_language`
    pub fn new(config: TranslationConfig, source_language: &str, target_language: &str) -> Result<Self> {
        let timeout_secs = config.get_timeout_secs();
        let retry_count = config.common.retry_count;
        let retry_backoff_ms = config.common.retry_backoff_ms;
        let endpoint = parse_endpoint(&config.get_endpoint())?;

        let provider = match config.provider {
            ConfigTranslationProvider::Ollama => TranslationProviderImpl::Ollama {
                client: Ollama::new_with_config(endpoint, timeout_secs, retry_count, retry_backoff_ms),
            },
            ConfigTranslationProvider::OpenAI => TranslationProviderImpl::OpenAI {
                client: OpenAI::new_with_config(
                    config.get_api_key(),
                    endpoint,
                    timeout_secs,
                    retry_count,
                    retry_backoff_ms,
                ),
            },
            ConfigTranslationProvider::LMStudio => {
                // LM Studio accepts any key
                let api_key = {
                    let k = config.get_api_key();
                    if k.is_empty() { "lm-studio".to_string() } else { k }
                };
                TranslationProviderImpl::LMStudio {
                    client: OpenAI::new_with_config(
                        api_key,
                        endpoint,
                        timeout_secs,
                        retry_count,
                        retry_backoff_ms,
                    ),
                }
            }
            ConfigTranslationProvider::Anthropic => TranslationProviderImpl::Anthropic {
                client: Anthropic::new_with_config(
                    config.get_api_key(),
                    endpoint,
                    config.get_model(),
                    timeout_secs,
                    retry_count,
                    retry_backoff_ms,
                ),
            },
        };

        let source_language = language_utils::get_language_name(source_language)?;
        let target_language = language_utils::get_language_name(target_language)?;
        let system_prompt = render_prompt(
            &config.common.system_prompt,
            &source_language,
            &target_language,
            "",
        );

        info!(
            "Translating {} -> {} with {} ({})",
            source_language,
            target_language,
            config.provider.display_name(),
            config.get_model()
        );

        Ok(Self {
            provider,
            config,
            system_prompt,
            source_language,
            target_language,
        })
    }

    /// User message for a block of text
    pub fn user_prompt(&self, block: &str) -> String {
        render_prompt(
            &self.config.common.user_prompt,
            &self.source_language,
            &self.target_language,
            block,
        )
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }
}

/// Substitute the `{source_language}`, `{target_language}` and `{text}` placeholders
pub fn render_prompt(template: &str, source_language: &str, target_language: &str, text: &str) -> String {
    template
        .replace("{source_language}", source_language)
        .replace("{target_language}", target_language)
        .replace("{text}", text)
}

#[async_trait]
impl TextTranslator for TranslationService {
    async fn translate(&self, block: &str) -> Result<String, TranslationError> {
        let model = self.config.get_model();
        let temperature = self.config.common.temperature;
        let max_tokens = self.config.get_max_tokens();
        let user_prompt = self.user_prompt(block);

        debug!("Sending {} chars to {}", user_prompt.len(), self.config.provider);

        let text = match &self.provider {
            TranslationProviderImpl::Ollama { client } => {
                let request = ChatRequest::new(model)
                    .add_message("system", self.system_prompt.as_str())
                    .add_message("user", user_prompt)
                    .temperature(temperature)
                    .num_predict(max_tokens);
                Ollama::extract_text(&client.complete(request).await?)
            }
            TranslationProviderImpl::OpenAI { client }
            | TranslationProviderImpl::LMStudio { client } => {
                let request = OpenAIRequest::new(model)
                    .add_message("system", self.system_prompt.as_str())
                    .add_message("user", user_prompt)
                    .temperature(temperature)
                    .max_tokens(max_tokens);
                OpenAI::extract_text(&client.complete(request).await?)
            }
            TranslationProviderImpl::Anthropic { client } => {
                let request = AnthropicRequest::new(model, max_tokens)
                    .system(self.system_prompt.as_str())
                    .add_message("user", user_prompt)
                    .temperature(temperature);
                Anthropic::extract_text(&client.complete(request).await?)
            }
        };

        if text.trim().is_empty() {
            return Err(TranslationError::EmptyResponse);
        }
        Ok(text)
    }
}
