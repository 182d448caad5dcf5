/*!
 * Provider implementations for the remote services the pipeline talks to.
 *
 * This module contains client implementations for:
 * - OpenAI: chat completions and audio transcription (also used for LM Studio)
 * - Anthropic: messages API
 * - Ollama: local LLM server
 */

use async_trait::async_trait;
use log::warn;
use std::fmt::Debug;
use std::future::Future;
use std::time::Duration;

use crate::errors::ProviderError;

/// Common trait for all LLM providers
///
/// This trait defines the interface that all provider implementations must follow,
/// allowing them to be used interchangeably in the translation service.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// The request type for this provider
    type Request: Send + Sync;

    /// The response type for this provider
    type Response: Send + Sync;

    /// Complete a request using this provider
    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError>;

    /// Extract text from the provider response
    fn extract_text(response: &Self::Response) -> String;
}

/// Retry `operation` on transient failures with exponential backoff
///
/// Makes at most `max_retries + 1` calls. Non-transient errors are returned at once.
pub(crate) async fn with_retry<T, F, Fut>(
    label: &str,
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, ProviderError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ProviderError>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && attempt < max_retries => {
                attempt += 1;
                let backoff_ms = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(16));
                warn!(
                    "{} request failed ({}), retry {}/{} in {}ms",
                    label, e, attempt, max_retries, backoff_ms
                );
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Turn a non-success HTTP response into a `ProviderError`
pub(crate) async fn check_status(
    label: &str,
    response: reqwest::Response,
) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Failed to get error response text".to_string());
    log::error!("{} API error ({}): {}", label, status, error_text);
    Err(ProviderError::from_status(status.as_u16(), error_text))
}

pub mod anthropic;
pub mod mock;
pub mod ollama;
pub mod openai;
