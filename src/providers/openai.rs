use async_trait::async_trait;
use log::debug;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::segmenter::TranscriptSegment;

use super::{check_status, with_retry, Provider};

/// OpenAI client, also used for OpenAI-compatible servers such as LM Studio
#[derive(Debug, Clone)]
pub struct OpenAI {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// Base URL ending in the API version, e.g. `https://api.openai.com/v1`
    endpoint: String,
    /// Maximum number of retries of a transient failure
    max_retries: u32,
    /// Base backoff time in milliseconds
    backoff_base_ms: u64,
}

/// Chat completion request
#[derive(Debug, Clone, Serialize)]
pub struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

/// Chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIMessage {
    pub role: String,
    #[serde(default)]
    pub content: Option<String>,
}

/// Chat completion response
#[derive(Debug, Deserialize)]
pub struct OpenAIResponse {
    pub choices: Vec<OpenAIChoice>,
    #[serde(default)]
    pub usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
pub struct OpenAIChoice {
    pub message: OpenAIMessage,
}

#[derive(Debug, Deserialize)]
pub struct OpenAIUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
}

/// Audio transcription upload
#[derive(Debug, Clone)]
pub struct TranscriptionRequest {
    pub model: String,
    /// ISO 639-1 hint, omitted when `None`
    pub language: Option<String>,
    pub file_name: String,
    pub audio: Vec<u8>,
}

/// `verbose_json` transcription response
#[derive(Debug, Clone, Deserialize)]
pub struct VerboseTranscription {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub segments: Option<Vec<TranscriptSegment>>,
}

impl OpenAIRequest {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn add_message(mut self, role: impl Into<String>, content: impl Into<String>) -> Self {
        self.messages.push(OpenAIMessage {
            role: role.into(),
            content: Some(content.into()),
        });
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

impl OpenAI {
    /// Create a new OpenAI client
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self::new_with_config(api_key, endpoint, 120, 3, 1000)
    }

    /// Create a new OpenAI client with explicit timeout and retry settings
    pub fn new_with_config(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            max_retries,
            backoff_base_ms,
        }
    }

    fn url(&self, path: &str) -> String {
        let base = if self.endpoint.is_empty() {
            "https://api.openai.com/v1"
        } else {
            self.endpoint.trim_end_matches('/')
        };
        format!("{}/{}", base, path)
    }

    /// Upload an audio file and return its segmented transcript
    pub async fn transcribe(
        &self,
        request: TranscriptionRequest,
    ) -> Result<VerboseTranscription, ProviderError> {
        let url = self.url("audio/transcriptions");
        debug!(
            "Uploading {} ({} bytes) to {}",
            request.file_name,
            request.audio.len(),
            url
        );

        let request = &request;
        let url = &url;
        with_retry("OpenAI transcription", self.max_retries, self.backoff_base_ms, || async move {
            let file = Part::bytes(request.audio.clone())
                .file_name(request.file_name.clone())
                .mime_str("audio/mpeg")?;
            let mut form = Form::new()
                .text("model", request.model.clone())
                .text("response_format", "verbose_json")
                .text("timestamp_granularities[]", "segment")
                .part("file", file);
            if let Some(language) = &request.language {
                form = form.text("language", language.clone());
            }

            let response = self
                .client
                .post(url)
                .bearer_auth(&self.api_key)
                .multipart(form)
                .send()
                .await?;
            let response = check_status("OpenAI", response).await?;
            response
                .json::<VerboseTranscription>()
                .await
                .map_err(|e| ProviderError::ParseError(e.to_string()))
        })
        .await
    }
}

#[async_trait]
impl Provider for OpenAI {
    type Request = OpenAIRequest;
    type Response = OpenAIResponse;

    async fn complete(&self, request: OpenAIRequest) -> Result<OpenAIResponse, ProviderError> {
        let url = self.url("chat/completions");
        let (request, url) = (&request, &url);

        with_retry("OpenAI", self.max_retries, self.backoff_base_ms, || async move {
            let response = self
                .client
                .post(url)
                .bearer_auth(&self.api_key)
                .json(request)
                .send()
                .await?;
            let response = check_status("OpenAI", response).await?;
            response
                .json::<OpenAIResponse>()
                .await
                .map_err(|e| ProviderError::ParseError(e.to_string()))
        })
        .await
    }

    fn extract_text(response: &OpenAIResponse) -> String {
        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .unwrap_or_default()
    }
}
