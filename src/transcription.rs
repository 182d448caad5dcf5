/*!
 * Speech-to-text.
 *
 * `SpeechToText` is the seam the pipeline calls; `WhisperTranscriber` talks
 * to an OpenAI-compatible `/audio/transcriptions` endpoint. Transcripts are
 * persisted as JSON next to the extracted audio so a second run can skip the
 * upload.
 */

use async_trait::async_trait;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::app_config::{TranscriptionConfig, TranslationCommonConfig};
use crate::errors::TranscriptionError;
use crate::language_utils;
use crate::providers::openai::{OpenAI, TranscriptionRequest, VerboseTranscription};
use crate::segmenter::TranscriptSegment;

/// A transcript as returned by the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    /// Full text
    #[serde(default)]
    pub text: String,
    /// Detected or requested language
    #[serde(default)]
    pub language: Option<String>,
    /// Audio length in seconds
    #[serde(default)]
    pub duration: Option<f64>,
    /// Time-coded segments
    #[serde(default)]
    pub segments: Vec<TranscriptSegment>,
}

impl Transcript {
    pub fn from_segments(segments: Vec<TranscriptSegment>) -> Self {
        let text = segments
            .iter()
            .map(|s| s.text.trim())
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            text,
            language: None,
            duration: None,
            segments,
        }
    }

    /// Write the transcript as pretty JSON, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), TranscriptionError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        debug!("Saved transcript with {} segments to {:?}", self.segments.len(), path);
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, TranscriptionError> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

impl TryFrom<VerboseTranscription> for Transcript {
    type Error = TranscriptionError;

    fn try_from(response: VerboseTranscription) -> Result<Self, Self::Error> {
        let segments = response.segments.ok_or_else(|| {
            TranscriptionError::InvalidResponse(
                "response has no segments; was verbose_json requested?".to_string(),
            )
        })?;
        Ok(Self {
            text: response.text,
            language: response.language,
            duration: response.duration,
            segments,
        })
    }
}

/// Transcribes an audio file into time-coded segments
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Full transcript including metadata
    async fn transcribe_full(&self, audio_path: &Path) -> Result<Transcript, TranscriptionError>;

    /// Segments only
    async fn transcribe(&self, audio_path: &Path) -> Result<Vec<TranscriptSegment>, TranscriptionError> {
        Ok(self.transcribe_full(audio_path).await?.segments)
    }
}

/// Whisper-style transcription over the OpenAI audio API
#[derive(Debug, Clone)]
pub struct WhisperTranscriber {
    client: OpenAI,
    model: String,
    language: Option<String>,
}

impl WhisperTranscriber {
    pub fn from_config(config: &TranscriptionConfig, retry: &TranslationCommonConfig) -> Self {
        let language = if config.language.trim().is_empty() {
            None
        } else {
            // The API takes ISO 639-1 hints
            Some(
                language_utils::normalize_to_part1_or_part2t(&config.language)
                    .unwrap_or_else(|_| config.language.clone()),
            )
        };

        Self {
            client: OpenAI::new_with_config(
                config.get_api_key(),
                config.endpoint.clone(),
                config.timeout_secs,
                retry.retry_count,
                retry.retry_backoff_ms,
            ),
            model: config.model.clone(),
            language,
        }
    }
}

#[async_trait]
impl SpeechToText for WhisperTranscriber {
    async fn transcribe_full(&self, audio_path: &Path) -> Result<Transcript, TranscriptionError> {
        let audio = tokio::fs::read(audio_path).await?;
        let file_name = audio_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio.mp3".to_string());

        info!("Transcribing {:?} with {}", audio_path, self.model);
        let response = self
            .client
            .transcribe(TranscriptionRequest {
                model: self.model.clone(),
                language: self.language.clone(),
                file_name,
                audio,
            })
            .await?;

        let transcript = Transcript::try_from(response)?;
        info!("Received {} segments", transcript.segments.len());
        Ok(transcript)
    }
}
