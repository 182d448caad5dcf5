/*!
 * Error types for the clipdeck application.
 *
 * This module contains custom error types for the different stages of the
 * pipeline, using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

impl ProviderError {
    /// Map a non-success HTTP status to the matching variant
    pub fn from_status(status_code: u16, message: String) -> Self {
        match status_code {
            401 | 403 => Self::AuthenticationError(message),
            429 => Self::RateLimitExceeded(message),
            _ => Self::ApiError { status_code, message },
        }
    }

    /// Whether retrying the same request may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::ConnectionError(_) | Self::RateLimitExceeded(_) => true,
            Self::ApiError { status_code, .. } => *status_code >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_connect() || error.is_timeout() {
            Self::ConnectionError(error.to_string())
        } else if error.is_decode() {
            Self::ParseError(error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }
}

/// Errors raised while turning provider output into segments
#[derive(Error, Debug)]
pub enum SegmentError {
    /// The provider (or the segment table) produced no segments at all
    #[error("Transcript contains no segments")]
    MissingTranscript,
}

/// Errors raised while partitioning segments into decks
#[derive(Error, Debug)]
pub enum DeckError {
    /// A deck without segments reached a stage that needs its first segment
    #[error("Deck {deck_number} has no segments")]
    EmptyDeck {
        /// 1-based deck number
        deck_number: usize,
    },

    /// Deck size must be at least one segment
    #[error("Invalid deck size: {0}")]
    InvalidDeckSize(usize),
}

/// Errors raised while cutting deck and part clips
#[derive(Error, Debug)]
pub enum ClipCutError {
    /// The trimming tool ran but reported a failure status
    #[error("Trimming {output} failed with status {code:?}: {message}")]
    TrimFailed {
        /// Clip that was being produced
        output: PathBuf,
        /// Exit code, if the process exited normally
        code: Option<i32>,
        /// Filtered diagnostic output of the tool
        message: String,
    },

    /// The trimming tool could not be started
    #[error("Failed to run trimming tool for {output}: {source}")]
    Spawn {
        /// Clip that was being produced
        output: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Creating or wiping the output directory tree failed
    #[error("Failed to prepare output directory {path}: {source}")]
    Layout {
        /// Directory being prepared
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The deck handed to the cutter is not cuttable
    #[error("Deck error: {0}")]
    Deck(#[from] DeckError),
}

/// Errors that can occur during speech-to-text
#[derive(Error, Debug)]
pub enum TranscriptionError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The audio file could not be read
    #[error("Audio file error: {0}")]
    Io(#[from] std::io::Error),

    /// The provider answered with something that is not a segmented transcript
    #[error("Invalid transcription response: {0}")]
    InvalidResponse(String),

    /// The persisted transcript could not be (de)serialized
    #[error("Transcript JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur during translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The provider answered without any text content
    #[error("Provider returned an empty response")]
    EmptyResponse,
}

/// Errors that can occur while reading or writing spreadsheets
#[derive(Error, Debug)]
pub enum TableError {
    /// The workbook could not be opened or parsed
    #[error("Failed to read spreadsheet {path}: {message}")]
    Read {
        /// Workbook path
        path: PathBuf,
        /// Reader diagnostic
        message: String,
    },

    /// The workbook could not be written
    #[error("Failed to write spreadsheet: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),

    /// A required header is absent
    #[error("Missing column '{0}' in segment table")]
    MissingColumn(String),

    /// A time cell could not be parsed
    #[error("Invalid timecode '{value}' in row {row}")]
    InvalidTimecode {
        /// 1-based spreadsheet row
        row: usize,
        /// Raw cell value
        value: String,
    },

    /// A row violates the segment invariants
    #[error("Invalid row {row}: {reason}")]
    InvalidRow {
        /// 1-based spreadsheet row
        row: usize,
        /// What is wrong with it
        reason: String,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from segmentation
    #[error("Segment error: {0}")]
    Segment(#[from] SegmentError),

    /// Error from deck planning
    #[error("Deck error: {0}")]
    Deck(#[from] DeckError),

    /// Error from clip cutting
    #[error("Clip error: {0}")]
    ClipCut(#[from] ClipCutError),

    /// Error from transcription
    #[error("Transcription error: {0}")]
    Transcription(#[from] TranscriptionError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Error from spreadsheet handling
    #[error("Table error: {0}")]
    Table(#[from] TableError),
}
