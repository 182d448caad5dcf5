/*!
 * # clipdeck - translated clip decks from long-form video
 *
 * A Rust library that turns a movie into short, translated,
 * timestamp-aligned clips grouped into fixed-size decks.
 *
 * ## Features
 *
 * - Extract the audio track and transcribe it into time-coded segments
 * - Stitch segment boundaries so consecutive segments abut
 * - Group segments into decks and compute deck-relative offsets
 * - Cut one clip per deck and one per segment with ffmpeg
 * - Translate all segment texts in one line-aligned request using:
 *   - OpenAI API
 *   - Anthropic API
 *   - Ollama (local LLM)
 *   - LM Studio (OpenAI-compatible)
 * - Read hand-edited segment tables and write the final table as `.xlsx`
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `segmenter`: Provider segments to stitched segments
 * - `deck_planner`: Deck partitioning and relative offsets
 * - `clip_cutter`: Deck and part clip layout
 * - `records`: Final table rows
 * - `translation`: Line-aligned batch translation:
 *   - `translation::core`: Provider-backed translator
 *   - `translation::batch`: Alignment retries
 * - `transcription`: Speech-to-text and transcript persistence
 * - `media`: ffmpeg trimming and audio extraction
 * - `table`: Spreadsheet input and output
 * - `timecode`: `HH:MM:SS` helpers
 * - `file_utils`: Artifact paths and file system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `providers`: Client implementations for the remote services
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod clip_cutter;
pub mod deck_planner;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod media;
pub mod providers;
pub mod records;
pub mod segmenter;
pub mod table;
pub mod timecode;
pub mod transcription;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Collaborators, Controller, SubmitReport, TranscribeReport};
pub use deck_planner::Deck;
pub use errors::{
    AppError, ClipCutError, DeckError, ProviderError, SegmentError, TableError, TranscriptionError,
    TranslationError,
};
pub use records::ClipRecord;
pub use segmenter::{Segment, TranscriptSegment};
pub use translation::{AlignmentStatus, BatchTranslation, BatchTranslator, TextTranslator, TranslationService};
