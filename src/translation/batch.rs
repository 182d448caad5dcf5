/*!
 * Batch translation processing.
 *
 * All segment texts of a movie are sent as one newline-joined block. The
 * answer is accepted only when it has exactly one line per segment; otherwise
 * the block is requested again until the attempt budget is spent, after which
 * every segment gets an empty translation and the result is marked exhausted.
 */

use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::TranslationError;
use crate::records::ClipRecord;

use super::TextTranslator;

/// Marker standing in for a line break inside one segment
pub const LINE_BREAK_MARKER: &str = "<br>";

/// Marker standing in for a segment without text
pub const EMPTY_LINE_MARKER: &str = "<empty>";

static LINE_BREAK_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());
static EMPTY_LINE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^<empty\s*/?>$").unwrap());

/// How the batch translation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignmentStatus {
    /// One translated line per source line
    Aligned,
    /// Every attempt came back with the wrong number of lines
    Exhausted,
}

/// Result of translating a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchTranslation {
    /// One entry per source text, empty when exhausted
    pub lines: Vec<String>,
    pub status: AlignmentStatus,
    /// Number of requests made
    pub attempts: u32,
}

impl BatchTranslation {
    fn empty() -> Self {
        Self {
            lines: Vec::new(),
            status: AlignmentStatus::Aligned,
            attempts: 0,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.status == AlignmentStatus::Exhausted
    }
}

enum BatchState {
    Pending,
    Requesting { attempt: u32 },
    Aligned { attempt: u32, lines: Vec<String> },
    Misaligned { attempt: u32, received: usize },
    Done(BatchTranslation),
}

/// Batch translator enforcing line alignment
pub struct BatchTranslator<'a> {
    translator: &'a dyn TextTranslator,
    max_attempts: u32,
}

impl<'a> BatchTranslator<'a> {
    /// Create a batch translator making at most `max_attempts` requests (at least one)
    pub fn new(translator: &'a dyn TextTranslator, max_attempts: u32) -> Self {
        Self {
            translator,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Translate texts, one output line per input text
    pub async fn translate(&self, texts: &[&str]) -> Result<BatchTranslation, TranslationError> {
        let expected = texts.len();
        let block = join_block(texts);
        let mut state = BatchState::Pending;

        loop {
            state = match state {
                BatchState::Pending => {
                    if expected == 0 {
                        BatchState::Done(BatchTranslation::empty())
                    } else {
                        BatchState::Requesting { attempt: 1 }
                    }
                }
                BatchState::Requesting { attempt } => {
                    debug!(
                        "Translation request {}/{} for {} lines",
                        attempt, self.max_attempts, expected
                    );
                    let lines = match self.translator.translate(&block).await {
                        Ok(response) => split_lines(&response),
                        // An empty answer is retried like any other misaligned one
                        Err(TranslationError::EmptyResponse) => Vec::new(),
                        Err(e) => return Err(e),
                    };
                    if lines.len() == expected {
                        BatchState::Aligned { attempt, lines }
                    } else {
                        BatchState::Misaligned {
                            attempt,
                            received: lines.len(),
                        }
                    }
                }
                BatchState::Aligned { attempt, lines } => {
                    info!("Translated {} lines in {} request(s)", expected, attempt);
                    BatchState::Done(BatchTranslation {
                        lines: lines.iter().map(|line| decode_line(line)).collect(),
                        status: AlignmentStatus::Aligned,
                        attempts: attempt,
                    })
                }
                BatchState::Misaligned { attempt, received } => {
                    debug!(
                        "Translation returned {} lines, expected {} (attempt {})",
                        received, expected, attempt
                    );
                    if attempt >= self.max_attempts {
                        warn!(
                            "Translation never aligned after {} attempts; leaving {} translations empty",
                            attempt, expected
                        );
                        BatchState::Done(BatchTranslation {
                            lines: vec![String::new(); expected],
                            status: AlignmentStatus::Exhausted,
                            attempts: attempt,
                        })
                    } else {
                        BatchState::Requesting {
                            attempt: attempt + 1,
                        }
                    }
                }
                BatchState::Done(result) => return Ok(result),
            };
        }
    }

    /// Translate the source texts of `records` and fill their translated text
    pub async fn translate_records(
        &self,
        records: &mut [ClipRecord],
    ) -> Result<BatchTranslation, TranslationError> {
        let texts: Vec<&str> = records.iter().map(|r| r.source_text.as_str()).collect();
        let result = self.translate(&texts).await?;

        for (record, line) in records.iter_mut().zip(&result.lines) {
            record.translated_text = line.clone();
        }
        Ok(result)
    }
}

/// Join texts into one request block, one text per line
pub fn join_block(texts: &[&str]) -> String {
    texts
        .iter()
        .map(|text| encode_line(text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Split a response into trimmed lines
pub fn split_lines(response: &str) -> Vec<String> {
    response
        .trim()
        .split('\n')
        .map(|line| line.trim().to_string())
        .collect()
}

// Every request line carries text, so trimming the response never drops a segment
fn encode_line(text: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        return EMPTY_LINE_MARKER.to_string();
    }
    text.replace("\r\n", LINE_BREAK_MARKER)
        .replace('\n', LINE_BREAK_MARKER)
}

fn decode_line(line: &str) -> String {
    if EMPTY_LINE_REGEX.is_match(line) {
        return String::new();
    }
    LINE_BREAK_REGEX.replace_all(line, "\n").into_owned()
}
