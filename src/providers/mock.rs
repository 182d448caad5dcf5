/*!
 * Mock translator implementations for testing.
 *
 * This module provides translators that simulate different behaviors:
 * - `MockTranslator::working()` - Always answers one line per input line
 * - `MockTranslator::dropping_last_line()` - Always answers one line short
 * - `MockTranslator::aligned_on(n)` - Misaligned until the n-th request
 * - `MockTranslator::failing()` - Always fails with a provider error
 */

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::{ProviderError, TranslationError};
use crate::translation::TextTranslator;

/// Behavior mode for the mock translator
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Prefixes every line with `[TR] `
    Working,
    /// Returns every line but the last
    DropLastLine,
    /// Drops the last line until the given 1-based request, then works
    AlignedOn { attempt: usize },
    /// Always fails with an error
    Failing,
}

/// Mock translator counting the requests it receives
#[derive(Debug)]
pub struct MockTranslator {
    behavior: MockBehavior,
    request_count: Arc<AtomicUsize>,
    custom_response: Option<fn(&str) -> String>,
}

impl MockTranslator {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            custom_response: None,
        }
    }

    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    pub fn dropping_last_line() -> Self {
        Self::new(MockBehavior::DropLastLine)
    }

    pub fn aligned_on(attempt: usize) -> Self {
        Self::new(MockBehavior::AlignedOn { attempt })
    }

    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Answer every request with `generator(block)`
    pub fn with_custom_response(mut self, generator: fn(&str) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    fn translate_lines(block: &str) -> Vec<String> {
        block.split('\n').map(|line| format!("[TR] {}", line)).collect()
    }
}

impl Clone for MockTranslator {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            request_count: Arc::clone(&self.request_count),
            custom_response: self.custom_response,
        }
    }
}

#[async_trait]
impl TextTranslator for MockTranslator {
    async fn translate(&self, block: &str) -> Result<String, TranslationError> {
        let attempt = self.request_count.fetch_add(1, Ordering::SeqCst) + 1;

        if let Some(generator) = self.custom_response {
            return Ok(generator(block));
        }

        let mut lines = Self::translate_lines(block);
        match self.behavior {
            MockBehavior::Working => {}
            MockBehavior::DropLastLine => {
                lines.pop();
            }
            MockBehavior::AlignedOn { attempt: aligned } => {
                if attempt < aligned {
                    lines.pop();
                }
            }
            MockBehavior::Failing => {
                return Err(ProviderError::ApiError {
                    status_code: 500,
                    message: "Mock provider failure".to_string(),
                }
                .into());
            }
        }
        Ok(lines.join("\n"))
    }
}
