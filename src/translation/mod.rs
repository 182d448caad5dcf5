/*!
 * Translation of segment texts.
 *
 * - `core`: `TranslationService`, the provider-backed `TextTranslator`
 * - `batch`: one-request batch translation with line-alignment retries
 */

use async_trait::async_trait;

use crate::errors::TranslationError;

/// Translates one block of text in the configured direction
#[async_trait]
pub trait TextTranslator: Send + Sync {
    /// Translate `block`, returning the provider's raw text
    async fn translate(&self, block: &str) -> Result<String, TranslationError>;
}

// Re-export main types for easier usage
pub use self::batch::{AlignmentStatus, BatchTranslation, BatchTranslator};
pub use self::core::TranslationService;

// Submodules
pub mod batch;
pub mod core;
