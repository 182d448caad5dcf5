/*!
 * Tests for line-aligned batch translation
 */

use clipdeck::errors::TranslationError;
use clipdeck::providers::mock::MockTranslator;
use clipdeck::records::ClipRecord;
use clipdeck::translation::{AlignmentStatus, BatchTranslator};
use std::time::Duration;

fn record(text: &str) -> ClipRecord {
    ClipRecord {
        deck_number: 1,
        part_number: 1,
        order: 1,
        start_offset: Duration::ZERO,
        end_offset: Duration::ZERO,
        source_language: "EN".to_string(),
        source_text: text.to_string(),
        translated_text: String::new(),
        deck_filename: String::new(),
        part_filename: String::new(),
    }
}

#[tokio::test]
async fn test_translate_withAlignedAnswer_shouldMakeOneRequest() {
    let translator = MockTranslator::working();
    let batch = BatchTranslator::new(&translator, 10);

    let result = batch.translate(&["one", "two", "three"]).await.unwrap();

    assert_eq!(result.status, AlignmentStatus::Aligned);
    assert_eq!(result.lines, vec!["[TR] one", "[TR] two", "[TR] three"]);
    assert_eq!(result.attempts, 1);
    assert_eq!(translator.request_count(), 1);
}

#[tokio::test]
async fn test_translate_withAlwaysShortAnswer_shouldExhaustAttempts() {
    let translator = MockTranslator::dropping_last_line();
    let batch = BatchTranslator::new(&translator, 10);

    let result = batch.translate(&["one", "two", "three"]).await.unwrap();

    assert!(result.is_exhausted());
    assert_eq!(result.lines, vec![String::new(); 3]);
    assert_eq!(result.attempts, 10);
    assert_eq!(translator.request_count(), 10);
}

#[tokio::test]
async fn test_translate_withLateAlignment_shouldStopAtFirstAlignedAnswer() {
    let translator = MockTranslator::aligned_on(3);
    let batch = BatchTranslator::new(&translator, 10);

    let result = batch.translate(&["one", "two"]).await.unwrap();

    assert_eq!(result.status, AlignmentStatus::Aligned);
    assert_eq!(result.attempts, 3);
    assert_eq!(translator.request_count(), 3);
}

#[tokio::test]
async fn test_translate_withZeroMaxAttempts_shouldStillRequestOnce() {
    let translator = MockTranslator::dropping_last_line();
    let batch = BatchTranslator::new(&translator, 0);

    let result = batch.translate(&["one", "two"]).await.unwrap();

    assert!(result.is_exhausted());
    assert_eq!(translator.request_count(), 1);
}

#[tokio::test]
async fn test_translate_withNoTexts_shouldNotCallProvider() {
    let translator = MockTranslator::working();
    let result = BatchTranslator::new(&translator, 10).translate(&[]).await.unwrap();

    assert!(result.lines.is_empty());
    assert_eq!(result.status, AlignmentStatus::Aligned);
    assert_eq!(translator.request_count(), 0);
}

#[tokio::test]
async fn test_translate_withProviderFailure_shouldPropagate() {
    let translator = MockTranslator::failing();
    let result = BatchTranslator::new(&translator, 10).translate(&["one"]).await;

    assert!(matches!(result, Err(TranslationError::Provider(_))));
    assert_eq!(translator.request_count(), 1);
}

#[tokio::test]
async fn test_translate_withMultilineSegment_shouldKeepItOnOneRequestLine() {
    let translator = MockTranslator::working();
    let batch = BatchTranslator::new(&translator, 10);

    let result = batch.translate(&["first\nsecond", "third"]).await.unwrap();

    assert_eq!(result.status, AlignmentStatus::Aligned);
    assert_eq!(result.lines, vec!["[TR] first\nsecond", "[TR] third"]);
}

#[tokio::test]
async fn test_translate_withPaddedAnswer_shouldTrimLines() {
    let translator = MockTranslator::working().with_custom_response(|_| "\n  bir \n iki\n".to_string());
    let result = BatchTranslator::new(&translator, 10)
        .translate(&["one", "two"])
        .await
        .unwrap();

    assert_eq!(result.lines, vec!["bir", "iki"]);
}

#[tokio::test]
async fn test_translate_withEmptyEdgeTexts_shouldStayAligned() {
    let translator = MockTranslator::working().with_custom_response(|block| block.to_string());
    let batch = BatchTranslator::new(&translator, 3);

    let result = batch.translate(&["Hello", "World", ""]).await.unwrap();

    assert_eq!(result.status, AlignmentStatus::Aligned);
    assert_eq!(result.attempts, 1);
    assert_eq!(result.lines, vec!["Hello", "World", ""]);

    let result = batch.translate(&["", "Hello"]).await.unwrap();
    assert_eq!(result.status, AlignmentStatus::Aligned);
    assert_eq!(result.lines, vec!["", "Hello"]);
}

#[tokio::test]
async fn test_translateRecords_shouldFillTranslatedTextInOrder() {
    let translator = MockTranslator::working();
    let mut records = vec![record("Hello"), record("World")];

    let result = BatchTranslator::new(&translator, 10)
        .translate_records(&mut records)
        .await
        .unwrap();

    assert_eq!(result.status, AlignmentStatus::Aligned);
    assert_eq!(records[0].translated_text, "[TR] Hello");
    assert_eq!(records[1].translated_text, "[TR] World");
}

#[tokio::test]
async fn test_translateRecords_whenExhausted_shouldLeaveTranslationsEmpty() {
    let translator = MockTranslator::dropping_last_line();
    let mut records = vec![record("Hello"), record("World")];

    let result = BatchTranslator::new(&translator, 2)
        .translate_records(&mut records)
        .await
        .unwrap();

    assert!(result.is_exhausted());
    assert!(records.iter().all(|r| r.translated_text.is_empty()));
    assert_eq!(translator.request_count(), 2);
}
