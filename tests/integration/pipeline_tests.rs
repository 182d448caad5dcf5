/*!
 * End-to-end pipeline tests with mocked collaborators
 */

use anyhow::Result;

use clipdeck::app_controller::Controller;
use clipdeck::errors::{ClipCutError, SegmentError};
use clipdeck::providers::mock::MockTranslator;
use clipdeck::segmenter::TranscriptSegment;
use clipdeck::table;
use clipdeck::translation::AlignmentStatus;

use crate::common::mock_providers::{MockCollaborators, RecordingTrimmer};
use crate::common::{self, secs};

fn hello_world() -> Vec<TranscriptSegment> {
    vec![
        TranscriptSegment::new("Hello", 0.0, 3.0),
        TranscriptSegment::new("World", 10.0, 14.0),
    ]
}

#[tokio::test]
async fn test_submit_withHelloWorld_shouldProduceOneDeckWithRelativeOffsets() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = common::config_in(temp_dir.path());
    common::create_test_video(&config, "film")?;
    let mocks = MockCollaborators::new(hello_world());
    let controller = Controller::with_collaborators(config, mocks.collaborators()).with_progress(false);

    let report = controller.submit("film", None).await?;

    assert_eq!(report.deck_count, 1);
    assert_eq!(report.records.len(), 2);
    assert_eq!(report.records[0].start_offset, secs(0));
    assert_eq!(report.records[1].start_offset, secs(10));
    assert_eq!(report.records[0].translated_text, "[TR] Hello");
    assert_eq!(report.records[1].translated_text, "[TR] World");
    assert_eq!(report.translation.status, AlignmentStatus::Aligned);

    // Stitched boundary in the generated segment table
    let segments = table::read_segment_table(&controller.paths("film").segment_table())?;
    assert_eq!(segments[0].end, Some(secs(10)));

    // Deck clip spans the whole deck
    let calls = mocks.trimmer.calls();
    assert_eq!((calls[0].start, calls[0].end), (secs(0), Some(secs(14))));

    assert_eq!(report.clips.len(), 3);
    assert_eq!(report.clips_on_disk, 3);
    assert!(report.final_table.is_file());
    assert_eq!(mocks.translator.request_count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_submit_twice_shouldWriteIdenticalFinalTable() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = common::config_in(temp_dir.path());
    common::create_test_video(&config, "film")?;
    let mocks = MockCollaborators::new(common::provider_segments(23, 4.0, 3.0));
    let controller = Controller::with_collaborators(config, mocks.collaborators()).with_progress(false);

    let first = controller.submit("film", None).await?;
    let first_bytes = std::fs::read(&first.final_table)?;
    let second = controller.submit("film", None).await?;
    let second_bytes = std::fs::read(&second.final_table)?;

    assert_eq!(first.deck_count, 3);
    assert_eq!(first_bytes, second_bytes);
    // The transcript is memoized, clips are cut again
    assert_eq!(mocks.speech_to_text.call_count(), 1);
    assert_eq!(mocks.trimmer.calls().len(), 2 * (23 + 3));
    Ok(())
}

#[tokio::test]
async fn test_transcribe_withExistingArtifacts_shouldSkipProviderCalls() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = common::config_in(temp_dir.path());
    common::create_test_video(&config, "film")?;
    let mocks = MockCollaborators::new(hello_world());
    let controller = Controller::with_collaborators(config, mocks.collaborators()).with_progress(false);

    let first = controller.transcribe("film", false).await?;
    assert!(first.reused.is_empty());
    assert_eq!(first.segment_count, 2);

    let second = controller.transcribe("film", false).await?;
    assert_eq!(second.reused, vec!["audio", "transcript", "segment table"]);
    assert_eq!(mocks.audio_extractor.call_count(), 1);
    assert_eq!(mocks.speech_to_text.call_count(), 1);

    let forced = controller.transcribe("film", true).await?;
    assert!(forced.reused.is_empty());
    assert_eq!(mocks.audio_extractor.call_count(), 2);
    assert_eq!(mocks.speech_to_text.call_count(), 2);
    Ok(())
}

#[tokio::test]
async fn test_transcribe_withMissingSegmentTable_shouldRebuildFromTranscript() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = common::config_in(temp_dir.path());
    common::create_test_video(&config, "film")?;
    let mocks = MockCollaborators::new(hello_world());
    let controller = Controller::with_collaborators(config, mocks.collaborators()).with_progress(false);

    let first = controller.transcribe("film", false).await?;
    std::fs::remove_file(&first.segment_table)?;
    let second = controller.transcribe("film", false).await?;

    assert_eq!(second.reused, vec!["audio", "transcript"]);
    assert!(second.segment_table.is_file());
    assert_eq!(mocks.speech_to_text.call_count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_submit_withEditedTable_shouldUseItWithoutTranscribing() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = common::config_in(temp_dir.path());
    common::create_test_video(&config, "film")?;
    let mocks = MockCollaborators::new(hello_world());
    let controller = Controller::with_collaborators(config, mocks.collaborators()).with_progress(false);

    let edited = temp_dir.path().join("edited.xlsx");
    table::write_segment_table(&edited, &common::stitched_segments(4, 5))?;

    let report = controller.submit("film", Some(edited.as_path())).await?;

    assert_eq!(report.records.len(), 4);
    assert_eq!(report.records[0].source_text, "line 1");
    assert_eq!(mocks.speech_to_text.call_count(), 0);
    assert_eq!(mocks.audio_extractor.call_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_submit_withFailingTrimmer_shouldPropagateTrimFailed() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = common::config_in(temp_dir.path());
    common::create_test_video(&config, "film")?;
    let mocks = MockCollaborators::new(hello_world()).with_trimmer(RecordingTrimmer::failing_on(1, 1));
    let controller = Controller::with_collaborators(config, mocks.collaborators()).with_progress(false);

    let error = controller.submit("film", None).await.unwrap_err();

    assert!(matches!(
        error.downcast_ref::<ClipCutError>(),
        Some(ClipCutError::TrimFailed { code: Some(1), .. })
    ));
    assert!(!controller.paths("film").final_table().exists());
    assert_eq!(mocks.translator.request_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_submit_withNeverAlignedTranslation_shouldStillWriteTable() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut config = common::config_in(temp_dir.path());
    config.translation.common.max_attempts = 3;
    common::create_test_video(&config, "film")?;
    let mocks = MockCollaborators::new(hello_world()).with_translator(MockTranslator::dropping_last_line());
    let controller = Controller::with_collaborators(config, mocks.collaborators()).with_progress(false);

    let report = controller.submit("film", None).await?;

    assert!(report.translation.is_exhausted());
    assert!(report.records.iter().all(|r| r.translated_text.is_empty()));
    assert!(report.final_table.is_file());
    assert_eq!(mocks.translator.request_count(), 3);
    Ok(())
}

#[tokio::test]
async fn test_submit_shouldWipeOutputTreeOfPreviousRun() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = common::config_in(temp_dir.path());
    common::create_test_video(&config, "film")?;
    let mocks = MockCollaborators::new(hello_world());
    let controller = Controller::with_collaborators(config, mocks.collaborators()).with_progress(false);

    let stale = common::create_test_file(
        &controller.paths("film").movie_output_dir().join("Deste 7"),
        "film_D7.mp4",
        "",
    )?;
    let report = controller.submit("film", None).await?;

    assert!(!stale.exists());
    assert_eq!(report.clips_on_disk, 3);
    Ok(())
}

#[tokio::test]
async fn test_submit_withEmptyTranscript_shouldReportMissingTranscript() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = common::config_in(temp_dir.path());
    common::create_test_video(&config, "film")?;
    let mocks = MockCollaborators::new(Vec::new());
    let controller = Controller::with_collaborators(config, mocks.collaborators()).with_progress(false);

    let error = controller.submit("film", None).await.unwrap_err();

    assert!(matches!(
        error.downcast_ref::<SegmentError>(),
        Some(SegmentError::MissingTranscript)
    ));
    Ok(())
}

#[tokio::test]
async fn test_submit_withMissingVideo_shouldFailBeforeCutting() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = common::config_in(temp_dir.path());
    let mocks = MockCollaborators::new(hello_world());
    let controller = Controller::with_collaborators(config, mocks.collaborators()).with_progress(false);

    let edited = temp_dir.path().join("edited.xlsx");
    table::write_segment_table(&edited, &common::stitched_segments(2, 5))?;
    let result = controller.submit("film", Some(edited.as_path())).await;

    assert!(result.is_err());
    assert!(mocks.trimmer.calls().is_empty());
    Ok(())
}
