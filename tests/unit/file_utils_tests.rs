/*!
 * Tests for file utility functions and the per-movie layout
 */

use anyhow::Result;
use std::path::Path;

use clipdeck::app_config::LayoutConfig;
use clipdeck::file_utils::{FileManager, MoviePaths};

use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "test_file_exists.tmp", "test content")?;

    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::file_exists(temp_dir.path()));
    Ok(())
}

/// Test that file_exists returns false for non-existent files
#[test]
fn test_file_exists_withNonExistentFile_shouldReturnFalse() {
    assert!(!FileManager::file_exists("non_existent_file.tmp"));
}

#[test]
fn test_ensureDir_shouldCreateNestedDirectories() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("a").join("b").join("c");

    FileManager::ensure_dir(&nested)?;
    FileManager::ensure_dir(&nested)?;

    assert!(nested.is_dir());
    Ok(())
}

#[test]
fn test_recreateDir_shouldLeaveEmptyDirectory() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().join("tree");
    common::create_test_file(&dir.join("sub"), "old.mp4", "x")?;

    FileManager::recreate_dir(&dir)?;

    assert!(dir.is_dir());
    assert_eq!(std::fs::read_dir(&dir)?.count(), 0);
    Ok(())
}

#[test]
fn test_findFiles_shouldMatchExtensionRecursivelyAndSort() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    common::create_test_file(&root.join("b"), "2.mp4", "")?;
    common::create_test_file(&root.join("a"), "1.MP4", "")?;
    common::create_test_file(root, "notes.txt", "")?;

    let found = FileManager::find_files(root, ".mp4")?;

    assert_eq!(found, vec![root.join("a").join("1.MP4"), root.join("b").join("2.mp4")]);
    Ok(())
}

#[test]
fn test_moviePaths_shouldFollowDefaultLayout() {
    let paths = MoviePaths::new(&LayoutConfig::default(), "film");

    assert_eq!(paths.movie(), "film");
    assert_eq!(paths.video(), Path::new("data/input/film.mp4"));
    assert_eq!(paths.audio(), Path::new("data/created/film.mp3"));
    assert_eq!(paths.transcript(), Path::new("data/created/film_transcript.json"));
    assert_eq!(paths.segment_table(), Path::new("data/created/film_data.xlsx"));
    assert_eq!(paths.movie_output_dir(), Path::new("data/out/film"));
    assert_eq!(paths.final_table(), Path::new("data/out/film_final_table.xlsx"));
}

#[test]
fn test_moviePaths_deckAndPartsDirs_shouldUseLabelsAndRanges() {
    let paths = MoviePaths::new(&LayoutConfig::default(), "film");

    assert_eq!(paths.deck_dir(3), Path::new("data/out/film/Deste 3"));
    assert_eq!(
        paths.parts_dir(2, 10),
        Path::new("data/out/film/Deste 3/Partlar 21-30")
    );
    assert_eq!(paths.parts_dir(0, 4), Path::new("data/out/film/Deste 1/Partlar 1-4"));
    assert_eq!(paths.deck_clip_name(3), "film_D3.mp4");
    assert_eq!(paths.part_clip_name(7), "film_7.mp4");
}
