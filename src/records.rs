use std::time::Duration;

use crate::deck_planner::Deck;
use crate::errors::DeckError;
use crate::file_utils::MoviePaths;

// @module: Per-segment output rows

/// One row of the final table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipRecord {
    pub deck_number: usize,
    pub part_number: usize,
    /// 1-based position inside the deck
    pub order: usize,
    pub start_offset: Duration,
    pub end_offset: Duration,
    /// Upper-case source language code
    pub source_language: String,
    pub source_text: String,
    /// Filled by the batch translator
    pub translated_text: String,
    /// Set on part 1 only
    pub deck_filename: String,
    pub part_filename: String,
}

/// Build the records of one deck
pub fn build_records(
    deck: &Deck,
    paths: &MoviePaths,
    source_language: &str,
) -> Result<Vec<ClipRecord>, DeckError> {
    let offsets = deck.offsets()?;
    let source_language = source_language.to_uppercase();

    Ok(deck
        .segments
        .iter()
        .zip(offsets)
        .enumerate()
        .map(|(i, (segment, offset))| ClipRecord {
            deck_number: deck.number(),
            part_number: i + 1,
            order: i + 1,
            start_offset: offset.start,
            end_offset: offset.end,
            source_language: source_language.clone(),
            source_text: segment.text.clone(),
            translated_text: String::new(),
            deck_filename: if i == 0 {
                paths.deck_clip_name(deck.number())
            } else {
                String::new()
            },
            part_filename: paths.part_clip_name(i + 1),
        })
        .collect())
}
