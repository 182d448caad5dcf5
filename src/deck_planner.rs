/*!
 * Deck planning.
 *
 * Partitions the ordered segment sequence into fixed-size decks and computes
 * the deck-relative offsets of every segment.
 */

use log::debug;
use std::time::Duration;

use crate::errors::DeckError;
use crate::segmenter::Segment;

/// Default number of segments per deck
pub const DEFAULT_DECK_SIZE: usize = 10;

/// A contiguous group of segments cut and published together
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    /// 0-based position of the deck in the movie
    pub index: usize,
    /// Segments of the deck, in playback order
    pub segments: Vec<Segment>,
}

/// Offsets of one segment relative to its deck's first segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartOffset {
    pub start: Duration,
    pub end: Duration,
}

impl Deck {
    /// 1-based number used in directory names and records
    pub fn number(&self) -> usize {
        self.index + 1
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Fail when the deck has no segments
    pub fn ensure_not_empty(&self) -> Result<(), DeckError> {
        if self.segments.is_empty() {
            return Err(DeckError::EmptyDeck {
                deck_number: self.number(),
            });
        }
        Ok(())
    }

    /// First segment of the deck
    pub fn first(&self) -> Result<&Segment, DeckError> {
        self.segments.first().ok_or(DeckError::EmptyDeck {
            deck_number: self.number(),
        })
    }

    /// Last segment of the deck
    pub fn last(&self) -> Result<&Segment, DeckError> {
        self.segments.last().ok_or(DeckError::EmptyDeck {
            deck_number: self.number(),
        })
    }

    /// Offsets of every segment, measured from the first segment's original start
    pub fn offsets(&self) -> Result<Vec<PartOffset>, DeckError> {
        let base = self.first()?.duration_start;
        Ok(self
            .segments
            .iter()
            .map(|segment| PartOffset {
                start: segment.duration_start.saturating_sub(base),
                end: segment.duration_end.saturating_sub(base),
            })
            .collect())
    }
}

/// Split segments into decks of `deck_size`
///
/// Produces `ceil(n / deck_size)` decks; only the last one may be short.
pub fn plan(segments: &[Segment], deck_size: usize) -> Result<Vec<Deck>, DeckError> {
    if deck_size == 0 {
        return Err(DeckError::InvalidDeckSize(deck_size));
    }

    let decks: Vec<Deck> = segments
        .chunks(deck_size)
        .enumerate()
        .map(|(index, chunk)| Deck {
            index,
            segments: chunk.to_vec(),
        })
        .collect();

    debug!(
        "Planned {} decks for {} segments (deck size {})",
        decks.len(),
        segments.len(),
        deck_size
    );

    Ok(decks)
}
