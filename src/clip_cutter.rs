/*!
 * Clip cutting.
 *
 * For every deck this produces one clip spanning the whole deck plus one clip
 * per segment, laid out as
 *
 * ```text
 * {output}/{movie}/{deck label} {n}/{movie}_D{n}.mp4
 * {output}/{movie}/{deck label} {n}/{parts label} {a}-{b}/{movie}_{i}.mp4
 * ```
 */

use log::{debug, info};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::deck_planner::Deck;
use crate::errors::ClipCutError;
use crate::file_utils::{FileManager, MoviePaths};
use crate::media::MediaTrimmer;

/// Wipe and recreate the movie's output tree
pub fn prepare_output_tree(paths: &MoviePaths) -> Result<PathBuf, ClipCutError> {
    let root = paths.movie_output_dir();
    FileManager::recreate_dir(&root).map_err(|source| ClipCutError::Layout {
        path: root.clone(),
        source,
    })?;
    debug!("Prepared output tree {:?}", root);
    Ok(root)
}

/// Cuts deck and part clips out of one source video
pub struct ClipCutter<'a> {
    paths: &'a MoviePaths,
    trimmer: &'a dyn MediaTrimmer,
    deck_size: usize,
}

impl<'a> ClipCutter<'a> {
    pub fn new(paths: &'a MoviePaths, trimmer: &'a dyn MediaTrimmer, deck_size: usize) -> Self {
        Self {
            paths,
            trimmer,
            deck_size,
        }
    }

    /// Cut all clips of a deck
    ///
    /// Returns the deck clip first, then the part clips in playback order.
    pub async fn cut(&self, deck: &Deck) -> Result<Vec<PathBuf>, ClipCutError> {
        deck.ensure_not_empty()?;
        let first = deck.first()?;
        let last = deck.last()?;

        let deck_dir = self.paths.deck_dir(deck.number());
        let parts_dir = self.paths.parts_dir(deck.index, self.deck_size);
        for dir in [&deck_dir, &parts_dir] {
            FileManager::ensure_dir(dir).map_err(|source| ClipCutError::Layout {
                path: dir.clone(),
                source,
            })?;
        }

        let source = self.paths.video();
        let mut produced = Vec::with_capacity(deck.len() + 1);

        let deck_clip = deck_dir.join(self.paths.deck_clip_name(deck.number()));
        self.trim(&source, &deck_clip, first.start, Some(last.playback_end()))
            .await?;
        produced.push(deck_clip);

        for (i, segment) in deck.segments.iter().enumerate() {
            let part_clip = parts_dir.join(self.paths.part_clip_name(i + 1));
            self.trim(&source, &part_clip, segment.start, Some(segment.playback_end()))
                .await?;
            produced.push(part_clip);
        }

        info!(
            "Deck {}: cut {} clips into {:?}",
            deck.number(),
            produced.len(),
            deck_dir
        );
        Ok(produced)
    }

    async fn trim(
        &self,
        input: &Path,
        output: &Path,
        start: Duration,
        end: Option<Duration>,
    ) -> Result<(), ClipCutError> {
        let status = self
            .trimmer
            .cut(input, output, start, end)
            .await
            .map_err(|source| ClipCutError::Spawn {
                output: output.to_path_buf(),
                source,
            })?;

        if !status.success() {
            return Err(ClipCutError::TrimFailed {
                output: output.to_path_buf(),
                code: status.code,
                message: status.stderr,
            });
        }
        Ok(())
    }
}
