use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app_config::Config;
use crate::clip_cutter::{self, ClipCutter};
use crate::deck_planner;
use crate::errors::SegmentError;
use crate::file_utils::{FileManager, MoviePaths};
use crate::media::{AudioExtractor, FfmpegTool, MediaTrimmer};
use crate::records::{build_records, ClipRecord};
use crate::segmenter;
use crate::table;
use crate::transcription::{SpeechToText, Transcript, WhisperTranscriber};
use crate::translation::{BatchTranslation, BatchTranslator, TextTranslator, TranslationService};

// @module: Application controller sequencing the pipeline

/// External services the pipeline depends on
#[derive(Clone)]
pub struct Collaborators {
    pub speech_to_text: Arc<dyn SpeechToText>,
    pub translator: Arc<dyn TextTranslator>,
    pub trimmer: Arc<dyn MediaTrimmer>,
    pub audio_extractor: Arc<dyn AudioExtractor>,
}

/// What `transcribe` produced or reused
#[derive(Debug, Clone)]
pub struct TranscribeReport {
    pub audio: PathBuf,
    pub transcript: PathBuf,
    pub segment_table: PathBuf,
    pub segment_count: usize,
    /// Stages skipped because their artifact already existed
    pub reused: Vec<&'static str>,
}

/// What `submit` produced
#[derive(Debug, Clone)]
pub struct SubmitReport {
    pub records: Vec<ClipRecord>,
    /// Clips in cutting order, each deck clip followed by its part clips
    pub clips: Vec<PathBuf>,
    /// `.mp4` files found under the movie's output tree afterwards
    pub clips_on_disk: usize,
    pub deck_count: usize,
    pub final_table: PathBuf,
    pub output_dir: PathBuf,
    pub translation: BatchTranslation,
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Injected services
    collaborators: Collaborators,
    // @field: Draw a progress bar while cutting
    show_progress: bool,
}

impl Controller {
    // @method: Create a controller backed by the configured providers and ffmpeg
    pub fn with_config(config: Config) -> Result<Self> {
        let translator = TranslationService::new(
            config.translation.clone(),
            &config.source_language,
            &config.target_language,
        )
        .context("Failed to create translation service")?;
        let transcriber =
            WhisperTranscriber::from_config(&config.transcription, &config.translation.common);
        let ffmpeg = Arc::new(FfmpegTool::from_config(&config.media));

        let collaborators = Collaborators {
            speech_to_text: Arc::new(transcriber),
            translator: Arc::new(translator),
            trimmer: ffmpeg.clone(),
            audio_extractor: ffmpeg,
        };
        Ok(Self::with_collaborators(config, collaborators))
    }

    // @method: Create a controller with explicit collaborators
    pub fn with_collaborators(config: Config, collaborators: Collaborators) -> Self {
        Self {
            config,
            collaborators,
            show_progress: true,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Artifact layout of `movie`
    pub fn paths(&self, movie: &str) -> MoviePaths {
        MoviePaths::new(&self.config.layout, movie)
    }

    /// Extract audio, transcribe it and write the segment table
    ///
    /// Each stage is skipped when its artifact already exists, unless `force`.
    pub async fn transcribe(&self, movie: &str, force: bool) -> Result<TranscribeReport> {
        let paths = self.paths(movie);
        let mut reused = Vec::new();
        FileManager::ensure_dir(self.config.layout.created_dir.as_str())
            .context("Failed to create intermediate directory")?;

        let audio = paths.audio();
        if force || !FileManager::file_exists(&audio) {
            let video = paths.video();
            if !FileManager::file_exists(&video) {
                return Err(anyhow!("Input video does not exist: {:?}", video));
            }
            info!("Extracting audio from {:?}", video);
            let status = self
                .collaborators
                .audio_extractor
                .extract_audio(&video, &audio)
                .await
                .context("Failed to run audio extraction")?;
            if !status.success() {
                return Err(anyhow!(
                    "Audio extraction failed with status {:?}: {}",
                    status.code,
                    status.stderr
                ));
            }
        } else {
            debug!("Reusing audio {:?}", audio);
            reused.push("audio");
        }

        let transcript_path = paths.transcript();
        let transcript = if force || !FileManager::file_exists(&transcript_path) {
            let transcript = self
                .collaborators
                .speech_to_text
                .transcribe_full(&audio)
                .await
                .context("Transcription failed")?;
            transcript.save(&transcript_path)?;
            transcript
        } else {
            debug!("Reusing transcript {:?}", transcript_path);
            reused.push("transcript");
            Transcript::load(&transcript_path)
                .with_context(|| format!("Failed to load transcript {:?}", transcript_path))?
        };

        let segment_table = paths.segment_table();
        let segment_count = if force || !FileManager::file_exists(&segment_table) {
            let segments = segmenter::segment(&transcript.segments)?;
            table::write_segment_table(&segment_table, &segments)?;
            segments.len()
        } else {
            debug!("Reusing segment table {:?}", segment_table);
            reused.push("segment table");
            table::read_segment_table(&segment_table)?.len()
        };

        info!("{} segments in {:?}", segment_count, segment_table);
        Ok(TranscribeReport {
            audio,
            transcript: transcript_path,
            segment_table,
            segment_count,
            reused,
        })
    }

    /// Cut clips, translate and write the final table for `movie`
    ///
    /// Uses `table` when given, otherwise the movie's segment table, which is
    /// produced first if it does not exist yet.
    pub async fn submit(&self, movie: &str, table_path: Option<&Path>) -> Result<SubmitReport> {
        let paths = self.paths(movie);
        let deck_size = self.config.layout.deck_size;

        let table_path = match table_path {
            Some(path) => path.to_path_buf(),
            None => {
                let path = paths.segment_table();
                if !FileManager::file_exists(&path) {
                    info!("No segment table for '{}', transcribing first", movie);
                    self.transcribe(movie, false).await?;
                }
                path
            }
        };

        let segments = table::read_segment_table(&table_path)
            .with_context(|| format!("Failed to load segment table {:?}", table_path))?;
        if segments.is_empty() {
            return Err(SegmentError::MissingTranscript.into());
        }

        let decks = deck_planner::plan(&segments, deck_size)?;
        let video = paths.video();
        if !FileManager::file_exists(&video) {
            return Err(anyhow!("Input video does not exist: {:?}", video));
        }

        let output_dir = clip_cutter::prepare_output_tree(&paths)?;
        let cutter = ClipCutter::new(&paths, self.collaborators.trimmer.as_ref(), deck_size);
        let progress = self.deck_progress_bar(decks.len() as u64);

        let mut clips = Vec::new();
        let mut records = Vec::with_capacity(segments.len());
        for deck in &decks {
            progress.set_message(format!("Deck {}", deck.number()));
            clips.extend(cutter.cut(deck).await?);
            records.extend(build_records(deck, &paths, &self.config.source_language)?);
            progress.inc(1);
        }
        progress.finish_and_clear();

        let translation = BatchTranslator::new(
            self.collaborators.translator.as_ref(),
            self.config.translation.common.max_attempts,
        )
        .translate_records(&mut records)
        .await
        .context("Translation failed")?;
        if translation.is_exhausted() {
            warn!(
                "Translation column left empty for '{}' after {} attempts",
                movie, translation.attempts
            );
        }

        let final_table = paths.final_table();
        if let Some(parent) = final_table.parent() {
            FileManager::ensure_dir(parent).context("Failed to create output directory")?;
        }
        table::write_final_table(
            &final_table,
            &records,
            &self.config.source_language,
            &self.config.target_language,
        )?;

        let clips_on_disk = FileManager::find_files(&output_dir, "mp4")?.len();
        info!(
            "{} records, {} clips in {} decks; final table {:?}",
            records.len(),
            clips.len(),
            decks.len(),
            final_table
        );

        Ok(SubmitReport {
            records,
            clips,
            clips_on_disk,
            deck_count: decks.len(),
            final_table,
            output_dir,
            translation,
        })
    }

    fn deck_progress_bar(&self, len: u64) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let progress_bar = ProgressBar::new(len);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} decks ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));
        progress_bar
    }
}
