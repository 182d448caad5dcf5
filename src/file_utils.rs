use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::app_config::LayoutConfig;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> std::io::Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    // @creates: Empty directory, removing whatever was there
    pub fn recreate_dir<P: AsRef<Path>>(path: P) -> std::io::Result<()> {
        let path = path.as_ref();
        if path.exists() {
            fs::remove_dir_all(path)?;
        }
        fs::create_dir_all(path)
    }

    /// Find files with a specific extension in a directory tree, sorted by path
    pub fn find_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
        let extension = extension.trim_start_matches('.');
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            let matches = path
                .extension()
                .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension));
            if path.is_file() && matches {
                result.push(path.to_path_buf());
            }
        }

        result.sort();
        Ok(result)
    }
}

/// Where every artifact of one movie lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoviePaths {
    movie: String,
    input_dir: PathBuf,
    created_dir: PathBuf,
    output_dir: PathBuf,
    deck_dir_label: String,
    parts_dir_label: String,
}

impl MoviePaths {
    pub fn new(layout: &LayoutConfig, movie: impl Into<String>) -> Self {
        Self {
            movie: movie.into(),
            input_dir: PathBuf::from(&layout.input_dir),
            created_dir: PathBuf::from(&layout.created_dir),
            output_dir: PathBuf::from(&layout.output_dir),
            deck_dir_label: layout.deck_dir_label.clone(),
            parts_dir_label: layout.parts_dir_label.clone(),
        }
    }

    pub fn movie(&self) -> &str {
        &self.movie
    }

    // @path: {input}/{movie}.mp4
    pub fn video(&self) -> PathBuf {
        self.input_dir.join(format!("{}.mp4", self.movie))
    }

    // @path: {created}/{movie}.mp3
    pub fn audio(&self) -> PathBuf {
        self.created_dir.join(format!("{}.mp3", self.movie))
    }

    // @path: {created}/{movie}_transcript.json
    pub fn transcript(&self) -> PathBuf {
        self.created_dir.join(format!("{}_transcript.json", self.movie))
    }

    // @path: {created}/{movie}_data.xlsx
    pub fn segment_table(&self) -> PathBuf {
        self.created_dir.join(format!("{}_data.xlsx", self.movie))
    }

    // @path: {output}/{movie}
    pub fn movie_output_dir(&self) -> PathBuf {
        self.output_dir.join(&self.movie)
    }

    // @path: {output}/{movie}_final_table.xlsx
    pub fn final_table(&self) -> PathBuf {
        self.output_dir.join(format!("{}_final_table.xlsx", self.movie))
    }

    /// Directory of deck `number` (1-based)
    pub fn deck_dir(&self, number: usize) -> PathBuf {
        self.movie_output_dir()
            .join(format!("{} {}", self.deck_dir_label, number))
    }

    /// Part directory of the deck at `index` (0-based), named by its nominal part range
    pub fn parts_dir(&self, index: usize, deck_size: usize) -> PathBuf {
        let first = index * deck_size + 1;
        let last = index * deck_size + deck_size;
        self.deck_dir(index + 1)
            .join(format!("{} {}-{}", self.parts_dir_label, first, last))
    }

    pub fn deck_clip_name(&self, number: usize) -> String {
        format!("{}_D{}.mp4", self.movie, number)
    }

    pub fn part_clip_name(&self, part_number: usize) -> String {
        format!("{}_{}.mp4", self.movie, part_number)
    }
}
