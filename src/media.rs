/*!
 * Media collaborators.
 *
 * The pipeline only sees the `MediaTrimmer` and `AudioExtractor` traits;
 * `FfmpegTool` implements both by running the ffmpeg binary.
 */

use async_trait::async_trait;
use log::{debug, error};
use std::ffi::OsString;
use std::io;
use std::path::Path;
use std::process::Output;
use std::time::Duration;
use tokio::process::Command;

use crate::app_config::MediaConfig;
use crate::timecode;

/// Exit information of a media tool invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrimStatus {
    /// Exit code; `None` when the process was killed by a signal
    pub code: Option<i32>,
    /// Diagnostic output with banner noise removed
    pub stderr: String,
}

impl TrimStatus {
    pub fn ok() -> Self {
        Self {
            code: Some(0),
            stderr: String::new(),
        }
    }

    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stderr: stderr.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    fn from_output(output: &Output) -> Self {
        if output.status.success() {
            return Self::ok();
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        Self {
            code: output.status.code(),
            stderr: filter_ffmpeg_stderr(&stderr),
        }
    }
}

/// Cuts a time range out of a video file
#[async_trait]
pub trait MediaTrimmer: Send + Sync {
    /// Write `[start, end]` of `input` to `output`; `None` end cuts to the end of the source
    async fn cut(
        &self,
        input: &Path,
        output: &Path,
        start: Duration,
        end: Option<Duration>,
    ) -> io::Result<TrimStatus>;
}

/// Extracts the audio track of a video file
#[async_trait]
pub trait AudioExtractor: Send + Sync {
    async fn extract_audio(&self, video: &Path, audio: &Path) -> io::Result<TrimStatus>;
}

/// ffmpeg-backed media tool
#[derive(Debug, Clone)]
pub struct FfmpegTool {
    ffmpeg_path: String,
    video_codec: String,
    audio_codec: String,
}

impl Default for FfmpegTool {
    fn default() -> Self {
        Self::from_config(&MediaConfig::default())
    }
}

impl FfmpegTool {
    pub fn from_config(config: &MediaConfig) -> Self {
        Self {
            ffmpeg_path: config.ffmpeg_path.clone(),
            video_codec: config.video_codec.clone(),
            audio_codec: config.audio_codec.clone(),
        }
    }

    /// Arguments for cutting one clip
    ///
    /// `-ss` before `-i` seeks the input; the range length is passed as `-t`.
    pub fn cut_args(
        &self,
        input: &Path,
        output: &Path,
        start: Duration,
        end: Option<Duration>,
    ) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-y".into(),
            "-ss".into(),
            timecode::ffmpeg_seconds(start).into(),
            "-i".into(),
            input.as_os_str().to_owned(),
        ];
        if let Some(end) = end {
            args.push("-t".into());
            args.push(timecode::ffmpeg_seconds(end.saturating_sub(start)).into());
        }
        args.extend([
            "-c:v".into(),
            self.video_codec.clone().into(),
            "-c:a".into(),
            self.audio_codec.clone().into(),
            output.as_os_str().to_owned(),
        ]);
        args
    }

    /// Arguments for extracting the audio track at best VBR quality
    pub fn audio_args(&self, video: &Path, audio: &Path) -> Vec<OsString> {
        vec![
            "-y".into(),
            "-i".into(),
            video.as_os_str().to_owned(),
            "-vn".into(),
            "-q:a".into(),
            "0".into(),
            audio.as_os_str().to_owned(),
        ]
    }

    async fn run(&self, args: Vec<OsString>) -> io::Result<TrimStatus> {
        debug!("Running {} {:?}", self.ffmpeg_path, args);
        let output = Command::new(&self.ffmpeg_path).args(&args).output().await?;
        let status = TrimStatus::from_output(&output);
        if !status.success() {
            error!("ffmpeg exited with {:?}: {}", status.code, status.stderr);
        }
        Ok(status)
    }
}

#[async_trait]
impl MediaTrimmer for FfmpegTool {
    async fn cut(
        &self,
        input: &Path,
        output: &Path,
        start: Duration,
        end: Option<Duration>,
    ) -> io::Result<TrimStatus> {
        self.run(self.cut_args(input, output, start, end)).await
    }
}

#[async_trait]
impl AudioExtractor for FfmpegTool {
    async fn extract_audio(&self, video: &Path, audio: &Path) -> io::Result<TrimStatus> {
        self.run(self.audio_args(video, audio)).await
    }
}

/// Keep only the meaningful lines of ffmpeg's stderr, dropping the version
/// banner and stream listings
pub fn filter_ffmpeg_stderr(stderr: &str) -> String {
    const NOISE: [&str; 14] = [
        "ffmpeg version",
        "built with",
        "configuration:",
        "lib",
        "Input #",
        "Metadata:",
        "Duration:",
        "Chapter",
        "Stream #",
        "encoder",
        "handler_name",
        "Output #",
        "Stream mapping:",
        "Press [q]",
    ];

    let meaningful: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !NOISE.iter().any(|p| line.starts_with(p)))
        .collect();

    if meaningful.is_empty() {
        "unknown ffmpeg error".to_string()
    } else {
        meaningful.join("\n")
    }
}
