// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use clipdeck::app_config::{self, Config, TranslationProvider};
use clipdeck::app_controller::{Controller, SubmitReport, TranscribeReport};
use clipdeck::file_utils::{FileManager, MoviePaths};

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    Ollama,
    OpenAI,
    Anthropic,
    LMStudio,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::Ollama => TranslationProvider::Ollama,
            CliTranslationProvider::OpenAI => TranslationProvider::OpenAI,
            CliTranslationProvider::Anthropic => TranslationProvider::Anthropic,
            CliTranslationProvider::LMStudio => TranslationProvider::LMStudio,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract audio, transcribe it and write the editable segment table
    Transcribe {
        /// Movie name, the video is read from <input_dir>/<MOVIE>.mp4
        #[arg(value_name = "MOVIE")]
        movie: String,

        /// Redo every stage even when its artifact already exists
        #[arg(short, long)]
        force: bool,
    },

    /// Cut deck and part clips, translate and write the final table
    Submit {
        /// Movie name, the video is read from <input_dir>/<MOVIE>.mp4
        #[arg(value_name = "MOVIE")]
        movie: String,

        /// Edited segment table to use instead of the generated one
        #[arg(long, value_name = "PATH")]
        table: Option<PathBuf>,
    },

    /// Generate shell completions for clipdeck
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct GlobalOptions {
    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config_path: String,

    /// Translation provider to use
    #[arg(short, long, global = true, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use for translation
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// Target language code (e.g., 'tr', 'es', 'fr')
    #[arg(short, long, global = true)]
    target_language: Option<String>,

    /// Segments per deck
    #[arg(short, long, global = true)]
    deck_size: Option<usize>,

    /// Exit with an error when translation never lines up with the source
    #[arg(long, global = true)]
    strict_translation: bool,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// clipdeck - translated clip decks from long-form video
///
/// Transcribes a movie, groups its segments into decks, cuts one clip per
/// deck and per segment, and writes a spreadsheet pairing every clip with
/// its source text and translation.
#[derive(Parser, Debug)]
#[command(name = "clipdeck")]
#[command(version)]
#[command(about = "Translated clip decks from long-form video")]
#[command(long_about = "clipdeck turns a movie into short translated clips grouped into decks.

EXAMPLES:
    clipdeck transcribe movie                     # Transcribe data/input/movie.mp4
    clipdeck transcribe --force movie             # Redo audio, transcript and segment table
    clipdeck submit movie                         # Cut clips and write the final table
    clipdeck submit movie --table edited.xlsx     # Use a hand-edited segment table
    clipdeck -p anthropic -t de submit movie      # Translate into German with Anthropic
    clipdeck completions bash > clipdeck.bash     # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.

SUPPORTED PROVIDERS:
    openai    - OpenAI API (requires API key)
    anthropic - Anthropic Claude API (requires API key)
    ollama    - Local Ollama server
    lmstudio  - LM Studio local server (OpenAI-compatible on http://localhost:1234/v1)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    options: GlobalOptions,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => "",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color of the level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let level = record.level();

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {}{}\x1B[0m",
                Self::get_color_for_level(level),
                now,
                Self::get_emoji_for_level(level),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Trace lets every record through; the effective level is set with set_max_level
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "clipdeck", &mut std::io::stdout());
            Ok(())
        }
        Commands::Transcribe { movie, force } => {
            let config = load_config(&cli.options)?;
            if force || !FileManager::file_exists(layout_transcript(&config, &movie)) {
                config
                    .validate_transcription()
                    .context("Configuration validation failed")?;
            }

            let controller = Controller::with_config(config)?;
            let report = controller.transcribe(&movie, force).await?;
            print_transcribe_report(&report);
            Ok(())
        }
        Commands::Submit { movie, table } => {
            let config = load_config(&cli.options)?;
            config
                .validate_translation()
                .context("Configuration validation failed")?;
            if table.is_none()
                && !FileManager::file_exists(layout_segment_table(&config, &movie))
                && !FileManager::file_exists(layout_transcript(&config, &movie))
            {
                config
                    .validate_transcription()
                    .context("Configuration validation failed")?;
            }

            let controller = Controller::with_config(config)?;
            let report = controller.submit(&movie, table.as_deref()).await?;
            print_submit_report(&report);

            if cli.options.strict_translation && report.translation.is_exhausted() {
                return Err(anyhow!(
                    "Translation did not line up with the source after {} attempts",
                    report.translation.attempts
                ));
            }
            Ok(())
        }
    }
}

fn layout_transcript(config: &Config, movie: &str) -> PathBuf {
    MoviePaths::new(&config.layout, movie).transcript()
}

fn layout_segment_table(config: &Config, movie: &str) -> PathBuf {
    MoviePaths::new(&config.layout, movie).segment_table()
}

/// Load the config file, creating a default one when missing, and apply CLI overrides
fn load_config(options: &GlobalOptions) -> Result<Config> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let config_path = &options.config_path;
    let mut config = if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    if let Some(provider) = &options.provider {
        config.translation.provider = provider.clone().into();
    }

    if let Some(model) = &options.model {
        config.translation.active_provider_config_mut().model = model.clone();
    }

    if let Some(target_lang) = &options.target_language {
        config.target_language = target_lang.clone();
    }

    if let Some(deck_size) = options.deck_size {
        config.layout.deck_size = deck_size;
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    } else {
        log::set_max_level(config.log_level.to_level_filter());
    }

    config.validate().context("Configuration validation failed")?;

    info!(
        "Using {} ({}) for {} -> {}",
        config.translation.provider.display_name(),
        config.translation.get_model(),
        config.source_language,
        config.target_language
    );

    Ok(config)
}

fn print_transcribe_report(report: &TranscribeReport) {
    if !report.reused.is_empty() {
        info!("Reused existing {}", report.reused.join(", "));
    }
    info!("Segments: {}", report.segment_count);
    info!("Audio: {:?}", report.audio);
    info!("Transcript: {:?}", report.transcript);
    info!("Success: {:?}", report.segment_table);
}

fn print_submit_report(report: &SubmitReport) {
    info!(
        "Records: {}, clips: {} ({} on disk) in {} decks",
        report.records.len(),
        report.clips.len(),
        report.clips_on_disk,
        report.deck_count
    );
    if report.translation.is_exhausted() {
        warn!(
            "Translation column is empty after {} attempts",
            report.translation.attempts
        );
    }
    info!("Clips: {:?}", report.output_dir);
    info!("Success: {:?}", report.final_table);
}
