use anyhow::{Result, Context, anyhow};
use log::{error, warn, info, debug};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use indicatif::{ProgressBar, ProgressStyle};

use crate::app_config::Config;
use crate::batch::{BatchConverter, FileOutcome, SRT_EXTENSION};
use crate::file_utils::FileManager;
use crate::itt::IttEncoder;
use crate::subtitle_processor::{Segment, SrtEncoder};

// @module: Application controller for subtitle conversion

/// Segment files come either as a bare list or wrapped in a transcription result
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SegmentFile {
    Wrapped { segments: Vec<Segment> },
    Bare(Vec<Segment>),
}

/// Counts and per-file outcomes of a conversion run
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub warnings: usize,
    pub outcomes: Vec<FileOutcome>,
}

impl BatchSummary {
    fn from_outcomes(outcomes: Vec<FileOutcome>) -> Self {
        // Warning-class errors never count as failures
        let failed = outcomes
            .iter()
            .filter_map(FileOutcome::error)
            .filter(|e| !e.is_warning())
            .count();
        let warnings = outcomes
            .iter()
            .filter_map(|o| o.warning.as_ref().or(o.error()))
            .filter(|e| e.is_warning())
            .count();
        Self {
            succeeded: outcomes.len() - failed,
            failed,
            warnings,
            outcomes,
        }
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// Main application controller for subtitle conversion
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn batch_converter(&self) -> BatchConverter {
        BatchConverter::new(
            IttEncoder::with_indent(self.config.output.indent_size),
            self.config.batch.concurrency,
        )
    }

    /// Convert SRT inputs (files or directories) to ITT files next to them
    pub async fn run_convert(&self, inputs: &[PathBuf]) -> Result<BatchSummary> {
        let start_time = std::time::Instant::now();

        let paths = FileManager::expand_inputs(inputs, SRT_EXTENSION, self.config.batch.recursive)?;
        let candidates = paths.iter().filter(|p| BatchConverter::accepts(p)).count();
        if candidates == 0 {
            warn!("No SRT files found in the given inputs");
            return Ok(BatchSummary::default());
        }

        debug!("Converting {} SRT file(s) with up to {} in parallel", candidates, self.config.batch.concurrency);

        let progress_bar = ProgressBar::new(candidates as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));

        let bar = progress_bar.clone();
        let outcomes = self
            .batch_converter()
            .convert_all_with_progress(&paths, move |done, _total| bar.set_position(done as u64))
            .await;

        progress_bar.finish_and_clear();

        for outcome in &outcomes {
            Self::log_outcome(outcome);
        }

        let summary = BatchSummary::from_outcomes(outcomes);
        info!(
            "Converted {} file(s), {} failed, {} warning(s) in {}",
            summary.succeeded,
            summary.failed,
            summary.warnings,
            Self::format_duration(start_time.elapsed())
        );

        Ok(summary)
    }

    /// Write an SRT file from a segments JSON file.
    ///
    /// The output goes to `output` when given, otherwise next to `media_path`
    /// (or the segments file) with an `.srt` extension.
    pub fn run_encode(&self, segments_path: &Path, media_path: Option<&Path>, output: Option<&Path>) -> Result<PathBuf> {
        let segments = Self::load_segments(segments_path)?;

        let output_path = match (output, media_path) {
            (Some(output), _) => output.to_path_buf(),
            (None, Some(media)) => FileManager::replace_extension(media, SRT_EXTENSION),
            (None, None) => FileManager::replace_extension(segments_path, SRT_EXTENSION),
        };

        if output_path == segments_path {
            return Err(anyhow!("Refusing to overwrite the segments file: {:?}", segments_path));
        }

        SrtEncoder::write_to_file(&segments, &output_path)
            .with_context(|| format!("Failed to write subtitles to {:?}", output_path))?;

        info!("Subtitles written: {:?} ({} cues)", output_path, segments.len());
        Ok(output_path)
    }

    /// Read transcription segments from JSON
    pub fn load_segments(path: &Path) -> Result<Vec<Segment>> {
        let content = FileManager::read_to_string(path)?;
        let parsed: SegmentFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse segments file: {:?}", path))?;

        let segments = match parsed {
            SegmentFile::Wrapped { segments } => segments,
            SegmentFile::Bare(segments) => segments,
        };

        if segments.is_empty() {
            warn!("Segments file {:?} contains no segments", path);
        }

        Ok(segments)
    }

    fn log_outcome(outcome: &FileOutcome) {
        if let Some(output_path) = outcome.output_path() {
            info!("Converted: {:?} -> {:?}", outcome.path, output_path);
        }
        if let Some(e) = outcome.error() {
            if e.is_warning() {
                warn!("{:?}: {}", outcome.path, e);
            } else {
                error!("Failed to convert {:?}: {}", outcome.path, e);
            }
        }
        if let Some(warning) = &outcome.warning {
            warn!("{}", warning);
        }
    }

    /// Format a duration in a human-readable form
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
